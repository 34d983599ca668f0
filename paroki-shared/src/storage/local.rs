/// Local filesystem implementation of [`FileStore`]

use super::{validate_relative_path, FileStore, StorageError, StorageResult};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::PathBuf;
use tracing::{debug, info};
use uuid::Uuid;

/// Files stored below a root directory
#[derive(Debug, Clone)]
pub struct LocalDisk {
    root: PathBuf,
}

impl LocalDisk {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Creates the root directory when missing
    pub async fn ensure_root(&self) -> StorageResult<()> {
        tokio::fs::create_dir_all(&self.root).await?;
        info!(root = %self.root.display(), "Public storage disk ready");
        Ok(())
    }

    fn absolute(&self, path: &str) -> StorageResult<PathBuf> {
        let relative = validate_relative_path(path)?;
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl FileStore for LocalDisk {
    async fn put(&self, directory: &str, extension: &str, contents: &[u8]) -> StorageResult<String> {
        let directory = validate_relative_path(directory)?;
        if extension.is_empty() || !extension.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(StorageError::InvalidPath(format!("extension {:?}", extension)));
        }

        let relative = format!("{}/{}.{}", directory, Uuid::new_v4(), extension);
        let absolute = self.root.join(&relative);

        if let Some(parent) = absolute.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&absolute, contents).await?;

        debug!(path = %relative, bytes = contents.len(), "Stored file");
        Ok(relative)
    }

    async fn read(&self, path: &str) -> StorageResult<Vec<u8>> {
        let absolute = self.absolute(path)?;
        match tokio::fs::read(&absolute).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(StorageError::NotFound(path.to_string())),
            Err(e) => Err(e.into()),
        }
    }

    async fn delete(&self, path: &str) -> StorageResult<bool> {
        let absolute = self.absolute(path)?;
        match tokio::fs::remove_file(&absolute).await {
            Ok(()) => {
                debug!(path, "Deleted file");
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn exists(&self, path: &str) -> StorageResult<bool> {
        let absolute = match self.absolute(path) {
            Ok(absolute) => absolute,
            Err(StorageError::InvalidPath(_)) => return Ok(false),
            Err(e) => return Err(e),
        };

        match tokio::fs::metadata(&absolute).await {
            Ok(meta) => Ok(meta.is_file()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn delete_dir(&self, directory: &str) -> StorageResult<()> {
        let absolute = self.absolute(directory)?;
        match tokio::fs::remove_dir_all(&absolute).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    /// Disk rooted in a fresh directory that is removed when the guard drops
    fn scratch_disk() -> (TempDir, LocalDisk) {
        let dir = TempDir::new().unwrap();
        let disk = LocalDisk::new(dir.path().join("public"));
        (dir, disk)
    }

    #[tokio::test]
    async fn test_put_read_delete() {
        let (_dir, disk) = scratch_disk();
        disk.ensure_root().await.unwrap();

        let path = disk.put("announcements", "jpg", b"image-bytes").await.unwrap();
        assert!(path.starts_with("announcements/"));
        assert!(path.ends_with(".jpg"));
        assert!(disk.exists(&path).await.unwrap());
        assert_eq!(disk.read(&path).await.unwrap(), b"image-bytes");

        assert!(disk.delete(&path).await.unwrap());
        assert!(!disk.delete(&path).await.unwrap());
        assert!(!disk.exists(&path).await.unwrap());
        assert!(matches!(disk.read(&path).await, Err(StorageError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_put_generates_unique_names() {
        let (_dir, disk) = scratch_disk();
        let a = disk.put("user_pdfs/u1", "pdf", b"%PDF-1").await.unwrap();
        let b = disk.put("user_pdfs/u1", "pdf", b"%PDF-1").await.unwrap();
        assert_ne!(a, b);

        disk.delete_dir("user_pdfs/u1").await.unwrap();
        assert!(!disk.exists(&a).await.unwrap());
        disk.delete_dir("user_pdfs/u1").await.unwrap();
    }

    #[tokio::test]
    async fn test_rejects_escaping_paths() {
        let (_dir, disk) = scratch_disk();
        assert!(disk.put("../outside", "txt", b"x").await.is_err());
        assert!(disk.put("announcements", "j/pg", b"x").await.is_err());
        assert!(disk.read("../../etc/passwd").await.is_err());
        assert!(!disk.exists("../../etc/passwd").await.unwrap());
    }
}
