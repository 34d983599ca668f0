/// Public file storage for uploaded images and documents
///
/// Files are addressed by a disk-relative path such as
/// `announcements/0b6e....jpg` or `user_pdfs/{user_id}/....pdf`. The same
/// path is stored in the database and later resolved into a public URL by
/// [`crate::media`].
///
/// # Directories
///
/// - [`ANNOUNCEMENTS_DIR`], [`ACTIVITIES_DIR`], [`CHURCH_OFFICIALS_DIR`]: images
/// - [`user_pdf_dir`]: per-user document slots
///
/// The [`FileStore`] trait is the seam handlers depend on; [`LocalDisk`] is
/// the implementation used in production and tests.

use async_trait::async_trait;
use uuid::Uuid;

mod local;

pub use local::LocalDisk;

pub const ANNOUNCEMENTS_DIR: &str = "announcements";
pub const ACTIVITIES_DIR: &str = "activities";
pub const CHURCH_OFFICIALS_DIR: &str = "church-officials";
pub const USER_PDFS_DIR: &str = "user_pdfs";

/// Directory holding one user's documents
pub fn user_pdf_dir(user_id: Uuid) -> String {
    format!("{}/{}", USER_PDFS_DIR, user_id)
}

/// Storage error types
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Path escapes the disk root or is otherwise unusable
    #[error("Invalid storage path: {0}")]
    InvalidPath(String),

    /// No file at the given path
    #[error("File not found: {0}")]
    NotFound(String),

    /// Underlying filesystem failure
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Disk-backed file store
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Writes `contents` under `directory` with a fresh unique name
    ///
    /// Returns the disk-relative path of the new file.
    async fn put(&self, directory: &str, extension: &str, contents: &[u8]) -> StorageResult<String>;

    /// Reads a whole file
    async fn read(&self, path: &str) -> StorageResult<Vec<u8>>;

    /// Deletes a file, returning false when nothing was there
    async fn delete(&self, path: &str) -> StorageResult<bool>;

    /// Whether a regular file exists at `path`
    async fn exists(&self, path: &str) -> StorageResult<bool>;

    /// Removes a directory and everything below it
    async fn delete_dir(&self, directory: &str) -> StorageResult<()>;
}

/// Checks a disk-relative path and returns its normalized form
///
/// Rejects empty paths, absolute paths, and any `..` or `.` segment.
pub fn validate_relative_path(path: &str) -> StorageResult<String> {
    let normalized = path.replace('\\', "/");

    if normalized.is_empty() || normalized.starts_with('/') || normalized.contains(':') {
        return Err(StorageError::InvalidPath(path.to_string()));
    }

    let valid = normalized
        .split('/')
        .all(|segment| !segment.is_empty() && segment != "." && segment != "..");

    if !valid {
        return Err(StorageError::InvalidPath(path.to_string()));
    }

    Ok(normalized)
}

/// Lowercased extension of a client file name, limited to `allowed`
pub fn allowed_extension(file_name: &str, allowed: &[&str]) -> Option<String> {
    let (_, ext) = file_name.rsplit_once('.')?;
    let ext = ext.to_ascii_lowercase();
    allowed.contains(&ext.as_str()).then_some(ext)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_relative_path() {
        assert_eq!(
            validate_relative_path("announcements/a.jpg").unwrap(),
            "announcements/a.jpg"
        );
        assert_eq!(
            validate_relative_path("user_pdfs\\u\\a.pdf").unwrap(),
            "user_pdfs/u/a.pdf"
        );

        for bad in ["", "/etc/passwd", "../secret", "a/../../b", "a//b", "./a", "C:/x"] {
            assert!(validate_relative_path(bad).is_err(), "{:?} should be rejected", bad);
        }
    }

    #[test]
    fn test_allowed_extension() {
        let images = ["jpg", "jpeg", "png", "webp"];
        assert_eq!(allowed_extension("Foto.JPG", &images), Some("jpg".to_string()));
        assert_eq!(allowed_extension("archive.tar.png", &images), Some("png".to_string()));
        assert_eq!(allowed_extension("script.exe", &images), None);
        assert_eq!(allowed_extension("noext", &images), None);
    }

    #[test]
    fn test_user_pdf_dir() {
        let id = Uuid::nil();
        assert_eq!(
            user_pdf_dir(id),
            "user_pdfs/00000000-0000-0000-0000-000000000000"
        );
    }
}
