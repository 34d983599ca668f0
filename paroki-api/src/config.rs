/// Configuration for the API server
///
/// Loaded from environment variables, with a `.env` file honoured in
/// development. Invalid values fail startup rather than falling back.
///
/// # Environment Variables
///
/// - `API_HOST` (default `0.0.0.0`), `API_PORT` (default `8080`)
/// - `CORS_ORIGINS`: comma-separated origins, `*` for any (default `*`)
/// - `PRODUCTION`: enables HSTS (default `false`)
/// - `APP_NAME` (default `Paroki`), `APP_URL` (default `http://localhost:8080`)
/// - `APP_TIMEZONE`: `WIB`, `WITA` or `WIT` (default `WITA`)
/// - `DATABASE_URL` (required), `DATABASE_MAX_CONNECTIONS` (default 10)
/// - `JWT_SECRET` (required, at least 32 characters)
/// - `STORAGE_ROOT` (default `storage/app/public`)
/// - `ASSETS_ROOT`: directory served as `/assets` (default `public/assets`)
/// - `DEFAULT_IMAGE` (default `assets/images/default.jpg`)
/// - `MAX_PDF_BYTES` (default 5 MiB), `MAX_IMAGE_BYTES` (default 2 MiB)
///
/// # Example
///
/// ```no_run
/// use paroki_api::config::Config;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// println!("Server will listen on {}", config.bind_address());
/// # Ok(())
/// # }
/// ```

use paroki_shared::calendar::ParishTimezone;
use paroki_shared::media::MediaUrls;
use serde::Serialize;
use std::env;
use std::path::PathBuf;

const MIB: usize = 1024 * 1024;

#[derive(Debug, Clone, Serialize)]
pub struct Config {
    pub api: ApiConfig,
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Serialize)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,

    /// Allowed CORS origins; `["*"]` allows any
    pub cors_origins: Vec<String>,

    pub production: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct AppConfig {
    /// Parish name printed on reports
    pub name: String,

    /// Public root URL without trailing slash
    pub url: String,

    pub timezone: ParishTimezone,
}

#[derive(Debug, Clone, Serialize)]
pub struct DatabaseConfig {
    #[serde(skip_serializing)]
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct JwtConfig {
    /// HS256 signing secret, at least 32 characters
    #[serde(skip_serializing)]
    pub secret: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct StorageConfig {
    /// Root of the public disk served under `/storage`
    pub root: PathBuf,

    /// Bundled assets served under `/assets`
    pub assets_root: PathBuf,

    /// Fallback image, relative to the application root
    pub default_image: String,

    pub max_pdf_bytes: usize,
    pub max_image_bytes: usize,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key lookup
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let port = get("API_PORT", "8080")
            .parse::<u16>()
            .map_err(|e| anyhow::anyhow!("API_PORT is invalid: {}", e))?;

        let cors_origins = get("CORS_ORIGINS", "*")
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();

        let production = parse_bool(&get("PRODUCTION", "false"))
            .ok_or_else(|| anyhow::anyhow!("PRODUCTION must be true or false"))?;

        let timezone = get("APP_TIMEZONE", "WITA")
            .parse::<ParishTimezone>()
            .map_err(|e| anyhow::anyhow!("APP_TIMEZONE is invalid: {}", e))?;

        let app_url = get("APP_URL", "http://localhost:8080")
            .trim_end_matches('/')
            .to_string();
        if !(app_url.starts_with("http://") || app_url.starts_with("https://")) {
            anyhow::bail!("APP_URL must start with http:// or https://");
        }

        let database_url = lookup("DATABASE_URL")
            .ok_or_else(|| anyhow::anyhow!("DATABASE_URL environment variable is required"))?;

        let max_connections = get("DATABASE_MAX_CONNECTIONS", "10")
            .parse::<u32>()
            .map_err(|e| anyhow::anyhow!("DATABASE_MAX_CONNECTIONS is invalid: {}", e))?;

        let jwt_secret = lookup("JWT_SECRET")
            .ok_or_else(|| anyhow::anyhow!("JWT_SECRET environment variable is required"))?;
        if jwt_secret.len() < 32 {
            anyhow::bail!("JWT_SECRET must be at least 32 characters long");
        }

        let max_pdf_bytes = parse_size(&get("MAX_PDF_BYTES", ""), 5 * MIB, "MAX_PDF_BYTES")?;
        let max_image_bytes = parse_size(&get("MAX_IMAGE_BYTES", ""), 2 * MIB, "MAX_IMAGE_BYTES")?;

        Ok(Self {
            api: ApiConfig {
                host: get("API_HOST", "0.0.0.0"),
                port,
                cors_origins,
                production,
            },
            app: AppConfig {
                name: get("APP_NAME", "Paroki"),
                url: app_url,
                timezone,
            },
            database: DatabaseConfig {
                url: database_url,
                max_connections,
            },
            jwt: JwtConfig { secret: jwt_secret },
            storage: StorageConfig {
                root: PathBuf::from(get("STORAGE_ROOT", "storage/app/public")),
                assets_root: PathBuf::from(get("ASSETS_ROOT", "public/assets")),
                default_image: get("DEFAULT_IMAGE", "assets/images/default.jpg"),
                max_pdf_bytes,
                max_image_bytes,
            },
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }

    pub fn media_urls(&self) -> MediaUrls {
        MediaUrls::new(self.app.url.clone(), self.storage.default_image.clone())
    }

    /// Largest accepted request body: four PDFs plus form overhead
    pub fn body_limit(&self) -> usize {
        let files = (4 * self.storage.max_pdf_bytes).max(self.storage.max_image_bytes);
        files + MIB
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

fn parse_size(value: &str, default: usize, key: &str) -> anyhow::Result<usize> {
    if value.trim().is_empty() {
        return Ok(default);
    }

    match value.trim().parse::<usize>() {
        Ok(0) => anyhow::bail!("{} must be greater than zero", key),
        Ok(n) => Ok(n),
        Err(e) => anyhow::bail!("{} is invalid: {}", key, e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    fn load(vars: &[(&str, &str)]) -> anyhow::Result<Config> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[("DATABASE_URL", "postgresql://localhost/paroki"), ("JWT_SECRET", SECRET)])
            .unwrap();

        assert_eq!(config.bind_address(), "0.0.0.0:8080");
        assert_eq!(config.api.cors_origins, vec!["*"]);
        assert!(!config.api.production);
        assert_eq!(config.app.name, "Paroki");
        assert_eq!(config.app.timezone, ParishTimezone::Wita);
        assert_eq!(config.storage.max_pdf_bytes, 5 * MIB);
        assert_eq!(config.storage.max_image_bytes, 2 * MIB);
        assert_eq!(config.storage.assets_root, PathBuf::from("public/assets"));
        assert_eq!(config.body_limit(), 21 * MIB);
    }

    #[test]
    fn test_required_values() {
        assert!(load(&[("JWT_SECRET", SECRET)]).is_err());
        assert!(load(&[("DATABASE_URL", "postgresql://localhost/paroki")]).is_err());
        assert!(load(&[("DATABASE_URL", "postgresql://x"), ("JWT_SECRET", "short")]).is_err());
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("DATABASE_URL", "postgresql://localhost/paroki"),
            ("JWT_SECRET", SECRET),
            ("API_PORT", "3000"),
            ("APP_URL", "https://paroki.example/"),
            ("APP_TIMEZONE", "WIB"),
            ("PRODUCTION", "true"),
            ("CORS_ORIGINS", "https://a.example, https://b.example"),
            ("MAX_PDF_BYTES", "1048576"),
        ])
        .unwrap();

        assert_eq!(config.api.port, 3000);
        assert_eq!(config.app.url, "https://paroki.example");
        assert_eq!(config.app.timezone, ParishTimezone::Wib);
        assert!(config.api.production);
        assert_eq!(config.api.cors_origins.len(), 2);
        assert_eq!(config.storage.max_pdf_bytes, MIB);
        assert_eq!(
            config.media_urls().default_image_url(),
            "https://paroki.example/assets/images/default.jpg"
        );
    }

    #[test]
    fn test_invalid_values_fail() {
        let base = [("DATABASE_URL", "postgresql://x"), ("JWT_SECRET", SECRET)];
        for bad in [
            ("API_PORT", "eighty"),
            ("APP_TIMEZONE", "PST"),
            ("PRODUCTION", "maybe"),
            ("APP_URL", "paroki.example"),
            ("MAX_PDF_BYTES", "0"),
        ] {
            let mut vars = base.to_vec();
            vars.push(bad);
            assert!(load(&vars).is_err(), "{:?} should be rejected", bad);
        }
    }
}
