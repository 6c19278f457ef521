//! Configuration for the pcbook server.
//!
//! Resolution order (lowest to highest priority):
//! 1. Built-in defaults
//! 2. TOML config file (`--config`)
//! 3. CLI arguments / environment, applied by the binary

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default ceiling for a single uploaded image (1 MiB).
pub const DEFAULT_MAX_IMAGE_BYTES: usize = 1 << 20;

/// Default lifetime of an access token (15 minutes).
pub const DEFAULT_TOKEN_TTL_SECS: i64 = 15 * 60;

/// Complete pcbook configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub logging: LoggingConfig,
}

/// Listener and upload settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub addr: SocketAddr,
    /// Directory that uploaded images are written into.
    pub image_dir: PathBuf,
    pub max_image_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            image_dir: PathBuf::from("img"),
            max_image_bytes: DEFAULT_MAX_IMAGE_BYTES,
        }
    }
}

/// Token signing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_ttl_secs: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "secret".to_string(),
            token_ttl_secs: DEFAULT_TOKEN_TTL_SECS,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LoggingConfig {
    pub format: LogFormat,
}

/// Output format of the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Compact,
    Json,
}

impl Config {
    /// Load configuration from a TOML file, falling back to defaults for any
    /// missing keys.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the server cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.server.max_image_bytes == 0 {
            return Err(Error::Config("server.max_image_bytes must be positive".into()));
        }
        if self.auth.token_ttl_secs <= 0 {
            return Err(Error::Config("auth.token_ttl_secs must be positive".into()));
        }
        if self.auth.jwt_secret.is_empty() {
            return Err(Error::Config("auth.jwt_secret must not be empty".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_limits() {
        let config = Config::default();
        assert_eq!(config.server.max_image_bytes, 1_048_576);
        assert_eq!(config.auth.token_ttl_secs, 900);
        assert_eq!(config.logging.format, LogFormat::Pretty);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pcbook.toml");
        std::fs::write(
            &path,
            "[server]\nmax_image_bytes = 2048\n\n[logging]\nformat = \"json\"\n",
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.server.max_image_bytes, 2048);
        assert_eq!(config.server.image_dir, PathBuf::from("img"));
        assert_eq!(config.auth.token_ttl_secs, DEFAULT_TOKEN_TTL_SECS);
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn zero_ceiling_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pcbook.toml");
        std::fs::write(&path, "[server]\nmax_image_bytes = 0\n").unwrap();

        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn malformed_file_is_toml_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pcbook.toml");
        std::fs::write(&path, "[server\n").unwrap();

        assert!(matches!(Config::load(&path).unwrap_err(), Error::Toml(_)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = Config::load(Path::new("/nonexistent/pcbook.toml")).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
