// File: src/config.rs
// Purpose: Configuration parsing from virgule.toml

use std::fs;
use std::path::Path;

use anyhow::{Context as _, Result};
use serde::{Deserialize, Serialize};

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub project: ProjectConfig,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub routing: RoutingConfig,

    #[serde(default)]
    pub dev: DevConfig,
}

/// Project metadata.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProjectConfig {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub version: String,
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

/// Routing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingConfig {
    /// Directory scanned for route files (default: "app").
    #[serde(default = "default_app_dir")]
    pub app_dir: String,

    /// Surface skipped declarations as warnings.
    #[serde(default)]
    pub verbose_scan: bool,
}

/// Development configuration, consumed by external tooling (the rebuild
/// trigger itself lives with the caller).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DevConfig {
    #[serde(default = "default_true")]
    pub hot_reload: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            app_dir: default_app_dir(),
            verbose_scan: false,
        }
    }
}

impl Default for DevConfig {
    fn default() -> Self {
        Self {
            hot_reload: default_true(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_app_dir() -> String {
    "app".to_string()
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Loads configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        toml::from_str(&raw)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }

    /// Loads `virgule.toml` from the working directory, falling back to
    /// defaults when the file does not exist.
    pub fn load_default() -> Result<Self> {
        let path = Path::new("virgule.toml");
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// The bind address.
    pub fn address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.routing.app_dir, "app");
        assert!(config.dev.hot_reload);
        assert_eq!(config.address(), "0.0.0.0:3000");
    }

    #[test]
    fn test_partial_file_uses_field_defaults() {
        let config: Config = toml::from_str(
            r#"
[server]
port = 8080
"#,
        )
        .unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.routing.app_dir, "app");
    }

    #[test]
    fn test_full_file() {
        let config: Config = toml::from_str(
            r#"
[project]
name = "demo"
version = "0.1.0"

[server]
host = "127.0.0.1"
port = 4000

[routing]
app_dir = "routes"
verbose_scan = true

[dev]
hot_reload = false
"#,
        )
        .unwrap();

        assert_eq!(config.project.name, "demo");
        assert_eq!(config.address(), "127.0.0.1:4000");
        assert_eq!(config.routing.app_dir, "routes");
        assert!(config.routing.verbose_scan);
        assert!(!config.dev.hot_reload);
    }

    #[test]
    fn test_load_missing_file_is_an_error() {
        assert!(Config::load("/nonexistent/virgule.toml").is_err());
    }
}
