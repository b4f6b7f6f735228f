use crate::error::{AxisError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// BackendConfig
// ---------------------------------------------------------------------------

/// Where the managed data backend and the sibling functions live.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the managed backend, e.g. `https://acme.backend.example`.
    #[serde(default)]
    pub url: String,
    /// Service-role secret. Doubles as the tick endpoint's expected
    /// bearer credential and the JWT signing secret.
    #[serde(default)]
    pub service_role_key: String,
    /// Base URL for sibling function calls. Defaults to `{url}/functions/v1`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub functions_url: Option<String>,
}

impl BackendConfig {
    pub fn functions_url(&self) -> String {
        match &self.functions_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("{}/functions/v1", self.url.trim_end_matches('/')),
        }
    }
}

// ---------------------------------------------------------------------------
// ServerConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

fn default_bind() -> String {
    "0.0.0.0:8787".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config (top-level)
// ---------------------------------------------------------------------------

/// Service configuration: a YAML file with per-field environment
/// overrides. Environment always wins, so a deployment can run with no
/// file at all.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

pub const ENV_BACKEND_URL: &str = "AXIS_BACKEND_URL";
pub const ENV_SERVICE_ROLE_KEY: &str = "AXIS_SERVICE_ROLE_KEY";
pub const ENV_FUNCTIONS_URL: &str = "AXIS_FUNCTIONS_URL";
pub const ENV_BIND: &str = "AXIS_BIND";

impl Config {
    /// Load from a YAML file, then apply environment overrides.
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        let mut cfg: Config = serde_yaml::from_str(&data)?;
        cfg.apply_env();
        cfg.require_backend()?;
        Ok(cfg)
    }

    /// Build purely from the environment (no config file).
    pub fn from_env() -> Result<Self> {
        let mut cfg = Config::default();
        cfg.apply_env();
        cfg.require_backend()?;
        Ok(cfg)
    }

    fn apply_env(&mut self) {
        if let Ok(v) = std::env::var(ENV_BACKEND_URL) {
            self.backend.url = v;
        }
        if let Ok(v) = std::env::var(ENV_SERVICE_ROLE_KEY) {
            self.backend.service_role_key = v;
        }
        if let Ok(v) = std::env::var(ENV_FUNCTIONS_URL) {
            self.backend.functions_url = Some(v);
        }
        if let Ok(v) = std::env::var(ENV_BIND) {
            self.server.bind = v;
        }
    }

    fn require_backend(&self) -> Result<()> {
        if self.backend.url.trim().is_empty() {
            return Err(AxisError::MissingConfig(ENV_BACKEND_URL));
        }
        if self.backend.service_role_key.trim().is_empty() {
            return Err(AxisError::MissingConfig(ENV_SERVICE_ROLE_KEY));
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        if self.backend.url.starts_with("http://") {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: "backend.url uses plaintext http; the service secret travels with every request".to_string(),
            });
        }

        if !self.backend.service_role_key.is_empty() && self.backend.service_role_key.len() < 32 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: format!(
                    "backend.service_role_key is only {} characters; expected a full service secret",
                    self.backend.service_role_key.len()
                ),
            });
        }

        if let Some(functions) = &self.backend.functions_url {
            if functions.starts_with("http://") {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Warning,
                    message: "backend.functions_url uses plaintext http".to_string(),
                });
            }
        }

        if self.server.bind.parse::<std::net::SocketAddr>().is_err() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: format!("server.bind '{}' is not a valid socket address", self.server.bind),
            });
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> Config {
        Config {
            backend: BackendConfig {
                url: "https://acme.backend.example".into(),
                service_role_key: "0123456789abcdef0123456789abcdef".into(),
                functions_url: None,
            },
            server: ServerConfig::default(),
        }
    }

    #[test]
    fn functions_url_defaults_under_backend() {
        let cfg = base_config();
        assert_eq!(
            cfg.backend.functions_url(),
            "https://acme.backend.example/functions/v1"
        );
    }

    #[test]
    fn explicit_functions_url_wins_and_is_trimmed() {
        let mut cfg = base_config();
        cfg.backend.functions_url = Some("https://fns.example/".into());
        assert_eq!(cfg.backend.functions_url(), "https://fns.example");
    }

    #[test]
    fn load_from_yaml_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("axis.yaml");
        std::fs::write(
            &path,
            "backend:\n  url: https://acme.backend.example\n  service_role_key: 0123456789abcdef0123456789abcdef\nserver:\n  bind: 127.0.0.1:9000\n",
        )
        .unwrap();
        let cfg = Config::load(&path).unwrap();
        assert_eq!(cfg.backend.url, "https://acme.backend.example");
        assert_eq!(cfg.server.bind, "127.0.0.1:9000");
    }

    #[test]
    fn missing_backend_url_is_a_hard_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("axis.yaml");
        std::fs::write(&path, "server:\n  bind: 127.0.0.1:9000\n").unwrap();
        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, AxisError::MissingConfig(ENV_BACKEND_URL)));
    }

    #[test]
    fn missing_service_key_is_a_hard_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("axis.yaml");
        std::fs::write(&path, "backend:\n  url: https://acme.backend.example\n").unwrap();
        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, AxisError::MissingConfig(ENV_SERVICE_ROLE_KEY)));
    }

    #[test]
    fn validate_warns_on_plaintext_http() {
        let mut cfg = base_config();
        cfg.backend.url = "http://insecure.example".into();
        let warnings = cfg.validate();
        assert!(warnings.iter().any(|w| w.message.contains("plaintext http")));
    }

    #[test]
    fn validate_warns_on_short_secret() {
        let mut cfg = base_config();
        cfg.backend.service_role_key = "hunter2".into();
        let warnings = cfg.validate();
        assert!(warnings
            .iter()
            .any(|w| w.message.contains("service_role_key")));
    }

    #[test]
    fn validate_flags_bad_bind_address() {
        let mut cfg = base_config();
        cfg.server.bind = "not-an-addr".into();
        let warnings = cfg.validate();
        assert!(warnings
            .iter()
            .any(|w| w.level == WarnLevel::Error && w.message.contains("server.bind")));
    }

    #[test]
    fn clean_config_has_no_warnings() {
        let warnings = base_config().validate();
        assert!(warnings.is_empty(), "unexpected warnings: {warnings:?}");
    }
}
