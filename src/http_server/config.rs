//! HTTP Server Configuration
//!
//! Bind address, port and log file template of the capture server.

use serde::{Deserialize, Serialize};

use super::errors::{ServerError, ServerResult};
use crate::rotation::{FilenameTemplate, DEFAULT_TEMPLATE};

/// Capture server configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpServerConfig {
    /// Address to bind to (default: "", all interfaces)
    #[serde(default)]
    pub bind: String,

    /// Port to bind to (default: 8080)
    #[serde(default = "default_port")]
    pub port: u16,

    /// Log file name template (default: "http-%Y%m%d.log")
    #[serde(default = "default_log_file")]
    pub log_file: String,
}

fn default_port() -> u16 {
    8080
}

fn default_log_file() -> String {
    DEFAULT_TEMPLATE.to_string()
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            bind: String::new(),
            port: default_port(),
            log_file: default_log_file(),
        }
    }
}

impl HttpServerConfig {
    /// Create a new config with specified port
    pub fn with_port(port: u16) -> Self {
        Self {
            port,
            ..Default::default()
        }
    }

    /// Host part of the listen address.
    ///
    /// Empty means all interfaces: the IPv6 wildcard, which also accepts
    /// IPv4 where the system allows dual-stack sockets.
    pub fn host(&self) -> &str {
        if self.bind.is_empty() {
            "::"
        } else {
            &self.bind
        }
    }

    /// IPv4 wildcard to retry with when the IPv6 wildcard cannot be bound
    pub fn fallback_host(&self) -> Option<&str> {
        if self.bind.is_empty() {
            Some("0.0.0.0")
        } else {
            None
        }
    }

    /// Get the socket address string
    pub fn socket_addr(&self) -> String {
        if self.host().contains(':') {
            format!("[{}]:{}", self.host(), self.port)
        } else {
            format!("{}:{}", self.host(), self.port)
        }
    }

    pub fn template(&self) -> FilenameTemplate {
        FilenameTemplate::new(self.log_file.clone())
    }

    /// Rejects templates that cannot name a file
    pub fn validate(&self) -> ServerResult<()> {
        if self.log_file.trim().is_empty() {
            return Err(ServerError::InvalidConfig(
                "log_file template must not be empty".to_string(),
            ));
        }
        if self.log_file.ends_with('/') {
            return Err(ServerError::InvalidConfig(format!(
                "log_file template '{}' names a directory",
                self.log_file
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = HttpServerConfig::default();
        assert_eq!(config.bind, "");
        assert_eq!(config.port, 8080);
        assert_eq!(config.log_file, "http-%Y%m%d.log");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_socket_addr() {
        let config = HttpServerConfig::with_port(9000);
        assert_eq!(config.socket_addr(), "[::]:9000");

        let config = HttpServerConfig {
            bind: "127.0.0.1".to_string(),
            ..HttpServerConfig::with_port(9000)
        };
        assert_eq!(config.socket_addr(), "127.0.0.1:9000");

        let config = HttpServerConfig {
            bind: "::1".to_string(),
            ..HttpServerConfig::with_port(9000)
        };
        assert_eq!(config.socket_addr(), "[::1]:9000");
    }

    #[test]
    fn test_empty_bind_listens_on_both_families() {
        let config = HttpServerConfig::default();
        assert_eq!(config.host(), "::");
        assert_eq!(config.fallback_host(), Some("0.0.0.0"));

        let explicit = HttpServerConfig {
            bind: "0.0.0.0".to_string(),
            ..Default::default()
        };
        assert_eq!(explicit.host(), "0.0.0.0");
        assert_eq!(explicit.fallback_host(), None);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config: HttpServerConfig = serde_json::from_str(r#"{"port": 9999}"#).unwrap();
        assert_eq!(config.port, 9999);
        assert_eq!(config.bind, "");
        assert_eq!(config.log_file, "http-%Y%m%d.log");
    }

    #[test]
    fn test_validate_rejects_unusable_templates() {
        let empty = HttpServerConfig {
            log_file: "  ".to_string(),
            ..Default::default()
        };
        assert!(matches!(empty.validate(), Err(ServerError::InvalidConfig(_))));

        let dir = HttpServerConfig {
            log_file: "logs/%Y/".to_string(),
            ..Default::default()
        };
        assert!(dir.validate().is_err());
    }
}
