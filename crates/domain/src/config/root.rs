use serde::{Deserialize, Serialize};
use std::path::Path;

use super::ecs::EcsConfig;
use super::errors::ConfigError;
use super::logging::LoggingConfig;
use super::routing::RoutingConfig;
use super::server::ServerConfig;
use super::upstream::UpstreamConfig;

const LOCAL_CONFIG_PATH: &str = "doh-ecs.toml";
const SYSTEM_CONFIG_PATH: &str = "/etc/doh-ecs/config.toml";

/// Main configuration structure for the DoH proxy
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// HTTP listener
    #[serde(default)]
    pub server: ServerConfig,

    /// Upstream DoH resolver
    #[serde(default)]
    pub upstream: UpstreamConfig,

    /// Client subnet injection
    #[serde(default)]
    pub ecs: EcsConfig,

    /// Path filtering
    #[serde(default)]
    pub routing: RoutingConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from file or use defaults
    ///
    /// Priority order:
    /// 1. Explicitly provided path
    /// 2. doh-ecs.toml in current directory
    /// 3. /etc/doh-ecs/config.toml
    /// 4. Default configuration
    pub fn load(path: Option<&str>, cli_overrides: CliOverrides) -> Result<Self, ConfigError> {
        let mut config = match path.map(str::to_string).or_else(Self::get_config_path) {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };

        config.apply_cli_overrides(cli_overrides);
        Ok(config)
    }

    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::FileRead {
            path: path.to_string(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_string(),
            source,
        })
    }

    fn apply_cli_overrides(&mut self, overrides: CliOverrides) {
        if let Some(port) = overrides.port {
            self.server.port = port;
        }
        if let Some(bind) = overrides.bind_address {
            self.server.bind_address = bind;
        }
        if let Some(url) = overrides.upstream_url {
            self.upstream.json_url = url.clone();
            self.upstream.url = url;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
        if overrides.disable_ecs {
            self.ecs.enabled = false;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("Port cannot be 0".to_string()));
        }

        for (field, url) in [
            ("upstream.url", &self.upstream.url),
            ("upstream.json_url", &self.upstream.json_url),
        ] {
            if !(url.starts_with("https://") || url.starts_with("http://")) {
                return Err(ConfigError::Validation(format!(
                    "{} must be an http(s) URL, got '{}'",
                    field, url
                )));
            }
        }

        if self.upstream.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "upstream.timeout_secs cannot be 0".to_string(),
            ));
        }

        if self.ecs.ipv4_prefix > 32 {
            return Err(ConfigError::Validation(format!(
                "ecs.ipv4_prefix {} exceeds 32",
                self.ecs.ipv4_prefix
            )));
        }
        if self.ecs.ipv6_prefix > 128 {
            return Err(ConfigError::Validation(format!(
                "ecs.ipv6_prefix {} exceeds 128",
                self.ecs.ipv6_prefix
            )));
        }
        if self.ecs.udp_payload_size < 512 {
            return Err(ConfigError::Validation(format!(
                "ecs.udp_payload_size {} is below 512",
                self.ecs.udp_payload_size
            )));
        }
        if self.ecs.client_ip_header.trim().is_empty() {
            return Err(ConfigError::Validation(
                "ecs.client_ip_header cannot be empty".to_string(),
            ));
        }

        Ok(())
    }

    pub fn save(&self, path: &str) -> Result<(), ConfigError> {
        let toml_string = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_string).map_err(|source| ConfigError::FileWrite {
            path: path.to_string(),
            source,
        })?;
        Ok(())
    }

    /// Get the path to the configuration file that `load` would pick up
    pub fn get_config_path() -> Option<String> {
        [LOCAL_CONFIG_PATH, SYSTEM_CONFIG_PATH]
            .into_iter()
            .find(|p| Path::new(p).exists())
            .map(str::to_string)
    }
}

/// Command-line overrides for configuration
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub port: Option<u16>,
    pub bind_address: Option<String>,
    pub upstream_url: Option<String>,
    pub log_level: Option<String>,
    pub disable_ecs: bool,
}
