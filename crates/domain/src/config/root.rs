use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::errors::ConfigError;
use super::logging::LoggingConfig;
use super::provider::{default_providers, Provider};
use super::resolver::ResolverConfig;

/// Main configuration structure for Ferrous Resolv
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Fixed resolver; when absent the resolver is discovered at startup
    #[serde(default)]
    pub resolver: Option<ResolverConfig>,

    #[serde(default = "default_providers")]
    pub providers: Vec<Provider>,

    #[serde(default)]
    pub discovery: DiscoveryConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DiscoveryConfig {
    #[serde(default = "default_resolv_conf")]
    pub resolv_conf: String,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            resolv_conf: default_resolv_conf(),
        }
    }
}

fn default_resolv_conf() -> String {
    "/etc/resolv.conf".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            logging: LoggingConfig::default(),
            resolver: None,
            providers: default_providers(),
            discovery: DiscoveryConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from file or use defaults
    ///
    /// Priority order:
    /// 1. Explicitly provided path
    /// 2. ferrous-resolv.toml in current directory
    /// 3. /etc/ferrous-resolv/config.toml
    /// 4. Default configuration
    pub fn load(path: Option<&str>, cli_overrides: CliOverrides) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = path {
            Self::from_file(path)?
        } else if let Some(path) = Self::get_config_path() {
            Self::from_file(&path)?
        } else {
            Self::default()
        };

        config.apply_cli_overrides(cli_overrides)?;
        config.normalize_providers();
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.to_string(), e.to_string()))?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Apply command-line overrides to configuration
    ///
    /// `--server` and `--provider` replace the `[resolver]` section; the
    /// transport flags then adjust whichever resolver is selected.
    fn apply_cli_overrides(&mut self, overrides: CliOverrides) -> Result<(), ConfigError> {
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }

        if let Some(server) = overrides.server {
            self.resolver = Some(ResolverConfig::new(server.clone(), server));
        } else if let Some(name) = overrides.provider {
            let provider = Provider::find(&self.providers, &name)
                .ok_or_else(|| ConfigError::UnknownProvider(name.clone()))?;
            self.resolver = Some(ResolverConfig::from_provider(provider, overrides.dot));
        }

        if let Some(resolver) = self.resolver.as_mut() {
            if overrides.dot && !resolver.dot {
                resolver.dot = true;
            }
            if overrides.pin.is_some() {
                resolver.tls_key_pin = overrides.pin;
            }
            if let Some(secs) = overrides.timeout_secs {
                resolver.timeout_ms = Duration::from_secs(secs).as_millis() as u64;
            }
            resolver.no_ip4 |= overrides.no_ip4;
            resolver.no_ip6 |= overrides.no_ip6;
            resolver.no_udp |= overrides.no_udp;
            resolver.no_tcp |= overrides.no_tcp;
        }
        Ok(())
    }

    fn normalize_providers(&mut self) {
        self.providers.sort_by(|a, b| a.name.cmp(&b.name));
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(resolver) = &self.resolver {
            resolver.validate()?;
        }

        for provider in &self.providers {
            if provider.name.is_empty() {
                return Err(ConfigError::Validation(
                    "Provider with empty name".to_string(),
                ));
            }
            if provider.pin.is_empty() {
                return Err(ConfigError::Validation(format!(
                    "Provider '{}' has no key pin",
                    provider.name
                )));
            }
        }
        Ok(())
    }

    /// Get the path to the configuration file being used
    pub fn get_config_path() -> Option<String> {
        if std::path::Path::new("ferrous-resolv.toml").exists() {
            Some("ferrous-resolv.toml".to_string())
        } else if std::path::Path::new("/etc/ferrous-resolv/config.toml").exists() {
            Some("/etc/ferrous-resolv/config.toml".to_string())
        } else {
            None
        }
    }
}

/// Command-line overrides for configuration
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub log_level: Option<String>,
    pub server: Option<String>,
    pub provider: Option<String>,
    pub dot: bool,
    pub pin: Option<String>,
    pub timeout_secs: Option<u64>,
    pub no_ip4: bool,
    pub no_ip6: bool,
    pub no_udp: bool,
    pub no_tcp: bool,
}
