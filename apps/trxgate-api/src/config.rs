//! trxgate API configuration module.
//!
//! Configuration is layered, lowest precedence first:
//!
//! 1. Built-in defaults
//! 2. `trxgate.toml` in the working directory, or the file named by
//!    `TRXGATE_CONFIG` (required when that variable is set)
//! 3. `TRXGATE_*` environment variables, e.g. `TRXGATE_HTTP_PORT=9000`

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::net::{IpAddr, SocketAddr};

use ::config::builder::DefaultState;
use ::config::{Config, ConfigBuilder, Environment, File, FileFormat};
use serde::Deserialize;
use trxgate_core::directory::InMemoryPartnerDirectory;
use trxgate_core::{Partner, DEFAULT_FRESHNESS_WINDOW_SECS};

/// Environment variable naming an explicit configuration file.
pub const CONFIG_PATH_ENV: &str = "TRXGATE_CONFIG";

/// File looked up when `TRXGATE_CONFIG` is not set.
pub const DEFAULT_CONFIG_FILE: &str = "trxgate.toml";

const ENV_PREFIX: &str = "TRXGATE";

const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0";
const DEFAULT_HTTP_PORT: u16 = 8080;
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_MAX_BODY_BYTES: usize = 64 * 1024;

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// A partner entry from the configuration file.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct PartnerConfig {
    pub key: String,
    pub password: String,
}

impl fmt::Debug for PartnerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PartnerConfig")
            .field("key", &self.key)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// trxgate API configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ApiConfig {
    /// Interface to listen on
    pub bind_address: String,

    /// HTTP server port
    pub http_port: u16,

    /// `pretty` for terminals, `json` for log shippers
    pub log_format: LogFormat,

    /// Default filter directive; `RUST_LOG` overrides it
    pub log_level: String,

    /// Allowed request timestamp skew in seconds
    pub freshness_window_secs: i64,

    /// Max request body size in bytes (default: 64KiB)
    pub max_body_bytes: usize,

    /// Registered partners; empty means the two sandbox partners
    #[serde(default)]
    pub partners: Vec<PartnerConfig>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            http_port: DEFAULT_HTTP_PORT,
            log_format: LogFormat::Pretty,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            freshness_window_secs: DEFAULT_FRESHNESS_WINDOW_SECS,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            partners: Vec::new(),
        }
    }
}

impl ApiConfig {
    /// Load configuration from defaults, the config file and the environment.
    pub fn load() -> Result<Self, ConfigError> {
        let (path, required) = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) => (path, true),
            Err(_) => (DEFAULT_CONFIG_FILE.to_string(), false),
        };

        let builder = Self::defaults()?
            .add_source(File::new(&path, FileFormat::Toml).required(required))
            .add_source(Self::environment(None));
        Self::finish(builder)
    }

    /// Load from a TOML document and an explicit environment map instead of
    /// the filesystem and process environment.
    pub fn from_toml(toml: &str, env: HashMap<String, String>) -> Result<Self, ConfigError> {
        let builder = Self::defaults()?
            .add_source(File::from_str(toml, FileFormat::Toml))
            .add_source(Self::environment(Some(env)));
        Self::finish(builder)
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        let d = Self::default();
        let builder = Config::builder()
            .set_default("bind_address", d.bind_address)?
            .set_default("http_port", i64::from(d.http_port))?
            .set_default("log_format", "pretty")?
            .set_default("log_level", d.log_level)?
            .set_default("freshness_window_secs", d.freshness_window_secs)?
            .set_default("max_body_bytes", d.max_body_bytes as i64)?;
        Ok(builder)
    }

    fn environment(source: Option<HashMap<String, String>>) -> Environment {
        Environment::with_prefix(ENV_PREFIX)
            .try_parsing(true)
            .source(source)
    }

    fn finish(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        let config: ApiConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Checks values the type system can't.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.socket_addr()?;

        if self.http_port == 0 {
            return Err(ConfigError::InvalidValue {
                key: "http_port",
                reason: "must not be 0".to_string(),
            });
        }
        if self.freshness_window_secs <= 0 {
            return Err(ConfigError::InvalidValue {
                key: "freshness_window_secs",
                reason: "must be positive".to_string(),
            });
        }
        self.freshness_window()?;
        if self.max_body_bytes == 0 {
            return Err(ConfigError::InvalidValue {
                key: "max_body_bytes",
                reason: "must be positive".to_string(),
            });
        }

        let mut seen = HashSet::new();
        for partner in &self.partners {
            if partner.key.trim().is_empty() || partner.password.is_empty() {
                return Err(ConfigError::InvalidValue {
                    key: "partners",
                    reason: "every partner needs a key and a password".to_string(),
                });
            }
            if !seen.insert(partner.key.as_str()) {
                return Err(ConfigError::DuplicatePartner(partner.key.clone()));
            }
        }

        Ok(())
    }

    /// The address the server binds to.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip: IpAddr = self
            .bind_address
            .parse()
            .map_err(|_| ConfigError::InvalidValue {
                key: "bind_address",
                reason: format!("{:?} is not an IP address", self.bind_address),
            })?;
        Ok(SocketAddr::new(ip, self.http_port))
    }

    /// The allowed timestamp skew, rejecting values `chrono` can't represent.
    pub fn freshness_window(&self) -> Result<chrono::Duration, ConfigError> {
        chrono::Duration::try_seconds(self.freshness_window_secs).ok_or_else(|| {
            ConfigError::InvalidValue {
                key: "freshness_window_secs",
                reason: format!("{} seconds is out of range", self.freshness_window_secs),
            }
        })
    }

    /// Partner directory built from `partners`, or the sandbox directory when
    /// none are configured.
    pub fn directory(&self) -> InMemoryPartnerDirectory {
        if self.partners.is_empty() {
            return InMemoryPartnerDirectory::seeded();
        }
        InMemoryPartnerDirectory::from_partners(
            self.partners
                .iter()
                .map(|p| Partner::new(p.key.clone(), p.password.clone())),
        )
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] ::config::ConfigError),

    #[error("Invalid value for {key}: {reason}")]
    InvalidValue { key: &'static str, reason: String },

    #[error("Duplicate partner key: {0}")]
    DuplicatePartner(String),
}
