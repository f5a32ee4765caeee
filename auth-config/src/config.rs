//! Server configuration module.
//!
//! This module provides configuration loading for the auth config admin
//! server from environment variables.
//!
//! # Environment Variables
//!
//! - `AUTH_CONFIG_LISTEN_PORT`: Port to listen on (default: `3000`)
//! - `AUTH_CONFIG_FILE`: JSON array of stored auth configs (default: `./auth_configs.json`)
//! - `AUTH_CONFIG_REGISTRY_FILE`: JSON registry narrowing the accepted sources
//!   (optional; the full built-in registry is used when unset)
//!
//! # Invariants
//!
//! - `listen_port` is always a valid port number (1-65535)
//! - `config_file` is always a valid path (may not exist yet)

use std::path::PathBuf;

/// Server configuration.
///
/// # Post-conditions
///
/// - `listen_port` is always in the valid range (1-65535)
/// - `registry_file`, when set, is a non-empty path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Port to listen on for admin HTTP requests.
    pub listen_port: u16,
    /// File holding the stored auth configs.
    pub config_file: PathBuf,
    /// File holding the active source registry, re-read on reload.
    pub registry_file: Option<PathBuf>,
}

/// Error returned when loading configuration fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// An environment variable has an invalid value.
    InvalidValue { name: String, message: String },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let Self::InvalidValue { name, message } = self;
        write!(f, "invalid value for {name}: {message}")
    }
}

impl std::error::Error for ConfigError {}

const LISTEN_PORT_VAR: &str = "AUTH_CONFIG_LISTEN_PORT";
const CONFIG_FILE_VAR: &str = "AUTH_CONFIG_FILE";
const REGISTRY_FILE_VAR: &str = "AUTH_CONFIG_REGISTRY_FILE";

impl ServerConfig {
    /// Default port for the server.
    pub const DEFAULT_PORT: u16 = 3000;
    /// Default stored-configs file.
    pub const DEFAULT_CONFIG_FILE: &'static str = "./auth_configs.json";

    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `AUTH_CONFIG_LISTEN_PORT` is set but not a valid port number
    /// - `AUTH_CONFIG_REGISTRY_FILE` is set but empty
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// See [`ServerConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let listen_port = Self::load_listen_port(lookup(LISTEN_PORT_VAR))?;
        let config_file = lookup(CONFIG_FILE_VAR)
            .map_or_else(|| PathBuf::from(Self::DEFAULT_CONFIG_FILE), PathBuf::from);
        let registry_file = Self::load_registry_file(lookup(REGISTRY_FILE_VAR))?;

        Ok(Self {
            listen_port,
            config_file,
            registry_file,
        })
    }

    /// Parse the listen port.
    ///
    /// Returns the default if not set.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is set but not a valid port number.
    fn load_listen_port(value: Option<String>) -> Result<u16, ConfigError> {
        let Some(value) = value else {
            return Ok(Self::DEFAULT_PORT);
        };
        match value.parse::<u16>() {
            Ok(port) if port != 0 => Ok(port),
            _ => Err(ConfigError::InvalidValue {
                name: LISTEN_PORT_VAR.to_string(),
                message: format!("'{value}' is not a valid port number (must be 1-65535)"),
            }),
        }
    }

    fn load_registry_file(value: Option<String>) -> Result<Option<PathBuf>, ConfigError> {
        match value {
            Some(path) if path.is_empty() => Err(ConfigError::InvalidValue {
                name: REGISTRY_FILE_VAR.to_string(),
                message: "must not be empty".to_string(),
            }),
            other => Ok(other.map(PathBuf::from)),
        }
    }
}
