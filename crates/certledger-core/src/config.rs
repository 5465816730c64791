//! Configuration parsing.
//!
//! A deployment is described by a TOML file:
//!
//! ```toml
//! [ledger]
//! backend = "sqlite"
//! path = "certledger.db"
//!
//! [access]
//! admin_credential_hash = "ef92b778bafe771e89245b89ecbc08a44a4e166c06659911881f383d4473e94f"
//!
//! [seed]
//! enabled = true
//! ```
//!
//! Only `[access]` is required.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::guard::CredentialHash;

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CertLedgerConfig {
    /// Ledger backend settings.
    #[serde(default)]
    pub ledger: LedgerConfig,

    /// Admin credential settings.
    pub access: AccessConfig,

    /// Example data settings.
    #[serde(default)]
    pub seed: SeedConfig,
}

impl CertLedgerConfig {
    /// Creates a configuration with default ledger and seed settings.
    #[must_use]
    pub fn new(admin_credential_hash: &CredentialHash) -> Self {
        Self {
            ledger: LedgerConfig::default(),
            access: AccessConfig {
                admin_credential_hash: admin_credential_hash.to_hex(),
            },
            seed: SeedConfig::default(),
        }
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml(&content)?;
        tracing::debug!(path = %path.display(), backend = %config.ledger.backend, "loaded configuration");
        Ok(config)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid, `[access]` is missing, or
    /// the credential hash is not 32 bytes of hex.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Serializes configuration to TOML.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Checks values serde cannot.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] on a malformed credential hash or
    /// an empty ledger path.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.credential_hash()?;
        if self.ledger.backend == LedgerBackendKind::Sqlite
            && self.ledger.path.as_os_str().is_empty()
        {
            return Err(ConfigError::Validation(
                "ledger.path must not be empty for the sqlite backend".to_string(),
            ));
        }
        Ok(())
    }

    /// Returns the parsed admin credential hash.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] if the hash is malformed.
    pub fn credential_hash(&self) -> Result<CredentialHash, ConfigError> {
        CredentialHash::from_hex(&self.access.admin_credential_hash)
            .map_err(|e| ConfigError::Validation(format!("access.admin_credential_hash: {e}")))
    }
}

/// Ledger backend selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Storage backend.
    #[serde(default)]
    pub backend: LedgerBackendKind,

    /// Database file for the sqlite backend.
    #[serde(default = "default_ledger_path")]
    pub path: PathBuf,
}

fn default_ledger_path() -> PathBuf {
    PathBuf::from("certledger.db")
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            backend: LedgerBackendKind::default(),
            path: default_ledger_path(),
        }
    }
}

/// Available ledger backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LedgerBackendKind {
    /// Persistent `SQLite` file.
    #[default]
    Sqlite,
    /// Process-local map; contents are lost on exit.
    Memory,
}

impl std::fmt::Display for LedgerBackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite => f.write_str("sqlite"),
            Self::Memory => f.write_str("memory"),
        }
    }
}

/// Admin credential configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessConfig {
    /// Hex SHA-256 digest of the admin credential.
    pub admin_credential_hash: String,
}

/// Example data configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedConfig {
    /// Whether `init` loads the example assets.
    #[serde(default = "default_seed_enabled")]
    pub enabled: bool,
}

const fn default_seed_enabled() -> bool {
    true
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            enabled: default_seed_enabled(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// I/O error reading configuration file.
    #[error("failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// TOML serialization error.
    #[error("failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// Validation error.
    #[error("configuration validation failed: {0}")]
    Validation(String),
}
