//! Command implementations.
//!
//! Every command builds its engine from the configuration file, runs one
//! operation and prints the result as text or JSON.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result, anyhow};
use certledger_core::config::{CertLedgerConfig, LedgerBackendKind};
use certledger_core::{AccessGuard, CertificateEngine, LedgerGateway, MemoryLedger, SqliteLedger};
use secrecy::{ExposeSecret, SecretString};

pub mod authority;
pub mod output;
pub mod seller;
pub mod setup;

/// Engine over whichever backend the configuration selects.
pub type Engine = CertificateEngine<Box<dyn LedgerGateway>>;

/// Shared command context: global flags plus lazily loaded config.
pub struct Context {
    config_path: PathBuf,
    json: bool,
    credential: Option<SecretString>,
}

impl Context {
    /// Creates a context from the global CLI flags.
    pub const fn new(config_path: PathBuf, json: bool, credential: Option<SecretString>) -> Self {
        Self {
            config_path,
            json,
            credential,
        }
    }

    /// Returns `true` if results should be printed as JSON.
    pub const fn json(&self) -> bool {
        self.json
    }

    /// Returns the admin credential.
    ///
    /// # Errors
    ///
    /// Returns an error if neither `--credential` nor
    /// `CERTLEDGER_CREDENTIAL` was given.
    pub fn credential(&self) -> Result<&str> {
        self.credential
            .as_ref()
            .map(ExposeSecret::expose_secret)
            .ok_or_else(|| {
                anyhow!("admin credential required: pass --credential or set CERTLEDGER_CREDENTIAL")
            })
    }

    /// Loads and validates the configuration file.
    pub fn config(&self) -> Result<CertLedgerConfig> {
        CertLedgerConfig::from_file(&self.config_path).with_context(|| {
            format!(
                "failed to load configuration from {}",
                self.config_path.display()
            )
        })
    }

    /// Opens the configured ledger and wraps it in an engine.
    pub fn engine(&self) -> Result<Engine> {
        let config = self.config()?;
        self.engine_from(&config)
    }

    /// Opens the ledger described by `config` and wraps it in an engine.
    pub fn engine_from(&self, config: &CertLedgerConfig) -> Result<Engine> {
        let guard = AccessGuard::new(config.credential_hash()?);
        let ledger = open_ledger(config.ledger.backend, &config.ledger.path)?;
        Ok(CertificateEngine::new(ledger, guard))
    }
}

fn open_ledger(backend: LedgerBackendKind, path: &Path) -> Result<Box<dyn LedgerGateway>> {
    let ledger: Box<dyn LedgerGateway> = match backend {
        LedgerBackendKind::Sqlite => Box::new(
            SqliteLedger::open(path)
                .with_context(|| format!("failed to open ledger at {}", path.display()))?,
        ),
        LedgerBackendKind::Memory => Box::new(MemoryLedger::new()),
    };
    tracing::debug!(%backend, "ledger opened");
    Ok(ledger)
}
