use thiserror::Error;
use uuid::Uuid;

/// Message shown when a free-text entry could not be turned into a debt.
pub const REJECTION_HINT: &str =
    "Could not understand that. Try: '<name> owes me <amount> for <reason>'.";

/// Error type that captures common ledger failures.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("{0}")]
    ExtractionRejected(String),
    #[error("Stored snapshot is corrupt: {0}")]
    PersistenceCorrupt(String),
    #[error("Debt not found: {0}")]
    NotFound(Uuid),
    #[error("Persistence error: {0}")]
    Persistence(String),
}

impl LedgerError {
    pub fn rejected() -> Self {
        Self::ExtractionRejected(REJECTION_HINT.into())
    }
}

pub type Result<T> = std::result::Result<T, LedgerError>;

/// Failures while reading or writing the user configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(String),
}
