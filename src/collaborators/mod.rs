//! Seams to the external text-extraction and advice collaborators.
//!
//! Neither collaborator can change ledger state: extraction only produces a
//! candidate for `LedgerStore::create`, and advice only produces a string.

pub mod command;

use thiserror::Error;

use crate::ledger::AnalysisResult;

pub use command::{CommandAdvisor, CommandExtractor, CommandLine, UnavailableAdvisor, TODAY_ENV};

#[derive(Debug, Error)]
pub enum CollaboratorError {
    #[error("collaborator command is empty")]
    EmptyCommand,
    #[error("invalid collaborator command: {0}")]
    InvalidCommand(String),
    #[error("failed to start `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("`{program}` exited with {status}: {stderr}")]
    Failed {
        program: String,
        status: String,
        stderr: String,
    },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Turns free text into a structured debt candidate.
pub trait Extractor {
    /// `None` when the text carries no usable signal or the collaborator fails.
    fn extract(&self, text: &str) -> Option<AnalysisResult>;
}

/// Produces a short financial tip from a ledger summary.
pub trait Advisor {
    fn advise(&self, request: &str) -> Result<String, CollaboratorError>;
}
