pub mod json_backend;
pub mod memory;

use crate::{errors::Result, ledger::LedgerSnapshot};

/// Abstraction over the single named slot that holds the ledger snapshot.
pub trait StorageBackend: Send + Sync {
    /// Reads the slot. `Ok(None)` means nothing has been saved yet; a slot
    /// that cannot be parsed yields `LedgerError::PersistenceCorrupt`.
    fn load(&self) -> Result<Option<LedgerSnapshot>>;

    /// Replaces the slot with the full snapshot.
    fn save(&self, snapshot: &LedgerSnapshot) -> Result<()>;

    /// Keeps a copy of the current slot where later saves cannot reach it.
    /// Returns where the copy went, or `None` when there is nothing to keep.
    fn set_aside(&self) -> Result<Option<String>> {
        Ok(None)
    }

    /// Human-readable location used in logs and CLI output.
    fn location(&self) -> String;
}

pub use json_backend::{JsonStorage, DEFAULT_SNAPSHOT_KEY};
pub use memory::MemoryStorage;
