use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::{
    errors::{LedgerError, Result},
    ledger::LedgerSnapshot,
};

use super::StorageBackend;

/// In-process slot. Clones share the same slot, so a handle kept outside a
/// store can observe what the store wrote.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    slot: Arc<Mutex<Slot>>,
}

#[derive(Debug, Default)]
struct Slot {
    raw: Option<String>,
    set_aside: Vec<String>,
    writes: usize,
    fail_writes: bool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the slot with raw contents, valid or not.
    pub fn with_raw(raw: impl Into<String>) -> Self {
        let storage = Self::default();
        storage.lock().raw = Some(raw.into());
        storage
    }

    pub fn raw(&self) -> Option<String> {
        self.lock().raw.clone()
    }

    /// Copies kept by `set_aside`, oldest first.
    pub fn set_aside_copies(&self) -> Vec<String> {
        self.lock().set_aside.clone()
    }

    /// Number of successful saves so far.
    pub fn write_count(&self) -> usize {
        self.lock().writes
    }

    /// Makes every following save fail until switched off again.
    pub fn set_fail_writes(&self, fail: bool) {
        self.lock().fail_writes = fail;
    }

    fn lock(&self) -> MutexGuard<'_, Slot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl StorageBackend for MemoryStorage {
    fn load(&self) -> Result<Option<LedgerSnapshot>> {
        match self.lock().raw.as_deref() {
            Some(raw) => LedgerSnapshot::parse(raw).map(Some),
            None => Ok(None),
        }
    }

    fn save(&self, snapshot: &LedgerSnapshot) -> Result<()> {
        let json = snapshot.to_json()?;
        let mut slot = self.lock();
        if slot.fail_writes {
            return Err(LedgerError::Persistence("memory slot is read-only".into()));
        }
        slot.raw = Some(json);
        slot.writes += 1;
        Ok(())
    }

    fn set_aside(&self) -> Result<Option<String>> {
        let mut slot = self.lock();
        let Some(raw) = slot.raw.clone() else {
            return Ok(None);
        };
        slot.set_aside.push(raw);
        Ok(Some(format!("memory#{}", slot.set_aside.len())))
    }

    fn location(&self) -> String {
        "memory".into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_the_slot() {
        let storage = MemoryStorage::new();
        let observer = storage.clone();
        storage.save(&LedgerSnapshot::default()).unwrap();
        assert_eq!(observer.write_count(), 1);
        assert_eq!(observer.raw().as_deref(), Some("[]"));
    }

    #[test]
    fn failing_writes_leave_slot_untouched() {
        let storage = MemoryStorage::with_raw("[]");
        storage.set_fail_writes(true);
        assert!(storage.save(&LedgerSnapshot::default()).is_err());
        assert_eq!(storage.write_count(), 0);
        assert_eq!(storage.raw().as_deref(), Some("[]"));
    }

    #[test]
    fn set_aside_keeps_the_raw_slot() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.set_aside().unwrap(), None);

        let storage = MemoryStorage::with_raw("[{\"half\": ");
        assert_eq!(storage.set_aside().unwrap().as_deref(), Some("memory#1"));
        assert_eq!(storage.set_aside_copies(), vec!["[{\"half\": ".to_string()]);
        assert_eq!(storage.raw().as_deref(), Some("[{\"half\": "));
    }
}
