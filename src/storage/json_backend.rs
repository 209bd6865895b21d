use chrono::Utc;
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    core::utils::{ensure_dir, write_atomic, PathResolver},
    errors::Result,
    ledger::LedgerSnapshot,
};

use super::StorageBackend;

pub const DEFAULT_SNAPSHOT_KEY: &str = "debts";

const QUARANTINE_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";
const QUARANTINE_EXTENSION: &str = "json";

/// Keeps the ledger snapshot in `<base>/<key>.json`.
#[derive(Debug, Clone)]
pub struct JsonStorage {
    key: String,
    snapshot_file: PathBuf,
    quarantine_dir: PathBuf,
}

impl JsonStorage {
    pub fn new(root: Option<PathBuf>, key: &str) -> Result<Self> {
        let root = PathResolver::resolve_base(root);
        ensure_dir(&root)?;
        let key = canonical_key(key);
        let snapshot_file = PathResolver::snapshot_file_in(&root, &key);
        let quarantine_dir = PathResolver::quarantine_dir_in(&root);
        Ok(Self {
            key,
            snapshot_file,
            quarantine_dir,
        })
    }

    pub fn snapshot_path(&self) -> &Path {
        &self.snapshot_file
    }

    pub fn quarantine_dir(&self) -> &Path {
        &self.quarantine_dir
    }

    /// First unused `<key>_<timestamp>[_n].json` name in the quarantine dir.
    fn quarantine_target(&self) -> Result<PathBuf> {
        ensure_dir(&self.quarantine_dir)?;
        let stem = format!(
            "{}_{}",
            self.key,
            Utc::now().format(QUARANTINE_TIMESTAMP_FORMAT)
        );
        let mut path = self
            .quarantine_dir
            .join(format!("{}.{}", stem, QUARANTINE_EXTENSION));
        let mut attempt = 1;
        while path.exists() {
            path = self
                .quarantine_dir
                .join(format!("{}_{}.{}", stem, attempt, QUARANTINE_EXTENSION));
            attempt += 1;
        }
        Ok(path)
    }

    /// Moves an unreadable slot aside, so the next load finds no slot.
    fn quarantine_corrupt(&self) -> Result<PathBuf> {
        let target = self.quarantine_target()?;
        fs::rename(&self.snapshot_file, &target)?;
        Ok(target)
    }
}

impl StorageBackend for JsonStorage {
    fn load(&self) -> Result<Option<LedgerSnapshot>> {
        if !self.snapshot_file.exists() {
            return Ok(None);
        }
        let raw = fs::read(&self.snapshot_file)?;
        match LedgerSnapshot::from_slice(&raw) {
            Ok(snapshot) => Ok(Some(snapshot)),
            Err(err) => {
                match self.quarantine_corrupt() {
                    Ok(path) => tracing::warn!(
                        quarantined = %path.display(),
                        "corrupt ledger snapshot moved aside"
                    ),
                    Err(move_err) => tracing::warn!(
                        error = %move_err,
                        "unable to quarantine corrupt ledger snapshot"
                    ),
                }
                Err(err)
            }
        }
    }

    fn save(&self, snapshot: &LedgerSnapshot) -> Result<()> {
        save_snapshot_to_path(snapshot, &self.snapshot_file)
    }

    fn set_aside(&self) -> Result<Option<String>> {
        if !self.snapshot_file.exists() {
            return Ok(None);
        }
        let target = self.quarantine_target()?;
        fs::copy(&self.snapshot_file, &target)?;
        Ok(Some(target.display().to_string()))
    }

    fn location(&self) -> String {
        self.snapshot_file.display().to_string()
    }
}

pub fn save_snapshot_to_path(snapshot: &LedgerSnapshot, path: &Path) -> Result<()> {
    let json = snapshot.to_json()?;
    write_atomic(path, &json)?;
    Ok(())
}

fn canonical_key(name: &str) -> String {
    let sanitized: String = name
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'a'..='z' | '0'..='9' | '-' => c,
            _ => '_',
        })
        .collect();
    if sanitized.trim_matches('_').is_empty() {
        DEFAULT_SNAPSHOT_KEY.into()
    } else {
        sanitized
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::utils::tmp_path;
    use crate::errors::LedgerError;
    use crate::ledger::{DebtRecord, DebtStatus};
    use tempfile::TempDir;
    use uuid::Uuid;

    fn storage_with_temp_dir() -> (JsonStorage, TempDir) {
        let temp = TempDir::new().expect("temp dir");
        let storage =
            JsonStorage::new(Some(temp.path().to_path_buf()), "debts").expect("json storage");
        (storage, temp)
    }

    fn sample_snapshot() -> LedgerSnapshot {
        LedgerSnapshot::new(vec![DebtRecord {
            id: Uuid::new_v4(),
            person_name: "Gil".into(),
            amount: 18.75,
            description: "movie tickets".into(),
            created_at: Utc::now(),
            due_date: None,
            status: DebtStatus::Pending,
            category: Some("Leisure".into()),
        }])
    }

    #[test]
    fn load_without_file_is_none() {
        let (storage, _guard) = storage_with_temp_dir();
        assert!(storage.load().expect("load").is_none());
    }

    #[test]
    fn save_and_load_roundtrip() {
        let (storage, _guard) = storage_with_temp_dir();
        let snapshot = sample_snapshot();
        storage.save(&snapshot).expect("save snapshot");
        let loaded = storage.load().expect("load snapshot").expect("slot present");
        assert_eq!(loaded, snapshot);
        assert!(!tmp_path(storage.snapshot_path()).exists());
    }

    #[test]
    fn corrupt_slot_is_quarantined() {
        let (storage, _guard) = storage_with_temp_dir();
        fs::write(storage.snapshot_path(), "[{\"id\": 12").unwrap();

        let err = storage.load().expect_err("corrupt slot");
        assert!(matches!(err, LedgerError::PersistenceCorrupt(_)));

        let quarantined: Vec<_> = fs::read_dir(storage.quarantine_dir())
            .expect("quarantine dir")
            .collect();
        assert_eq!(quarantined.len(), 1);
        assert!(!storage.snapshot_path().exists());
    }

    #[test]
    fn repeated_loads_quarantine_a_corrupt_slot_once() {
        let (storage, _guard) = storage_with_temp_dir();
        fs::write(storage.snapshot_path(), "not json at all").unwrap();

        assert!(storage.load().is_err());
        assert!(storage.load().expect("slot moved aside").is_none());
        assert!(storage.load().expect("slot moved aside").is_none());

        let quarantined: Vec<_> = fs::read_dir(storage.quarantine_dir())
            .expect("quarantine dir")
            .map(|entry| entry.expect("dir entry").path())
            .collect();
        assert_eq!(quarantined.len(), 1);
        assert_eq!(fs::read_to_string(&quarantined[0]).unwrap(), "not json at all");
    }

    #[test]
    fn set_aside_copies_the_slot_and_keeps_it_in_place() {
        let (storage, _guard) = storage_with_temp_dir();
        assert_eq!(storage.set_aside().expect("nothing to copy"), None);

        storage.save(&sample_snapshot()).expect("save snapshot");
        let copy = storage.set_aside().expect("copy slot").expect("slot present");

        assert_eq!(
            fs::read_to_string(&copy).unwrap(),
            fs::read_to_string(storage.snapshot_path()).unwrap()
        );
    }

    #[test]
    fn keys_are_canonicalized() {
        assert_eq!(canonical_key("My Debts"), "my_debts");
        assert_eq!(canonical_key("  "), DEFAULT_SNAPSHOT_KEY);
        assert_eq!(canonical_key("work-2025"), "work-2025");
    }
}
