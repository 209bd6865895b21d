#![allow(dead_code)]

use debt_ledger::{ledger::AnalysisResult, storage::JsonStorage, LedgerStore};
use tempfile::TempDir;

pub fn candidate(name: &str, amount: f64, confidence: f64) -> AnalysisResult {
    AnalysisResult {
        person_name: name.into(),
        amount,
        description: format!("{name} borrowed money"),
        due_date: Some("2025-12-24".into()),
        category: Some("Loan".into()),
        confidence_score: confidence,
    }
}

/// Creates a JSON-backed storage rooted in a fresh temp dir. Keep the guard
/// alive for as long as the storage is used.
pub fn temp_json_storage() -> (JsonStorage, TempDir) {
    let temp = TempDir::new().expect("create temp dir");
    let storage = JsonStorage::new(Some(temp.path().to_path_buf()), "debts")
        .expect("create json storage backend");
    (storage, temp)
}

pub fn restored_store(storage: &JsonStorage) -> LedgerStore {
    let (store, report) = LedgerStore::open(Box::new(storage.clone()));
    assert!(report.warnings.is_empty(), "unexpected warnings: {report:?}");
    store
}
