use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::debt::DebtRecord;
use crate::errors::{LedgerError, Result};

/// Full ordered copy of the ledger, newest record first. Serialized as a bare
/// JSON array of records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LedgerSnapshot {
    pub records: Vec<DebtRecord>,
}

impl LedgerSnapshot {
    pub fn new(records: Vec<DebtRecord>) -> Self {
        Self { records }
    }

    /// A blank slot is an empty ledger; anything else must be a valid array.
    pub fn from_slice(raw: &[u8]) -> Result<Self> {
        if raw.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        serde_json::from_slice(raw).map_err(|err| LedgerError::PersistenceCorrupt(err.to_string()))
    }

    pub fn parse(raw: &str) -> Result<Self> {
        Self::from_slice(raw.as_bytes())
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Drops records that break ledger invariants, keeping the first
    /// occurrence of any repeated id. Returns one warning per dropped record.
    pub fn sanitize(self) -> (Self, Vec<String>) {
        let mut seen = HashSet::new();
        let mut warnings = Vec::new();
        let mut records = Vec::with_capacity(self.records.len());

        for record in self.records {
            if !seen.insert(record.id) {
                warnings.push(format!("dropped debt {} with duplicate id", record.id));
                continue;
            }
            if let Some(reason) = record.invariant_violation() {
                warnings.push(format!("dropped debt {}: {}", record.id, reason));
                continue;
            }
            records.push(record);
        }
        (Self { records }, warnings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::DebtStatus;
    use chrono::Utc;
    use uuid::Uuid;

    fn record(name: &str, amount: f64) -> DebtRecord {
        DebtRecord {
            id: Uuid::new_v4(),
            person_name: name.into(),
            amount,
            description: String::new(),
            created_at: Utc::now(),
            due_date: None,
            status: DebtStatus::Pending,
            category: None,
        }
    }

    #[test]
    fn blank_slot_parses_as_empty() {
        assert!(LedgerSnapshot::parse("").unwrap().is_empty());
        assert!(LedgerSnapshot::parse("  \n").unwrap().is_empty());
    }

    #[test]
    fn malformed_slot_reports_corruption() {
        let err = LedgerSnapshot::parse("{\"oops\":").expect_err("corrupt input");
        assert!(matches!(err, LedgerError::PersistenceCorrupt(_)));
        let err = LedgerSnapshot::parse("{}").expect_err("object instead of array");
        assert!(matches!(err, LedgerError::PersistenceCorrupt(_)));
    }

    #[test]
    fn missing_optional_keys_read_as_absent() {
        let raw = r#"[{
            "id": "6f1c1a52-3d1e-4c39-9b6a-0d4f1b3f6c11",
            "personName": "Dora",
            "amount": 5.0,
            "description": "",
            "createdAt": "2025-01-01T12:00:00Z",
            "status": "PAID"
        }]"#;
        let snapshot = LedgerSnapshot::parse(raw).expect("valid snapshot");
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot.records[0].due_date, None);
        assert_eq!(snapshot.records[0].category, None);
        assert_eq!(snapshot.records[0].status, DebtStatus::Paid);
    }

    #[test]
    fn sanitize_drops_duplicates_and_invalid_records() {
        let first = record("Eva", 10.0);
        let mut duplicate = record("Eva again", 20.0);
        duplicate.id = first.id;
        let snapshot = LedgerSnapshot::new(vec![
            first.clone(),
            duplicate,
            record("", 3.0),
            record("Finn", -4.0),
        ]);

        let (clean, warnings) = snapshot.sanitize();
        assert_eq!(clean.records, vec![first]);
        assert_eq!(warnings.len(), 3);
    }
}
