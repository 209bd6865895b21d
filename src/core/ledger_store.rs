use chrono::Utc;
use uuid::Uuid;

use crate::core::services::{DebtStats, SummaryService};
use crate::errors::{LedgerError, Result};
use crate::ledger::{AnalysisResult, DebtRecord, DebtStatus, LedgerSnapshot};
use crate::storage::StorageBackend;

/// Outcome of restoring the ledger from storage.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    pub records: usize,
    pub warnings: Vec<String>,
    /// Set when the stored snapshot was unusable and the ledger started empty.
    pub recovered: bool,
}

/// Authoritative, newest-first collection of debts.
///
/// Every mutation writes the full snapshot before returning. When that write
/// fails the in-memory change is rolled back, so an operation either applies
/// completely or not at all.
pub struct LedgerStore {
    snapshot: LedgerSnapshot,
    storage: Box<dyn StorageBackend>,
}

impl LedgerStore {
    pub fn new(storage: Box<dyn StorageBackend>) -> Self {
        Self {
            snapshot: LedgerSnapshot::default(),
            storage,
        }
    }

    /// Constructs a store and restores it from `storage` in one step.
    pub fn open(storage: Box<dyn StorageBackend>) -> (Self, LoadReport) {
        let mut store = Self::new(storage);
        let report = store.restore();
        (store, report)
    }

    /// Replaces the ledger with the stored snapshot. Never fails: a missing
    /// slot is an empty ledger and an unreadable one is reported and dropped.
    /// When records had to be dropped, the original slot is set aside first.
    pub fn restore(&mut self) -> LoadReport {
        match self.storage.load() {
            Ok(Some(snapshot)) => {
                let report = self.restore_snapshot(snapshot);
                if !report.warnings.is_empty() {
                    self.set_aside_dropped();
                }
                report
            }
            Ok(None) => {
                self.snapshot = LedgerSnapshot::default();
                LoadReport::default()
            }
            Err(err) => {
                tracing::warn!(
                    error = %err,
                    location = %self.storage.location(),
                    "stored ledger is unreadable, starting empty"
                );
                self.snapshot = LedgerSnapshot::default();
                LoadReport {
                    records: 0,
                    warnings: vec![err.to_string()],
                    recovered: true,
                }
            }
        }
    }

    /// Replaces the ledger with `snapshot`, dropping records that break
    /// ledger invariants.
    pub fn restore_snapshot(&mut self, snapshot: LedgerSnapshot) -> LoadReport {
        let (snapshot, warnings) = snapshot.sanitize();
        for warning in &warnings {
            tracing::warn!("{warning}");
        }
        self.snapshot = snapshot;
        tracing::debug!(records = self.snapshot.len(), "ledger restored");
        LoadReport {
            records: self.snapshot.len(),
            warnings,
            recovered: false,
        }
    }

    /// Accepts an extraction result as a new pending debt at the head of the
    /// ledger. `None`, low confidence and unusable fields are all rejected
    /// with `LedgerError::ExtractionRejected` and leave the ledger untouched.
    pub fn create(&mut self, candidate: Option<AnalysisResult>) -> Result<DebtRecord> {
        let Some(candidate) = candidate else {
            tracing::warn!("extraction produced no result");
            return Err(LedgerError::rejected());
        };
        if !candidate.is_confident() {
            tracing::warn!(
                confidence = candidate.confidence_score,
                "rejecting low-confidence extraction"
            );
            return Err(LedgerError::rejected());
        }
        if let Err(reason) = candidate.validate() {
            tracing::warn!(reason = %reason, "rejecting unusable extraction");
            return Err(LedgerError::rejected());
        }

        let record = DebtRecord::from_analysis(self.fresh_id(), candidate, Utc::now());
        self.snapshot.records.insert(0, record.clone());
        if let Err(err) = self.persist() {
            self.snapshot.records.remove(0);
            return Err(err);
        }
        tracing::info!(id = %record.id, amount = record.amount, "debt recorded");
        Ok(record)
    }

    /// Marks the debt as paid. Unknown ids are ignored.
    pub fn mark_paid(&mut self, id: Uuid) -> Result<()> {
        let index = match self.position(id) {
            Ok(index) => index,
            Err(err) => {
                tracing::debug!(error = %err, "mark paid ignored");
                return Ok(());
            }
        };
        let previous = self.snapshot.records[index].status;
        self.snapshot.records[index].status = DebtStatus::Paid;
        if let Err(err) = self.persist() {
            self.snapshot.records[index].status = previous;
            return Err(err);
        }
        tracing::info!(%id, "debt marked as paid");
        Ok(())
    }

    /// Removes the debt permanently. Unknown ids are ignored; confirming the
    /// deletion is the caller's job.
    pub fn delete(&mut self, id: Uuid) -> Result<()> {
        let index = match self.position(id) {
            Ok(index) => index,
            Err(err) => {
                tracing::debug!(error = %err, "delete ignored");
                return Ok(());
            }
        };
        let removed = self.snapshot.records.remove(index);
        if let Err(err) = self.persist() {
            self.snapshot.records.insert(index, removed);
            return Err(err);
        }
        tracing::info!(%id, "debt deleted");
        Ok(())
    }

    /// Newest first.
    pub fn list(&self) -> &[DebtRecord] {
        &self.snapshot.records
    }

    pub fn len(&self) -> usize {
        self.snapshot.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot.is_empty()
    }

    pub fn find(&self, id: Uuid) -> Result<&DebtRecord> {
        self.position(id).map(|index| &self.snapshot.records[index])
    }

    pub fn snapshot(&self) -> LedgerSnapshot {
        self.snapshot.clone()
    }

    /// Freshly computed on every call.
    pub fn stats(&self) -> DebtStats {
        SummaryService::compute_stats(self.list())
    }

    fn position(&self, id: Uuid) -> Result<usize> {
        self.snapshot
            .records
            .iter()
            .position(|record| record.id == id)
            .ok_or(LedgerError::NotFound(id))
    }

    fn fresh_id(&self) -> Uuid {
        loop {
            let id = Uuid::new_v4();
            if self.position(id).is_err() {
                return id;
            }
        }
    }

    /// Copies the stored slot aside, then rewrites it without the dropped
    /// records. The slot is left alone when no copy could be made.
    fn set_aside_dropped(&self) {
        match self.storage.set_aside() {
            Ok(Some(copy)) => {
                tracing::warn!(copy = %copy, "original ledger snapshot kept aside");
                if let Err(err) = self.persist() {
                    tracing::warn!(error = %err, "unable to rewrite sanitized ledger");
                }
            }
            Ok(None) => {}
            Err(err) => tracing::warn!(error = %err, "unable to set ledger snapshot aside"),
        }
    }

    fn persist(&self) -> Result<()> {
        self.storage.save(&self.snapshot)
    }
}
