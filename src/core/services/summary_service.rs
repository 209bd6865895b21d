use chrono::NaiveDate;
use serde::Serialize;

use crate::ledger::DebtRecord;

/// Totals derived from a ledger snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct DebtStats {
    pub total: f64,
    pub collected: f64,
    pub pending: f64,
    pub count: usize,
    pub pending_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Bucket {
    Collected,
    Pending,
}

impl Bucket {
    pub fn label(self) -> &'static str {
        match self {
            Bucket::Collected => "collected",
            Bucket::Pending => "pending",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DistributionSlice {
    pub bucket: Bucket,
    pub value: f64,
}

impl DistributionSlice {
    pub fn label(&self) -> &'static str {
        self.bucket.label()
    }

    /// Percentage of `total`, zero when there is nothing owed.
    pub fn share_of(&self, total: f64) -> f64 {
        if total > 0.0 {
            self.value / total * 100.0
        } else {
            0.0
        }
    }
}

/// Always collected first, then pending.
pub type Distribution = [DistributionSlice; 2];

/// Pure aggregation over debt records. Nothing is cached between calls.
pub struct SummaryService;

impl SummaryService {
    pub fn compute_stats(records: &[DebtRecord]) -> DebtStats {
        let mut stats = DebtStats::default();
        for record in records {
            stats.total += record.amount;
            stats.count += 1;
            if record.is_paid() {
                stats.collected += record.amount;
            } else {
                stats.pending_count += 1;
            }
        }
        stats.pending = stats.total - stats.collected;
        stats
    }

    pub fn distribution(stats: &DebtStats) -> Distribution {
        [
            DistributionSlice {
                bucket: Bucket::Collected,
                value: stats.collected,
            },
            DistributionSlice {
                bucket: Bucket::Pending,
                value: stats.pending,
            },
        ]
    }

    /// Unpaid records past their due date, in ledger order.
    pub fn overdue(records: &[DebtRecord], today: NaiveDate) -> Vec<&DebtRecord> {
        records
            .iter()
            .filter(|record| record.is_overdue(today))
            .collect()
    }
}
