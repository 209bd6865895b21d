//! Debt ledger domain models and persistence-friendly types.

pub mod analysis;
pub mod debt;
pub mod snapshot;

pub use analysis::{AnalysisResult, CONFIDENCE_THRESHOLD};
pub use debt::{DebtRecord, DebtStatus, MAX_AMOUNT};
pub use snapshot::LedgerSnapshot;
