pub mod advice_service;
pub mod summary_service;

pub use advice_service::{AdviceService, EMPTY_REPLY_ADVICE, FALLBACK_ADVICE};
pub use summary_service::{Bucket, DebtStats, Distribution, DistributionSlice, SummaryService};
