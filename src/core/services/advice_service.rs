//! Post-aggregation hook that asks an external advisor for a short tip.

use crate::collaborators::Advisor;

use super::summary_service::DebtStats;

/// Shown when the advisor cannot be reached or fails.
pub const FALLBACK_ADVICE: &str = "Stay focused on collecting what you are owed.";
/// Shown when the advisor answers with nothing.
pub const EMPTY_REPLY_ADVICE: &str = "Keep your finances organized!";

pub struct AdviceService;

impl AdviceService {
    pub fn summary_request(stats: &DebtStats) -> String {
        format!(
            "Total owed: {}, pending: {}. Count: {}",
            stats.total, stats.pending, stats.count
        )
    }

    /// Returns `None` for an empty ledger without contacting the advisor.
    /// Advisor failures degrade to a fixed sentence and are never surfaced.
    pub fn advise(advisor: &dyn Advisor, stats: &DebtStats) -> Option<String> {
        if stats.count == 0 {
            return None;
        }
        let request = Self::summary_request(stats);
        let tip = match advisor.advise(&request) {
            Ok(reply) if reply.trim().is_empty() => EMPTY_REPLY_ADVICE.to_string(),
            Ok(reply) => reply.trim().to_string(),
            Err(err) => {
                tracing::warn!(error = %err, "advisor failed, using fallback tip");
                FALLBACK_ADVICE.to_string()
            }
        };
        Some(tip)
    }
}
