use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::analysis::AnalysisResult;

/// A single informal debt: someone owes the ledger owner `amount`.
///
/// Optional fields are always serialized as explicit `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebtRecord {
    pub id: Uuid,
    pub person_name: String,
    pub amount: f64,
    pub description: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    pub status: DebtStatus,
    #[serde(default)]
    pub category: Option<String>,
}

impl DebtRecord {
    /// Builds a pending record from an accepted analysis result.
    pub fn from_analysis(id: Uuid, analysis: AnalysisResult, created_at: DateTime<Utc>) -> Self {
        let due_date = analysis.parsed_due_date();
        let category = analysis
            .category
            .as_deref()
            .map(str::trim)
            .filter(|label| !label.is_empty())
            .map(str::to_string);
        Self {
            id,
            person_name: analysis.person_name.trim().to_string(),
            amount: analysis.amount,
            description: analysis.description.trim().to_string(),
            created_at,
            due_date,
            status: DebtStatus::Pending,
            category,
        }
    }

    pub fn is_paid(&self) -> bool {
        self.status == DebtStatus::Paid
    }

    /// An unpaid record whose due date lies strictly before `today`.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.is_paid() && self.due_date.is_some_and(|due| due < today)
    }

    /// Describes the first broken record invariant, if any.
    pub fn invariant_violation(&self) -> Option<String> {
        check_fields(&self.person_name, self.amount)
    }
}

/// Largest amount a single debt may carry. Keeps every ledger total finite.
pub const MAX_AMOUNT: f64 = 1e12;

/// Shared by accepted analysis results and restored snapshot records.
pub(crate) fn check_fields(person_name: &str, amount: f64) -> Option<String> {
    if person_name.trim().is_empty() {
        return Some("person name is empty".into());
    }
    if !amount.is_finite() || amount <= 0.0 {
        return Some(format!("amount {amount} is not a positive value"));
    }
    if amount > MAX_AMOUNT {
        return Some(format!("amount {amount} exceeds the {MAX_AMOUNT} limit"));
    }
    None
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum DebtStatus {
    #[default]
    Pending,
    Paid,
    /// Reserved for partial repayments; no operation produces it yet.
    Partial,
}

impl DebtStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            DebtStatus::Pending => "PENDING",
            DebtStatus::Paid => "PAID",
            DebtStatus::Partial => "PARTIAL",
        }
    }
}

impl fmt::Display for DebtStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
