use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};

use super::debt::check_fields;

/// Minimum confidence an extraction must strictly exceed to be accepted.
pub const CONFIDENCE_THRESHOLD: f64 = 0.5;

/// Structured guess produced by the external text-extraction step.
///
/// `confidence_score` is nominally in `[0, 1]` but is never clamped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub person_name: String,
    pub amount: f64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    pub confidence_score: f64,
}

impl AnalysisResult {
    /// Parses the extraction contract. A JSON `null` or any malformed payload
    /// yields `None`, which callers treat like a low-confidence result.
    pub fn from_json(raw: &str) -> Option<Self> {
        match serde_json::from_str::<Option<Self>>(raw.trim()) {
            Ok(result) => result,
            Err(err) => {
                tracing::warn!(error = %err, "analysis payload is not a valid result");
                None
            }
        }
    }

    /// NaN never passes.
    pub fn is_confident(&self) -> bool {
        self.confidence_score > CONFIDENCE_THRESHOLD
    }

    pub fn validate(&self) -> Result<(), String> {
        match check_fields(&self.person_name, self.amount) {
            Some(reason) => Err(reason),
            None => Ok(()),
        }
    }

    /// Accepts `YYYY-MM-DD` or an RFC 3339 timestamp; anything else is absent.
    pub fn parsed_due_date(&self) -> Option<NaiveDate> {
        let raw = self.due_date.as_deref()?.trim();
        if raw.is_empty() {
            return None;
        }
        if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            return Some(date);
        }
        match DateTime::parse_from_rfc3339(raw) {
            Ok(timestamp) => Some(timestamp.date_naive()),
            Err(_) => {
                tracing::warn!(due_date = raw, "ignoring unparseable due date");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(confidence: f64) -> AnalysisResult {
        AnalysisResult {
            person_name: "Bruno".into(),
            amount: 40.0,
            description: "taxi".into(),
            due_date: None,
            category: Some("Transport".into()),
            confidence_score: confidence,
        }
    }

    #[test]
    fn threshold_is_strict_and_unbounded() {
        assert!(!sample(0.5).is_confident());
        assert!(sample(0.51).is_confident());
        assert!(sample(7.0).is_confident());
        assert!(!sample(-1.0).is_confident());
        assert!(!sample(f64::NAN).is_confident());
    }

    #[test]
    fn from_json_reads_contract_fields() {
        let raw = r#"{
            "personName": "Carla",
            "amount": 12.5,
            "description": "coffee",
            "dueDate": null,
            "category": "Food",
            "confidenceScore": 0.8
        }"#;
        let result = AnalysisResult::from_json(raw).expect("valid payload");
        assert_eq!(result.person_name, "Carla");
        assert_eq!(result.amount, 12.5);
        assert_eq!(result.due_date, None);
        assert_eq!(result.category.as_deref(), Some("Food"));
    }

    #[test]
    fn from_json_treats_null_and_garbage_as_absent() {
        assert!(AnalysisResult::from_json("null").is_none());
        assert!(AnalysisResult::from_json("{}").is_none());
        assert!(AnalysisResult::from_json("not json").is_none());
    }

    #[test]
    fn due_date_accepts_plain_dates_and_timestamps() {
        let mut result = sample(0.9);
        result.due_date = Some("2025-06-01".into());
        assert_eq!(result.parsed_due_date(), NaiveDate::from_ymd_opt(2025, 6, 1));
        result.due_date = Some("2025-06-02T10:00:00Z".into());
        assert_eq!(result.parsed_due_date(), NaiveDate::from_ymd_opt(2025, 6, 2));
        result.due_date = Some("next friday".into());
        assert_eq!(result.parsed_due_date(), None);
    }

    #[test]
    fn validate_rejects_blank_names() {
        let mut result = sample(0.9);
        result.person_name = " ".into();
        assert!(result.validate().is_err());
    }
}
