//! Badge status classification

use serde::{Deserialize, Serialize};
use std::fmt;

const SUCCESS_MARKERS: &[&str] = &["pass", "success", "ok"];
const FAILURE_MARKERS: &[&str] = &["fail", "error"];
const NEUTRAL_MARKERS: &[&str] = &["cancel", "skip"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatusClassification {
    Success,
    Failure,
    Neutral,
    Unknown,
    NoBadge,
}

impl StatusClassification {
    /// Classifies a badge label by case-insensitive substring, first match wins.
    ///
    /// Substring matching is deliberately loose: `"broken"` contains `ok`.
    pub fn classify(label: &str) -> Self {
        let label = label.to_lowercase();
        let matches = |markers: &[&str]| markers.iter().any(|marker| label.contains(marker));
        if matches(SUCCESS_MARKERS) {
            StatusClassification::Success
        } else if matches(FAILURE_MARKERS) {
            StatusClassification::Failure
        } else if matches(NEUTRAL_MARKERS) {
            StatusClassification::Neutral
        } else {
            StatusClassification::Unknown
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StatusClassification::Success => "SUCCESS",
            StatusClassification::Failure => "FAILURE",
            StatusClassification::Neutral => "NEUTRAL",
            StatusClassification::Unknown => "UNKNOWN",
            StatusClassification::NoBadge => "NO_BADGE",
        }
    }
}

impl fmt::Display for StatusClassification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolved badge: the classification plus the label it came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BadgeStatus {
    pub classification: StatusClassification,
    pub label: Option<String>,
}

impl BadgeStatus {
    pub fn no_badge() -> Self {
        Self {
            classification: StatusClassification::NoBadge,
            label: None,
        }
    }

    pub fn unknown() -> Self {
        Self {
            classification: StatusClassification::Unknown,
            label: None,
        }
    }

    pub fn from_label(label: impl Into<String>) -> Self {
        let label = label.into();
        Self {
            classification: StatusClassification::classify(&label),
            label: Some(label),
        }
    }

    /// Text shown on a card: the badge label, or a placeholder
    pub fn display_label(&self) -> &str {
        match (&self.label, self.classification) {
            (Some(label), _) if !label.is_empty() => label.as_str(),
            (_, StatusClassification::NoBadge) => "no badge",
            _ => "unknown",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_badge_labels() {
        assert_eq!(StatusClassification::classify("passing"), StatusClassification::Success);
        assert_eq!(StatusClassification::classify("Success"), StatusClassification::Success);
        assert_eq!(StatusClassification::classify("OK"), StatusClassification::Success);
        assert_eq!(StatusClassification::classify("failing"), StatusClassification::Failure);
        assert_eq!(StatusClassification::classify("ERROR"), StatusClassification::Failure);
        assert_eq!(StatusClassification::classify("skipped"), StatusClassification::Neutral);
        assert_eq!(StatusClassification::classify("cancelled"), StatusClassification::Neutral);
        assert_eq!(StatusClassification::classify("no status"), StatusClassification::Unknown);
        assert_eq!(StatusClassification::classify(""), StatusClassification::Unknown);
    }

    #[test]
    fn test_first_match_wins() {
        // "pass" is tested before "fail"
        assert_eq!(
            StatusClassification::classify("pass after fail"),
            StatusClassification::Success
        );
        assert_eq!(StatusClassification::classify("broken"), StatusClassification::Success);
    }

    #[test]
    fn test_display_label() {
        assert_eq!(BadgeStatus::from_label("passing").display_label(), "passing");
        assert_eq!(BadgeStatus::no_badge().display_label(), "no badge");
        assert_eq!(BadgeStatus::unknown().display_label(), "unknown");
        assert_eq!(BadgeStatus::from_label("").display_label(), "unknown");
    }

    #[test]
    fn test_serializes_screaming_case() {
        let json = serde_json::to_string(&StatusClassification::NoBadge).unwrap();
        assert_eq!(json, "\"NO_BADGE\"");
    }
}
