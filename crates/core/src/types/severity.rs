//! Severity classification for performance monitoring.
//!
//! A metric submission carries a `performance_score` (0-100). Scores below
//! 70 raise an alert: `high` under 50, `medium` otherwise. Scores of 70 and
//! above raise nothing.

use serde::{Deserialize, Serialize};

/// Score below which an alert is raised at all.
pub const ALERT_THRESHOLD: f64 = 70.0;

/// Score below which an alert is `High` rather than `Medium`.
pub const HIGH_SEVERITY_THRESHOLD: f64 = 50.0;

/// Severity of an auto-created performance alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertSeverity {
    High,
    Medium,
}

impl AlertSeverity {
    /// Classify a performance score, or `None` when no alert is warranted.
    #[must_use]
    pub fn for_score(score: f64) -> Option<Self> {
        if score >= ALERT_THRESHOLD {
            None
        } else if score < HIGH_SEVERITY_THRESHOLD {
            Some(Self::High)
        } else {
            Some(Self::Medium)
        }
    }

    /// Stable string form, matching the database representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
        }
    }
}

impl std::fmt::Display for AlertSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Severity reported by the client for an individual performance issue.
///
/// Unlike [`AlertSeverity`] this is taken from the submission as-is; the
/// server does not derive it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueSeverity {
    Low,
    Medium,
    High,
}

impl IssueSeverity {
    /// Stable string form, matching the database representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl std::fmt::Display for IssueSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_65_is_medium() {
        assert_eq!(AlertSeverity::for_score(65.0), Some(AlertSeverity::Medium));
    }

    #[test]
    fn test_score_40_is_high() {
        assert_eq!(AlertSeverity::for_score(40.0), Some(AlertSeverity::High));
    }

    #[test]
    fn test_score_85_is_no_alert() {
        assert_eq!(AlertSeverity::for_score(85.0), None);
    }

    #[test]
    fn test_boundaries() {
        // 70 is healthy, 69.9 is not
        assert_eq!(AlertSeverity::for_score(70.0), None);
        assert_eq!(
            AlertSeverity::for_score(69.9),
            Some(AlertSeverity::Medium)
        );
        // 50 is medium, just under is high
        assert_eq!(
            AlertSeverity::for_score(50.0),
            Some(AlertSeverity::Medium)
        );
        assert_eq!(AlertSeverity::for_score(49.9), Some(AlertSeverity::High));
        assert_eq!(AlertSeverity::for_score(0.0), Some(AlertSeverity::High));
    }

    #[test]
    fn test_string_forms() {
        assert_eq!(AlertSeverity::High.as_str(), "high");
        assert_eq!(AlertSeverity::Medium.to_string(), "medium");
        assert_eq!(IssueSeverity::Low.as_str(), "low");
    }
}
