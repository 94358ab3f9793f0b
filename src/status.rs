//! Training job status state machine.
//!
//! A job starts in `Starting` and moves through `Training` to one of the
//! terminal states. The remote provider owns the transitions; this module
//! only classifies and parses what it reports.

use serde::{Deserialize, Serialize};

/// Lifecycle status of a training job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrainingStatus {
    Starting,
    Training,
    Succeeded,
    Failed,
    Canceled,
}

impl TrainingStatus {
    /// Check if this is a terminal (final) status.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TrainingStatus::Succeeded | TrainingStatus::Failed | TrainingStatus::Canceled
        )
    }

    /// Check if this is a success status.
    pub fn is_success(&self) -> bool {
        *self == TrainingStatus::Succeeded
    }

    /// Parse a status string (case-insensitive, handles aliases).
    ///
    /// Handles common provider aliases:
    /// - "starting", "queued", "pending" → Starting
    /// - "training", "processing", "running", "in_progress" → Training
    /// - "succeeded", "success", "completed" → Succeeded
    /// - "failed", "failure", "error" → Failed
    /// - "canceled", "cancelled" → Canceled
    pub fn from_str(s: &str) -> Option<Self> {
        let normalized = s.trim().to_lowercase().replace(' ', "_");
        match normalized.as_str() {
            "starting" | "queued" | "pending" => Some(TrainingStatus::Starting),
            "training" | "processing" | "running" | "in_progress" => Some(TrainingStatus::Training),
            "succeeded" | "success" | "completed" | "complete" => Some(TrainingStatus::Succeeded),
            "failed" | "failure" | "error" => Some(TrainingStatus::Failed),
            "canceled" | "cancelled" | "cancel" => Some(TrainingStatus::Canceled),
            _ => None,
        }
    }

    /// Convert to string.
    pub fn as_str(&self) -> &'static str {
        match self {
            TrainingStatus::Starting => "starting",
            TrainingStatus::Training => "training",
            TrainingStatus::Succeeded => "succeeded",
            TrainingStatus::Failed => "failed",
            TrainingStatus::Canceled => "canceled",
        }
    }
}

impl std::fmt::Display for TrainingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Default for TrainingStatus {
    fn default() -> Self {
        TrainingStatus::Starting
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_from_str() {
        assert_eq!(
            TrainingStatus::from_str("starting"),
            Some(TrainingStatus::Starting)
        );
        assert_eq!(
            TrainingStatus::from_str("QUEUED"),
            Some(TrainingStatus::Starting)
        );
        assert_eq!(
            TrainingStatus::from_str("processing"),
            Some(TrainingStatus::Training)
        );
        assert_eq!(
            TrainingStatus::from_str("in_progress"),
            Some(TrainingStatus::Training)
        );
        assert_eq!(
            TrainingStatus::from_str("succeeded"),
            Some(TrainingStatus::Succeeded)
        );
        assert_eq!(
            TrainingStatus::from_str("completed"),
            Some(TrainingStatus::Succeeded)
        );
        assert_eq!(
            TrainingStatus::from_str("failed"),
            Some(TrainingStatus::Failed)
        );
        assert_eq!(
            TrainingStatus::from_str("cancelled"),
            Some(TrainingStatus::Canceled)
        );
        assert_eq!(TrainingStatus::from_str("unknown"), None);
    }

    #[test]
    fn test_status_is_terminal() {
        assert!(!TrainingStatus::Starting.is_terminal());
        assert!(!TrainingStatus::Training.is_terminal());
        assert!(TrainingStatus::Succeeded.is_terminal());
        assert!(TrainingStatus::Failed.is_terminal());
        assert!(TrainingStatus::Canceled.is_terminal());
    }

    #[test]
    fn test_status_is_success() {
        assert!(TrainingStatus::Succeeded.is_success());
        assert!(!TrainingStatus::Failed.is_success());
        assert!(!TrainingStatus::Training.is_success());
    }

    #[test]
    fn test_status_roundtrip() {
        for status in [
            TrainingStatus::Starting,
            TrainingStatus::Training,
            TrainingStatus::Succeeded,
            TrainingStatus::Failed,
            TrainingStatus::Canceled,
        ] {
            assert_eq!(TrainingStatus::from_str(status.as_str()), Some(status));
        }
    }

    #[test]
    fn test_default_is_starting() {
        assert_eq!(TrainingStatus::default(), TrainingStatus::Starting);
    }
}
