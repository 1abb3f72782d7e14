use std::time::Duration;

use super::ReconcileOutcome;
use crate::config::ControllerConfig;
use crate::error::ReconcileError;

/// When to run the next pass for a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorPolicy {
    /// Periodic resync after a successful pass, and retry delay for errors
    /// that need the record to change.
    pub requeue_after: Duration,
    /// Retry delay for transient store errors.
    pub error_backoff: Duration,
}

impl ErrorPolicy {
    pub fn from_config(config: &ControllerConfig) -> Self {
        Self {
            requeue_after: config.requeue_after(),
            error_backoff: config.error_backoff(),
        }
    }

    /// Delay before the next pass, or `None` to wait for the next change.
    pub fn after_success(&self, outcome: &ReconcileOutcome) -> Option<Duration> {
        match outcome {
            ReconcileOutcome::Synced(_) => Some(self.requeue_after),
            ReconcileOutcome::Absent | ReconcileOutcome::Finalized => None,
        }
    }

    pub fn after_error(&self, error: &ReconcileError) -> Duration {
        if error.is_retryable() {
            self.error_backoff
        } else {
            self.requeue_after.min(self.error_backoff.saturating_mul(4))
        }
    }
}

impl Default for ErrorPolicy {
    fn default() -> Self {
        Self::from_config(&ControllerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconcile::SyncOutcome;
    use projector_storage::StorageError;

    #[test]
    fn test_defaults() {
        let policy = ErrorPolicy::default();
        assert_eq!(policy.requeue_after, Duration::from_secs(300));
        assert_eq!(policy.error_backoff, Duration::from_secs(15));
    }

    #[test]
    fn test_after_success() {
        let policy = ErrorPolicy::default();
        assert_eq!(
            policy.after_success(&ReconcileOutcome::Synced(SyncOutcome::Created)),
            Some(Duration::from_secs(300))
        );
        assert_eq!(policy.after_success(&ReconcileOutcome::Absent), None);
        assert_eq!(policy.after_success(&ReconcileOutcome::Finalized), None);
    }

    #[test]
    fn test_after_error() {
        let policy = ErrorPolicy::default();
        let transient = ReconcileError::from(StorageError::unavailable("timed out"));
        assert_eq!(policy.after_error(&transient), Duration::from_secs(15));

        let stuck = ReconcileError::TemplateNotFound("gold".into());
        assert_eq!(policy.after_error(&stuck), Duration::from_secs(60));

        let short = ErrorPolicy {
            requeue_after: Duration::from_secs(30),
            error_backoff: Duration::from_secs(15),
        };
        assert_eq!(short.after_error(&stuck), Duration::from_secs(30));
    }

    #[test]
    fn test_after_error_huge_backoff_saturates() {
        let policy = ErrorPolicy::from_config(&ControllerConfig {
            error_backoff_secs: u64::MAX / 2,
            ..ControllerConfig::default()
        });
        let stuck = ReconcileError::TemplateNotFound("gold".into());
        assert_eq!(policy.after_error(&stuck), Duration::from_secs(300));
    }
}
