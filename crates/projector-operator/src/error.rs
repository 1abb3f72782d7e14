//! Errors returned from a reconcile pass.

use std::fmt;

use projector_core::CoreError;
use projector_storage::StorageError;

/// Why a reconcile pass failed. Every variant asks the scheduler to retry.
#[derive(Debug, thiserror::Error)]
pub enum ReconcileError {
    /// The record names a template outside the catalog.
    #[error("template {0} not found")]
    TemplateNotFound(String),

    /// The record cannot be rendered into an AppProject.
    #[error("render failed: {0}")]
    Render(#[source] CoreError),

    /// Optimistic concurrency lost a race with another writer.
    #[error("store conflict: {0}")]
    StoreConflict(#[source] StorageError),

    /// Any other store failure, including timeouts.
    #[error("store unavailable: {0}")]
    StoreUnavailable(#[source] StorageError),
}

impl ReconcileError {
    /// Returns `true` when a retry may succeed without the record being edited.
    ///
    /// Template and render failures only clear once the user edits the record,
    /// so they are retried on the slow schedule.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::StoreConflict(_) | Self::StoreUnavailable(_))
    }

    #[must_use]
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::StoreConflict(_))
    }

    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::TemplateNotFound(_) => ErrorCategory::TemplateNotFound,
            Self::Render(_) => ErrorCategory::Render,
            Self::StoreConflict(_) => ErrorCategory::StoreConflict,
            Self::StoreUnavailable(_) => ErrorCategory::StoreUnavailable,
        }
    }
}

impl From<StorageError> for ReconcileError {
    fn from(err: StorageError) -> Self {
        if err.is_version_conflict() || err.is_already_exists() {
            Self::StoreConflict(err)
        } else {
            Self::StoreUnavailable(err)
        }
    }
}

/// Categories of reconcile errors for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    TemplateNotFound,
    Render,
    StoreConflict,
    StoreUnavailable,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TemplateNotFound => write!(f, "template_not_found"),
            Self::Render => write!(f, "render"),
            Self::StoreConflict => write!(f, "store_conflict"),
            Self::StoreUnavailable => write!(f, "store_unavailable"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_errors_split_by_conflict() {
        let err = ReconcileError::from(StorageError::version_conflict("1", "2"));
        assert!(err.is_conflict());
        assert_eq!(err.category(), ErrorCategory::StoreConflict);

        let err = ReconcileError::from(StorageError::already_exists("AppProject", "ns/a"));
        assert!(err.is_conflict());

        let err = ReconcileError::from(StorageError::unavailable("timed out"));
        assert!(!err.is_conflict());
        assert_eq!(err.category(), ErrorCategory::StoreUnavailable);

        let err = ReconcileError::from(StorageError::invalid_object("bad"));
        assert_eq!(err.category(), ErrorCategory::StoreUnavailable);
    }

    #[test]
    fn test_retryable() {
        assert!(ReconcileError::from(StorageError::unavailable("x")).is_retryable());
        assert!(ReconcileError::from(StorageError::version_conflict("1", "2")).is_retryable());
        assert!(!ReconcileError::TemplateNotFound("gold".into()).is_retryable());
        assert!(!ReconcileError::Render(CoreError::missing_field("spec")).is_retryable());
    }

    #[test]
    fn test_display() {
        assert_eq!(
            ReconcileError::TemplateNotFound("gold".into()).to_string(),
            "template gold not found"
        );
        assert_eq!(ErrorCategory::StoreConflict.to_string(), "store_conflict");
    }
}
