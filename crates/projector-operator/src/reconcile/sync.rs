//! Create-or-update of the AppProject document.

use std::fmt;

use projector_core::AppProject;
use projector_storage::{DynStore, ResourceKind, StorageError};
use tracing::info;

/// What a successful synchronization did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    Created,
    Updated,
}

impl SyncOutcome {
    /// Status message reported on the managed project.
    pub fn message(&self) -> &'static str {
        match self {
            SyncOutcome::Created => "ArgoCD AppProject created successfully",
            SyncOutcome::Updated => "ArgoCD AppProject updated successfully",
        }
    }
}

impl fmt::Display for SyncOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncOutcome::Created => f.write_str("created"),
            SyncOutcome::Updated => f.write_str("updated"),
        }
    }
}

/// A failed synchronization, tagged with the store call that failed.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("failed to get project: {0}")]
    Lookup(#[source] StorageError),
    #[error("failed to create project: {0}")]
    Create(#[source] StorageError),
    #[error("failed to update project: {0}")]
    Update(#[source] StorageError),
    #[error("failed to encode project: {0}")]
    Encode(#[source] projector_core::CoreError),
}

impl SyncError {
    /// Failed-status message for the managed project, if this failure sets one.
    ///
    /// Lookup failures leave the status alone, as do conflicts, which only
    /// mean another writer got there first.
    pub fn status_message(&self) -> Option<String> {
        match self {
            SyncError::Lookup(_) => None,
            SyncError::Create(err) | SyncError::Update(err)
                if err.is_version_conflict() || err.is_already_exists() =>
            {
                None
            }
            SyncError::Create(err) => Some(format!("Failed to create project: {err}")),
            SyncError::Update(err) => Some(format!("Failed to update project: {err}")),
            SyncError::Encode(err) => Some(format!("Failed to render project: {err}")),
        }
    }

    pub fn into_storage_error(self) -> StorageError {
        match self {
            SyncError::Lookup(err) | SyncError::Create(err) | SyncError::Update(err) => err,
            SyncError::Encode(err) => StorageError::invalid_object(err.to_string()),
        }
    }
}

/// Writes rendered AppProjects to the store.
///
/// An existing document is overwritten in full: spec, labels and owner
/// reference all come from the fresh render.
pub struct ResourceSynchronizer {
    store: DynStore,
}

impl ResourceSynchronizer {
    pub fn new(store: DynStore) -> Self {
        Self { store }
    }

    pub async fn sync(&self, project: &mut AppProject) -> Result<SyncOutcome, SyncError> {
        let kind = ResourceKind::APP_PROJECT;
        let target = project.metadata.object_ref();

        let existing = self
            .store
            .get(&kind, &target.namespace, &target.name)
            .await
            .map_err(SyncError::Lookup)?;

        match existing {
            None => {
                info!(project = %target, "Creating ArgoCD AppProject");
                project.set_resource_version(None);
                let value = project.to_value().map_err(SyncError::Encode)?;
                self.store
                    .create(&kind, &value)
                    .await
                    .map_err(SyncError::Create)?;
                Ok(SyncOutcome::Created)
            }
            Some(found) => {
                info!(project = %target, "Updating ArgoCD AppProject");
                project.set_resource_version(found.meta.resource_version.clone());
                let value = project.to_value().map_err(SyncError::Encode)?;
                self.store
                    .update(&kind, &value)
                    .await
                    .map_err(SyncError::Update)?;
                Ok(SyncOutcome::Updated)
            }
        }
    }
}
