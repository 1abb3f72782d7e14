//! Finalizer handling for managed project records.
//!
//! A record holds the finalizer for as long as its AppProject may exist. The
//! AppProject is removed before the finalizer is released, so deleting a
//! record never leaves a stray AppProject behind.

use projector_core::project::FINALIZER;
use projector_core::{ManagedProject, ObjectMeta};
use projector_storage::{DynStore, ResourceKind, StorageError, StoredObject};
use tracing::{debug, info};

use crate::error::ReconcileError;

/// Lifecycle position of a record, from its deletion marker and finalizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinalizerState {
    /// Live record that has not been claimed yet.
    NoFinalizer,
    /// Live record claimed by this controller.
    FinalizerPresent,
    /// Marked for deletion while still claimed; cleanup is pending.
    Deleting,
    /// Marked for deletion and already released.
    Removed,
}

impl FinalizerState {
    pub fn of(meta: &ObjectMeta) -> Self {
        match (meta.is_deleting(), meta.has_finalizer(FINALIZER)) {
            (false, false) => Self::NoFinalizer,
            (false, true) => Self::FinalizerPresent,
            (true, true) => Self::Deleting,
            (true, false) => Self::Removed,
        }
    }
}

/// What the reconcile pass does after the finalizer step.
#[derive(Debug)]
pub enum FinalizerStep {
    /// The record is live and claimed; carry on with the latest copy.
    Continue(Box<ManagedProject>),
    /// Deletion was handled; the pass ends here.
    Finalized,
}

pub struct FinalizerManager {
    store: DynStore,
}

impl FinalizerManager {
    pub fn new(store: DynStore) -> Self {
        Self { store }
    }

    /// Moves the record one step along its lifecycle.
    pub async fn advance(
        &self,
        mut project: ManagedProject,
    ) -> Result<FinalizerStep, ReconcileError> {
        let state = FinalizerState::of(&project.metadata);
        let target = project.object_ref();
        match state {
            FinalizerState::NoFinalizer => {
                project.metadata.add_finalizer(FINALIZER);
                let stored = self.persist(&project).await?;
                debug!(project = %target, "Finalizer added");
                Ok(FinalizerStep::Continue(Box::new(stored.decode()?)))
            }
            FinalizerState::FinalizerPresent => Ok(FinalizerStep::Continue(Box::new(project))),
            FinalizerState::Deleting => {
                self.cleanup(&project).await?;
                project.metadata.remove_finalizer(FINALIZER);
                match self.persist(&project).await {
                    Ok(_) => {}
                    // Record already gone, nothing left to release
                    Err(err) if err.is_not_found() => {}
                    Err(err) => return Err(err.into()),
                }
                info!(project = %target, "Finalizer removed");
                Ok(FinalizerStep::Finalized)
            }
            FinalizerState::Removed => Ok(FinalizerStep::Finalized),
        }
    }

    /// Deletes the AppProject derived from `project`, if any.
    pub async fn cleanup(&self, project: &ManagedProject) -> Result<(), ReconcileError> {
        let derived = project.derived_ref();
        if derived.name.is_empty() {
            return Ok(());
        }

        let kind = ResourceKind::APP_PROJECT;
        if self
            .store
            .get(&kind, &derived.namespace, &derived.name)
            .await?
            .is_none()
        {
            debug!(project = %derived, "AppProject already absent");
            return Ok(());
        }

        match self
            .store
            .delete(&kind, &derived.namespace, &derived.name)
            .await
        {
            Ok(()) => {
                info!(project = %derived, "Deleted ArgoCD AppProject");
                Ok(())
            }
            Err(err) if err.is_not_found() => Ok(()),
            Err(err) => Err(err.into()),
        }
    }

    async fn persist(&self, project: &ManagedProject) -> Result<StoredObject, StorageError> {
        let value = project
            .to_value()
            .map_err(|e| StorageError::invalid_object(e.to_string()))?;
        self.store
            .update(&ResourceKind::MANAGED_PROJECT, &value)
            .await
    }
}
