//! Reconciliation of managed project records into Argo CD AppProjects.
//!
//! One pass handles one record:
//! - the finalizer step claims live records and cleans up deleted ones
//! - the template is resolved and the AppProject rendered
//! - the AppProject is created or overwritten in the store
//! - the outcome is reported on the record status

mod finalizer;
mod policy;
mod status;
mod sync;

use std::sync::Arc;

use projector_core::{
    CoreError, ManagedProject, ManagedProjectSpec, ObjectRef, Phase, ProjectRenderer,
    TemplateCatalog,
};
use projector_storage::{DynStore, ResourceKind, StoredObject};
use tracing::{debug, info, warn};

use crate::error::ReconcileError;

pub use finalizer::{FinalizerManager, FinalizerState, FinalizerStep};
pub use policy::ErrorPolicy;
pub use status::{StatusReporter, apply_status};
pub use sync::{ResourceSynchronizer, SyncError, SyncOutcome};

/// Written to `renderedYAML` when the snapshot cannot be serialized.
pub const SNAPSHOT_ERROR: &str = "# Error marshaling YAML";

/// What a successful pass did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// The record no longer exists.
    Absent,
    /// The record is being deleted and cleanup is done.
    Finalized,
    /// The AppProject was written.
    Synced(SyncOutcome),
}

/// Drives one reconcile pass per invocation.
///
/// Passes for the same record must not overlap; the caller serializes them.
pub struct ReconcileLoop {
    store: DynStore,
    catalog: Arc<TemplateCatalog>,
    renderer: ProjectRenderer,
    finalizers: FinalizerManager,
    synchronizer: ResourceSynchronizer,
    status: StatusReporter,
}

impl ReconcileLoop {
    pub fn new(store: DynStore, catalog: Arc<TemplateCatalog>) -> Self {
        Self {
            finalizers: FinalizerManager::new(store.clone()),
            synchronizer: ResourceSynchronizer::new(store.clone()),
            status: StatusReporter::new(store.clone()),
            renderer: ProjectRenderer::new(),
            catalog,
            store,
        }
    }

    pub fn catalog(&self) -> &TemplateCatalog {
        &self.catalog
    }

    pub fn backend_name(&self) -> &'static str {
        self.store.backend_name()
    }

    pub async fn reconcile(&self, target: &ObjectRef) -> Result<ReconcileOutcome, ReconcileError> {
        let Some(stored) = self
            .store
            .get(
                &ResourceKind::MANAGED_PROJECT,
                &target.namespace,
                &target.name,
            )
            .await?
        else {
            info!(project = %target, "ManagedArgoCDProject not found, ignoring");
            return Ok(ReconcileOutcome::Absent);
        };
        let project: ManagedProject = match stored.decode() {
            Ok(project) => project,
            Err(err) => {
                warn!(project = %target, error = %err, "Failed to decode ManagedArgoCDProject");
                let err = CoreError::invalid_spec(err.to_string());
                let mut partial = undecoded(&stored);
                let message = format!("Failed to render project: {err}");
                self.status
                    .report(&mut partial, Phase::Failed, message, String::new())
                    .await;
                return Err(ReconcileError::Render(err));
            }
        };

        let mut project = match self.finalizers.advance(project).await? {
            FinalizerStep::Continue(project) => *project,
            FinalizerStep::Finalized => return Ok(ReconcileOutcome::Finalized),
        };

        let template = match self.catalog.resolve(&project.spec.template) {
            Ok(template) => template,
            Err(err) => {
                warn!(
                    project = %target,
                    template = %project.spec.template,
                    error = %err,
                    "Failed to load template"
                );
                let message = format!("Failed to load template: {err}");
                self.status
                    .report(&mut project, Phase::Failed, message, String::new())
                    .await;
                return Err(ReconcileError::TemplateNotFound(project.spec.template));
            }
        };

        let rendered = self
            .renderer
            .render_project(&project, template)
            .and_then(|mut app| {
                let snapshot = snapshot(&app, target);
                app.set_owner_reference(project.controller_reference()?);
                Ok((app, snapshot))
            });
        let (mut app, snapshot) = match rendered {
            Ok(rendered) => rendered,
            Err(err) => {
                warn!(project = %target, error = %err, "Failed to render project");
                let message = format!("Failed to render project: {err}");
                self.status
                    .report(&mut project, Phase::Failed, message, String::new())
                    .await;
                return Err(ReconcileError::Render(err));
            }
        };

        let outcome = match self.synchronizer.sync(&mut app).await {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!(project = %target, error = %err, "Failed to synchronize AppProject");
                if let Some(message) = err.status_message() {
                    self.status
                        .report(&mut project, Phase::Failed, message, String::new())
                        .await;
                }
                return Err(err.into_storage_error().into());
            }
        };

        self.status
            .report(&mut project, Phase::Ready, outcome.message(), snapshot)
            .await;
        debug!(project = %target, outcome = %outcome, "Reconcile pass complete");
        Ok(ReconcileOutcome::Synced(outcome))
    }
}

/// A record whose spec does not decode, carrying only what status writes need.
fn undecoded(stored: &StoredObject) -> ManagedProject {
    let mut project = ManagedProject::new(stored.meta.clone(), ManagedProjectSpec::default());
    project.status = stored
        .value
        .get("status")
        .and_then(|status| serde_json::from_value(status.clone()).ok());
    project
}

fn snapshot(app: &projector_core::AppProject, target: &ObjectRef) -> String {
    app.to_yaml().unwrap_or_else(|err| {
        warn!(project = %target, error = %err, "Failed to marshal AppProject to YAML");
        SNAPSHOT_ERROR.to_string()
    })
}
