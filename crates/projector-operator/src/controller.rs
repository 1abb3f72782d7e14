//! Watch-driven scheduling of reconcile passes.
//!
//! The kube runtime controller watches managed project records and the
//! AppProjects they own, and serializes passes per record.

use std::sync::Arc;

use futures_util::StreamExt;
use kube::api::{Api, DynamicObject};
use kube::runtime::controller::{Action, Controller};
use kube::runtime::watcher;
use kube::Client;
use projector_core::{ObjectRef, TemplateCatalog};
use projector_kube::{KubeStore, api_resource};
use projector_storage::{DynStore, ResourceKind, TimedStore};
use tracing::{debug, info, warn};

use crate::config::AppConfig;
use crate::error::ReconcileError;
use crate::reconcile::{ErrorPolicy, ReconcileLoop};

/// Shared state handed to every pass.
pub struct Context {
    pub reconciler: ReconcileLoop,
    pub policy: ErrorPolicy,
}

impl Context {
    pub fn new(reconciler: ReconcileLoop, policy: ErrorPolicy) -> Self {
        Self { reconciler, policy }
    }
}

/// Builds the store used by the controller: the cluster API, time-bounded.
pub fn cluster_store(client: Client, cfg: &AppConfig) -> DynStore {
    Arc::new(TimedStore::new(
        KubeStore::new(client),
        cfg.store.request_timeout(),
    ))
}

/// Runs the controller until a shutdown signal arrives.
pub async fn run(client: Client, cfg: &AppConfig) {
    let managed = api_resource(&ResourceKind::MANAGED_PROJECT);
    let owned = api_resource(&ResourceKind::APP_PROJECT);
    let (records, projects): (Api<DynamicObject>, Api<DynamicObject>) =
        match cfg.controller.namespace.as_deref() {
            Some(ns) => (
                Api::namespaced_with(client.clone(), ns, &managed),
                Api::namespaced_with(client.clone(), ns, &owned),
            ),
            None => (
                Api::all_with(client.clone(), &managed),
                Api::all_with(client.clone(), &owned),
            ),
        };

    let store = cluster_store(client, cfg);
    let catalog = Arc::new(TemplateCatalog::builtin());
    let context = Arc::new(Context::new(
        ReconcileLoop::new(store, catalog),
        ErrorPolicy::from_config(&cfg.controller),
    ));

    info!(
        namespace = cfg.controller.namespace.as_deref().unwrap_or("*"),
        requeue_after_secs = cfg.controller.requeue_after_secs,
        "Starting controller"
    );

    Controller::new_with(records, watcher::Config::default(), managed)
        .owns_with(projects, owned, watcher::Config::default())
        .shutdown_on_signal()
        .run(reconcile, error_policy, context)
        .for_each(|result| async move {
            match result {
                Ok((object, action)) => debug!(object = %object, action = ?action, "Reconciled"),
                Err(err) => warn!(error = %err, "Controller error"),
            }
        })
        .await;

    info!("Controller stopped");
}

fn target_of(object: &DynamicObject) -> ObjectRef {
    ObjectRef::new(
        object.metadata.namespace.clone().unwrap_or_default(),
        object.metadata.name.clone().unwrap_or_default(),
    )
}

async fn reconcile(
    object: Arc<DynamicObject>,
    ctx: Arc<Context>,
) -> Result<Action, ReconcileError> {
    let outcome = ctx.reconciler.reconcile(&target_of(&object)).await?;
    Ok(match ctx.policy.after_success(&outcome) {
        Some(delay) => Action::requeue(delay),
        None => Action::await_change(),
    })
}

fn error_policy(
    object: Arc<DynamicObject>,
    error: &ReconcileError,
    ctx: Arc<Context>,
) -> Action {
    let delay = ctx.policy.after_error(error);
    warn!(
        project = %target_of(&object),
        error = %error,
        category = %error.category(),
        retry_in_secs = delay.as_secs(),
        "Reconcile failed"
    );
    Action::requeue(delay)
}
