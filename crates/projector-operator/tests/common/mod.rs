#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use projector_core::{ManagedProject, ObjectRef, TemplateCatalog};
use projector_db_memory::InMemoryStore;
use projector_operator::ReconcileLoop;
use projector_storage::{DynStore, ResourceKind, ResourceStore, StorageError, StoredObject};
use serde_json::{Value, json};

pub const NAMESPACE: &str = "argocd";

/// In-memory store that records every call and fails the ones it is told to.
#[derive(Default)]
pub struct FaultyStore {
    inner: InMemoryStore,
    faults: Mutex<HashMap<(&'static str, &'static str), VecDeque<StorageError>>>,
    calls: Mutex<Vec<String>>,
}

impl FaultyStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn inner(&self) -> &InMemoryStore {
        &self.inner
    }

    /// Fails the next `op` on `kind` with `error`.
    pub fn fail_next(&self, op: &'static str, kind: &ResourceKind, error: StorageError) {
        self.faults
            .lock()
            .unwrap()
            .entry((op, kind.kind))
            .or_default()
            .push_back(error);
    }

    /// Calls recorded so far, as `"<op> <Kind>"`.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    fn enter(&self, op: &'static str, kind: &ResourceKind) -> Result<(), StorageError> {
        self.calls.lock().unwrap().push(format!("{op} {}", kind.kind));
        match self
            .faults
            .lock()
            .unwrap()
            .get_mut(&(op, kind.kind))
            .and_then(VecDeque::pop_front)
        {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ResourceStore for FaultyStore {
    async fn get(
        &self,
        kind: &ResourceKind,
        namespace: &str,
        name: &str,
    ) -> Result<Option<StoredObject>, StorageError> {
        self.enter("get", kind)?;
        self.inner.get(kind, namespace, name).await
    }

    async fn create(
        &self,
        kind: &ResourceKind,
        object: &Value,
    ) -> Result<StoredObject, StorageError> {
        self.enter("create", kind)?;
        self.inner.create(kind, object).await
    }

    async fn update(
        &self,
        kind: &ResourceKind,
        object: &Value,
    ) -> Result<StoredObject, StorageError> {
        self.enter("update", kind)?;
        self.inner.update(kind, object).await
    }

    async fn update_status(
        &self,
        kind: &ResourceKind,
        object: &Value,
    ) -> Result<StoredObject, StorageError> {
        self.enter("update_status", kind)?;
        self.inner.update_status(kind, object).await
    }

    async fn delete(
        &self,
        kind: &ResourceKind,
        namespace: &str,
        name: &str,
    ) -> Result<(), StorageError> {
        self.enter("delete", kind)?;
        self.inner.delete(kind, namespace, name).await
    }

    fn backend_name(&self) -> &'static str {
        "faulty-memory"
    }
}

pub struct Harness {
    pub store: Arc<FaultyStore>,
    pub reconciler: ReconcileLoop,
}

impl Harness {
    pub fn new() -> Self {
        let store = FaultyStore::new();
        let dyn_store: DynStore = store.clone();
        let reconciler = ReconcileLoop::new(dyn_store, Arc::new(TemplateCatalog::builtin()));
        Self { store, reconciler }
    }

    /// Creates a managed project record whose name matches its project name.
    pub async fn seed(&self, name: &str, spec: Value) -> ObjectRef {
        let record = json!({
            "apiVersion": "argocd.platform.io/v1alpha1",
            "kind": "ManagedArgoCDProject",
            "metadata": {"name": name, "namespace": NAMESPACE},
            "spec": spec,
        });
        self.store
            .inner()
            .create(&ResourceKind::MANAGED_PROJECT, &record)
            .await
            .unwrap();
        ObjectRef::new(NAMESPACE, name)
    }

    pub async fn project(&self, target: &ObjectRef) -> Option<ManagedProject> {
        self.store
            .inner()
            .get(&ResourceKind::MANAGED_PROJECT, &target.namespace, &target.name)
            .await
            .unwrap()
            .map(|stored| stored.decode().unwrap())
    }

    pub async fn app_project(&self, namespace: &str, name: &str) -> Option<StoredObject> {
        self.store
            .inner()
            .get(&ResourceKind::APP_PROJECT, namespace, name)
            .await
            .unwrap()
    }

    /// Replaces the record spec, bumping its generation.
    pub async fn edit_spec(&self, target: &ObjectRef, spec: Value) {
        let mut current = self
            .store
            .inner()
            .get(&ResourceKind::MANAGED_PROJECT, &target.namespace, &target.name)
            .await
            .unwrap()
            .unwrap()
            .into_value();
        current["spec"] = spec;
        self.store
            .inner()
            .update(&ResourceKind::MANAGED_PROJECT, &current)
            .await
            .unwrap();
    }
}

pub fn team_a_spec() -> Value {
    json!({
        "projectName": "team-a",
        "repositories": ["https://git/x"],
        "destinations": [{"server": "https://cluster1", "namespace": "ns1"}]
    })
}
