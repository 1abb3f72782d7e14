//! Kubernetes API implementation of the ResourceStore trait.

use async_trait::async_trait;
use kube::api::{Api, DeleteParams, DynamicObject, Patch, PatchParams, PostParams};
use kube::Client;
use serde_json::{Value, json};
use tracing::debug;

use projector_core::ObjectRef;
use projector_storage::{ResourceKind, ResourceStore, StorageError, StoredObject, object_ref_of};

use crate::resource::api_resource;

/// Resource store backed by the Kubernetes API server.
///
/// Every object is addressed through the dynamic API so the store does not
/// need generated types for the managed project or AppProject kinds.
#[derive(Clone)]
pub struct KubeStore {
    client: Client,
}

impl KubeStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    fn api(&self, kind: &ResourceKind, namespace: &str) -> Api<DynamicObject> {
        let ar = api_resource(kind);
        if namespace.is_empty() {
            Api::all_with(self.client.clone(), &ar)
        } else {
            Api::namespaced_with(self.client.clone(), namespace, &ar)
        }
    }
}

impl std::fmt::Debug for KubeStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KubeStore").finish_non_exhaustive()
    }
}

fn to_stored(kind: &ResourceKind, object: DynamicObject) -> Result<StoredObject, StorageError> {
    let value = serde_json::to_value(&object)?;
    StoredObject::from_value(*kind, value)
}

fn to_dynamic(object: &Value) -> Result<DynamicObject, StorageError> {
    Ok(serde_json::from_value(object.clone())?)
}

/// Maps a client error onto the store error taxonomy.
///
/// `key` is only used to describe 404 and 409 responses.
pub(crate) fn map_api_error(err: kube::Error, kind: &ResourceKind, key: &ObjectRef) -> StorageError {
    match err {
        kube::Error::Api(response) => match response.code {
            404 => StorageError::not_found(kind.kind, key.to_string()),
            409 if response.reason == "AlreadyExists" => {
                StorageError::already_exists(kind.kind, key.to_string())
            }
            409 => StorageError::version_conflict("stale", response.message),
            400 | 422 => StorageError::invalid_object(response.message),
            _ => StorageError::unavailable(format!(
                "{} {}: {}",
                response.code, response.reason, response.message
            )),
        },
        other => map_kube_error(other),
    }
}

fn map_kube_error(err: kube::Error) -> StorageError {
    StorageError::unavailable(err.to_string())
}

#[async_trait]
impl ResourceStore for KubeStore {
    async fn get(
        &self,
        kind: &ResourceKind,
        namespace: &str,
        name: &str,
    ) -> Result<Option<StoredObject>, StorageError> {
        let key = ObjectRef::new(namespace, name);
        let found = self
            .api(kind, namespace)
            .get_opt(name)
            .await
            .map_err(|e| map_api_error(e, kind, &key))?;
        found.map(|object| to_stored(kind, object)).transpose()
    }

    async fn create(
        &self,
        kind: &ResourceKind,
        object: &Value,
    ) -> Result<StoredObject, StorageError> {
        let key = object_ref_of(object)?;
        let mut dynamic = to_dynamic(object)?;
        dynamic.metadata.resource_version = None;

        let created = self
            .api(kind, &key.namespace)
            .create(&PostParams::default(), &dynamic)
            .await
            .map_err(|e| map_api_error(e, kind, &key))?;
        debug!(kind = %kind, object = %key, "Object created");
        to_stored(kind, created)
    }

    async fn update(
        &self,
        kind: &ResourceKind,
        object: &Value,
    ) -> Result<StoredObject, StorageError> {
        let key = object_ref_of(object)?;
        let dynamic = to_dynamic(object)?;

        let replaced = self
            .api(kind, &key.namespace)
            .replace(&key.name, &PostParams::default(), &dynamic)
            .await
            .map_err(|e| map_api_error(e, kind, &key))?;
        to_stored(kind, replaced)
    }

    async fn update_status(
        &self,
        kind: &ResourceKind,
        object: &Value,
    ) -> Result<StoredObject, StorageError> {
        let key = object_ref_of(object)?;
        let status = object.get("status").cloned().unwrap_or(Value::Null);
        // A resourceVersion in a merge patch makes the API server check it
        let mut patch = json!({ "status": status });
        if let Some(rv) = object
            .get("metadata")
            .and_then(|m| m.get("resourceVersion"))
            .filter(|rv| !rv.is_null())
        {
            patch["metadata"] = json!({ "resourceVersion": rv });
        }

        let patched = self
            .api(kind, &key.namespace)
            .patch_status(&key.name, &PatchParams::default(), &Patch::Merge(&patch))
            .await
            .map_err(|e| map_api_error(e, kind, &key))?;
        to_stored(kind, patched)
    }

    async fn delete(
        &self,
        kind: &ResourceKind,
        namespace: &str,
        name: &str,
    ) -> Result<(), StorageError> {
        let key = ObjectRef::new(namespace, name);
        self.api(kind, namespace)
            .delete(name, &DeleteParams::background())
            .await
            .map_err(|e| map_api_error(e, kind, &key))?;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "kubernetes"
    }
}
