//! Implementation of the ResourceStore trait for InMemoryStore.

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use projector_core::{ObjectRef, now_utc};
use projector_storage::{ResourceKind, ResourceStore, StorageError, StoredObject, object_ref_of};

use crate::storage::{InMemoryStore, check_version, decode_meta, make_store_key, with_meta};

#[async_trait]
impl ResourceStore for InMemoryStore {
    async fn get(
        &self,
        kind: &ResourceKind,
        namespace: &str,
        name: &str,
    ) -> Result<Option<StoredObject>, StorageError> {
        let key = make_store_key(kind, namespace, name);
        Ok(self.lookup(&key))
    }

    async fn create(
        &self,
        kind: &ResourceKind,
        object: &Value,
    ) -> Result<StoredObject, StorageError> {
        let object_ref = object_ref_of(object)?;
        let mut meta = decode_meta(object)?;
        let key = make_store_key(kind, &object_ref.namespace, &object_ref.name);

        let _writes = self.writes.lock().await;
        if self.lookup(&key).is_some() {
            return Err(StorageError::already_exists(kind.kind, object_ref.to_string()));
        }

        meta.uid = Some(uuid::Uuid::new_v4().to_string());
        meta.resource_version = Some(self.next_version());
        meta.generation = Some(1);
        meta.creation_timestamp = Some(now_utc());
        meta.deletion_timestamp = None;

        // Status is only written through update_status
        let mut value = object.clone();
        if let Some(obj) = value.as_object_mut() {
            obj.remove("status");
            obj.entry("apiVersion")
                .or_insert_with(|| Value::String(kind.api_version()));
            obj.entry("kind")
                .or_insert_with(|| Value::String(kind.kind.to_string()));
        }

        let stored = with_meta(*kind, meta, value)?;
        self.insert(key, stored.clone());
        debug!(kind = %kind, object = %object_ref, "Object created");
        Ok(stored)
    }

    async fn update(
        &self,
        kind: &ResourceKind,
        object: &Value,
    ) -> Result<StoredObject, StorageError> {
        let object_ref = object_ref_of(object)?;
        let mut meta = decode_meta(object)?;
        let key = make_store_key(kind, &object_ref.namespace, &object_ref.name);

        let _writes = self.writes.lock().await;
        let existing = self
            .lookup(&key)
            .ok_or_else(|| StorageError::not_found(kind.kind, object_ref.to_string()))?;
        check_version(&meta, &existing)?;

        let generation = existing.meta.generation.unwrap_or(1);
        meta.uid = existing.meta.uid.clone();
        meta.creation_timestamp = existing.meta.creation_timestamp;
        meta.deletion_timestamp = existing.meta.deletion_timestamp;
        meta.generation = Some(if object.get("spec") != existing.value.get("spec") {
            generation + 1
        } else {
            generation
        });
        meta.resource_version = Some(self.next_version());

        let mut value = object.clone();
        if let Some(obj) = value.as_object_mut() {
            match existing.value.get("status") {
                Some(status) => {
                    obj.insert("status".to_string(), status.clone());
                }
                None => {
                    obj.remove("status");
                }
            }
        }

        let stored = with_meta(*kind, meta, value)?;
        if stored.meta.is_deleting() && stored.meta.finalizers.is_empty() {
            self.remove(&key, &stored);
            return Ok(stored);
        }
        self.insert(key, stored.clone());
        Ok(stored)
    }

    async fn update_status(
        &self,
        kind: &ResourceKind,
        object: &Value,
    ) -> Result<StoredObject, StorageError> {
        let object_ref = object_ref_of(object)?;
        let incoming = decode_meta(object)?;
        let key = make_store_key(kind, &object_ref.namespace, &object_ref.name);

        let _writes = self.writes.lock().await;
        let existing = self
            .lookup(&key)
            .ok_or_else(|| StorageError::not_found(kind.kind, object_ref.to_string()))?;
        check_version(&incoming, &existing)?;

        let mut meta = existing.meta.clone();
        meta.resource_version = Some(self.next_version());

        let mut value = existing.value;
        if let Some(obj) = value.as_object_mut() {
            match object.get("status") {
                Some(status) => {
                    obj.insert("status".to_string(), status.clone());
                }
                None => {
                    obj.remove("status");
                }
            }
        }

        let stored = with_meta(*kind, meta, value)?;
        self.insert(key, stored.clone());
        Ok(stored)
    }

    async fn delete(
        &self,
        kind: &ResourceKind,
        namespace: &str,
        name: &str,
    ) -> Result<(), StorageError> {
        let key = make_store_key(kind, namespace, name);

        let _writes = self.writes.lock().await;
        let existing = self
            .lookup(&key)
            .ok_or_else(|| {
                StorageError::not_found(kind.kind, ObjectRef::new(namespace, name).to_string())
            })?;
        self.delete_or_mark(&key, existing)
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
