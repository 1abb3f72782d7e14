use papaya::HashMap as PapayaHashMap;
use projector_core::{ObjectMeta, now_utc};
use projector_storage::{ResourceKind, StorageError, StoredObject};
use serde_json::Value;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::Mutex;
use tracing::debug;

pub type StoreKey = String; // Format: "plural.group/namespace/name"

pub(crate) fn make_store_key(kind: &ResourceKind, namespace: &str, name: &str) -> StoreKey {
    format!("{}.{}/{namespace}/{name}", kind.plural, kind.group)
}

/// In-memory resource store using papaya lock-free HashMap.
///
/// Mirrors the object lifecycle of the Kubernetes API server:
/// - uid, resourceVersion, generation and creationTimestamp assigned on create
/// - generation bumped only when `spec` changes
/// - optimistic concurrency on `metadata.resourceVersion`
/// - a separate status write path that leaves the rest of the object alone
/// - deletion deferred while finalizers remain, completed when the last one is cleared
/// - removal cascading to objects whose owner references name the removed uid
///
/// Reads are lock-free. Writes are serialized so a version check and the
/// write that follows it cannot interleave with another writer.
#[derive(Debug)]
pub struct InMemoryStore {
    /// Main storage using papaya for lock-free concurrent access
    pub(crate) data: Arc<PapayaHashMap<StoreKey, StoredObject>>,
    /// Atomic counter for generating resource versions
    pub(crate) version_counter: AtomicU64,
    pub(crate) writes: Mutex<()>,
}

impl InMemoryStore {
    /// Creates a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            data: Arc::new(PapayaHashMap::new()),
            version_counter: AtomicU64::new(1),
            writes: Mutex::new(()),
        }
    }

    /// Returns every stored object of `kind`, ordered by key.
    pub fn list(&self, kind: &ResourceKind) -> Vec<StoredObject> {
        let guard = self.data.pin();
        let mut objects: Vec<(StoreKey, StoredObject)> = guard
            .iter()
            .filter(|(_, stored)| stored.kind == *kind)
            .map(|(key, stored)| (key.clone(), stored.clone()))
            .collect();
        objects.sort_by(|a, b| a.0.cmp(&b.0));
        objects.into_iter().map(|(_, stored)| stored).collect()
    }

    pub fn len(&self) -> usize {
        self.data.pin().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Generates the next resource version.
    pub(crate) fn next_version(&self) -> String {
        self.version_counter
            .fetch_add(1, Ordering::SeqCst)
            .to_string()
    }

    pub(crate) fn lookup(&self, key: &str) -> Option<StoredObject> {
        self.data.pin().get(key).cloned()
    }

    pub(crate) fn insert(&self, key: StoreKey, stored: StoredObject) {
        self.data.pin().insert(key, stored);
    }

    /// Finishes deletion if no finalizers remain, otherwise marks the object
    /// as deleting. Must be called with the write lock held.
    pub(crate) fn delete_or_mark(&self, key: &str, existing: StoredObject) -> Result<(), StorageError> {
        if existing.meta.finalizers.is_empty() {
            self.remove(key, &existing);
            return Ok(());
        }
        if existing.meta.is_deleting() {
            return Ok(());
        }

        let mut meta = existing.meta.clone();
        meta.deletion_timestamp = Some(now_utc());
        meta.resource_version = Some(self.next_version());
        let stored = with_meta(existing.kind, meta, existing.value)?;
        debug!(
            kind = %stored.kind,
            object = %stored.object_ref(),
            finalizers = ?stored.meta.finalizers,
            "Deletion deferred until finalizers are cleared"
        );
        self.insert(key.to_string(), stored);
        Ok(())
    }

    /// Drops the object and collects dependents. Must be called with the write lock held.
    pub(crate) fn remove(&self, key: &str, removed: &StoredObject) {
        self.data.pin().remove(key);
        debug!(kind = %removed.kind, object = %removed.object_ref(), "Object removed");

        let Some(uid) = removed.uid() else {
            return;
        };
        let dependents: Vec<(StoreKey, StoredObject)> = {
            let guard = self.data.pin();
            guard
                .iter()
                .filter(|(_, stored)| stored.meta.owner_references.iter().any(|r| r.uid == uid))
                .map(|(key, stored)| (key.clone(), stored.clone()))
                .collect()
        };
        for (key, dependent) in dependents {
            if let Err(err) = self.delete_or_mark(&key, dependent) {
                debug!(key = %key, error = %err, "Skipping dependent during cascade");
            }
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Decodes `metadata` from an incoming object.
pub(crate) fn decode_meta(object: &Value) -> Result<ObjectMeta, StorageError> {
    let metadata = object
        .get("metadata")
        .cloned()
        .ok_or_else(|| StorageError::invalid_object("object has no metadata"))?;
    Ok(serde_json::from_value(metadata)?)
}

/// Writes `meta` back into `value` and wraps the result.
pub(crate) fn with_meta(
    kind: ResourceKind,
    meta: ObjectMeta,
    mut value: Value,
) -> Result<StoredObject, StorageError> {
    let obj = value
        .as_object_mut()
        .ok_or_else(|| StorageError::invalid_object("object must be a JSON object"))?;
    obj.insert("metadata".to_string(), serde_json::to_value(&meta)?);
    Ok(StoredObject { kind, meta, value })
}

/// Fails when the incoming object carries a stale resource version.
///
/// An incoming object without a resource version is an unconditional write.
pub(crate) fn check_version(
    incoming: &ObjectMeta,
    existing: &StoredObject,
) -> Result<(), StorageError> {
    match (incoming.resource_version.as_deref(), existing.resource_version()) {
        (Some(expected), Some(actual)) if expected != actual => {
            Err(StorageError::version_conflict(expected, actual))
        }
        _ => Ok(()),
    }
}
