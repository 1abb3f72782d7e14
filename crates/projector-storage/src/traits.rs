//! Store traits for the resource store abstraction layer.
//!
//! This module defines the contract every store backend must implement.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::StorageError;
use crate::types::{ResourceKind, StoredObject};

/// The main store trait that every backend must implement.
///
/// Objects are JSON documents with a Kubernetes-style `metadata` block.
/// Concurrency control is optimistic: writes carry `metadata.resourceVersion`
/// and fail with `StorageError::VersionConflict` when it is stale.
/// Implementations must be thread-safe (`Send + Sync`).
///
/// # Example
///
/// ```ignore
/// use projector_storage::{ResourceKind, ResourceStore, StorageError, StoredObject};
///
/// async fn get_project(store: &dyn ResourceStore, ns: &str, name: &str) -> Result<StoredObject, StorageError> {
///     store
///         .get(&ResourceKind::APP_PROJECT, ns, name)
///         .await?
///         .ok_or_else(|| StorageError::not_found("AppProject", format!("{ns}/{name}")))
/// }
/// ```
#[async_trait]
pub trait ResourceStore: Send + Sync {
    /// Reads an object by namespace and name.
    ///
    /// Returns `None` if the object does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error only for infrastructure issues, not for missing objects.
    async fn get(
        &self,
        kind: &ResourceKind,
        namespace: &str,
        name: &str,
    ) -> Result<Option<StoredObject>, StorageError>;

    /// Creates a new object.
    ///
    /// Any `resourceVersion` on the input is ignored; the backend assigns one.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::AlreadyExists` if an object with the same name exists.
    /// Returns `StorageError::InvalidObject` if the object is malformed.
    async fn create(&self, kind: &ResourceKind, object: &Value)
    -> Result<StoredObject, StorageError>;

    /// Replaces an existing object, leaving its status untouched.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the object does not exist.
    /// Returns `StorageError::VersionConflict` if `metadata.resourceVersion` is stale.
    async fn update(&self, kind: &ResourceKind, object: &Value)
    -> Result<StoredObject, StorageError>;

    /// Writes only the `status` of an existing object.
    ///
    /// # Errors
    ///
    /// Same version rules as [`ResourceStore::update`].
    async fn update_status(
        &self,
        kind: &ResourceKind,
        object: &Value,
    ) -> Result<StoredObject, StorageError>;

    /// Deletes an object by namespace and name.
    ///
    /// Objects holding finalizers are only marked for deletion.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the object does not exist.
    async fn delete(
        &self,
        kind: &ResourceKind,
        namespace: &str,
        name: &str,
    ) -> Result<(), StorageError>;

    /// Returns the name of the backend for logging.
    fn backend_name(&self) -> &'static str;
}
