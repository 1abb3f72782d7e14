//! TimedStore - A store wrapper that bounds every call with a deadline.
//!
//! This wrapper delegates all operations to an inner store implementation.
//! A call that does not finish in time is abandoned and reported as
//! `StorageError::Unavailable`, which callers treat as retryable.
//!
//! # Example
//!
//! ```ignore
//! use std::time::Duration;
//! use projector_storage::TimedStore;
//!
//! let store = TimedStore::new(kube_store, Duration::from_secs(10));
//! store.get(&ResourceKind::APP_PROJECT, "argocd", "team-a").await?;
//! ```

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::error::StorageError;
use crate::traits::ResourceStore;
use crate::types::{ResourceKind, StoredObject};

/// A store wrapper that fails calls exceeding a fixed timeout.
pub struct TimedStore<S: ResourceStore> {
    /// The inner store implementation.
    inner: S,
    timeout: Duration,
}

impl<S: ResourceStore> TimedStore<S> {
    pub fn new(inner: S, timeout: Duration) -> Self {
        Self { inner, timeout }
    }

    /// Get a reference to the inner store.
    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn bounded<T>(
        &self,
        operation: &'static str,
        kind: &ResourceKind,
        call: impl Future<Output = Result<T, StorageError>>,
    ) -> Result<T, StorageError> {
        match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => result,
            Err(_) => {
                debug!(
                    backend = self.inner.backend_name(),
                    kind = %kind,
                    operation,
                    timeout_ms = self.timeout.as_millis() as u64,
                    "Store call timed out"
                );
                Err(StorageError::unavailable(format!(
                    "{operation} {kind} timed out after {}ms",
                    self.timeout.as_millis()
                )))
            }
        }
    }
}

#[async_trait]
impl<S: ResourceStore> ResourceStore for TimedStore<S> {
    async fn get(
        &self,
        kind: &ResourceKind,
        namespace: &str,
        name: &str,
    ) -> Result<Option<StoredObject>, StorageError> {
        self.bounded("get", kind, self.inner.get(kind, namespace, name))
            .await
    }

    async fn create(
        &self,
        kind: &ResourceKind,
        object: &Value,
    ) -> Result<StoredObject, StorageError> {
        self.bounded("create", kind, self.inner.create(kind, object))
            .await
    }

    async fn update(
        &self,
        kind: &ResourceKind,
        object: &Value,
    ) -> Result<StoredObject, StorageError> {
        self.bounded("update", kind, self.inner.update(kind, object))
            .await
    }

    async fn update_status(
        &self,
        kind: &ResourceKind,
        object: &Value,
    ) -> Result<StoredObject, StorageError> {
        self.bounded("update_status", kind, self.inner.update_status(kind, object))
            .await
    }

    async fn delete(
        &self,
        kind: &ResourceKind,
        namespace: &str,
        name: &str,
    ) -> Result<(), StorageError> {
        self.bounded("delete", kind, self.inner.delete(kind, namespace, name))
            .await
    }

    fn backend_name(&self) -> &'static str {
        self.inner.backend_name()
    }
}

impl<S: ResourceStore> std::fmt::Debug for TimedStore<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimedStore")
            .field("backend", &self.inner.backend_name())
            .field("timeout", &self.timeout)
            .finish()
    }
}
