//! # projector-storage
//!
//! Resource store abstraction layer for Projector.
//!
//! This crate defines the traits and types that all store backends must implement.
//! It does not contain any backends - those are provided by separate crates
//! (`projector-db-memory` for tests and offline use, `projector-kube` for a cluster).
//!
//! ## Overview
//!
//! The main trait is [`ResourceStore`], which defines the contract for:
//! - reading objects by namespace and name
//! - creating and replacing objects under optimistic versioning
//! - writing the status subresource
//! - finalizer-aware deletion
//!
//! ## Storage Backends
//!
//! To implement a backend, implement the [`ResourceStore`] trait:
//!
//! ```ignore
//! use async_trait::async_trait;
//! use projector_storage::{ResourceKind, ResourceStore, StorageError, StoredObject};
//!
//! struct MyStore {
//!     // ...
//! }
//!
//! #[async_trait]
//! impl ResourceStore for MyStore {
//!     async fn get(&self, kind: &ResourceKind, namespace: &str, name: &str)
//!         -> Result<Option<StoredObject>, StorageError> {
//!         // Implementation
//!     }
//!     // ... other methods
//! }
//! ```

mod error;
pub mod timeout;
mod traits;
mod types;

pub use error::{ErrorCategory, StorageError};
pub use timeout::TimedStore;
pub use traits::ResourceStore;
pub use types::{ResourceKind, StoredObject, object_ref_of};

/// Type alias for a shared store trait object.
pub type DynStore = std::sync::Arc<dyn ResourceStore>;
