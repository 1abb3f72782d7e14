//! In-memory resource store backend for Projector.
//!
//! This crate provides an in-memory implementation of the `ResourceStore` trait
//! from `projector-storage`, using papaya lock-free HashMap for concurrent access.
//! It backs the reconcile tests and offline runs that have no cluster.
//!
//! # Example
//!
//! ```ignore
//! use projector_db_memory::InMemoryStore;
//! use projector_storage::{ResourceKind, ResourceStore};
//!
//! let store = InMemoryStore::new();
//!
//! let record = serde_json::json!({
//!     "metadata": {"name": "team-a", "namespace": "argocd"},
//!     "spec": {"projectName": "team-a"}
//! });
//! let created = store.create(&ResourceKind::MANAGED_PROJECT, &record).await?;
//! ```

pub mod storage;
mod store_impl;

// Re-export the ResourceStore trait for convenience
pub use projector_storage::{ResourceStore, StorageError, StoredObject};

pub use storage::{InMemoryStore, StoreKey};
