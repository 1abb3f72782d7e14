//! Kubernetes API resource store backend for Projector.
//!
//! Implements the `ResourceStore` trait from `projector-storage` on top of the
//! `kube` dynamic client. HTTP status codes are mapped onto `StorageError`:
//! 404 is `NotFound`, 409 is `AlreadyExists` or `VersionConflict`, 400/422 are
//! `InvalidObject`, everything else is `Unavailable` and retryable.

pub mod resource;
pub mod store;

pub use resource::api_resource;
pub use store::KubeStore;

pub use kube::Client;
