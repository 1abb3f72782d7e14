pub mod config;
pub mod controller;
pub mod error;
pub mod observability;
pub mod reconcile;

pub use error::{ErrorCategory, ReconcileError};
pub use reconcile::{ErrorPolicy, ReconcileLoop, ReconcileOutcome, SyncOutcome};
