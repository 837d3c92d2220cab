//! Unified error types for the viewbridge-core public API.
//!
//! Sync operations fail for a small number of reasons: the worker backing a
//! surface's readiness chain is gone, the resource host rejected a call, or
//! the worker could not be started in the first place. Variants carry
//! rendered messages rather than source errors so the first chain failure
//! can be stored by the worker and handed out to every later
//! [`ensure_ready`](crate::sync::ResourceSync::ensure_ready) caller.

use thiserror::Error;

/// Resource sync error type.
#[derive(Debug, Clone, Error)]
pub enum SyncError {
    /// The sync worker is no longer reachable.
    #[error("resource sync channel error: {0}")]
    Channel(String),
    /// The resource host rejected an operation.
    #[error("resource host error: {0}")]
    Host(String),
    /// The sync worker thread could not be spawned.
    #[error("resource sync worker spawn error: {0}")]
    Spawn(String),
}

/// Result type alias for resource sync operations.
pub type SyncResult<T> = Result<T, SyncError>;
