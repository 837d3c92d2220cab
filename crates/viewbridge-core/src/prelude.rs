//! Prelude module for convenient imports.
//!
//! Re-exports the types most embedders need, allowing a single import to
//! cover surface registration and markup rewriting.
//!
//! # Example
//!
//! ```rust,ignore
//! use viewbridge_core::prelude::*;
//!
//! let (attach, pending) = pending_host();
//! let sync = ResourceSync::new(
//!     SurfaceId::new("surface-1"),
//!     None,
//!     ResourcePolicy::new(),
//!     pending,
//!     host,
//!     connections,
//!     &StaticSessionConfig::local(),
//! )?;
//! ```

// ============================================================================
// Identity & Policy
// ============================================================================

pub use crate::policy::{PortMapping, ResourcePolicy};
pub use crate::surface::{
    pending_host, ExtensionOrigin, HostAttach, HostHandle, PendingHost, SurfaceId,
};

// ============================================================================
// Sync Manager & Collaborator Seams
// ============================================================================

pub use crate::connection::{
    ConnectionDescriptor, ConnectionProvider, ConnectionSubscription, NoopConnectionProvider,
};
pub use crate::host::{MetadataUpdate, ResourceHost, SurfaceMetadata};
pub use crate::session::{SessionConfig, StaticSessionConfig};
pub use crate::sync::ResourceSync;

// ============================================================================
// Markup Rewriting
// ============================================================================

pub use crate::rewrite::{
    as_resolved_url, rewrite_resource_urls, RESOLVED_SCHEME, RESOURCE_SCHEME,
};

// ============================================================================
// Error Types
// ============================================================================

pub use crate::error::{SyncError, SyncResult};
