//! Viewbridge Core - resource state synchronization for sandboxed rendering surfaces.
//!
//! An embedded rendering surface (a webview) may only resolve resources
//! through the local roots and port remaps it was granted. This crate keeps
//! an out-of-process resource host informed of those grants and rewrites the
//! private resource-reference scheme in markup so requests route back to the
//! owning surface.
//!
//! ## Quick Start
//!
//! Use the [`prelude`] module for common imports:
//!
//! ```rust,ignore
//! use viewbridge_core::prelude::*;
//!
//! // Register a surface with the resource host.
//! let (attach, pending) = pending_host();
//! let mut sync = ResourceSync::new(
//!     SurfaceId::new("surface-1"),
//!     None,
//!     ResourcePolicy::new().with_local_root(workspace_root),
//!     pending,
//!     host,
//!     connections,
//!     &StaticSessionConfig::local(),
//! )?;
//!
//! // Rewrite authored markup before it reaches the surface.
//! let html = rewrite_resource_urls(sync.id(), raw_html);
//!
//! // Later: grant different roots, then wait for the host to catch up.
//! sync.update(new_policy)?;
//! sync.ensure_ready()?;
//! ```
//!
//! ## Module Organization
//!
//! - [`sync`] - Registration manager and its readiness chain
//! - [`rewrite`] - Markup rewrite pass and programmatic URL resolution
//! - [`policy`] - Access policy (local roots, port mappings)
//! - [`surface`] - Surface identity and host-handle plumbing
//! - [`host`], [`connection`], [`session`] - Collaborator seams
//!
//! Everything host-facing is trait-shaped and constructor-injected; this
//! crate ships no transport and initializes no logger.

// ============================================================================
// Prelude - Common imports for convenience
// ============================================================================

/// Common imports for viewbridge-core users.
pub mod prelude;

/// Unified error types for the viewbridge-core public API.
pub mod error;
pub use error::{SyncError, SyncResult};

// ============================================================================
// Identity & Policy Types
// ============================================================================

/// Access policy (local roots, port mappings).
pub mod policy;

/// Surface identity and host-handle plumbing.
pub mod surface;

// ============================================================================
// Collaborator Seams
// ============================================================================

/// Remote-connectivity oracle seam.
pub mod connection;

/// Resource host seam.
pub mod host;

/// Session configuration seam.
pub mod session;

// ============================================================================
// Core Behavior
// ============================================================================

/// Markup rewrite pass for the private resource-reference scheme.
pub mod rewrite;

/// Resource registration synchronization.
pub mod sync;

// ============================================================================
// Internal Modules (implementation details, may change without notice)
// ============================================================================

/// Testing utilities (mocks, wait helpers)
#[doc(hidden)]
pub mod testing;
