//! Resource host seam.
//!
//! The resource host is the external process that actually serves surface
//! resources; this crate only registers intent with it. Implementations wrap
//! whatever RPC channel reaches that process and may fail with any error
//! type. Failures are recorded by the sync worker as chain failures and are
//! never retried here; retry policy belongs to the implementation.

use crate::connection::ConnectionDescriptor;
use crate::policy::PortMapping;
use crate::surface::{ExtensionOrigin, HostHandle, SurfaceId};
use anyhow::Result as AnyResult;
use serde::{Deserialize, Serialize};
use url::Url;

/// Everything the resource host needs to serve one surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurfaceMetadata {
    /// Origin of the code that configured the surface, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extension: Option<ExtensionOrigin>,
    /// Filesystem roots resources may be served from.
    pub local_roots: Vec<Url>,
    /// Connection data for the remote authority, when one is configured.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection: Option<ConnectionDescriptor>,
    /// Port remaps applied to loopback requests.
    pub port_mappings: Vec<PortMapping>,
}

/// A partial metadata update for an already registered surface.
///
/// Modeled as an enum so a connectivity refresh never touches the access
/// policy and a policy change never touches connection data.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetadataUpdate {
    /// Replace the access policy wholesale.
    Policy {
        /// Filesystem roots resources may be served from.
        local_roots: Vec<Url>,
        /// Port remaps applied to loopback requests.
        port_mappings: Vec<PortMapping>,
    },
    /// Replace the connection data.
    Connection(Option<ConnectionDescriptor>),
}

/// RPC surface of the external resource host.
pub trait ResourceHost: Send + Sync {
    /// Registers a surface, its backing host handle, and initial metadata.
    ///
    /// `host` is `None` when the surface never attached a native host.
    fn register(
        &self,
        id: &SurfaceId,
        host: Option<HostHandle>,
        metadata: &SurfaceMetadata,
    ) -> AnyResult<()>;

    /// Applies a partial metadata update to a registered surface.
    fn update_metadata(&self, id: &SurfaceId, update: &MetadataUpdate) -> AnyResult<()>;

    /// Removes a surface's registration.
    fn unregister(&self, id: &SurfaceId) -> AnyResult<()>;
}
