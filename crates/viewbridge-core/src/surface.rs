//! Surface identity and host-handle plumbing.
//!
//! A rendering surface is identified to the resource host by an opaque
//! [`SurfaceId`]. The native window actually backing that surface usually
//! materializes after registration has been requested, so the handle travels
//! through a one-shot [`HostAttach`]/[`PendingHost`] pair: the embedder keeps
//! the attach end and resolves it once the surface exists, the sync worker
//! blocks on the pending end before talking to the host.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::mpsc::{self, Receiver, Sender};
use url::Url;

/// Opaque stable identity of one rendering-surface instance.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SurfaceId(String);

impl SurfaceId {
    /// Creates an identity from any string-like token.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw identity token.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SurfaceId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Opaque handle of the host surface backing an identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HostHandle(u64);

impl HostHandle {
    /// Wraps a raw platform handle value.
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw handle value.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

/// Identifies the code that configured a surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtensionOrigin {
    /// Stable extension identifier.
    pub id: String,
    /// Install location of the extension.
    pub location: Url,
}

impl ExtensionOrigin {
    /// Creates an origin descriptor.
    pub fn new(id: impl Into<String>, location: Url) -> Self {
        Self {
            id: id.into(),
            location,
        }
    }
}

/// Resolving half of a pending host handle; usable at most once.
///
/// Dropping it without calling [`attach`](Self::attach) resolves the paired
/// [`PendingHost`] to `None`, meaning the surface never attached.
pub struct HostAttach {
    sender: Sender<Option<HostHandle>>,
}

impl HostAttach {
    /// Resolves the pending host with a concrete handle.
    pub fn attach(self, handle: HostHandle) {
        let _ = self.sender.send(Some(handle));
    }
}

/// Waiting half of a pending host handle.
pub struct PendingHost {
    receiver: Receiver<Option<HostHandle>>,
}

impl PendingHost {
    /// Blocks until the surface attaches or the attach end is dropped.
    pub fn wait(self) -> Option<HostHandle> {
        self.receiver.recv().unwrap_or(None)
    }

    /// A pending host that is already resolved to `handle`.
    pub fn resolved(handle: HostHandle) -> Self {
        let (attach, pending) = pending_host();
        attach.attach(handle);
        pending
    }

    /// A pending host that will never attach.
    pub fn never() -> Self {
        let (_, pending) = pending_host();
        pending
    }
}

/// Creates a linked attach/pending pair for one surface.
pub fn pending_host() -> (HostAttach, PendingHost) {
    let (sender, receiver) = mpsc::channel();
    (HostAttach { sender }, PendingHost { receiver })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn resolved_pending_host_yields_handle() {
        assert_eq!(
            PendingHost::resolved(HostHandle::new(7)).wait(),
            Some(HostHandle::new(7))
        );
    }

    #[test]
    fn dropped_attach_end_yields_none() {
        let (attach, pending) = pending_host();
        drop(attach);
        assert_eq!(pending.wait(), None);
    }

    #[test]
    fn never_pending_host_yields_none() {
        assert_eq!(PendingHost::never().wait(), None);
    }

    #[test]
    fn attach_from_another_thread() {
        let (attach, pending) = pending_host();
        let attacher = thread::spawn(move || attach.attach(HostHandle::new(42)));

        assert_eq!(pending.wait(), Some(HostHandle::new(42)));
        attacher.join().unwrap();
    }

    #[test]
    fn surface_id_round_trips_as_plain_string() {
        let id = SurfaceId::new("abc");
        assert_eq!(id.to_string(), "abc");
        assert_eq!(serde_json::to_value(&id).unwrap(), serde_json::json!("abc"));
    }
}
