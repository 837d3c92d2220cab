//! Mock implementations for testing.
//!
//! Provides recording doubles for the resource host and connection provider
//! seams, plus a bounded polling helper for asserting on work done by the
//! sync worker thread.

use crate::connection::{
    ConnectionDescriptor, ConnectionEvents, ConnectionListener, ConnectionProvider,
    ConnectionSubscription,
};
use crate::host::{MetadataUpdate, ResourceHost, SurfaceMetadata};
use crate::surface::{HostHandle, SurfaceId};
use anyhow::Result as AnyResult;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::thread;
use std::time::{Duration, Instant};

/// One successful operation observed by a [`RecordingHost`].
#[derive(Debug, Clone)]
pub enum HostOp {
    /// `register` was called.
    Register {
        id: SurfaceId,
        host: Option<HostHandle>,
        metadata: SurfaceMetadata,
    },
    /// `update_metadata` was called.
    UpdateMetadata {
        id: SurfaceId,
        update: MetadataUpdate,
    },
    /// `unregister` was called.
    Unregister { id: SurfaceId },
}

/// A resource host that records every successful call in order.
///
/// Can be told to reject the next call to exercise failure paths; a
/// rejected call is not recorded.
///
/// # Example
///
/// ```rust,ignore
/// let host = Arc::new(RecordingHost::new());
/// host.fail_next();
/// // ... drive a ResourceSync, then assert on host.ops()
/// ```
#[derive(Default)]
pub struct RecordingHost {
    ops: Mutex<Vec<HostOp>>,
    fail_next: AtomicBool,
}

impl RecordingHost {
    /// Creates a host with an empty recording.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next host call fail.
    pub fn fail_next(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }

    /// Snapshot of the operations observed so far.
    pub fn ops(&self) -> Vec<HostOp> {
        self.ops.lock().unwrap().clone()
    }

    /// Number of operations observed so far.
    pub fn op_count(&self) -> usize {
        self.ops.lock().unwrap().len()
    }

    fn record(&self, op: HostOp) -> AnyResult<()> {
        if self.fail_next.swap(false, Ordering::SeqCst) {
            anyhow::bail!("forced host failure");
        }
        self.ops.lock().unwrap().push(op);
        Ok(())
    }
}

impl ResourceHost for RecordingHost {
    fn register(
        &self,
        id: &SurfaceId,
        host: Option<HostHandle>,
        metadata: &SurfaceMetadata,
    ) -> AnyResult<()> {
        self.record(HostOp::Register {
            id: id.clone(),
            host,
            metadata: metadata.clone(),
        })
    }

    fn update_metadata(&self, id: &SurfaceId, update: &MetadataUpdate) -> AnyResult<()> {
        self.record(HostOp::UpdateMetadata {
            id: id.clone(),
            update: update.clone(),
        })
    }

    fn unregister(&self, id: &SurfaceId) -> AnyResult<()> {
        self.record(HostOp::Unregister { id: id.clone() })
    }
}

/// A connection provider with settable data and manually fired changes.
pub struct StaticConnectionProvider {
    data: Mutex<Option<ConnectionDescriptor>>,
    events: ConnectionEvents,
}

impl StaticConnectionProvider {
    /// Creates a provider that currently knows no connection data.
    pub fn new() -> Self {
        Self {
            data: Mutex::new(None),
            events: ConnectionEvents::new(),
        }
    }

    /// Creates a provider answering every authority with `descriptor`.
    pub fn with_data(descriptor: ConnectionDescriptor) -> Self {
        Self {
            data: Mutex::new(Some(descriptor)),
            events: ConnectionEvents::new(),
        }
    }

    /// Replaces the connection data without notifying listeners.
    pub fn set_connection_data(&self, descriptor: Option<ConnectionDescriptor>) {
        *self.data.lock().unwrap() = descriptor;
    }

    /// Notifies listeners that connection data changed.
    pub fn fire_changed(&self) {
        self.events.notify();
    }

    /// Number of live change listeners.
    pub fn listener_count(&self) -> usize {
        self.events.listener_count()
    }
}

impl Default for StaticConnectionProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl ConnectionProvider for StaticConnectionProvider {
    fn connection_data(&self, _authority: &str) -> Option<ConnectionDescriptor> {
        self.data.lock().unwrap().clone()
    }

    fn subscribe_changes(&self, listener: ConnectionListener) -> ConnectionSubscription {
        self.events.subscribe(listener)
    }
}

/// Polls `condition` every 10ms until it holds or a two second deadline
/// passes; returns the final evaluation.
pub fn wait_until(condition: impl Fn() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_secs(2);
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        thread::sleep(Duration::from_millis(10));
    }
    condition()
}
