//! Resource registration synchronization.
//!
//! [`ResourceSync`] keeps the external resource host's view of one surface
//! in sync: it registers the surface once, pushes policy and connectivity
//! changes as partial metadata updates, and unregisters on disposal. All
//! host operations for a surface flow through a single FIFO command queue
//! drained by a dedicated worker thread, so the host observes them in
//! submission order and never two at once.
//!
//! Failures are not retried. The worker records the first failed host call
//! and keeps draining the queue; the recorded failure is what
//! [`ensure_ready`](ResourceSync::ensure_ready) reports from then on, while
//! later queued operations still execute.

use crate::connection::{ConnectionProvider, ConnectionSubscription};
use crate::error::{SyncError, SyncResult};
use crate::host::{MetadataUpdate, ResourceHost, SurfaceMetadata};
use crate::policy::ResourcePolicy;
use crate::session::SessionConfig;
use crate::surface::{ExtensionOrigin, PendingHost, SurfaceId};
use log::{debug, warn};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// Commands appended to a surface's readiness chain.
enum SyncCommand {
    Register {
        pending_host: PendingHost,
        metadata: SurfaceMetadata,
    },
    UpdateMetadata(MetadataUpdate),
    Unregister,
    Flush(Sender<SyncResult<()>>),
    Shutdown,
}

/// Synchronizes one surface's registration with the resource host.
///
/// Collaborators are constructor-injected: the host behind
/// [`ResourceHost`], connectivity behind [`ConnectionProvider`], and the
/// session's remote authority behind [`SessionConfig`]. Dropping the manager
/// disposes it; [`dispose`](Self::dispose) does the same explicitly.
pub struct ResourceSync {
    id: SurfaceId,
    policy: ResourcePolicy,
    sender: Sender<SyncCommand>,
    subscription: Option<ConnectionSubscription>,
    worker: Option<JoinHandle<()>>,
}

impl ResourceSync {
    /// Spawns the sync worker and enqueues the surface's registration.
    ///
    /// When the session has a remote authority, connection data for it is
    /// resolved synchronously and shipped with the registration, and a
    /// connectivity-change subscription keeps it current afterwards: every
    /// change event appends one metadata update carrying freshly fetched
    /// data. The registration itself completes asynchronously, after
    /// `pending_host` resolves on the worker.
    pub fn new(
        id: SurfaceId,
        extension: Option<ExtensionOrigin>,
        initial_policy: ResourcePolicy,
        pending_host: PendingHost,
        host: Arc<dyn ResourceHost>,
        connections: Arc<dyn ConnectionProvider>,
        session: &dyn SessionConfig,
    ) -> SyncResult<Self> {
        let authority = session.remote_authority();
        let connection = authority
            .as_deref()
            .and_then(|authority| connections.connection_data(authority));

        debug!("ResourceSync({}): init", id);

        let (sender, receiver) = mpsc::channel();
        let worker = SyncWorker {
            id: id.clone(),
            host,
        };
        let handle = thread::Builder::new()
            .name("resource-sync-worker".to_string())
            .spawn(move || worker.run(receiver))
            .map_err(|err| SyncError::Spawn(err.to_string()))?;

        let metadata = SurfaceMetadata {
            extension,
            local_roots: initial_policy.local_roots.clone(),
            connection,
            port_mappings: initial_policy.port_mappings.clone(),
        };
        sender
            .send(SyncCommand::Register {
                pending_host,
                metadata,
            })
            .map_err(|err| SyncError::Channel(err.to_string()))?;

        // Subscribe only after the registration is queued so a change event
        // can never put an update ahead of it.
        let subscription = authority.map(|authority| {
            let sender = sender.clone();
            let provider = connections.clone();
            connections.subscribe_changes(Box::new(move || {
                let fresh = provider.connection_data(&authority);
                let _ = sender.send(SyncCommand::UpdateMetadata(MetadataUpdate::Connection(
                    fresh,
                )));
            }))
        });

        Ok(Self {
            id,
            policy: initial_policy,
            sender,
            subscription,
            worker: Some(handle),
        })
    }

    /// The identity this manager synchronizes.
    pub fn id(&self) -> &SurfaceId {
        &self.id
    }

    /// The currently granted access policy.
    pub fn policy(&self) -> &ResourcePolicy {
        &self.policy
    }

    /// Replaces the surface's access policy.
    ///
    /// A policy granting the same access as the current one is a no-op; an
    /// actual change appends exactly one metadata update to the readiness
    /// chain.
    pub fn update(&mut self, policy: ResourcePolicy) -> SyncResult<()> {
        if self.policy.same_access(&policy) {
            return Ok(());
        }

        let update = MetadataUpdate::Policy {
            local_roots: policy.local_roots.clone(),
            port_mappings: policy.port_mappings.clone(),
        };
        self.policy = policy;
        self.send_command(SyncCommand::UpdateMetadata(update))
    }

    /// Blocks until every operation appended so far has completed.
    ///
    /// Reports the chain's first failure once any link has failed; operations
    /// appended after this call are not waited for.
    pub fn ensure_ready(&self) -> SyncResult<()> {
        let (reply, ready) = mpsc::channel();
        self.send_command(SyncCommand::Flush(reply))?;
        ready
            .recv()
            .map_err(|err| SyncError::Channel(err.to_string()))?
    }

    /// Unregisters the surface and stops the worker.
    ///
    /// Cleanup is fire-and-forget: the unregister call is appended behind
    /// every previously queued operation, but the caller does not wait for
    /// the worker to drain. The connectivity subscription is released first
    /// so no further updates can be appended.
    pub fn dispose(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.release();
        }
        if self.worker.take().is_some() {
            let _ = self.sender.send(SyncCommand::Unregister);
            let _ = self.sender.send(SyncCommand::Shutdown);
        }
    }

    fn send_command(&self, command: SyncCommand) -> SyncResult<()> {
        self.sender
            .send(command)
            .map_err(|err| SyncError::Channel(err.to_string()))
    }
}

impl Drop for ResourceSync {
    fn drop(&mut self) {
        self.release();
    }
}

struct SyncWorker {
    id: SurfaceId,
    host: Arc<dyn ResourceHost>,
}

impl SyncWorker {
    fn run(self, receiver: Receiver<SyncCommand>) {
        let mut chain_error: Option<SyncError> = None;

        loop {
            match receiver.recv() {
                Ok(SyncCommand::Register {
                    pending_host,
                    metadata,
                }) => {
                    debug!("ResourceSync({}): did-start-loading", self.id);
                    let host_handle = pending_host.wait();

                    match self.host.register(&self.id, host_handle, &metadata) {
                        Ok(()) => debug!("ResourceSync({}): did-register", self.id),
                        Err(err) => {
                            warn!("ResourceSync({}): register failed: {}", self.id, err);
                            chain_error.get_or_insert(SyncError::Host(err.to_string()));
                        }
                    }
                }
                Ok(SyncCommand::UpdateMetadata(update)) => {
                    debug!("ResourceSync({}): will-update", self.id);
                    match self.host.update_metadata(&self.id, &update) {
                        Ok(()) => debug!("ResourceSync({}): did-update", self.id),
                        Err(err) => {
                            warn!("ResourceSync({}): update failed: {}", self.id, err);
                            chain_error.get_or_insert(SyncError::Host(err.to_string()));
                        }
                    }
                }
                Ok(SyncCommand::Unregister) => {
                    if let Err(err) = self.host.unregister(&self.id) {
                        warn!("ResourceSync({}): unregister failed: {}", self.id, err);
                    }
                }
                Ok(SyncCommand::Flush(reply)) => {
                    let outcome = match &chain_error {
                        Some(err) => Err(err.clone()),
                        None => Ok(()),
                    };
                    let _ = reply.send(outcome);
                }
                Ok(SyncCommand::Shutdown) | Err(_) => break,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::NoopConnectionProvider;
    use crate::policy::PortMapping;
    use crate::session::StaticSessionConfig;
    use crate::surface::HostHandle;
    use crate::testing::mocks::{HostOp, RecordingHost};
    use url::Url;

    fn policy(root: &str) -> ResourcePolicy {
        ResourcePolicy::new().with_local_root(Url::parse(root).unwrap())
    }

    fn local_sync(host: Arc<RecordingHost>) -> ResourceSync {
        ResourceSync::new(
            SurfaceId::new("surface-1"),
            None,
            policy("file:///workspace"),
            PendingHost::resolved(HostHandle::new(1)),
            host,
            Arc::new(NoopConnectionProvider),
            &StaticSessionConfig::local(),
        )
        .expect("spawn resource sync")
    }

    #[test]
    fn registers_with_the_resolved_host_handle() {
        let host = Arc::new(RecordingHost::new());
        let sync = local_sync(host.clone());
        sync.ensure_ready().expect("ready");

        let ops = host.ops();
        assert_eq!(ops.len(), 1);
        match &ops[0] {
            HostOp::Register {
                id,
                host: handle,
                metadata,
            } => {
                assert_eq!(id.as_str(), "surface-1");
                assert_eq!(*handle, Some(HostHandle::new(1)));
                assert_eq!(metadata.local_roots[0].as_str(), "file:///workspace");
                assert!(metadata.connection.is_none());
            }
            other => panic!("unexpected op: {:?}", other),
        }
    }

    #[test]
    fn identical_policy_update_is_a_no_op() {
        let host = Arc::new(RecordingHost::new());
        let mut sync = local_sync(host.clone());

        sync.update(policy("file:///workspace")).expect("update");
        sync.update(policy("file:///workspace")).expect("update");
        sync.ensure_ready().expect("ready");

        // Just the registration.
        assert_eq!(host.op_count(), 1);
    }

    #[test]
    fn changed_policy_issues_exactly_one_update() {
        let host = Arc::new(RecordingHost::new());
        let mut sync = local_sync(host.clone());

        let next = policy("file:///workspace").with_port_mapping(PortMapping::new(3000, 3001));
        sync.update(next.clone()).expect("update");
        sync.update(next).expect("update");
        sync.ensure_ready().expect("ready");

        let ops = host.ops();
        assert_eq!(ops.len(), 2);
        match &ops[1] {
            HostOp::UpdateMetadata {
                update: MetadataUpdate::Policy { port_mappings, .. },
                ..
            } => {
                assert_eq!(port_mappings, &[PortMapping::new(3000, 3001)]);
            }
            other => panic!("unexpected op: {:?}", other),
        }
    }

    #[test]
    fn ensure_ready_reports_the_first_chain_failure() {
        let host = Arc::new(RecordingHost::new());
        host.fail_next();
        let sync = local_sync(host.clone());

        let err = sync.ensure_ready().expect_err("chain failure");
        assert!(matches!(err, SyncError::Host(_)));
    }
}
