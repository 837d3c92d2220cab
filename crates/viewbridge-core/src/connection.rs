//! Remote-connectivity oracle seam.
//!
//! A [`ConnectionProvider`] maps a remote authority to connection data and
//! notifies listeners when that data may have changed. Providers are
//! constructor-injected into [`ResourceSync`](crate::sync::ResourceSync);
//! the sync manager fetches a fresh descriptor on every change event rather
//! than trusting any value captured at subscription time.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, Weak};

/// Connection data for reaching a remote authority.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionDescriptor {
    /// Host to connect to.
    pub host: String,
    /// Port to connect to.
    pub port: u16,
    /// Token expected by the remote end, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_token: Option<String>,
}

impl ConnectionDescriptor {
    /// Creates a descriptor without a connection token.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            connection_token: None,
        }
    }

    /// Sets the connection token.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.connection_token = Some(token.into());
        self
    }
}

/// Callback invoked when a provider's connection data may have changed.
///
/// The callback carries no payload; interested parties re-fetch via
/// [`ConnectionProvider::connection_data`].
pub type ConnectionListener = Box<dyn Fn() + Send + Sync>;

/// Oracle mapping a remote authority to connection data.
pub trait ConnectionProvider: Send + Sync {
    /// Current connection data for `authority`, if the authority is known.
    fn connection_data(&self, authority: &str) -> Option<ConnectionDescriptor>;

    /// Registers a change listener; the returned guard unsubscribes it.
    fn subscribe_changes(&self, listener: ConnectionListener) -> ConnectionSubscription;
}

/// Provider for sessions with no remote authority.
pub struct NoopConnectionProvider;

impl ConnectionProvider for NoopConnectionProvider {
    fn connection_data(&self, _authority: &str) -> Option<ConnectionDescriptor> {
        None
    }

    fn subscribe_changes(&self, _listener: ConnectionListener) -> ConnectionSubscription {
        ConnectionSubscription::detached()
    }
}

struct EventsInner {
    listeners: Mutex<HashMap<usize, Arc<dyn Fn() + Send + Sync>>>,
    next_id: Mutex<usize>,
}

/// Listener registry shared by provider implementations.
///
/// Listeners are keyed by a numeric id. [`notify`](Self::notify) snapshots
/// the current listeners and invokes them outside the registry lock, so a
/// listener may subscribe or release without deadlocking the registry.
#[derive(Clone)]
pub struct ConnectionEvents {
    inner: Arc<EventsInner>,
}

impl ConnectionEvents {
    /// Creates an empty listener registry.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(EventsInner {
                listeners: Mutex::new(HashMap::new()),
                next_id: Mutex::new(0),
            }),
        }
    }

    /// Registers `listener`, returning the guard that releases it.
    pub fn subscribe(&self, listener: ConnectionListener) -> ConnectionSubscription {
        let id = {
            let mut next_id = self.inner.next_id.lock().unwrap();
            let id = *next_id;
            *next_id += 1;
            id
        };

        let mut listeners = self.inner.listeners.lock().unwrap();
        listeners.insert(id, Arc::from(listener));
        drop(listeners);

        ConnectionSubscription {
            registry: Some((Arc::downgrade(&self.inner), id)),
        }
    }

    /// Invokes every registered listener.
    pub fn notify(&self) {
        let snapshot: Vec<Arc<dyn Fn() + Send + Sync>> = {
            let listeners = self.inner.listeners.lock().unwrap();
            listeners.values().cloned().collect()
        };

        for listener in snapshot {
            listener();
        }
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.inner.listeners.lock().unwrap().len()
    }
}

impl Default for ConnectionEvents {
    fn default() -> Self {
        Self::new()
    }
}

/// Guard for a connectivity-change subscription.
///
/// The listener is removed at most once, either explicitly via
/// [`release`](Self::release) or when the guard is dropped. Holds only a
/// weak reference to the registry, so a guard outliving its provider is
/// harmless.
pub struct ConnectionSubscription {
    registry: Option<(Weak<EventsInner>, usize)>,
}

impl ConnectionSubscription {
    /// A subscription with nothing to release.
    pub fn detached() -> Self {
        Self { registry: None }
    }

    /// Removes the listener from its registry.
    pub fn release(mut self) {
        self.release_inner();
    }

    fn release_inner(&mut self) {
        if let Some((registry, id)) = self.registry.take() {
            if let Some(registry) = registry.upgrade() {
                registry.listeners.lock().unwrap().remove(&id);
            }
        }
    }
}

impl Drop for ConnectionSubscription {
    fn drop(&mut self) {
        self.release_inner();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn notify_invokes_registered_listeners() {
        let events = ConnectionEvents::new();
        let count = Arc::new(AtomicUsize::new(0));
        let count_clone = count.clone();

        let subscription = events.subscribe(Box::new(move || {
            count_clone.fetch_add(1, Ordering::SeqCst);
        }));

        events.notify();
        events.notify();

        assert_eq!(count.load(Ordering::SeqCst), 2);
        subscription.release();
    }

    #[test]
    fn released_listener_is_no_longer_invoked() {
        let events = ConnectionEvents::new();
        let count = Arc::new(AtomicUsize::new(0));
        let count_clone = count.clone();

        let subscription = events.subscribe(Box::new(move || {
            count_clone.fetch_add(1, Ordering::SeqCst);
        }));
        assert_eq!(events.listener_count(), 1);

        subscription.release();
        assert_eq!(events.listener_count(), 0);

        events.notify();
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn dropping_the_guard_releases_the_listener() {
        let events = ConnectionEvents::new();
        {
            let _subscription = events.subscribe(Box::new(|| {}));
            assert_eq!(events.listener_count(), 1);
        }
        assert_eq!(events.listener_count(), 0);
    }

    #[test]
    fn guard_outliving_its_registry_is_harmless() {
        let events = ConnectionEvents::new();
        let subscription = events.subscribe(Box::new(|| {}));
        drop(events);
        subscription.release();
    }

    #[test]
    fn detached_subscription_is_a_no_op() {
        ConnectionSubscription::detached().release();
    }

    #[test]
    fn noop_provider_knows_no_authority() {
        let provider = NoopConnectionProvider;
        assert_eq!(provider.connection_data("remote-1"), None);

        let subscription = provider.subscribe_changes(Box::new(|| {}));
        subscription.release();
    }

    #[test]
    fn descriptor_token_is_omitted_when_absent() {
        let json = serde_json::to_value(ConnectionDescriptor::new("localhost", 8000)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "host": "localhost", "port": 8000 })
        );

        let with_token =
            serde_json::to_value(ConnectionDescriptor::new("localhost", 8000).with_token("tok"))
                .unwrap();
        assert_eq!(
            with_token,
            serde_json::json!({ "host": "localhost", "port": 8000, "connection_token": "tok" })
        );
    }
}
