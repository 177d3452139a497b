//! Host-environment seams: connectivity flag and transient notifications.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

/// Reports whether the host currently has network connectivity.
pub trait ConnectivityProbe: Send + Sync {
    fn is_online(&self) -> bool;
}

/// Probe for hosts without a connectivity signal.
#[derive(Debug, Default, Clone, Copy)]
pub struct AlwaysOnline;

impl ConnectivityProbe for AlwaysOnline {
    fn is_online(&self) -> bool {
        true
    }
}

/// Settable flag, updated by whatever watches the host's network state.
#[derive(Debug)]
pub struct ConnectivityFlag {
    online: AtomicBool,
}

impl ConnectivityFlag {
    pub fn new(online: bool) -> Self {
        Self {
            online: AtomicBool::new(online),
        }
    }

    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::SeqCst);
    }
}

impl Default for ConnectivityFlag {
    fn default() -> Self {
        Self::new(true)
    }
}

impl ConnectivityProbe for ConnectivityFlag {
    fn is_online(&self) -> bool {
        self.online.load(Ordering::SeqCst)
    }
}

/// Destination for transient user-visible failure notifications (toasts).
pub trait Notifier: Send + Sync {
    fn notify_error(&self, text: &str);
}

/// Logs notifications through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify_error(&self, text: &str) {
        tracing::warn!(notification = text, "history-qa notification");
    }
}

/// Keeps the most recent notifications in memory, for UIs that poll and for tests.
#[derive(Debug, Clone)]
pub struct InMemoryNotifier {
    events: Arc<Mutex<Vec<String>>>,
    max_events: usize,
}

impl InMemoryNotifier {
    pub fn new(max: usize) -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
            max_events: max.max(1),
        }
    }

    pub fn events(&self) -> Vec<String> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Notifier for InMemoryNotifier {
    fn notify_error(&self, text: &str) {
        let mut events = self.events.lock().unwrap_or_else(PoisonError::into_inner);
        events.push(text.to_string());
        if events.len() > self.max_events {
            let overflow = events.len() - self.max_events;
            events.drain(..overflow);
        }
    }
}
