use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use engine_logging::engine_debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropEvent {
    pub mime: String,
    pub text: String,
}

type Listener = Box<dyn Fn(&DropEvent) + Send + Sync>;

/// Drop target of the file browser.
///
/// Listeners are only reachable through the guard returned by [`DropZone::attach`],
/// so a listener lives exactly as long as the drag that attached it.
#[derive(Default)]
pub struct DropZone {
    listeners: Mutex<BTreeMap<u64, Listener>>,
    next_id: AtomicU64,
}

impl DropZone {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn attach(
        self: &Arc<Self>,
        listener: impl Fn(&DropEvent) + Send + Sync + 'static,
    ) -> DropListenerGuard {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.lock().insert(id, Box::new(listener));
        engine_debug!("Drop listener {} attached", id);
        DropListenerGuard {
            zone: Arc::clone(self),
            id,
        }
    }

    /// Delivers a drop to every attached listener; returns how many saw it.
    pub fn dispatch(&self, event: &DropEvent) -> usize {
        let listeners = self.lock();
        for listener in listeners.values() {
            listener(event);
        }
        listeners.len()
    }

    pub fn listener_count(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<u64, Listener>> {
        self.listeners.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[must_use = "dropping the guard detaches the listener"]
pub struct DropListenerGuard {
    zone: Arc<DropZone>,
    id: u64,
}

impl Drop for DropListenerGuard {
    fn drop(&mut self) {
        self.zone.lock().remove(&self.id);
        engine_debug!("Drop listener {} detached", self.id);
    }
}
