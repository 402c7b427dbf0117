//! Shared helpers for the allocator integration tests.
//!
//! Provides custom backend implementations shaped like real consumers (a
//! paravirtual channel handing out host IDs, a range-honoring bitmap
//! allocator) and event recorders for notifier assertions.

#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use ioasid::{EventArgs, IdBackend, Ioasid, IoasidEvent, IoasidNotifier, SetId};

/// Payload type used across the integration tests.
pub type Payload = String;

/// Initialize test logging; safe to call from every test.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Backend that hands out monotonically growing host IDs, the way a
/// paravirtual allocation channel would. Ignores the requested range.
pub struct MonotonicBackend {
    next: AtomicU32,
    freed: Mutex<Vec<Ioasid>>,
}

impl MonotonicBackend {
    pub fn new(start: Ioasid) -> Arc<Self> {
        Arc::new(Self {
            next: AtomicU32::new(start),
            freed: Mutex::new(Vec::new()),
        })
    }

    /// IDs returned through `free`, in order.
    pub fn freed(&self) -> Vec<Ioasid> {
        self.freed.lock().unwrap().clone()
    }
}

impl IdBackend for MonotonicBackend {
    fn alloc(&self, _min: Ioasid, _max: Ioasid) -> Option<Ioasid> {
        Some(self.next.fetch_add(1, Ordering::Relaxed))
    }

    fn free(&self, id: Ioasid) {
        self.freed.lock().unwrap().push(id);
    }
}

/// Backend that honors the requested range over a private used-set.
pub struct RangeBackend {
    used: Mutex<HashSet<Ioasid>>,
}

impl RangeBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            used: Mutex::new(HashSet::new()),
        })
    }
}

impl IdBackend for RangeBackend {
    fn alloc(&self, min: Ioasid, max: Ioasid) -> Option<Ioasid> {
        let mut used = self.used.lock().unwrap();
        let id = (min..=max).find(|id| !used.contains(id))?;
        used.insert(id);
        Some(id)
    }

    fn free(&self, id: Ioasid) {
        self.used.lock().unwrap().remove(&id);
    }
}

/// One observed event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Seen {
    pub event: IoasidEvent,
    pub id: Ioasid,
    pub sid: SetId,
}

/// Subscriber that records every event it is handed.
pub struct Recorder {
    seen: Mutex<Vec<Seen>>,
}

impl Recorder {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            seen: Mutex::new(Vec::new()),
        })
    }

    pub fn seen(&self) -> Vec<Seen> {
        self.seen.lock().unwrap().clone()
    }

    pub fn kinds(&self) -> Vec<IoasidEvent> {
        self.seen.lock().unwrap().iter().map(|s| s.event).collect()
    }

    pub fn clear(&self) {
        self.seen.lock().unwrap().clear();
    }
}

impl IoasidNotifier<Payload> for Recorder {
    fn notify(&self, event: IoasidEvent, args: &EventArgs<Payload>) {
        self.seen.lock().unwrap().push(Seen {
            event,
            id: args.id,
            sid: args.set.sid(),
        });
    }
}

/// Subscriber that appends `(label, event)` to a log shared between
/// several instances, for cross-chain ordering assertions.
pub struct LabeledRecorder {
    label: &'static str,
    log: Arc<Mutex<Vec<(&'static str, IoasidEvent)>>>,
}

impl LabeledRecorder {
    pub fn new(
        label: &'static str,
        log: Arc<Mutex<Vec<(&'static str, IoasidEvent)>>>,
    ) -> Arc<Self> {
        Arc::new(Self { label, log })
    }
}

impl IoasidNotifier<Payload> for LabeledRecorder {
    fn notify(&self, event: IoasidEvent, _args: &EventArgs<Payload>) {
        self.log.lock().unwrap().push((self.label, event));
    }
}
