//! Lifecycle event chains.
//!
//! Consumers of an ID (an IOMMU driver, a virtualization front-end, a
//! hypervisor delegate) each keep hardware or guest state keyed by that
//! ID. Events on the global and per-set chains let them stay in sync with
//! alloc/free without polling. Delivery is synchronous on the mutating
//! thread with the allocator lock held: callbacks must not call back into
//! mutating allocator APIs (`find` is safe).

use std::sync::{Arc, Mutex};

use crate::error::{IoasidError, Result};
use crate::set::{IoasidSet, SetToken};
use crate::{INVALID_IOASID, Ioasid};

/// Lifecycle event kinds.
///
/// `Alloc`, `Free` and `SetFree` are emitted by the allocator itself;
/// `Bind` and `Unbind` exist for publishers announcing state changes of
/// their own (e.g. a page-table bind) via `notify`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoasidEvent {
    Alloc,
    Free,
    Bind,
    Unbind,
    SetFree,
}

/// Which chain `notify` publishes on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyScope {
    Global,
    Set,
}

/// Event record handed to subscribers.
pub struct EventArgs<D> {
    /// The ID concerned; `INVALID_IOASID` for set-level events.
    pub id: Ioasid,
    /// Set-private ID, `INVALID_IOASID` when none is attached.
    pub spid: Ioasid,
    /// The set the ID belongs to (or the set being destroyed).
    pub set: Arc<IoasidSet<D>>,
    /// Payload snapshot at the time of the event.
    pub private: Option<Arc<D>>,
}

impl<D> EventArgs<D> {
    /// Args for set-level events, which concern no particular ID.
    pub(crate) fn for_set(set: Arc<IoasidSet<D>>) -> Self {
        Self {
            id: INVALID_IOASID,
            spid: INVALID_IOASID,
            set,
            private: None,
        }
    }
}

/// An event subscriber. Held by `Arc`; unsubscription matches on the
/// allocation address, so keep the same `Arc` around to unsubscribe.
pub trait IoasidNotifier<D>: Send + Sync {
    fn notify(&self, event: IoasidEvent, args: &EventArgs<D>);
}

/// Thin-pointer identity of a subscriber, ignoring the vtable.
pub(crate) fn subscriber_ptr<D>(nb: &Arc<dyn IoasidNotifier<D>>) -> *const () {
    Arc::as_ptr(nb) as *const ()
}

/// An ordered chain of subscribers.
pub(crate) struct NotifierChain<D> {
    subscribers: Mutex<Vec<Arc<dyn IoasidNotifier<D>>>>,
}

impl<D> NotifierChain<D> {
    pub fn new() -> Self {
        Self {
            subscribers: Mutex::new(Vec::new()),
        }
    }

    pub fn register(&self, nb: Arc<dyn IoasidNotifier<D>>) -> Result<()> {
        let mut subs = self.subscribers.lock().unwrap();
        if subs.iter().any(|s| subscriber_ptr(s) == subscriber_ptr(&nb)) {
            return Err(IoasidError::Exists);
        }
        subs.push(nb);
        Ok(())
    }

    pub fn unregister(&self, nb: &Arc<dyn IoasidNotifier<D>>) -> bool {
        let mut subs = self.subscribers.lock().unwrap();
        match subs.iter().position(|s| subscriber_ptr(s) == subscriber_ptr(nb)) {
            Some(pos) => {
                subs.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Deliver to every subscriber in registration order. The list is
    /// snapshotted first so callbacks never run under the chain lock.
    pub fn call(&self, event: IoasidEvent, args: &EventArgs<D>) {
        let subs: Vec<_> = self.subscribers.lock().unwrap().clone();
        for nb in subs {
            nb.notify(event, args);
        }
    }
}

/// A subscriber keyed by set token. Parked inactive until a set with the
/// matching token is created, attached to that set's chain while it
/// lives, and parked again when it is destroyed.
pub(crate) struct PendingSubscriber<D> {
    pub token: SetToken,
    pub nb: Arc<dyn IoasidNotifier<D>>,
    pub active: bool,
    /// The live set while active.
    pub set: Option<Arc<IoasidSet<D>>>,
}
