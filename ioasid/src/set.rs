//! Quota-bounded sub-namespaces of the ID space.

use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};

use crate::notifier::NotifierChain;
use crate::table::IdTable;
use crate::{Ioasid, SetId};

/// Correlation token of a set.
///
/// `Mm` carries an opaque address-space handle and must be unique among
/// live sets; `Null` is the anonymous flavor used for system-owned sets
/// and carries no handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SetToken {
    Null,
    Mm(u64),
}

impl SetToken {
    pub fn is_mm(&self) -> bool {
        matches!(self, SetToken::Mm(_))
    }
}

/// A quota-bounded set of IDs.
///
/// Handles are shared (`Arc`), but the logical lifetime is the explicit
/// reference count driven by `set_get`/`set_put` on the allocator: when it
/// reaches zero the set is torn down and unregistered, and surviving
/// handles only keep the storage valid. Counters are atomics because
/// handles escape the allocator lock; all mutation happens under it.
pub struct IoasidSet<D> {
    sid: SetId,
    token: SetToken,
    quota: AtomicU32,
    live: AtomicU32,
    refs: AtomicUsize,
    index: IdTable<D>,
    chain: NotifierChain<D>,
}

impl<D> std::fmt::Debug for IoasidSet<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IoasidSet")
            .field("sid", &self.sid)
            .field("token", &self.token)
            .field("quota", &self.quota.load(Ordering::Relaxed))
            .field("live", &self.live.load(Ordering::Relaxed))
            .field("refs", &self.refs.load(Ordering::Relaxed))
            .finish()
    }
}

impl<D> IoasidSet<D> {
    pub(crate) fn new(sid: SetId, token: SetToken, quota: Ioasid) -> Self {
        Self {
            sid,
            token,
            quota: AtomicU32::new(quota),
            live: AtomicU32::new(0),
            refs: AtomicUsize::new(1),
            index: IdTable::new(),
            chain: NotifierChain::new(),
        }
    }

    pub fn sid(&self) -> SetId {
        self.sid
    }

    pub fn token(&self) -> SetToken {
        self.token
    }

    /// Maximum number of live IDs this set may hold.
    pub fn quota(&self) -> Ioasid {
        self.quota.load(Ordering::Relaxed)
    }

    /// Number of currently live IDs.
    pub fn live(&self) -> Ioasid {
        self.live.load(Ordering::Relaxed)
    }

    pub(crate) fn set_quota(&self, quota: Ioasid) {
        self.quota.store(quota, Ordering::Relaxed);
    }

    pub(crate) fn inc_live(&self) {
        self.live.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn dec_live(&self) {
        self.live.fetch_sub(1, Ordering::Relaxed);
    }

    pub(crate) fn get_ref(&self) {
        self.refs.fetch_add(1, Ordering::Relaxed);
    }

    /// Drop a reference, returning how many remain.
    pub(crate) fn put_ref(&self) -> usize {
        self.refs.fetch_sub(1, Ordering::Relaxed) - 1
    }

    /// Per-set `id -> entry` index (secondary; the backend table owns).
    pub(crate) fn index(&self) -> &IdTable<D> {
        &self.index
    }

    /// Per-set subscriber chain.
    pub(crate) fn chain(&self) -> &NotifierChain<D> {
        &self.chain
    }
}
