//! Tracking records for live IDs and the concurrent table holding them.
//!
//! The table is a copy-on-write `HashMap` behind an `ArcSwap`: writers
//! (serialized by the allocator lock) clone the map, mutate the clone and
//! publish it atomically; readers load a snapshot without taking any lock.
//! A snapshot pins the map and every entry in it, so storage retired by a
//! writer stays valid until the last reader drops its snapshot.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, AtomicU32, AtomicUsize, Ordering};

use arc_swap::{ArcSwap, ArcSwapOption};

use crate::set::IoasidSet;
use crate::{INVALID_IOASID, Ioasid};

/// Lifecycle state of an allocated ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoasidState {
    Active,
    /// Freed while outside references remain; reclaimed on the last put.
    FreePending,
}

const STATE_ACTIVE: u8 = 0;
const STATE_FREE_PENDING: u8 = 1;

/// Tracking record for one live ID.
///
/// The counters are atomics because entries sit in shared snapshots, but
/// they are only ever mutated under the allocator lock; `private` is the
/// one field replaced while readers are looking.
pub struct IoasidEntry<D> {
    id: Ioasid,
    set: Arc<IoasidSet<D>>,
    spid: AtomicU32,
    users: AtomicUsize,
    state: AtomicU8,
    private: ArcSwapOption<D>,
}

impl<D> IoasidEntry<D> {
    pub fn new(id: Ioasid, set: Arc<IoasidSet<D>>, private: Option<Arc<D>>) -> Self {
        Self {
            id,
            set,
            spid: AtomicU32::new(INVALID_IOASID),
            users: AtomicUsize::new(1),
            state: AtomicU8::new(STATE_ACTIVE),
            private: ArcSwapOption::new(private),
        }
    }

    pub fn id(&self) -> Ioasid {
        self.id
    }

    /// The set this ID was allocated from. Back-pointer only: the set's
    /// logical lifetime is governed by its own reference count.
    pub fn set(&self) -> &Arc<IoasidSet<D>> {
        &self.set
    }

    pub fn spid(&self) -> Ioasid {
        self.spid.load(Ordering::Relaxed)
    }

    pub fn set_spid(&self, spid: Ioasid) {
        self.spid.store(spid, Ordering::Relaxed);
    }

    pub fn state(&self) -> IoasidState {
        match self.state.load(Ordering::Relaxed) {
            STATE_FREE_PENDING => IoasidState::FreePending,
            _ => IoasidState::Active,
        }
    }

    pub fn mark_free_pending(&self) {
        self.state.store(STATE_FREE_PENDING, Ordering::Relaxed);
    }

    /// Take a reference. Callers must have checked the state first: a
    /// free-pending entry never gains new users.
    pub fn get_user(&self) {
        self.users.fetch_add(1, Ordering::Relaxed);
    }

    /// Drop a reference, returning how many remain.
    pub fn put_user(&self) -> usize {
        self.users.fetch_sub(1, Ordering::Relaxed) - 1
    }

    /// Current payload snapshot.
    pub fn private(&self) -> Option<Arc<D>> {
        self.private.load_full()
    }

    /// Replace the payload. The swap is atomic: readers observe either the
    /// old or the new value, and the old `Arc` is released once the last
    /// concurrent reader drops it.
    pub fn set_private(&self, data: Option<Arc<D>>) {
        self.private.store(data);
    }
}

type EntryMap<D> = HashMap<Ioasid, Arc<IoasidEntry<D>>>;

/// Concurrent `id -> entry` map with lock-free readers.
///
/// Backs both the per-backend-group ID table and the per-set index.
pub struct IdTable<D> {
    entries: ArcSwap<EntryMap<D>>,
}

impl<D> IdTable<D> {
    pub fn new() -> Self {
        Self {
            entries: ArcSwap::from_pointee(HashMap::new()),
        }
    }

    /// Lock-free lookup.
    pub fn load(&self, id: Ioasid) -> Option<Arc<IoasidEntry<D>>> {
        self.entries.load().get(&id).cloned()
    }

    /// Pin the current contents for iteration.
    pub fn snapshot(&self) -> Arc<EntryMap<D>> {
        self.entries.load_full()
    }

    /// Insert at exactly `id`. Returns false (and leaves the table
    /// untouched) if the slot is already taken.
    pub fn insert(&self, id: Ioasid, entry: Arc<IoasidEntry<D>>) -> bool {
        let current = self.entries.load();
        if current.contains_key(&id) {
            return false;
        }
        let mut map = (**current).clone();
        map.insert(id, entry);
        self.entries.store(Arc::new(map));
        true
    }

    pub fn remove(&self, id: Ioasid) -> Option<Arc<IoasidEntry<D>>> {
        let current = self.entries.load();
        if !current.contains_key(&id) {
            return None;
        }
        let mut map = (**current).clone();
        let removed = map.remove(&id);
        self.entries.store(Arc::new(map));
        removed
    }

    pub fn clear(&self) {
        self.entries.store(Arc::new(HashMap::new()));
    }

    /// First unused ID in `[min, max]`, if any.
    pub fn first_free(&self, min: Ioasid, max: Ioasid) -> Option<Ioasid> {
        let map = self.entries.load();
        (min..=max).find(|id| !map.contains_key(id))
    }

    pub fn len(&self) -> usize {
        self.entries.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.load().is_empty()
    }
}

impl<D> Default for IdTable<D> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::set::SetToken;

    fn test_set() -> Arc<IoasidSet<u32>> {
        Arc::new(IoasidSet::new(0, SetToken::Null, 16))
    }

    fn test_entry(id: Ioasid) -> Arc<IoasidEntry<u32>> {
        Arc::new(IoasidEntry::new(id, test_set(), Some(Arc::new(id * 10))))
    }

    #[test]
    fn test_insert_load_remove() {
        let table: IdTable<u32> = IdTable::new();
        assert!(table.is_empty());

        assert!(table.insert(5, test_entry(5)));
        assert!(!table.insert(5, test_entry(5)), "slot already taken");
        assert_eq!(table.len(), 1);

        let entry = table.load(5).unwrap();
        assert_eq!(entry.id(), 5);
        assert_eq!(*entry.private().unwrap(), 50);

        assert!(table.remove(5).is_some());
        assert!(table.remove(5).is_none());
        assert!(table.load(5).is_none());
    }

    #[test]
    fn test_first_free_skips_taken_slots() {
        let table: IdTable<u32> = IdTable::new();
        table.insert(10, test_entry(10));
        table.insert(11, test_entry(11));

        assert_eq!(table.first_free(10, 20), Some(12));
        assert_eq!(table.first_free(10, 11), None);
        assert_eq!(table.first_free(21, 20), None, "empty range");
    }

    #[test]
    fn test_snapshot_outlives_removal() {
        let table: IdTable<u32> = IdTable::new();
        table.insert(7, test_entry(7));

        let snapshot = table.snapshot();
        table.remove(7);

        // The pinned snapshot still sees the entry; fresh loads do not.
        assert!(snapshot.contains_key(&7));
        assert!(table.load(7).is_none());
    }

    #[test]
    fn test_entry_refcount() {
        let entry = test_entry(1);
        entry.get_user();
        assert_eq!(entry.put_user(), 1, "allocation reference remains");
        assert_eq!(entry.put_user(), 0);
    }

    #[test]
    fn test_entry_state_and_spid() {
        let entry = test_entry(1);
        assert_eq!(entry.state(), IoasidState::Active);
        assert_eq!(entry.spid(), crate::INVALID_IOASID);

        entry.set_spid(42);
        entry.mark_free_pending();
        assert_eq!(entry.spid(), 42);
        assert_eq!(entry.state(), IoasidState::FreePending);
    }
}
