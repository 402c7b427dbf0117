//! Pluggable ID-minting backends and the groups that share an ID pool.
//!
//! A backend supplies raw ID draws; the allocator keeps the bookkeeping
//! (entries, quotas, events) on top. Registrations of the same
//! implementing type are taken to mint from the same underlying pool
//! (e.g. several paravirtual channels to one host allocator) and are
//! grouped to share a single ID table; the built-in default backend draws
//! from its own table directly and is never part of the registry.

use std::any::TypeId;
use std::sync::{Arc, Mutex};

use crate::Ioasid;
use crate::table::IdTable;

/// A custom ID-minting backend.
///
/// Implementations own whatever platform context they need. The allocator
/// invokes both methods with its internal lock held, so they must not call
/// back into allocator APIs and must not block.
pub trait IdBackend: Send + Sync + 'static {
    /// Draw a free ID in `[min, max]`. `None` when the range is exhausted.
    fn alloc(&self, min: Ioasid, max: Ioasid) -> Option<Ioasid>;

    /// Return `id` to the backend pool.
    fn free(&self, id: Ioasid);
}

/// Thin-pointer identity of a registration, ignoring the vtable.
pub(crate) fn backend_ptr(backend: &Arc<dyn IdBackend>) -> *const () {
    Arc::as_ptr(backend) as *const ()
}

enum GroupKind {
    /// Built-in allocator: draws IDs by scanning its own table.
    Default,
    /// Registered backends of one implementing type, sharing a pool.
    Custom { key: TypeId },
}

/// One shared ID pool: the table of live IDs plus the registrations
/// serviced by it. Groups live as long as their longest-living member.
pub struct BackendGroup<D> {
    kind: GroupKind,
    table: IdTable<D>,
    /// Registration order; the first member services raw draws.
    members: Mutex<Vec<Arc<dyn IdBackend>>>,
}

impl<D> BackendGroup<D> {
    pub fn new_default() -> Self {
        Self {
            kind: GroupKind::Default,
            table: IdTable::new(),
            members: Mutex::new(Vec::new()),
        }
    }

    pub fn new_custom(key: TypeId, first: Arc<dyn IdBackend>) -> Self {
        Self {
            kind: GroupKind::Custom { key },
            table: IdTable::new(),
            members: Mutex::new(vec![first]),
        }
    }

    pub fn is_custom(&self) -> bool {
        matches!(self.kind, GroupKind::Custom { .. })
    }

    /// Type key of a custom group; `None` for the default group.
    pub fn key(&self) -> Option<TypeId> {
        match self.kind {
            GroupKind::Default => None,
            GroupKind::Custom { key } => Some(key),
        }
    }

    pub fn table(&self) -> &IdTable<D> {
        &self.table
    }

    /// Draw a raw ID in `[min, max]` from this pool.
    pub fn alloc_raw(&self, min: Ioasid, max: Ioasid) -> Option<Ioasid> {
        match self.kind {
            GroupKind::Default => self.table.first_free(min, max),
            GroupKind::Custom { .. } => self.current()?.alloc(min, max),
        }
    }

    /// Return a raw ID to this pool. For the default group the table
    /// removal done by the caller is the whole story.
    pub fn free_raw(&self, id: Ioasid) {
        if let GroupKind::Custom { .. } = self.kind
            && let Some(backend) = self.current()
        {
            backend.free(id);
        }
    }

    fn current(&self) -> Option<Arc<dyn IdBackend>> {
        self.members.lock().unwrap().first().cloned()
    }

    pub fn add_member(&self, backend: Arc<dyn IdBackend>) {
        self.members.lock().unwrap().push(backend);
    }

    /// Remove the registration with the given identity; false if absent.
    pub fn remove_member(&self, ptr: *const ()) -> bool {
        let mut members = self.members.lock().unwrap();
        match members.iter().position(|m| backend_ptr(m) == ptr) {
            Some(pos) => {
                members.remove(pos);
                true
            }
            None => false,
        }
    }

    pub fn has_member(&self, ptr: *const ()) -> bool {
        self.members.lock().unwrap().iter().any(|m| backend_ptr(m) == ptr)
    }

    pub fn member_count(&self) -> usize {
        self.members.lock().unwrap().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct Counting {
        next: AtomicU32,
    }

    impl IdBackend for Counting {
        fn alloc(&self, _min: Ioasid, _max: Ioasid) -> Option<Ioasid> {
            Some(self.next.fetch_add(1, Ordering::Relaxed))
        }

        fn free(&self, _id: Ioasid) {}
    }

    #[test]
    fn test_default_group_scans_table() {
        let group: BackendGroup<()> = BackendGroup::new_default();
        assert!(!group.is_custom());
        assert_eq!(group.key(), None);
        assert_eq!(group.alloc_raw(3, 5), Some(3));
    }

    #[test]
    fn test_custom_group_membership() {
        let a: Arc<dyn IdBackend> = Arc::new(Counting {
            next: AtomicU32::new(100),
        });
        let b: Arc<dyn IdBackend> = Arc::new(Counting {
            next: AtomicU32::new(200),
        });

        let group: BackendGroup<()> = BackendGroup::new_custom(TypeId::of::<Counting>(), a.clone());
        group.add_member(b.clone());
        assert_eq!(group.member_count(), 2);
        assert!(group.has_member(backend_ptr(&a)));

        // Draws go to the first member until it is removed.
        assert_eq!(group.alloc_raw(0, Ioasid::MAX), Some(100));
        assert!(group.remove_member(backend_ptr(&a)));
        assert_eq!(group.alloc_raw(0, Ioasid::MAX), Some(200));

        assert!(!group.remove_member(backend_ptr(&a)), "already removed");
        assert!(group.remove_member(backend_ptr(&b)));
        assert_eq!(group.member_count(), 0);
        assert_eq!(group.alloc_raw(0, Ioasid::MAX), None);
    }
}
