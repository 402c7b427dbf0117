//! The allocator service: capacity accounting, set registry, backend
//! registry, and the per-ID operations.
//!
//! One `Mutex` serializes every mutation; the lookup path (`find`) reads
//! copy-on-write snapshots and never takes it. Event callbacks run with
//! the lock held and must not call back into mutating APIs.

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use arc_swap::ArcSwap;
use tracing::{debug, info, warn};

use crate::backend::{BackendGroup, IdBackend, backend_ptr};
use crate::config::AllocatorConfig;
use crate::error::{IoasidError, Result};
use crate::notifier::{
    EventArgs, IoasidEvent, IoasidNotifier, NotifierChain, NotifyScope, PendingSubscriber,
    subscriber_ptr,
};
use crate::set::{IoasidSet, SetToken};
use crate::table::{IoasidEntry, IoasidState};
use crate::{INVALID_IOASID, Ioasid, SetId};

/// Mutable allocator state, guarded by the allocator lock.
struct AllocatorState<D> {
    /// Total ID-space budget.
    capacity: Ioasid,
    /// Budget not yet promised to any set.
    available: Ioasid,
    /// Registered sets by sid.
    sets: HashMap<SetId, Arc<IoasidSet<D>>>,
    /// Custom backend groups in registration order.
    groups: Vec<Arc<BackendGroup<D>>>,
    /// Built-in fallback; never a member of `groups`.
    default_group: Arc<BackendGroup<D>>,
    next_sid: SetId,
}

/// The IOASID allocator.
///
/// Construct one per process (or per independent ID space) and share it
/// behind an `Arc`. All operations are thread-safe; `find` additionally
/// runs lock-free against concurrent allocation and free.
pub struct IoasidAllocator<D> {
    state: Mutex<AllocatorState<D>>,
    /// The group currently servicing requests. Swapped under the state
    /// lock, read lock-free by `find`.
    active: ArcSwap<BackendGroup<D>>,
    global_chain: NotifierChain<D>,
    /// Token-keyed subscribers. Own lock; acquire order is state lock
    /// first, pending lock second, never the reverse.
    pending: Mutex<Vec<PendingSubscriber<D>>>,
}

fn set_registered<D>(st: &AllocatorState<D>, set: &Arc<IoasidSet<D>>) -> bool {
    st.sets.get(&set.sid()).is_some_and(|s| Arc::ptr_eq(s, set))
}

impl<D: Send + Sync + 'static> IoasidAllocator<D> {
    pub fn new() -> Self {
        Self::with_config(AllocatorConfig::default())
    }

    pub fn with_config(config: AllocatorConfig) -> Self {
        let default_group = Arc::new(BackendGroup::new_default());
        Self {
            state: Mutex::new(AllocatorState {
                capacity: config.capacity,
                available: config.capacity,
                sets: HashMap::new(),
                groups: Vec::new(),
                default_group: default_group.clone(),
                next_sid: 0,
            }),
            active: ArcSwap::from(default_group),
            global_chain: NotifierChain::new(),
            pending: Mutex::new(Vec::new()),
        }
    }

    /// One-shot reconfiguration of the ID-space budget. Meant to run
    /// before any set exists; later calls reset the accounting and are
    /// almost certainly a caller bug, so they are logged.
    pub fn install_capacity(&self, total: Ioasid) {
        let mut st = self.state.lock().unwrap();
        if !st.sets.is_empty() {
            warn!(total, "installing capacity over live sets resets quota accounting");
        }
        st.capacity = total;
        st.available = total;
    }

    /// Total ID-space budget.
    pub fn capacity(&self) -> Ioasid {
        self.state.lock().unwrap().capacity
    }

    /// Budget not yet promised to any set.
    pub fn available_capacity(&self) -> Ioasid {
        self.state.lock().unwrap().available
    }

    // ------------------------------------------------------------------
    // Backend registry
    // ------------------------------------------------------------------

    /// Register a custom ID-minting backend.
    ///
    /// The first registration takes over from the default backend and
    /// requires the default table to be empty. Further registrations of
    /// the same implementing type join that type's group and share its ID
    /// pool; other types are kept as candidates and activated in
    /// registration order as earlier groups unregister.
    pub fn register_allocator<B: IdBackend>(&self, backend: Arc<B>) -> Result<()> {
        let key = TypeId::of::<B>();
        let backend: Arc<dyn IdBackend> = backend;
        let mut st = self.state.lock().unwrap();

        if st.groups.is_empty() {
            if !st.default_group.table().is_empty() {
                warn!("default allocator has outstanding IDs, cannot switch");
                return Err(IoasidError::Busy);
            }
            let group = Arc::new(BackendGroup::new_custom(key, backend));
            st.groups.push(group.clone());
            self.active.store(group);
            return Ok(());
        }

        for group in &st.groups {
            if group.has_member(backend_ptr(&backend)) {
                warn!("allocator backend already registered");
                return Err(IoasidError::Exists);
            }
            if group.key() == Some(key) {
                // Same implementation, different context: one shared pool.
                group.add_member(backend);
                return Ok(());
            }
        }

        st.groups.push(Arc::new(BackendGroup::new_custom(key, backend)));
        Ok(())
    }

    /// Remove a registration. When the last member of a group goes, the
    /// group is dropped (outstanding IDs are a consumer bug and only
    /// warned about) and, if it was active, the next registered group or
    /// the default backend takes over.
    pub fn unregister_allocator<B: IdBackend>(&self, backend: &Arc<B>) {
        let ptr = Arc::as_ptr(backend) as *const ();
        let key = TypeId::of::<B>();
        let mut st = self.state.lock().unwrap();

        if st.groups.is_empty() {
            warn!("no custom allocator backends registered");
            return;
        }

        let Some(pos) = st.groups.iter().position(|g| g.key() == Some(key)) else {
            warn!("allocator backend was never registered");
            return;
        };
        let group = st.groups[pos].clone();
        if !group.remove_member(ptr) {
            warn!("allocator backend was never registered");
            return;
        }
        if group.member_count() > 0 {
            // Other registrations still mint from this pool.
            return;
        }

        if !group.table().is_empty() {
            warn!(
                outstanding = group.table().len(),
                "unregistering allocator backend with outstanding IDs"
            );
        }
        st.groups.remove(pos);

        if Arc::ptr_eq(&group, &self.active.load_full()) {
            match st.groups.first() {
                Some(next) => {
                    info!("active allocator backend changed");
                    self.active.store(next.clone());
                }
                None => {
                    info!("no custom allocator backends left, reverting to default");
                    self.active.store(st.default_group.clone());
                }
            }
        }
    }

    // ------------------------------------------------------------------
    // Set registry
    // ------------------------------------------------------------------

    /// Create a set with `quota` IDs reserved out of the global budget.
    ///
    /// `Mm` tokens must be unique among live sets. The returned handle
    /// carries one reference; drop it with [`set_put`](Self::set_put).
    pub fn alloc_set(&self, token: SetToken, quota: Ioasid) -> Result<Arc<IoasidSet<D>>> {
        let mut st = self.state.lock().unwrap();

        if quota > st.available {
            warn!(ask = quota, available = st.available, "out of ID capacity");
            return Err(IoasidError::NoSpace);
        }
        if token.is_mm() && st.sets.values().any(|s| s.token() == token) {
            return Err(IoasidError::Exists);
        }
        if quota == 0 {
            return Err(IoasidError::Invalid);
        }

        let sid = st.next_sid;
        st.next_sid += 1;
        let set = Arc::new(IoasidSet::new(sid, token, quota));
        st.sets.insert(sid, set.clone());
        st.available -= quota;

        // Wake up subscribers that were waiting for this token.
        self.attach_pending_subscribers(&set);

        Ok(set)
    }

    /// Take a reference on a registered set.
    pub fn set_get(&self, set: &Arc<IoasidSet<D>>) -> Result<()> {
        let st = self.state.lock().unwrap();
        if !set_registered(&st, set) {
            warn!(sid = set.sid(), "set is not registered");
            return Err(IoasidError::NotFound);
        }
        set.get_ref();
        Ok(())
    }

    /// Drop a reference on a set. The last reference tears the set down:
    /// every ID in it is freed (events included), the quota returns to
    /// the global budget, token subscribers revert to pending, and a
    /// `SetFree` event goes out.
    pub fn set_put(&self, set: &Arc<IoasidSet<D>>) {
        let mut st = self.state.lock().unwrap();
        self.set_put_locked(&mut st, set);
    }

    fn set_put_locked(&self, st: &mut AllocatorState<D>, set: &Arc<IoasidSet<D>>) {
        if !set_registered(st, set) {
            warn!(sid = set.sid(), "set is not registered");
            return;
        }
        let remaining = set.put_ref();
        if remaining > 0 {
            debug!(sid = set.sid(), remaining, "set still has users");
            return;
        }

        // Free every ID the set still owns. IDs with outside references
        // stay free-pending in the backend table until the last put; the
        // per-set index empties out regardless.
        let index = set.index().snapshot();
        if !index.is_empty() {
            let mut ids: Vec<Ioasid> = index.keys().copied().collect();
            ids.sort_unstable();
            for id in ids {
                self.free_locked(st, set, id);
            }
            set.index().clear();
        }

        st.available += set.quota();

        let args = EventArgs::for_set(set.clone());
        set.chain().call(IoasidEvent::SetFree, &args);

        // Park the token subscribers again; a future set with the same
        // token re-attaches them.
        {
            let mut pending = self.pending.lock().unwrap();
            for sub in pending.iter_mut() {
                if sub.token == set.token() {
                    if sub.active {
                        set.chain().unregister(&sub.nb);
                        sub.active = false;
                        sub.set = None;
                    } else {
                        warn!(sid = set.sid(), "token subscriber was never attached");
                    }
                }
            }
        }

        self.global_chain.call(IoasidEvent::SetFree, &args);

        st.sets.remove(&set.sid());
        debug!(sid = set.sid(), "set freed");
    }

    /// Change a set's quota. Fails `Invalid` when the set already holds
    /// more IDs than the new quota, `NoSpace` when the increase does not
    /// fit the unpromised budget.
    pub fn adjust_set_quota(&self, set: &Arc<IoasidSet<D>>, quota: Ioasid) -> Result<()> {
        let mut st = self.state.lock().unwrap();
        if !set_registered(&st, set) {
            warn!(sid = set.sid(), "set is not registered");
            return Err(IoasidError::NotFound);
        }

        let live = set.live();
        if live > quota {
            warn!(quota, live, "new quota is below the outstanding ID count");
            return Err(IoasidError::Invalid);
        }

        let current = set.quota();
        if quota as u64 > st.available as u64 + current as u64 {
            return Err(IoasidError::NoSpace);
        }
        if quota >= current {
            st.available -= quota - current;
        } else {
            st.available += current - quota;
        }
        set.set_quota(quota);
        Ok(())
    }

    /// Run `f` over every ID the set currently holds, in ascending order.
    ///
    /// Iterates a snapshot without holding the allocator lock, so `f` may
    /// call allocator APIs — including freeing the iterated IDs.
    pub fn set_for_each_ioasid<F>(&self, set: &Arc<IoasidSet<D>>, mut f: F) -> Result<()>
    where
        F: FnMut(Ioasid),
    {
        {
            let st = self.state.lock().unwrap();
            if !set_registered(&st, set) {
                warn!(sid = set.sid(), "set is not registered");
                return Err(IoasidError::NotFound);
            }
        }

        let index = set.index().snapshot();
        if index.is_empty() {
            warn!(sid = set.sid(), "set holds no IDs");
            return Err(IoasidError::NotFound);
        }
        let mut ids: Vec<Ioasid> = index.keys().copied().collect();
        ids.sort_unstable();
        for id in ids {
            f(id);
        }
        Ok(())
    }

    /// Look a set up by its `Mm` token, taking a reference on success.
    pub fn find_set_by_token(&self, token: SetToken) -> Option<Arc<IoasidSet<D>>> {
        if !token.is_mm() {
            return None;
        }
        let st = self.state.lock().unwrap();
        st.sets.values().find(|s| s.token() == token).map(|s| {
            s.get_ref();
            s.clone()
        })
    }

    // ------------------------------------------------------------------
    // ID allocation and reference counting
    // ------------------------------------------------------------------

    /// Allocate an ID in `[min, max]` within `set`, with an optional
    /// payload retrievable through [`find`](Self::find).
    ///
    /// The new ID is visible to `find` before the `Alloc` event fires on
    /// the set's chain.
    pub fn alloc(
        &self,
        set: &Arc<IoasidSet<D>>,
        min: Ioasid,
        max: Ioasid,
        private: Option<Arc<D>>,
    ) -> Result<Ioasid> {
        let st = self.state.lock().unwrap();

        if !set_registered(&st, set) {
            warn!(sid = set.sid(), "set is not registered");
            return Err(IoasidError::NotFound);
        }
        if set.live() >= set.quota() {
            warn!(sid = set.sid(), quota = set.quota(), "set out of quota");
            return Err(IoasidError::OutOfQuota);
        }

        let group = self.active.load_full();
        if group.is_custom() && group.member_count() == 0 {
            warn!("active backend group has no registrations left");
            return Err(IoasidError::NoBackend);
        }
        let Some(id) = group.alloc_raw(min, max) else {
            warn!(min, max, custom = group.is_custom(), "backend failed to mint an ID");
            return Err(IoasidError::NoMem);
        };

        let entry = Arc::new(IoasidEntry::new(id, set.clone(), private));
        if !group.table().insert(id, entry.clone()) {
            // The backend handed out an ID that is already tracked; give
            // it back and let the caller retry.
            warn!(id, "backend minted an ID that is already tracked");
            group.free_raw(id);
            return Err(IoasidError::NoMem);
        }
        set.index().insert(id, entry);
        set.inc_live();

        let args = EventArgs {
            id,
            spid: INVALID_IOASID,
            set: set.clone(),
            private: None,
        };
        set.chain().call(IoasidEvent::Alloc, &args);

        Ok(id)
    }

    /// Drop the allocation reference on `id`.
    ///
    /// Subscribers see a `Free` event (global chain first, then the
    /// set's) while the ID is still visible to `find`. The ID is
    /// reclaimed once the last reference is gone; until then `get` fails
    /// `Busy`. Freeing an unknown or foreign ID is logged and ignored.
    pub fn free(&self, set: &Arc<IoasidSet<D>>, id: Ioasid) {
        let st = self.state.lock().unwrap();
        self.free_locked(&st, set, id);
    }

    fn free_locked(&self, st: &AllocatorState<D>, set: &Arc<IoasidSet<D>>, id: Ioasid) {
        let group = self.active.load_full();
        let Some(entry) = group.table().load(id) else {
            warn!(id, "free of unknown ID ignored");
            return;
        };
        if !Arc::ptr_eq(entry.set(), set) {
            warn!(id, "free refused, ID is owned by another set");
            return;
        }

        entry.mark_free_pending();

        let args = EventArgs {
            id,
            spid: entry.spid(),
            set: entry.set().clone(),
            private: entry.private(),
        };
        self.global_chain.call(IoasidEvent::Free, &args);
        set.chain().call(IoasidEvent::Free, &args);

        if entry.put_user() == 0 {
            self.do_free(st, &group, &entry);
        }
    }

    /// Reclaim an entry whose last reference is gone: raw-free through
    /// the backend, drop it from the group table and the set index.
    fn do_free(&self, st: &AllocatorState<D>, group: &Arc<BackendGroup<D>>, entry: &IoasidEntry<D>) {
        group.free_raw(entry.id());
        group.table().remove(entry.id());

        let set = entry.set();
        if !set_registered(st, set) {
            // The set was torn down while outside references kept this
            // entry alive; its index is gone already.
            debug!(id = entry.id(), sid = set.sid(), "owning set already destroyed");
            return;
        }
        set.index().remove(entry.id());
        set.dec_live();
    }

    /// Take a reference on an active ID. Fails `Busy` once a free is
    /// pending, and `WrongSet` when `set` is given but does not own `id`.
    pub fn get(&self, set: Option<&Arc<IoasidSet<D>>>, id: Ioasid) -> Result<()> {
        let _st = self.state.lock().unwrap();
        let group = self.active.load_full();

        let Some(entry) = group.table().load(id) else {
            warn!(id, "get of unknown ID");
            return Err(IoasidError::NotFound);
        };
        if entry.state() == IoasidState::FreePending {
            warn!(id, "get refused, ID free is pending");
            return Err(IoasidError::Busy);
        }
        if let Some(set) = set
            && !Arc::ptr_eq(entry.set(), set)
        {
            warn!(id, "get refused, ID is owned by another set");
            return Err(IoasidError::WrongSet);
        }
        entry.get_user();
        Ok(())
    }

    /// Drop a reference taken with [`get`](Self::get). The last drop
    /// reclaims the ID; no further `Free` event is emitted.
    pub fn put(&self, set: Option<&Arc<IoasidSet<D>>>, id: Ioasid) {
        let st = self.state.lock().unwrap();
        let group = self.active.load_full();

        let Some(entry) = group.table().load(id) else {
            warn!(id, "put of unknown ID ignored");
            return;
        };
        if let Some(set) = set
            && !Arc::ptr_eq(entry.set(), set)
        {
            warn!(id, "put refused, ID is owned by another set");
            return;
        }

        let remaining = entry.put_user();
        if remaining > 0 {
            debug!(id, remaining, "ID still has users");
            return;
        }
        self.do_free(&st, &group, &entry);
    }

    /// Look up the payload of `id` without taking a reference.
    ///
    /// Lock-free: runs concurrently with allocation and free. The ID
    /// stays visible here from before its `Alloc` event until the last
    /// reference is dropped, free-pending included. `validator` may
    /// reject the payload, turning the result into `Ok(None)`.
    pub fn find(
        &self,
        set: Option<&Arc<IoasidSet<D>>>,
        id: Ioasid,
        validator: Option<&dyn Fn(&D) -> bool>,
    ) -> Result<Option<Arc<D>>> {
        let group = self.active.load_full();
        let Some(entry) = group.table().load(id) else {
            return Err(IoasidError::NotFound);
        };
        if let Some(set) = set
            && !Arc::ptr_eq(entry.set(), set)
        {
            return Err(IoasidError::WrongSet);
        }

        let private = entry.private();
        if let (Some(validator), Some(data)) = (validator, private.as_ref())
            && !validator(data)
        {
            return Ok(None);
        }
        Ok(private)
    }

    // ------------------------------------------------------------------
    // Attached data
    // ------------------------------------------------------------------

    /// Replace the payload of an allocated ID.
    ///
    /// Publication is atomic: once this returns, every new `find` sees
    /// the new payload, and the previous one is released as soon as the
    /// readers that still hold it let go.
    pub fn attach_data(&self, id: Ioasid, data: Option<Arc<D>>) -> Result<()> {
        let _st = self.state.lock().unwrap();
        let group = self.active.load_full();

        let Some(entry) = group.table().load(id) else {
            return Err(IoasidError::NotFound);
        };
        entry.set_private(data);
        Ok(())
    }

    /// Attach a set-private ID, enabling reverse lookup via
    /// [`find_by_spid`](Self::find_by_spid).
    pub fn attach_spid(&self, id: Ioasid, spid: Ioasid) -> Result<()> {
        let _st = self.state.lock().unwrap();
        let group = self.active.load_full();

        let Some(entry) = group.table().load(id) else {
            warn!(id, spid, "no ID to attach the set-private ID to");
            return Err(IoasidError::NotFound);
        };
        entry.set_spid(spid);
        Ok(())
    }

    /// Reverse lookup: the ID carrying `spid` within `set`, with a
    /// reference taken. Fails `Busy` when that ID's free is pending.
    pub fn find_by_spid(&self, set: &Arc<IoasidSet<D>>, spid: Ioasid) -> Result<Ioasid> {
        let st = self.state.lock().unwrap();
        if !set_registered(&st, set) {
            warn!(sid = set.sid(), "set is not registered");
            return Err(IoasidError::NotFound);
        }

        for (id, entry) in set.index().snapshot().iter() {
            if entry.spid() == spid {
                if entry.state() == IoasidState::FreePending {
                    warn!(id, spid, "matching ID has a pending free");
                    return Err(IoasidError::Busy);
                }
                debug!(id, spid, "found ID by set-private ID");
                entry.get_user();
                return Ok(*id);
            }
        }
        Err(IoasidError::NotFound)
    }

    // ------------------------------------------------------------------
    // Notification
    // ------------------------------------------------------------------

    /// Subscribe to every event (`set` = `None`) or to one set's events.
    pub fn register_notifier(
        &self,
        set: Option<&Arc<IoasidSet<D>>>,
        nb: Arc<dyn IoasidNotifier<D>>,
    ) -> Result<()> {
        match set {
            Some(set) => set.chain().register(nb),
            None => self.global_chain.register(nb),
        }
    }

    /// Remove a subscriber added with
    /// [`register_notifier`](Self::register_notifier). Token-keyed
    /// subscribers are managed through the pending list and are refused
    /// here.
    pub fn unregister_notifier(
        &self,
        set: Option<&Arc<IoasidSet<D>>>,
        nb: &Arc<dyn IoasidNotifier<D>>,
    ) {
        {
            let pending = self.pending.lock().unwrap();
            if pending.iter().any(|p| subscriber_ptr(&p.nb) == subscriber_ptr(nb)) {
                warn!("subscriber is token-keyed, unregister it by token");
                return;
            }
        }
        match set {
            Some(set) => set.chain().unregister(nb),
            None => self.global_chain.unregister(nb),
        };
    }

    /// Subscribe to the events of the set carrying `token`, now or in the
    /// future. With no such set yet the subscriber is parked; it attaches
    /// when the set appears and parks again when it goes. An existing set
    /// must still be empty (`Busy` otherwise): there is no replay of IDs
    /// allocated before the subscription.
    pub fn register_notifier_token(
        &self,
        token: SetToken,
        nb: Arc<dyn IoasidNotifier<D>>,
    ) -> Result<()> {
        if !token.is_mm() {
            return Err(IoasidError::Invalid);
        }

        let st = self.state.lock().unwrap();
        let mut pending = self.pending.lock().unwrap();

        if pending
            .iter()
            .any(|p| p.token == token && subscriber_ptr(&p.nb) == subscriber_ptr(&nb))
        {
            return Err(IoasidError::Exists);
        }

        match st.sets.values().find(|s| s.token() == token) {
            Some(set) => {
                if set.live() > 0 {
                    warn!(sid = set.sid(), "set already holds IDs");
                    return Err(IoasidError::Busy);
                }
                set.chain().register(nb.clone())?;
                pending.push(PendingSubscriber {
                    token,
                    nb,
                    active: true,
                    set: Some(set.clone()),
                });
            }
            None => pending.push(PendingSubscriber {
                token,
                nb,
                active: false,
                set: None,
            }),
        }
        Ok(())
    }

    /// Remove a token-keyed subscriber, detaching it from the live set's
    /// chain if it is currently attached.
    pub fn unregister_notifier_token(&self, token: SetToken, nb: &Arc<dyn IoasidNotifier<D>>) {
        let _st = self.state.lock().unwrap();
        let mut pending = self.pending.lock().unwrap();

        let Some(pos) = pending
            .iter()
            .position(|p| p.token == token && subscriber_ptr(&p.nb) == subscriber_ptr(nb))
        else {
            warn!(?token, "no subscriber registered for token");
            return;
        };
        let sub = pending.remove(pos);
        if sub.active
            && let Some(set) = sub.set
        {
            set.chain().unregister(nb);
        }
    }

    /// Publish an event for `id` on the global or its set's chain, with
    /// the current `{id, spid, payload, set}` filled in. For publishers
    /// announcing state the core does not track (`Bind`/`Unbind`).
    pub fn notify(&self, id: Ioasid, event: IoasidEvent, scope: NotifyScope) -> Result<()> {
        let _st = self.state.lock().unwrap();
        let group = self.active.load_full();

        let Some(entry) = group.table().load(id) else {
            warn!(id, "notify of unknown ID");
            return Err(IoasidError::NotFound);
        };
        let args = EventArgs {
            id,
            spid: entry.spid(),
            set: entry.set().clone(),
            private: entry.private(),
        };
        match scope {
            NotifyScope::Global => self.global_chain.call(event, &args),
            NotifyScope::Set => entry.set().chain().call(event, &args),
        }
        Ok(())
    }

    /// Attach parked subscribers whose token matches a newly created set.
    fn attach_pending_subscribers(&self, set: &Arc<IoasidSet<D>>) {
        if !set.token().is_mm() {
            return;
        }
        let mut pending = self.pending.lock().unwrap();
        for sub in pending.iter_mut() {
            if sub.token == set.token()
                && !sub.active
                && set.chain().register(sub.nb.clone()).is_ok()
            {
                sub.active = true;
                sub.set = Some(set.clone());
            }
        }
    }
}

impl<D: Send + Sync + 'static> Default for IoasidAllocator<D> {
    fn default() -> Self {
        Self::new()
    }
}
