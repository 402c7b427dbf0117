//! I/O Address Space ID (IOASID) allocation.
//!
//! One process-wide ID space, carved into quota-bounded sets. The IDs are
//! short unsigned integers (PCIe PASIDs in the common case) that I/O
//! hardware uses to tag DMA traffic with a context. The allocator handles:
//! - Set management: quota accounting against a global capacity, set
//!   reference counting, per-set secondary IDs (SPIDs)
//! - Pluggable ID-minting backends, with backends that share an
//!   implementation sharing one ID pool
//! - Reference-counted IDs with a two-phase free (free-pending until the
//!   last user drops its reference)
//! - Lifecycle events on global and per-set subscriber chains, including
//!   subscriptions keyed by a token whose set does not exist yet
//! - Lock-free lookup (`find`) that runs concurrently with allocation and
//!   free
//!
//! The crate deliberately has no process-global state: hosts construct an
//! [`IoasidAllocator`] and decide themselves whether to wrap it in a
//! `static`.

pub mod allocator;
pub mod backend;
pub mod config;
pub mod error;
pub mod notifier;
pub mod set;

mod table;

pub use allocator::IoasidAllocator;
pub use backend::IdBackend;
pub use config::AllocatorConfig;
pub use error::{IoasidError, Result};
pub use notifier::{EventArgs, IoasidEvent, IoasidNotifier, NotifyScope};
pub use set::{IoasidSet, SetToken};

/// An I/O address space identifier.
pub type Ioasid = u32;

/// Key a set is registered under.
pub type SetId = u32;

/// Sentinel for "no ID": all-ones of the ID width.
pub const INVALID_IOASID: Ioasid = Ioasid::MAX;

/// Default capacity: the PCIe standard 20-bit PASID space.
pub const DEFAULT_CAPACITY: Ioasid = 0x10_0000;
