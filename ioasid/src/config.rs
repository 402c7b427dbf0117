//! Allocator configuration.

use serde::{Deserialize, Serialize};

use crate::{DEFAULT_CAPACITY, Ioasid};

/// Capacity configuration for an allocator instance.
///
/// The capacity is the total number of IDs that may be promised to sets;
/// every set allocation reserves its quota out of this budget up front.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocatorConfig {
    /// Total ID-space budget. Defaults to the 20-bit PASID space.
    #[serde(default = "default_capacity")]
    pub capacity: Ioasid,
}

fn default_capacity() -> Ioasid {
    DEFAULT_CAPACITY
}

impl Default for AllocatorConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
        }
    }
}
