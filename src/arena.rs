//! Per-session memory budget.
//!
//! Every decomposition run gets its own [`SessionArena`]. The marshalled input
//! mesh and the clusters produced by the engine are charged against it, and a
//! run that would exceed its capacity fails immediately instead of growing
//! past it. An arena is never shared between two sessions.

use log::trace;

/// Indicates an invalid arena capacity or an exhausted arena.
#[derive(thiserror::Error, Copy, Clone, Debug, PartialEq, Eq)]
pub enum ArenaError {
    /// The requested arena capacity is zero.
    #[error("An arena capacity must be non-zero.")]
    ZeroCapacity,
    /// A charge would overflow the arena.
    #[error("Arena over capacity: {requested} bytes requested, {used}/{capacity} bytes in use.")]
    OverCapacity {
        /// The number of bytes requested by the failing charge.
        requested: usize,
        /// The number of bytes already in use.
        used: usize,
        /// The capacity of the arena.
        capacity: usize,
    },
}

/// A validated, non-zero arena capacity in bytes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct ArenaCapacity(usize);

impl ArenaCapacity {
    /// The default capacity of a session arena: 16 384 000 bytes.
    pub const DEFAULT: Self = Self(16_384 * 1000);

    /// Validates a capacity expressed in bytes.
    pub fn new(bytes: usize) -> Result<Self, ArenaError> {
        if bytes == 0 {
            Err(ArenaError::ZeroCapacity)
        } else {
            Ok(Self(bytes))
        }
    }

    /// The capacity in bytes.
    pub fn bytes(self) -> usize {
        self.0
    }
}

impl Default for ArenaCapacity {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// The fixed-capacity memory budget of one decomposition session.
#[derive(Debug)]
pub struct SessionArena {
    capacity: ArenaCapacity,
    used: usize,
}

impl SessionArena {
    /// Creates an empty arena with the given capacity.
    pub fn new(capacity: ArenaCapacity) -> Self {
        Self { capacity, used: 0 }
    }

    /// The capacity of this arena.
    pub fn capacity(&self) -> ArenaCapacity {
        self.capacity
    }

    /// The number of bytes charged so far.
    pub fn used(&self) -> usize {
        self.used
    }

    /// The number of bytes still available.
    pub fn remaining(&self) -> usize {
        self.capacity.0 - self.used
    }

    /// Charges `bytes` to this arena.
    ///
    /// On failure, nothing is charged.
    pub fn charge(&mut self, bytes: usize) -> Result<(), ArenaError> {
        match self.used.checked_add(bytes) {
            Some(total) if total <= self.capacity.0 => {
                self.used = total;
                trace!("arena charge: {bytes} bytes ({total}/{})", self.capacity.0);
                Ok(())
            }
            _ => Err(ArenaError::OverCapacity {
                requested: bytes,
                used: self.used,
                capacity: self.capacity.0,
            }),
        }
    }
}
