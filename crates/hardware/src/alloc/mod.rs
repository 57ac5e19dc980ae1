//! Dynamic Memory Allocators.
//!
//! Two mutually exclusive allocation engines over a simulated address space:
//! 1. **Contiguous:** A block list with first/best/worst-fit placement and coalescing.
//! 2. **Buddy:** Power-of-two segments split on demand and merged with their buddies on free.
//!
//! Both hand out [`AllocId`]s; ids start at 1 and increase monotonically per
//! allocator instance.

/// Contiguous block allocator.
pub mod block;

/// Power-of-two buddy allocator.
pub mod buddy;

/// Placement strategies for the contiguous allocator.
pub mod placement;

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

pub use block::{Block, BlockAllocator};
pub use buddy::BuddyAllocator;

/// Identifier of a live allocation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct AllocId(pub u32);

impl AllocId {
    /// The first id an allocator issues.
    pub const FIRST: Self = Self(1);

    /// Returns the id following this one.
    #[inline]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for AllocId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for AllocId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

/// Which allocator serves `malloc`, `free`, `dump`, and `stats`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum AllocMode {
    /// The contiguous block allocator.
    #[default]
    Contiguous,
    /// The buddy allocator.
    Buddy,
}
