//! Global Simulator Constants.
//!
//! This module defines system-wide constants used across the simulator. It includes:
//! 1. **Allocator Constants:** Alignment unit for the contiguous allocator.
//! 2. **Virtual Memory Constants:** The fixed virtual-to-physical over-commit ratio.
//! 3. **Latency Constants:** Access time of each level of the memory hierarchy.
//! 4. **Table Limits:** Caps on simulated table sizes, so oversized geometry is
//!    rejected instead of exhausting host memory.

/// Alignment unit of the contiguous allocator; every request is rounded up to it.
pub const ALIGNMENT: u64 = 8;

/// Number of virtual pages per physical frame.
///
/// The address space is over-provisioned so that touching enough distinct
/// pages forces faulting and eviction.
pub const VM_OVERCOMMIT: u64 = 4;

/// L1 cache access latency in abstract time units.
pub const L1_LATENCY: u64 = 1;

/// L2 cache access latency in abstract time units.
pub const L2_LATENCY: u64 = 5;

/// L3 cache access latency in abstract time units.
pub const L3_LATENCY: u64 = 15;

/// Main memory access latency in abstract time units.
pub const MEMORY_LATENCY: u64 = 100;

/// Upper bound on the lines of one cache level.
pub const MAX_CACHE_LINES: u64 = 1 << 24;

/// Upper bound on the virtual pages of one address translator.
pub const MAX_PAGES: u64 = 1 << 24;

/// Rounds `size` up to the next multiple of [`ALIGNMENT`].
///
/// Returns `None` if the rounded size does not fit in a `u64`.
#[inline]
pub const fn align_up(size: u64) -> Option<u64> {
    size.checked_next_multiple_of(ALIGNMENT)
}

/// Builds a table of `len` copies of `fill`, or `None` if it cannot be allocated.
pub fn try_table<T: Clone>(len: u64, fill: T) -> Option<Vec<T>> {
    let len = usize::try_from(len).ok()?;
    let mut table = Vec::new();
    table.try_reserve_exact(len).ok()?;
    table.resize(len, fill);
    Some(table)
}
