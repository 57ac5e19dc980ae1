//! First-In, First-Out (FIFO) Replacement Policy.
//!
//! This policy evicts the oldest installed slot, regardless of how recently it
//! was accessed. The recency stamp is written once when the slot is filled and
//! hits leave it untouched.
//!
//! # Performance
//!
//! - **Time Complexity:** `on_hit()` is O(1); victim selection is O(W)
//! - **Best Case:** Streaming accesses where all lines have equal importance
//! - **Worst Case:** Workloads with strong temporal locality (may evict frequently-used lines)

use super::RecencyPolicy;
use crate::config::ReplacementPolicy;

/// FIFO update rule.
#[derive(Debug, Clone, Copy, Default)]
pub struct FifoPolicy;

impl RecencyPolicy for FifoPolicy {
    /// Insertion order is the eviction order, so a hit changes nothing.
    fn on_hit(&self, _stamp: &mut u64, _now: u64) {}

    fn kind(&self) -> ReplacementPolicy {
        ReplacementPolicy::Fifo
    }
}
