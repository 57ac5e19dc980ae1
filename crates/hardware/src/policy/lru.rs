//! Least Recently Used (LRU) Replacement Policy.
//!
//! This policy evicts the slot that has not been accessed for the longest time.
//! Every hit refreshes the slot's recency stamp to the current logical time, so
//! the smallest stamp always belongs to the least recently used slot.
//!
//! # Performance
//!
//! - **Time Complexity:** `on_hit()` is O(1); victim selection is O(W)
//! - **Best Case:** Workloads with good temporal locality
//! - **Worst Case:** Scanning patterns larger than cache capacity (thrashing)

use super::RecencyPolicy;
use crate::config::ReplacementPolicy;

/// LRU update rule.
#[derive(Debug, Clone, Copy, Default)]
pub struct LruPolicy;

impl RecencyPolicy for LruPolicy {
    /// Moves the slot to the most-recently-used position.
    fn on_hit(&self, stamp: &mut u64, now: u64) {
        *stamp = now;
    }

    fn kind(&self) -> ReplacementPolicy {
        ReplacementPolicy::Lru
    }
}
