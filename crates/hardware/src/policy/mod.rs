//! Recency-based Replacement Policies.
//!
//! Both the caches and the page-frame allocator keep one recency stamp per
//! slot and evict the slot with the smallest stamp. A policy only decides how
//! a hit treats that stamp.
//!
//! # Policies
//!
//! - `Fifo`: First-In, First-Out. The stamp records installation time.
//! - `Lru`: Least Recently Used. The stamp records the last access.

/// First-In, First-Out replacement policy.
pub mod fifo;

/// Least Recently Used replacement policy.
pub mod lru;

use std::fmt;

pub use fifo::FifoPolicy;
pub use lru::LruPolicy;

use crate::config::ReplacementPolicy;

/// Trait for recency stamp update rules.
///
/// Installing a slot always stamps it with the current logical time; only the
/// behaviour on a hit differs between policies.
pub trait RecencyPolicy: fmt::Debug + Send + Sync {
    /// Updates the stamp of a slot that was just hit.
    ///
    /// # Arguments
    ///
    /// * `stamp` - The recency stamp of the slot that was accessed.
    /// * `now` - The current logical time.
    fn on_hit(&self, stamp: &mut u64, now: u64);

    /// Returns the configuration selector this strategy implements.
    fn kind(&self) -> ReplacementPolicy;
}

/// Selects a victim among `(key, stamp)` candidates.
///
/// Returns the key with the smallest stamp. Ties go to the candidate yielded
/// first, so callers that iterate in index order evict the lowest index.
/// Returns `None` when there are no candidates.
pub fn select_victim<I>(candidates: I) -> Option<usize>
where
    I: IntoIterator<Item = (usize, u64)>,
{
    candidates
        .into_iter()
        .min_by_key(|&(_, stamp)| stamp)
        .map(|(key, _)| key)
}
