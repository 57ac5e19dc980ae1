//! Power-of-two Buddy Allocator.
//!
//! Memory is a binary tree of power-of-two segments. The allocator keeps one
//! ordered free list per segment size:
//! 1. **Allocation:** Round the request up to a power of two, take the smallest
//!    non-empty free list at or above it, and halve that segment until it fits.
//! 2. **Free:** Return the segment and merge it with its buddy (`addr ^ size`)
//!    for as long as the buddy is free, doubling the size each time.
//!
//! Every free address of size `s` is a multiple of `s`, and a segment and its
//! buddy are never both free after a call returns.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use tracing::debug;

use super::AllocId;
use crate::common::{AllocError, ConfigError, PhysAddr};
use crate::stats::BuddyStats;

/// A live buddy allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuddyGrant {
    /// Start of the granted segment.
    pub addr: PhysAddr,
    /// Power-of-two size of the segment.
    pub size: u64,
    /// Size the caller asked for.
    pub requested: u64,
}

/// Buddy allocator over `[0, size)`.
///
/// Instances are plain values; they are not safe for concurrent mutation
/// without external synchronization.
#[derive(Debug, Clone)]
pub struct BuddyAllocator {
    size: u64,
    /// Segment size -> free start addresses, lowest first.
    free_lists: BTreeMap<u64, BTreeSet<u64>>,
    allocated: HashMap<AllocId, BuddyGrant>,
    internal_fragmentation: u64,
    next_id: AllocId,
    requests: u64,
    failures: u64,
}

impl BuddyAllocator {
    /// Creates an allocator whose whole space is one free segment at address 0.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotPowerOfTwo`] unless `size` is a nonzero power of two.
    pub fn new(size: u64) -> Result<Self, ConfigError> {
        if !size.is_power_of_two() {
            return Err(ConfigError::NotPowerOfTwo(size));
        }
        let mut free_lists = BTreeMap::new();
        let _ = free_lists.insert(size, BTreeSet::from([0]));
        debug!(size, "buddy memory initialized");
        Ok(Self {
            size,
            free_lists,
            allocated: HashMap::new(),
            internal_fragmentation: 0,
            next_id: AllocId::FIRST,
            requests: 0,
            failures: 0,
        })
    }

    /// Allocates a segment of at least `requested` bytes.
    ///
    /// # Errors
    ///
    /// Returns [`AllocError::ZeroSize`] for empty requests and
    /// [`AllocError::OutOfMemory`] when no free segment is large enough.
    pub fn allocate(&mut self, requested: u64) -> Result<AllocId, AllocError> {
        self.requests += 1;
        if requested == 0 {
            self.failures += 1;
            return Err(AllocError::ZeroSize);
        }

        let target = requested.checked_next_power_of_two().unwrap_or(u64::MAX);
        let Some((mut cur, addr)) = self.smallest_free_at_least(target) else {
            self.failures += 1;
            debug!(requested, target, "no buddy segment available");
            return Err(AllocError::OutOfMemory { requested });
        };

        let _ = self.take(cur, addr);
        while cur > target {
            cur >>= 1;
            self.put(cur, addr + cur);
            debug!(addr, size = cur, "buddy split");
        }

        let id = self.next_id;
        self.next_id = id.next();
        let _ = self.allocated.insert(
            id,
            BuddyGrant {
                addr: PhysAddr(addr),
                size: target,
                requested,
            },
        );
        self.internal_fragmentation += target - requested;
        debug!(%id, addr, size = target, "buddy allocated");
        Ok(id)
    }

    /// Frees the segment owned by `id`, merging with free buddies.
    ///
    /// # Errors
    ///
    /// Returns [`AllocError::UnknownId`] if `id` is not a live allocation.
    pub fn free(&mut self, id: AllocId) -> Result<(), AllocError> {
        let grant = self
            .allocated
            .remove(&id)
            .ok_or(AllocError::UnknownId(id))?;
        self.internal_fragmentation -= grant.size - grant.requested;

        let mut addr = grant.addr.val();
        let mut size = grant.size;
        while size < self.size {
            let buddy = addr ^ size;
            if !self.take(size, buddy) {
                break;
            }
            debug!(addr, buddy, size, "buddy merge");
            addr = addr.min(buddy);
            size <<= 1;
        }
        self.put(size, addr);
        debug!(%id, "buddy freed");
        Ok(())
    }

    /// Finds the smallest size `>= target` with a free segment, and its lowest address.
    fn smallest_free_at_least(&self, target: u64) -> Option<(u64, u64)> {
        if target > self.size {
            return None;
        }
        self.free_lists
            .range(target..)
            .find_map(|(&size, addrs)| addrs.first().map(|&a| (size, a)))
    }

    /// Removes `addr` from the `size` free list; returns whether it was there.
    fn take(&mut self, size: u64, addr: u64) -> bool {
        let Some(list) = self.free_lists.get_mut(&size) else {
            return false;
        };
        let removed = list.remove(&addr);
        if list.is_empty() {
            let _ = self.free_lists.remove(&size);
        }
        removed
    }

    /// Inserts `addr` into the `size` free list.
    fn put(&mut self, size: u64, addr: u64) {
        let _ = self.free_lists.entry(size).or_default().insert(addr);
    }

    /// Free lists as `(segment size, start addresses)`, smallest size first.
    pub fn free_lists(&self) -> impl Iterator<Item = (u64, Vec<u64>)> + '_ {
        self.free_lists
            .iter()
            .map(|(&size, addrs)| (size, addrs.iter().copied().collect()))
    }

    /// Returns the grant recorded for a live allocation.
    pub fn grant(&self, id: AllocId) -> Option<BuddyGrant> {
        self.allocated.get(&id).copied()
    }

    /// Returns true if `addr` is a free segment start of exactly `size` bytes.
    pub fn is_free(&self, size: u64, addr: u64) -> bool {
        self.free_lists
            .get(&size)
            .is_some_and(|list| list.contains(&addr))
    }

    /// Size of the managed space.
    pub const fn size(&self) -> u64 {
        self.size
    }

    /// Computes a statistics snapshot.
    pub fn stats(&self) -> BuddyStats {
        let free: u64 = self
            .free_lists
            .iter()
            .map(|(size, addrs)| size * addrs.len() as u64)
            .sum();
        let allocated: u64 = self.allocated.values().map(|g| g.size).sum();
        BuddyStats {
            total: self.size,
            free,
            allocated,
            internal_fragmentation: self.internal_fragmentation,
            live: self.allocated.len() as u64,
            requests: self.requests,
            failures: self.failures,
        }
    }
}
