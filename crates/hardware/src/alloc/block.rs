//! Contiguous Block Allocator.
//!
//! Manages a flat address space `[0, total)` as an ordered list of blocks. It provides:
//! 1. **Placement:** A pluggable first/best/worst-fit strategy picks the free block.
//! 2. **Splitting:** Oversized blocks are split into a used prefix and a free remainder.
//! 3. **Coalescing:** Adjacent free blocks are merged after every free.
//! 4. **Accounting:** Request, failure, and fragmentation counters for reporting.
//!
//! The block list always partitions the whole space: addresses strictly increase,
//! there are no gaps or overlaps, and no two neighbouring blocks are both free.

use serde::Serialize;
use tracing::debug;

use super::AllocId;
use super::placement::PlacementPolicy;
use crate::common::{AllocError, ConfigError, PhysAddr, align_up};
use crate::config::Placement;
use crate::stats::{AllocatorStats, ratio};

/// A contiguous range `[start, start + size)` of the simulated address space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Block {
    /// First address of the block.
    pub start: u64,
    /// Aligned size of the block in bytes.
    pub size: u64,
    /// Size the owner asked for; 0 for free blocks.
    pub requested: u64,
    /// Owning allocation, `None` while free.
    pub owner: Option<AllocId>,
}

impl Block {
    /// Creates a free block.
    pub const fn free(start: u64, size: u64) -> Self {
        Self {
            start,
            size,
            requested: 0,
            owner: None,
        }
    }

    /// Creates a block owned by `id`.
    pub const fn used(start: u64, size: u64, requested: u64, id: AllocId) -> Self {
        Self {
            start,
            size,
            requested,
            owner: Some(id),
        }
    }

    /// Returns true if no allocation owns the block.
    #[inline]
    pub const fn is_free(&self) -> bool {
        self.owner.is_none()
    }

    /// One past the last address of the block.
    #[inline]
    pub const fn end(&self) -> u64 {
        self.start + self.size
    }
}

/// Contiguous allocator with pluggable placement.
///
/// Instances are plain values; they are not safe for concurrent mutation
/// without external synchronization.
#[derive(Debug)]
pub struct BlockAllocator {
    blocks: Vec<Block>,
    total: u64,
    placement: Box<dyn PlacementPolicy>,
    next_id: AllocId,
    requests: u64,
    successes: u64,
    failures: u64,
    total_requested: u64,
    total_allocated: u64,
    internal_fragmentation: u64,
}

impl BlockAllocator {
    /// Creates an allocator managing `[0, total)` as one free block.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroMemory`] if `total` is zero.
    pub fn new(total: u64, placement: Placement) -> Result<Self, ConfigError> {
        let mut alloc = Self {
            blocks: Vec::new(),
            total: 0,
            placement: placement.build(),
            next_id: AllocId::FIRST,
            requests: 0,
            successes: 0,
            failures: 0,
            total_requested: 0,
            total_allocated: 0,
            internal_fragmentation: 0,
        };
        alloc.init(total)?;
        Ok(alloc)
    }

    /// Resets to one free block covering `[0, total)` and clears every counter.
    ///
    /// The placement policy is kept. On error the allocator is left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroMemory`] if `total` is zero.
    pub fn init(&mut self, total: u64) -> Result<(), ConfigError> {
        if total == 0 {
            return Err(ConfigError::ZeroMemory);
        }
        self.blocks.clear();
        self.blocks.push(Block::free(0, total));
        self.total = total;
        self.next_id = AllocId::FIRST;
        self.requests = 0;
        self.successes = 0;
        self.failures = 0;
        self.total_requested = 0;
        self.total_allocated = 0;
        self.internal_fragmentation = 0;
        debug!(total, "contiguous memory initialized");
        Ok(())
    }

    /// Switches the placement policy; the current layout is kept.
    pub fn set_placement(&mut self, placement: Placement) {
        self.placement = placement.build();
    }

    /// Returns the active placement policy.
    pub fn placement(&self) -> Placement {
        self.placement.kind()
    }

    /// Allocates `requested` bytes, rounded up to the alignment unit.
    ///
    /// # Errors
    ///
    /// Returns [`AllocError::ZeroSize`] for empty requests and
    /// [`AllocError::OutOfMemory`] when no free block is large enough, including
    /// requests larger than the whole space. Both count as failed requests; the
    /// block list is not modified.
    pub fn allocate(&mut self, requested: u64) -> Result<AllocId, AllocError> {
        self.requests += 1;
        self.total_requested = self.total_requested.saturating_add(requested);

        if requested == 0 {
            self.failures += 1;
            return Err(AllocError::ZeroSize);
        }

        let Some(aligned) = align_up(requested).filter(|&a| a <= self.total) else {
            self.failures += 1;
            debug!(requested, total = self.total, "request exceeds memory");
            return Err(AllocError::OutOfMemory { requested });
        };
        let Some(idx) = self.placement.select(&self.blocks, aligned) else {
            self.failures += 1;
            debug!(requested, aligned, "no free block fits");
            return Err(AllocError::OutOfMemory { requested });
        };

        let id = self.next_id;
        self.next_id = id.next();

        let chosen = self.blocks[idx];
        self.blocks[idx] = Block::used(chosen.start, aligned, requested, id);
        if chosen.size > aligned {
            self.blocks.insert(
                idx + 1,
                Block::free(chosen.start + aligned, chosen.size - aligned),
            );
        }

        self.successes += 1;
        self.total_allocated += aligned;
        self.internal_fragmentation += aligned - requested;
        debug!(%id, start = chosen.start, aligned, "block allocated");
        Ok(id)
    }

    /// Releases the block owned by `id` and coalesces free neighbours.
    ///
    /// # Errors
    ///
    /// Returns [`AllocError::UnknownId`] if no live block is owned by `id`.
    pub fn free(&mut self, id: AllocId) -> Result<(), AllocError> {
        let block = self
            .blocks
            .iter_mut()
            .find(|b| b.owner == Some(id))
            .ok_or(AllocError::UnknownId(id))?;

        self.total_allocated -= block.size;
        self.internal_fragmentation -= block.size - block.requested;
        *block = Block::free(block.start, block.size);

        self.coalesce();
        debug!(%id, "block freed");
        Ok(())
    }

    /// Merges every run of adjacent free blocks into one.
    fn coalesce(&mut self) {
        let mut i = 0;
        while i + 1 < self.blocks.len() {
            if self.blocks[i].is_free() && self.blocks[i + 1].is_free() {
                let next = self.blocks.remove(i + 1);
                self.blocks[i].size += next.size;
            } else {
                i += 1;
            }
        }
    }

    /// Returns the block list in address order.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Returns the start address of a live allocation.
    pub fn address_of(&self, id: AllocId) -> Option<PhysAddr> {
        self.blocks
            .iter()
            .find(|b| b.owner == Some(id))
            .map(|b| PhysAddr(b.start))
    }

    /// Size of the managed address space.
    pub const fn total(&self) -> u64 {
        self.total
    }

    /// Computes a statistics snapshot.
    pub fn stats(&self) -> AllocatorStats {
        let mut used = 0;
        let mut free = 0;
        let mut largest_free = 0;
        for b in &self.blocks {
            if b.is_free() {
                free += b.size;
                largest_free = largest_free.max(b.size);
            } else {
                used += b.size;
            }
        }

        AllocatorStats {
            total: self.total,
            used,
            free,
            largest_free,
            internal_fragmentation: self.internal_fragmentation,
            requests: self.requests,
            successes: self.successes,
            failures: self.failures,
            total_requested: self.total_requested,
            total_allocated: self.total_allocated,
            external_fragmentation: ratio(free - largest_free, free),
            success_rate: ratio(self.successes, self.requests),
            utilization: ratio(used, self.total),
        }
    }
}
