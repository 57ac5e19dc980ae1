//! Simulation statistics collection and reporting.
//!
//! Each engine produces a snapshot of its counters on demand. This module defines
//! those snapshots:
//! 1. **Contiguous allocator:** Usage, external/internal fragmentation, and success rate.
//! 2. **Buddy allocator:** Free bytes and internal fragmentation.
//! 3. **Caches:** Hit/miss counts and hit ratio per level.
//! 4. **Virtual memory:** Page hits, faults, and evictions.
//! 5. **Access time:** Accesses through the hierarchy and cumulative latency.
//!
//! Snapshots are plain data. `Display` renders the labelled text report and
//! `Serialize` allows JSON export.

use std::fmt;

use serde::Serialize;

/// Returns `num / den`, or 0 when `den` is zero.
#[inline]
pub const fn ratio(num: u64, den: u64) -> f64 {
    if den == 0 { 0.0 } else { num as f64 / den as f64 }
}

/// Snapshot of the contiguous allocator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct AllocatorStats {
    /// Size of the managed address space.
    pub total: u64,
    /// Bytes held by used blocks (aligned sizes).
    pub used: u64,
    /// Bytes held by free blocks.
    pub free: u64,
    /// Size of the largest free block.
    pub largest_free: u64,
    /// Sum of `aligned - requested` over live allocations.
    pub internal_fragmentation: u64,
    /// Allocation requests seen since the last init.
    pub requests: u64,
    /// Requests that produced an id.
    pub successes: u64,
    /// Requests that failed.
    pub failures: u64,
    /// Sum of all requested sizes, including failed requests; saturates at `u64::MAX`.
    pub total_requested: u64,
    /// Aligned bytes currently allocated.
    pub total_allocated: u64,
    /// `(free - largest_free) / free`, 0 with no free memory.
    pub external_fragmentation: f64,
    /// `successes / requests`, 0 with no requests.
    pub success_rate: f64,
    /// `used / total`, 0 for an empty space.
    pub utilization: f64,
}

impl fmt::Display for AllocatorStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total memory: {}", self.total)?;
        writeln!(f, "Used memory: {}", self.used)?;
        writeln!(f, "Free memory: {}", self.free)?;
        writeln!(
            f,
            "External fragmentation: {:.2}%",
            self.external_fragmentation * 100.0
        )?;
        writeln!(f, "Internal fragmentation: {}", self.internal_fragmentation)?;
        writeln!(
            f,
            "Allocation success rate: {:.2}%",
            self.success_rate * 100.0
        )?;
        writeln!(f, "Failed allocations: {}", self.failures)?;
        writeln!(f, "Memory utilization: {:.2}%", self.utilization * 100.0)
    }
}

/// Snapshot of the buddy allocator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BuddyStats {
    /// Size of the managed power-of-two space.
    pub total: u64,
    /// Bytes sitting in free lists.
    pub free: u64,
    /// Bytes granted to live allocations.
    pub allocated: u64,
    /// Sum of `granted - requested` over live allocations.
    pub internal_fragmentation: u64,
    /// Number of live allocations.
    pub live: u64,
    /// Allocation requests seen since the last init.
    pub requests: u64,
    /// Requests that failed.
    pub failures: u64,
}

impl fmt::Display for BuddyStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Buddy memory: {}", self.total)?;
        writeln!(f, "Buddy free memory: {}", self.free)?;
        writeln!(f, "Buddy live allocations: {}", self.live)?;
        writeln!(
            f,
            "Buddy internal fragmentation: {}",
            self.internal_fragmentation
        )?;
        writeln!(f, "Buddy failed allocations: {}", self.failures)
    }
}

/// Snapshot of one cache level.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CacheStats {
    /// Level name, e.g. `L1`.
    pub name: String,
    /// Probes that found the block.
    pub hits: u64,
    /// Probes that did not.
    pub misses: u64,
    /// Total probes.
    pub accesses: u64,
    /// Lines replaced while their set was full.
    pub evictions: u64,
}

impl CacheStats {
    /// `hits / (hits + misses)`, 0 before the first probe.
    pub const fn hit_ratio(&self) -> f64 {
        ratio(self.hits, self.hits + self.misses)
    }
}

impl fmt::Display for CacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} Cache", self.name)?;
        writeln!(f, "Hits: {}", self.hits)?;
        writeln!(f, "Misses: {}", self.misses)?;
        writeln!(f, "Hit Ratio: {:.2}%", self.hit_ratio() * 100.0)
    }
}

/// Snapshot of the address translator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct VmStats {
    /// Translations whose page was resident.
    pub hits: u64,
    /// Translations that had to load the page.
    pub faults: u64,
    /// Faults that displaced a resident page.
    pub evictions: u64,
    /// Translations rejected as out of range.
    pub invalid: u64,
    /// Number of physical frames.
    pub frames: u64,
    /// Number of virtual pages.
    pub pages: u64,
}

impl VmStats {
    /// `faults / (hits + faults)`, 0 before the first translation.
    pub const fn fault_rate(&self) -> f64 {
        ratio(self.faults, self.hits + self.faults)
    }
}

impl fmt::Display for VmStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Page hits: {}", self.hits)?;
        writeln!(f, "Page faults: {}", self.faults)?;
        writeln!(f, "Page evictions: {}", self.evictions)?;
        writeln!(f, "Invalid accesses: {}", self.invalid)?;
        writeln!(f, "Page fault rate: {:.2}%", self.fault_rate() * 100.0)
    }
}

/// Running totals of accesses through the cache hierarchy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AccessStats {
    /// Probes issued to the hierarchy.
    pub accesses: u64,
    /// Sum of all access latencies.
    pub total_latency: u64,
    /// L1 misses forwarded to L2.
    pub l1_misses: u64,
    /// L2 misses forwarded to L3.
    pub l2_misses: u64,
    /// L3 misses forwarded to main memory.
    pub l3_misses: u64,
}

impl AccessStats {
    /// Mean latency per access, 0 before the first access.
    pub const fn average_latency(&self) -> f64 {
        ratio(self.total_latency, self.accesses)
    }
}

impl fmt::Display for AccessStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Memory accesses: {}", self.accesses)?;
        writeln!(f, "Total access time: {}", self.total_latency)?;
        writeln!(f, "Average access time: {:.2}", self.average_latency())?;
        writeln!(f, "L1 misses to L2: {}", self.l1_misses)?;
        writeln!(f, "L2 misses to L3: {}", self.l2_misses)?;
        writeln!(f, "L3 misses to memory: {}", self.l3_misses)
    }
}
