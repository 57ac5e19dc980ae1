//! Memory Hierarchy Access Coordinator.
//!
//! Chains the three cache levels and main memory. A probe walks L1, then L2,
//! then L3, stopping at the first hit; each level visited adds its latency and
//! a miss in L3 adds the main memory latency. Virtual accesses are translated
//! first and then probed as physical accesses.

use std::fmt;

use serde::Serialize;

use crate::cache::Cache;
use crate::common::{ConfigError, PhysAddr, TranslateError, VirtAddr};
use crate::config::{CacheHierarchyConfig, MemoryConfig};
use crate::stats::{AccessStats, CacheStats};
use crate::vm::{AddressTranslator, Translation};

/// Level at which a probe was satisfied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HitLevel {
    /// Hit in L1.
    L1,
    /// Missed L1, hit in L2.
    L2,
    /// Missed L1 and L2, hit in L3.
    L3,
    /// Missed every cache level.
    Memory,
}

impl fmt::Display for HitLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::L1 => "L1 HIT",
            Self::L2 => "L1 MISS -> L2 HIT",
            Self::L3 => "L1 MISS -> L2 MISS -> L3 HIT",
            Self::Memory => "L1 MISS -> L2 MISS -> L3 MISS -> MEMORY",
        })
    }
}

/// Result of one probe through the hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AccessOutcome {
    /// Physical address that was probed.
    pub paddr: PhysAddr,
    /// Where the probe was satisfied.
    pub level: HitLevel,
    /// Latency of the access.
    pub latency: u64,
}

/// Result of a virtual access: the translation, then the physical probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VirtualAccess {
    /// How the virtual address was translated.
    pub translation: Translation,
    /// The physical probe that followed.
    pub outcome: AccessOutcome,
}

/// L1/L2/L3 caches in front of main memory.
#[derive(Debug)]
pub struct CacheHierarchy {
    /// Level 1 cache.
    pub l1: Cache,
    /// Level 2 cache.
    pub l2: Cache,
    /// Level 3 cache.
    pub l3: Cache,
    memory_latency: u64,
    stats: AccessStats,
}

impl CacheHierarchy {
    /// Builds the three levels.
    ///
    /// # Errors
    ///
    /// Returns the first level's [`ConfigError`] if any geometry is invalid.
    pub fn new(caches: &CacheHierarchyConfig, memory: &MemoryConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            l1: Cache::new("L1", &caches.l1)?,
            l2: Cache::new("L2", &caches.l2)?,
            l3: Cache::new("L3", &caches.l3)?,
            memory_latency: memory.latency,
            stats: AccessStats::default(),
        })
    }

    /// Probes the hierarchy with a physical address.
    ///
    /// Lower levels are only probed after a miss above them, so a hit in L1
    /// leaves L2 and L3 untouched. Latencies saturate at `u64::MAX`.
    pub fn probe(&mut self, paddr: PhysAddr) -> AccessOutcome {
        self.stats.accesses += 1;
        let mut latency = self.l1.latency;

        let level = if self.l1.probe(paddr) {
            HitLevel::L1
        } else {
            self.stats.l1_misses += 1;
            latency = latency.saturating_add(self.l2.latency);
            if self.l2.probe(paddr) {
                HitLevel::L2
            } else {
                self.stats.l2_misses += 1;
                latency = latency.saturating_add(self.l3.latency);
                if self.l3.probe(paddr) {
                    HitLevel::L3
                } else {
                    self.stats.l3_misses += 1;
                    latency = latency.saturating_add(self.memory_latency);
                    HitLevel::Memory
                }
            }
        };

        self.stats.total_latency = self.stats.total_latency.saturating_add(latency);
        AccessOutcome {
            paddr,
            level,
            latency,
        }
    }

    /// Translates `vaddr` and probes the hierarchy with the result.
    ///
    /// # Errors
    ///
    /// Propagates [`TranslateError::OutOfRange`]; the caches are not probed and
    /// the access totals are not updated in that case.
    pub fn probe_virtual(
        &mut self,
        translator: &mut AddressTranslator,
        vaddr: VirtAddr,
    ) -> Result<VirtualAccess, TranslateError> {
        let translation = translator.translate(vaddr)?;
        let outcome = self.probe(translation.paddr);
        Ok(VirtualAccess {
            translation,
            outcome,
        })
    }

    /// Access totals.
    pub const fn stats(&self) -> AccessStats {
        self.stats
    }

    /// Per-level cache statistics, L1 first.
    pub fn cache_stats(&self) -> [CacheStats; 3] {
        [self.l1.stats(), self.l2.stats(), self.l3.stats()]
    }

    /// Latency of a miss in every level.
    pub const fn memory_latency(&self) -> u64 {
        self.memory_latency
    }

    /// Invalidates every level and clears all counters.
    pub fn reset(&mut self) {
        self.l1.reset();
        self.l2.reset();
        self.l3.reset();
        self.stats = AccessStats::default();
    }
}
