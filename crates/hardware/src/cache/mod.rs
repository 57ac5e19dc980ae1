//! Set-Associative Cache Simulator.
//!
//! This module implements one configurable level of a set-associative cache.
//! An address selects exactly one set; the block may live in any line of that
//! set. Replacement is driven by a recency stamp per line, refreshed or not on
//! a hit according to the configured policy (FIFO or LRU).
//!
//! Address decomposition for block size `B` and `S` sets:
//!
//! ```text
//! block = addr / B
//! set   = block % S
//! tag   = block / S
//! ```

use tracing::{debug, warn};

use crate::common::{ConfigError, MAX_CACHE_LINES, PhysAddr, try_table};
use crate::config::{CacheConfig, ReplacementPolicy};
use crate::policy::{RecencyPolicy, select_victim};
use crate::stats::CacheStats;

/// Cache line entry containing tag, validity, and recency stamp.
#[derive(Clone, Copy, Debug, Default)]
struct CacheLine {
    tag: u64,
    valid: bool,
    /// Install time (FIFO) or last access time (LRU).
    stamp: u64,
}

/// One cache level.
///
/// Every set holds exactly `ways` lines, stored contiguously in `lines`.
#[derive(Debug)]
pub struct Cache {
    name: String,
    /// Access latency in abstract time units.
    pub latency: u64,
    lines: Vec<CacheLine>,
    num_sets: u64,
    ways: u64,
    line_bytes: u64,
    policy: Box<dyn RecencyPolicy>,
    /// Logical clock, advanced once per probe.
    time: u64,
    hits: u64,
    misses: u64,
    evictions: u64,
}

impl Cache {
    /// Creates a cache level from its configuration.
    ///
    /// # Arguments
    ///
    /// * `name` - Level name used in reports (e.g. `L1`).
    /// * `config` - Size, block size, associativity, policy, and latency.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the block size or associativity is zero, if
    /// the size is not a positive multiple of `line_bytes * ways`, or if the level
    /// would need more than [`MAX_CACHE_LINES`] lines. No cache is built.
    pub fn new(name: impl Into<String>, config: &CacheConfig) -> Result<Self, ConfigError> {
        let name = name.into();
        if config.line_bytes == 0 {
            warn!(cache = %name, "rejected cache with zero block size");
            return Err(ConfigError::ZeroBlockSize { cache: name });
        }
        if config.ways == 0 {
            warn!(cache = %name, "rejected cache with zero associativity");
            return Err(ConfigError::ZeroAssociativity { cache: name });
        }
        // A set wider than u64 cannot divide any cache size.
        let set_bytes = config.line_bytes.checked_mul(config.ways);
        if config.size_bytes == 0 || set_bytes.is_none_or(|b| config.size_bytes % b != 0) {
            warn!(cache = %name, size = config.size_bytes, ?set_bytes, "rejected uneven cache geometry");
            return Err(ConfigError::UnevenGeometry {
                cache: name,
                size: config.size_bytes,
                block_size: config.line_bytes,
                ways: config.ways,
            });
        }

        let line_count = config.size_bytes / config.line_bytes;
        let Some(lines) = (line_count <= MAX_CACHE_LINES)
            .then(|| try_table(line_count, CacheLine::default()))
            .flatten()
        else {
            warn!(cache = %name, line_count, "rejected oversized cache");
            return Err(ConfigError::CacheTooLarge {
                cache: name,
                size: config.size_bytes,
                block_size: config.line_bytes,
            });
        };

        Ok(Self {
            name,
            latency: config.latency,
            lines,
            num_sets: line_count / config.ways,
            ways: config.ways,
            line_bytes: config.line_bytes,
            policy: config.policy.build(),
            time: 0,
            hits: 0,
            misses: 0,
            evictions: 0,
        })
    }

    /// Returns the index of the first line of `addr`'s set, and `addr`'s tag.
    #[inline]
    const fn locate(&self, addr: PhysAddr) -> (usize, u64) {
        let block = addr.block(self.line_bytes);
        let set = block % self.num_sets;
        let tag = block / self.num_sets;
        ((set * self.ways) as usize, tag)
    }

    /// Lines of the set starting at `base`.
    #[inline]
    fn set_mut(&mut self, base: usize) -> &mut [CacheLine] {
        &mut self.lines[base..base + self.ways as usize]
    }

    /// Checks whether the block holding `addr` is resident, without side effects.
    pub fn contains(&self, addr: PhysAddr) -> bool {
        let (base, tag) = self.locate(addr);
        self.lines[base..base + self.ways as usize]
            .iter()
            .any(|l| l.valid && l.tag == tag)
    }

    /// Probes the cache for `addr`.
    ///
    /// On a hit the policy may refresh the line's stamp. On a miss the block is
    /// installed into the first invalid line of its set, or else replaces the
    /// line with the smallest stamp (lowest index on ties).
    ///
    /// # Returns
    ///
    /// `true` on a hit, `false` on a miss.
    pub fn probe(&mut self, addr: PhysAddr) -> bool {
        self.time += 1;
        let now = self.time;
        let (base, tag) = self.locate(addr);

        let policy = &*self.policy;
        let set = &mut self.lines[base..base + self.ways as usize];
        if let Some(line) = set.iter_mut().find(|l| l.valid && l.tag == tag) {
            policy.on_hit(&mut line.stamp, now);
            self.hits += 1;
            return true;
        }
        self.misses += 1;

        let set = self.set_mut(base);
        let way = match set.iter().position(|l| !l.valid) {
            Some(way) => way,
            None => {
                let victim =
                    select_victim(set.iter().enumerate().map(|(i, l)| (i, l.stamp))).unwrap_or(0);
                debug!(way = victim, old_tag = set[victim].tag, new_tag = tag, "cache eviction");
                self.evictions += 1;
                victim
            }
        };
        self.set_mut(base)[way] = CacheLine {
            tag,
            valid: true,
            stamp: now,
        };
        false
    }

    /// Invalidates every line and zeroes the counters and clock.
    pub fn reset(&mut self) {
        self.lines.fill(CacheLine::default());
        self.time = 0;
        self.hits = 0;
        self.misses = 0;
        self.evictions = 0;
    }

    /// Level name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of sets.
    pub const fn num_sets(&self) -> u64 {
        self.num_sets
    }

    /// Associativity.
    pub const fn ways(&self) -> u64 {
        self.ways
    }

    /// Block size in bytes.
    pub const fn line_bytes(&self) -> u64 {
        self.line_bytes
    }

    /// Replacement policy in use.
    pub fn policy(&self) -> ReplacementPolicy {
        self.policy.kind()
    }

    /// Computes a statistics snapshot.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            name: self.name.clone(),
            hits: self.hits,
            misses: self.misses,
            accesses: self.hits + self.misses,
            evictions: self.evictions,
        }
    }
}
