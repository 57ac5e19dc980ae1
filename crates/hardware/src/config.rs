//! Configuration system for the memory simulator.
//!
//! This module defines all configuration structures and enums used to parameterize
//! the simulator. It provides:
//! 1. **Defaults:** Baseline geometry and latencies of the L1/L2/L3 hierarchy.
//! 2. **Structures:** Hierarchical config for caches, main memory, allocator, and virtual memory.
//! 3. **Enums:** Replacement policy and placement policy selectors.
//!
//! Configuration is supplied as JSON (`--config` on the CLI) or use `Config::default()`.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::alloc::placement::{BestFit, FirstFit, PlacementPolicy, WorstFit};
use crate::common::ConfigError;
use crate::common::constants;
use crate::policy::{FifoPolicy, LruPolicy, RecencyPolicy};

/// Default configuration constants for the simulator.
///
/// These reproduce the hierarchy the simulator has always booted with when no
/// configuration file is supplied.
mod defaults {
    /// L1 total size in bytes.
    pub const L1_SIZE: u64 = 64;
    /// L1 block size in bytes.
    pub const L1_BLOCK: u64 = 16;
    /// L1 associativity (direct-mapped).
    pub const L1_WAYS: u64 = 1;

    /// L2 total size in bytes.
    pub const L2_SIZE: u64 = 128;
    /// L2 block size in bytes.
    pub const L2_BLOCK: u64 = 16;
    /// L2 associativity.
    pub const L2_WAYS: u64 = 2;

    /// L3 total size in bytes.
    pub const L3_SIZE: u64 = 256;
    /// L3 block size in bytes.
    pub const L3_BLOCK: u64 = 32;
    /// L3 associativity.
    pub const L3_WAYS: u64 = 4;
}

/// Replacement policy shared by the caches and the page-frame allocator.
///
/// Both policies order candidates by a recency stamp and evict the smallest;
/// they differ only in whether a hit refreshes the stamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ReplacementPolicy {
    /// First In First Out: stamp set on install, never refreshed.
    #[default]
    #[serde(alias = "Fifo", alias = "fifo")]
    Fifo,
    /// Least Recently Used: stamp refreshed on every hit.
    #[serde(alias = "Lru", alias = "lru")]
    Lru,
}

impl ReplacementPolicy {
    /// Builds the strategy object implementing this policy.
    pub fn build(self) -> Box<dyn RecencyPolicy> {
        match self {
            Self::Fifo => Box::new(FifoPolicy),
            Self::Lru => Box::new(LruPolicy),
        }
    }
}

impl FromStr for ReplacementPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "fifo" => Ok(Self::Fifo),
            "lru" => Ok(Self::Lru),
            other => Err(format!("unknown replacement policy '{other}'")),
        }
    }
}

impl fmt::Display for ReplacementPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Fifo => "fifo",
            Self::Lru => "lru",
        })
    }
}

/// Placement strategy of the contiguous allocator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Placement {
    /// First free block large enough.
    #[default]
    FirstFit,
    /// Smallest free block large enough.
    BestFit,
    /// Largest free block large enough.
    WorstFit,
}

impl Placement {
    /// Builds the strategy object implementing this placement.
    pub fn build(self) -> Box<dyn PlacementPolicy> {
        match self {
            Self::FirstFit => Box::new(FirstFit),
            Self::BestFit => Box::new(BestFit),
            Self::WorstFit => Box::new(WorstFit),
        }
    }
}

impl FromStr for Placement {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "first_fit" => Ok(Self::FirstFit),
            "best_fit" => Ok(Self::BestFit),
            "worst_fit" => Ok(Self::WorstFit),
            other => Err(format!("unknown allocator '{other}'")),
        }
    }
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::FirstFit => "first_fit",
            Self::BestFit => "best_fit",
            Self::WorstFit => "worst_fit",
        })
    }
}

/// Root configuration structure containing all simulator settings.
///
/// # Examples
///
/// ```
/// use memsim_core::config::{Config, ReplacementPolicy};
///
/// let config = Config::default();
/// assert_eq!(config.cache.l1.size_bytes, 64);
/// assert_eq!(config.cache.l1.policy, ReplacementPolicy::Lru);
/// assert_eq!(config.memory.latency, 100);
/// ```
///
/// Deserializing a partial JSON document keeps the defaults for everything omitted:
///
/// ```
/// use memsim_core::config::{Config, Placement};
///
/// let json = r#"{
///     "cache": {
///         "l2": { "size_bytes": 256, "line_bytes": 16, "ways": 4, "policy": "LRU", "latency": 6 }
///     },
///     "allocator": { "placement": "best_fit" }
/// }"#;
///
/// let config = Config::from_json(json).unwrap();
/// assert_eq!(config.cache.l2.ways, 4);
/// assert_eq!(config.cache.l3.size_bytes, 256);
/// assert_eq!(config.allocator.placement, Placement::BestFit);
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Cache hierarchy configuration
    pub cache: CacheHierarchyConfig,
    /// Main memory configuration
    pub memory: MemoryConfig,
    /// Contiguous allocator configuration
    pub allocator: AllocatorConfig,
    /// Virtual memory configuration
    pub vm: VmConfig,
}

impl Config {
    /// Parses a configuration from a JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] if the document is not valid JSON or does not
    /// match the configuration schema.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Reads and parses a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] if the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Parse(format!("{}: {e}", path.display())))?;
        Self::from_json(&text)
    }
}

/// Geometry, policy, and latency of one cache level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct CacheConfig {
    /// Total cache size in bytes
    pub size_bytes: u64,

    /// Block (line) size in bytes
    pub line_bytes: u64,

    /// Associativity (lines per set)
    pub ways: u64,

    /// Replacement policy
    #[serde(default)]
    pub policy: ReplacementPolicy,

    /// Access latency in abstract time units
    pub latency: u64,
}

/// Three-level cache hierarchy configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct CacheHierarchyConfig {
    /// Level 1 cache
    pub l1: CacheConfig,
    /// Level 2 cache
    pub l2: CacheConfig,
    /// Level 3 cache
    pub l3: CacheConfig,
}

impl Default for CacheHierarchyConfig {
    /// Creates the default hierarchy.
    ///
    /// L1 is a direct-mapped LRU cache; L2 and L3 are FIFO and progressively
    /// larger and more associative.
    fn default() -> Self {
        Self {
            l1: CacheConfig {
                size_bytes: defaults::L1_SIZE,
                line_bytes: defaults::L1_BLOCK,
                ways: defaults::L1_WAYS,
                policy: ReplacementPolicy::Lru,
                latency: constants::L1_LATENCY,
            },
            l2: CacheConfig {
                size_bytes: defaults::L2_SIZE,
                line_bytes: defaults::L2_BLOCK,
                ways: defaults::L2_WAYS,
                policy: ReplacementPolicy::Fifo,
                latency: constants::L2_LATENCY,
            },
            l3: CacheConfig {
                size_bytes: defaults::L3_SIZE,
                line_bytes: defaults::L3_BLOCK,
                ways: defaults::L3_WAYS,
                policy: ReplacementPolicy::Fifo,
                latency: constants::L3_LATENCY,
            },
        }
    }
}

/// Main memory configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct MemoryConfig {
    /// Latency of an access that misses every cache level
    #[serde(default = "MemoryConfig::default_latency")]
    pub latency: u64,
}

impl MemoryConfig {
    /// Returns the default main memory latency.
    const fn default_latency() -> u64 {
        constants::MEMORY_LATENCY
    }
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            latency: constants::MEMORY_LATENCY,
        }
    }
}

/// Contiguous allocator configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct AllocatorConfig {
    /// Initial placement policy
    pub placement: Placement,
}

/// Virtual memory configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct VmConfig {
    /// Initial page replacement policy
    pub policy: ReplacementPolicy,
}
