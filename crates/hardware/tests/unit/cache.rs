//! # Cache Tests
//!
//! Tests for set-associative lookup, block-granular hits, FIFO and LRU victim
//! selection, and geometry validation.

use memsim_core::cache::Cache;
use memsim_core::common::{ConfigError, PhysAddr};
use memsim_core::config::{CacheConfig, ReplacementPolicy};
use pretty_assertions::assert_eq;
use rstest::rstest;

use crate::common::harness::cache;

const A: PhysAddr = PhysAddr(0);
const B: PhysAddr = PhysAddr(16);
const C: PhysAddr = PhysAddr(32);

fn config(size_bytes: u64, line_bytes: u64, ways: u64) -> CacheConfig {
    CacheConfig {
        size_bytes,
        line_bytes,
        ways,
        policy: ReplacementPolicy::Fifo,
        latency: 1,
    }
}

#[test]
fn test_geometry() {
    let c = cache(128, 16, 2, ReplacementPolicy::Fifo);
    assert_eq!(c.num_sets(), 4);
    assert_eq!(c.ways(), 2);
    assert_eq!(c.line_bytes(), 16);
    assert_eq!(c.policy(), ReplacementPolicy::Fifo);
}

#[test]
fn test_zero_block_size_rejected() {
    assert_eq!(
        Cache::new("L1", &config(64, 0, 1)).unwrap_err(),
        ConfigError::ZeroBlockSize {
            cache: "L1".to_string()
        }
    );
}

#[test]
fn test_zero_associativity_rejected() {
    assert_eq!(
        Cache::new("L2", &config(64, 16, 0)).unwrap_err(),
        ConfigError::ZeroAssociativity {
            cache: "L2".to_string()
        }
    );
}

#[test]
fn test_uneven_geometry_rejected() {
    assert!(matches!(
        Cache::new("L3", &config(48, 16, 2)),
        Err(ConfigError::UnevenGeometry { size: 48, .. })
    ));
    assert!(matches!(
        Cache::new("L3", &config(0, 16, 2)),
        Err(ConfigError::UnevenGeometry { size: 0, .. })
    ));
}

#[test]
fn test_miss_then_hit_within_block() {
    let mut c = cache(64, 16, 1, ReplacementPolicy::Lru);
    assert!(!c.probe(PhysAddr(0x20)));
    assert!(c.probe(PhysAddr(0x2f)));
    assert!(!c.probe(PhysAddr(0x30)));
}

#[test]
fn test_direct_mapped_conflict() {
    let mut c = cache(64, 16, 1, ReplacementPolicy::Lru);
    assert!(!c.probe(PhysAddr(0)));
    assert!(!c.probe(PhysAddr(64)));
    assert!(!c.probe(PhysAddr(0)));
    assert_eq!(c.stats().evictions, 2);
}

#[test]
fn test_lru_evicts_least_recently_used() {
    let mut c = cache(32, 16, 2, ReplacementPolicy::Lru);
    for addr in [A, B, A, C] {
        let _ = c.probe(addr);
    }
    assert!(c.contains(A));
    assert!(!c.contains(B));
    assert!(c.contains(C));
}

#[test]
fn test_fifo_evicts_oldest_install() {
    let mut c = cache(32, 16, 2, ReplacementPolicy::Fifo);
    for addr in [A, B, A, C] {
        let _ = c.probe(addr);
    }
    assert!(!c.contains(A));
    assert!(c.contains(B));
    assert!(c.contains(C));
}

#[test]
fn test_counters() {
    let mut c = cache(32, 16, 2, ReplacementPolicy::Lru);
    for addr in [A, B, A, C] {
        let _ = c.probe(addr);
    }
    let stats = c.stats();
    assert_eq!(stats.hits, 1);
    assert_eq!(stats.misses, 3);
    assert_eq!(stats.accesses, 4);
    assert_eq!(stats.evictions, 1);
    assert!((stats.hit_ratio() - 0.25).abs() < f64::EPSILON);
}

#[test]
fn test_contains_has_no_side_effects() {
    let mut c = cache(32, 16, 2, ReplacementPolicy::Lru);
    let _ = c.probe(A);
    assert!(c.contains(A));
    assert!(!c.contains(B));
    assert_eq!(c.stats().accesses, 1);
}

#[test]
fn test_reset_invalidates_everything() {
    let mut c = cache(32, 16, 2, ReplacementPolicy::Fifo);
    let _ = c.probe(A);
    let _ = c.probe(A);
    c.reset();
    assert!(!c.contains(A));
    assert_eq!(c.stats().accesses, 0);
    assert!(!c.probe(A));
}

#[rstest]
#[case::set_wider_than_u64(config(1 << 63, 1 << 32, 1 << 32))]
#[case::max_block(config(u64::MAX, u64::MAX, 2))]
#[case::max_ways(config(1 << 62, 2, u64::MAX))]
fn test_overflowing_set_width_rejected(#[case] geometry: CacheConfig) {
    assert!(matches!(
        Cache::new("L2", &geometry),
        Err(ConfigError::UnevenGeometry { .. })
    ));
}

#[test]
fn test_oversized_cache_rejected() {
    assert_eq!(
        Cache::new("L3", &config(1 << 62, 1, 1)).unwrap_err(),
        ConfigError::CacheTooLarge {
            cache: "L3".to_string(),
            size: 1 << 62,
            block_size: 1,
        }
    );
}

#[test]
fn test_single_block_of_full_width() {
    let mut c = Cache::new("L1", &config(1 << 63, 1 << 63, 1)).unwrap();
    assert_eq!(c.num_sets(), 1);
    assert!(!c.probe(PhysAddr(u64::MAX)));
    assert!(c.probe(PhysAddr(1 << 63)));
    assert!(!c.probe(PhysAddr(0)));
}
