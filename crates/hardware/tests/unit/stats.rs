//! # Statistics Report Tests
//!
//! Tests for the derived ratios and the labelled text reports.

use memsim_core::stats::{AccessStats, AllocatorStats, CacheStats, VmStats, ratio};
use pretty_assertions::assert_eq;

#[test]
fn test_ratio_of_zero_denominator() {
    assert!(ratio(5, 0).abs() < f64::EPSILON);
    assert!((ratio(1, 4) - 0.25).abs() < f64::EPSILON);
}

#[test]
fn test_allocator_report() {
    let stats = AllocatorStats {
        total: 100,
        used: 56,
        free: 44,
        largest_free: 28,
        internal_fragmentation: 0,
        requests: 3,
        successes: 3,
        failures: 0,
        total_requested: 86,
        total_allocated: 56,
        external_fragmentation: ratio(16, 44),
        success_rate: 1.0,
        utilization: 0.56,
    };
    assert_eq!(
        stats.to_string(),
        "Total memory: 100\n\
         Used memory: 56\n\
         Free memory: 44\n\
         External fragmentation: 36.36%\n\
         Internal fragmentation: 0\n\
         Allocation success rate: 100.00%\n\
         Failed allocations: 0\n\
         Memory utilization: 56.00%\n"
    );
}

#[test]
fn test_cache_report() {
    let stats = CacheStats {
        name: "L2".to_string(),
        hits: 1,
        misses: 3,
        accesses: 4,
        evictions: 0,
    };
    assert_eq!(
        stats.to_string(),
        "L2 Cache\nHits: 1\nMisses: 3\nHit Ratio: 25.00%\n"
    );
}

#[test]
fn test_empty_cache_ratio_is_zero() {
    assert_eq!(
        CacheStats::default().to_string(),
        " Cache\nHits: 0\nMisses: 0\nHit Ratio: 0.00%\n"
    );
}

#[test]
fn test_vm_report() {
    let stats = VmStats {
        hits: 3,
        faults: 1,
        evictions: 0,
        invalid: 2,
        frames: 4,
        pages: 16,
    };
    assert!((stats.fault_rate() - 0.25).abs() < f64::EPSILON);
    assert_eq!(
        stats.to_string(),
        "Page hits: 3\n\
         Page faults: 1\n\
         Page evictions: 0\n\
         Invalid accesses: 2\n\
         Page fault rate: 25.00%\n"
    );
}

#[test]
fn test_access_report() {
    let stats = AccessStats {
        accesses: 4,
        total_latency: 384,
        l1_misses: 4,
        l2_misses: 4,
        l3_misses: 3,
    };
    assert!((stats.average_latency() - 96.0).abs() < f64::EPSILON);
    assert!(stats.to_string().contains("Average access time: 96.00\n"));
}

#[test]
fn test_stats_serialize_to_json() {
    let value = serde_json::to_value(VmStats {
        faults: 2,
        ..VmStats::default()
    })
    .unwrap();
    assert_eq!(value["faults"], 2);
    assert_eq!(value["hits"], 0);
}
