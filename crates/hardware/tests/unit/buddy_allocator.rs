//! # Buddy Allocator Tests
//!
//! Tests for power-of-two rounding, splitting, buddy merging, and the
//! fragmentation counters.

use memsim_core::alloc::{AllocId, BuddyAllocator};
use memsim_core::common::{AllocError, ConfigError, PhysAddr};
use pretty_assertions::assert_eq;
use rstest::rstest;

fn lists(buddy: &BuddyAllocator) -> Vec<(u64, Vec<u64>)> {
    buddy.free_lists().collect()
}

#[rstest]
#[case(0)]
#[case(3)]
#[case(100)]
fn test_size_must_be_power_of_two(#[case] size: u64) {
    assert_eq!(
        BuddyAllocator::new(size).unwrap_err(),
        ConfigError::NotPowerOfTwo(size)
    );
}

#[test]
fn test_new_is_one_free_segment() {
    let buddy = BuddyAllocator::new(64).unwrap();
    assert_eq!(lists(&buddy), vec![(64, vec![0])]);
}

#[test]
fn test_allocation_splits_down_to_target() {
    let mut buddy = BuddyAllocator::new(64).unwrap();
    let id = buddy.allocate(10).unwrap();

    let grant = buddy.grant(id).unwrap();
    assert_eq!(grant.addr, PhysAddr(0));
    assert_eq!(grant.size, 16);
    assert_eq!(grant.requested, 10);
    assert_eq!(lists(&buddy), vec![(16, vec![16]), (32, vec![32])]);
}

#[test]
fn test_smallest_fitting_segment_is_used() {
    let mut buddy = BuddyAllocator::new(64).unwrap();
    let _ = buddy.allocate(10).unwrap();
    let id = buddy.allocate(16).unwrap();
    assert_eq!(buddy.grant(id).unwrap().addr, PhysAddr(16));
    assert_eq!(lists(&buddy), vec![(32, vec![32])]);
}

#[test]
fn test_freeing_both_halves_restores_whole() {
    let mut buddy = BuddyAllocator::new(16).unwrap();
    let a = buddy.allocate(5).unwrap();
    let b = buddy.allocate(5).unwrap();
    assert_eq!(buddy.grant(a).unwrap().addr, PhysAddr(0));
    assert_eq!(buddy.grant(b).unwrap().addr, PhysAddr(8));
    assert_eq!(lists(&buddy), vec![]);

    buddy.free(a).unwrap();
    assert_eq!(lists(&buddy), vec![(8, vec![0])]);

    buddy.free(b).unwrap();
    assert_eq!(lists(&buddy), vec![(16, vec![0])]);
}

#[test]
fn test_merge_stops_at_allocated_buddy() {
    let mut buddy = BuddyAllocator::new(64).unwrap();
    let a = buddy.allocate(16).unwrap();
    let b = buddy.allocate(16).unwrap();
    let c = buddy.allocate(32).unwrap();

    buddy.free(a).unwrap();
    assert_eq!(lists(&buddy), vec![(16, vec![0])]);
    assert!(!buddy.is_free(16, 16));

    buddy.free(c).unwrap();
    buddy.free(b).unwrap();
    assert_eq!(lists(&buddy), vec![(64, vec![0])]);
}

#[test]
fn test_oversized_request_fails() {
    let mut buddy = BuddyAllocator::new(64).unwrap();
    assert_eq!(
        buddy.allocate(65),
        Err(AllocError::OutOfMemory { requested: 65 })
    );
    assert_eq!(lists(&buddy), vec![(64, vec![0])]);
}

#[rstest]
#[case::max(u64::MAX)]
#[case::top_bit(1 << 63)]
#[case::just_over_top_bit((1 << 63) + 1)]
fn test_huge_request_fails_cleanly(#[case] requested: u64) {
    let mut buddy = BuddyAllocator::new(64).unwrap();
    assert_eq!(
        buddy.allocate(requested),
        Err(AllocError::OutOfMemory { requested })
    );
    assert_eq!(lists(&buddy), vec![(64, vec![0])]);
    assert_eq!(buddy.stats().internal_fragmentation, 0);
}

#[test]
fn test_full_width_space() {
    let top = 1 << 63;
    let mut buddy = BuddyAllocator::new(top).unwrap();

    let whole = buddy.allocate(top).unwrap();
    assert_eq!(buddy.grant(whole).unwrap().addr, PhysAddr(0));
    assert_eq!(
        buddy.allocate(1),
        Err(AllocError::OutOfMemory { requested: 1 })
    );
    buddy.free(whole).unwrap();

    let small = buddy.allocate(1).unwrap();
    assert_eq!(buddy.grant(small).unwrap().size, 1);
    assert_eq!(buddy.free_lists().count(), 63);
    buddy.free(small).unwrap();
    assert_eq!(lists(&buddy), vec![(top, vec![0])]);
}

#[test]
fn test_exhaustion_and_zero_size() {
    let mut buddy = BuddyAllocator::new(32).unwrap();
    let _ = buddy.allocate(32).unwrap();
    assert_eq!(
        buddy.allocate(1),
        Err(AllocError::OutOfMemory { requested: 1 })
    );
    assert_eq!(buddy.allocate(0), Err(AllocError::ZeroSize));
    assert_eq!(buddy.stats().failures, 2);
}

#[test]
fn test_unknown_id_free() {
    let mut buddy = BuddyAllocator::new(32).unwrap();
    assert_eq!(
        buddy.free(AllocId(1)),
        Err(AllocError::UnknownId(AllocId(1)))
    );
    let id = buddy.allocate(4).unwrap();
    buddy.free(id).unwrap();
    assert_eq!(buddy.free(id), Err(AllocError::UnknownId(id)));
}

#[test]
fn test_stats_account_for_rounding() {
    let mut buddy = BuddyAllocator::new(64).unwrap();
    let _ = buddy.allocate(10).unwrap();
    let _ = buddy.allocate(20).unwrap();
    let _ = buddy.allocate(64).unwrap_err();

    let stats = buddy.stats();
    assert_eq!(stats.total, 64);
    assert_eq!(stats.free, 16);
    assert_eq!(stats.allocated, 48);
    assert_eq!(stats.internal_fragmentation, 18);
    assert_eq!(stats.live, 2);
    assert_eq!(stats.requests, 3);
    assert_eq!(stats.failures, 1);
}
