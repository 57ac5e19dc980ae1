//! # Virtual Memory Tests
//!
//! Tests for demand paging, address translation, FIFO and LRU frame eviction,
//! and the page/frame ownership bijection.

use memsim_core::common::{ConfigError, PhysAddr, TranslateError, VirtAddr};
use memsim_core::config::ReplacementPolicy;
use memsim_core::vm::AddressTranslator;
use pretty_assertions::assert_eq;
use rstest::rstest;

fn translator(physical: u64, page_size: u64, policy: ReplacementPolicy) -> AddressTranslator {
    AddressTranslator::new(physical, page_size, policy).unwrap()
}

#[test]
fn test_geometry_is_overcommitted() {
    let vm = translator(64, 16, ReplacementPolicy::Fifo);
    assert_eq!(vm.frames(), 4);
    assert_eq!(vm.pages(), 16);
    assert_eq!(vm.page_size(), 16);
}

#[test]
fn test_invalid_geometry_rejected() {
    assert_eq!(
        AddressTranslator::new(64, 0, ReplacementPolicy::Fifo).unwrap_err(),
        ConfigError::ZeroPageSize
    );
    assert_eq!(
        AddressTranslator::new(8, 16, ReplacementPolicy::Fifo).unwrap_err(),
        ConfigError::NoFrames {
            physical: 8,
            page_size: 16
        }
    );
}

#[test]
fn test_first_touch_faults_then_hits() {
    let mut vm = translator(64, 16, ReplacementPolicy::Fifo);

    let first = vm.translate(VirtAddr(0x25)).unwrap();
    assert!(first.fault);
    assert_eq!(first.page, 2);
    assert_eq!(first.frame, 0);
    assert_eq!(first.paddr, PhysAddr(5));
    assert_eq!(first.evicted, None);

    let second = vm.translate(VirtAddr(0x2a)).unwrap();
    assert!(!second.fault);
    assert_eq!(second.paddr, PhysAddr(0xa));

    let stats = vm.stats();
    assert_eq!((stats.hits, stats.faults, stats.evictions), (1, 1, 0));
}

#[test]
fn test_free_frames_are_used_lowest_first() {
    let mut vm = translator(64, 16, ReplacementPolicy::Fifo);
    let frames: Vec<u64> = [7u64, 3, 9]
        .iter()
        .map(|&page| vm.translate(VirtAddr(page * 16)).unwrap().frame)
        .collect();
    assert_eq!(frames, vec![0, 1, 2]);
}

#[rstest]
#[case::fifo(ReplacementPolicy::Fifo, 0)]
#[case::lru(ReplacementPolicy::Lru, 1)]
fn test_eviction_victim(#[case] policy: ReplacementPolicy, #[case] victim: u64) {
    let mut vm = translator(32, 16, policy);
    for page in [0u64, 1, 0] {
        let _ = vm.translate(VirtAddr(page * 16)).unwrap();
    }

    let t = vm.translate(VirtAddr(2 * 16)).unwrap();
    assert!(t.fault);
    assert_eq!(t.evicted, Some(victim));
    assert_eq!(vm.owner_of(t.frame), Some(2));
    assert_eq!(vm.stats().evictions, 1);
}

#[test]
fn test_evicted_page_faults_again() {
    let mut vm = translator(16, 16, ReplacementPolicy::Fifo);
    let _ = vm.translate(VirtAddr(0)).unwrap();
    let _ = vm.translate(VirtAddr(16)).unwrap();
    let t = vm.translate(VirtAddr(0)).unwrap();
    assert!(t.fault);
    assert_eq!(t.evicted, Some(1));
    assert_eq!(vm.mappings().collect::<Vec<_>>(), vec![(0, 0)]);
}

#[test]
fn test_out_of_range_is_counted_as_invalid() {
    let mut vm = translator(64, 16, ReplacementPolicy::Fifo);
    let vaddr = VirtAddr(16 * 16);
    assert_eq!(
        vm.translate(vaddr),
        Err(TranslateError::OutOfRange { vaddr, pages: 16 })
    );

    let stats = vm.stats();
    assert_eq!(stats.invalid, 1);
    assert_eq!(stats.hits + stats.faults, 0);
    assert_eq!(vm.mappings().count(), 0);
}

#[test]
fn test_policy_switch_applies_to_resident_pages() {
    let mut vm = translator(32, 16, ReplacementPolicy::Fifo);
    let _ = vm.translate(VirtAddr(0)).unwrap();
    let _ = vm.translate(VirtAddr(16)).unwrap();

    vm.set_policy(ReplacementPolicy::Lru);
    assert_eq!(vm.policy(), ReplacementPolicy::Lru);
    let _ = vm.translate(VirtAddr(0)).unwrap();

    let t = vm.translate(VirtAddr(32)).unwrap();
    assert_eq!(t.evicted, Some(1));
}

#[test]
fn test_mappings_are_in_page_order() {
    let mut vm = translator(64, 16, ReplacementPolicy::Lru);
    for page in [5u64, 2, 9] {
        let _ = vm.translate(VirtAddr(page * 16)).unwrap();
    }
    assert_eq!(
        vm.mappings().collect::<Vec<_>>(),
        vec![(2, 1), (5, 0), (9, 2)]
    );
    assert_eq!(vm.owner_of(3), None);
    assert_eq!(vm.owner_of(99), None);
}

#[rstest]
#[case::fifo(ReplacementPolicy::Fifo)]
#[case::lru(ReplacementPolicy::Lru)]
fn test_streaming_distinct_pages_always_fault(#[case] policy: ReplacementPolicy) {
    let mut vm = translator(64, 16, policy);
    for page in 0..vm.pages() {
        assert!(vm.translate(VirtAddr(page * 16)).unwrap().fault);
    }
    for page in 0..vm.pages() {
        assert!(vm.translate(VirtAddr(page * 16)).unwrap().fault);
    }
    let stats = vm.stats();
    assert_eq!(stats.faults, 2 * vm.pages());
    assert_eq!(stats.hits, 0);
    assert_eq!(stats.evictions, 2 * vm.pages() - vm.frames());
}

#[rstest]
#[case::overflowing_page_count(u64::MAX, 1)]
#[case::huge_table(1 << 40, 1)]
#[case::just_over_limit(1 << 23, 1)]
fn test_oversized_address_space_rejected(#[case] physical: u64, #[case] page_size: u64) {
    assert_eq!(
        AddressTranslator::new(physical, page_size, ReplacementPolicy::Lru).unwrap_err(),
        ConfigError::PageTableTooLarge {
            physical,
            page_size
        }
    );
}

#[test]
fn test_huge_pages_translate_without_overflow() {
    let mut vm = translator(u64::MAX, 1 << 62, ReplacementPolicy::Fifo);
    assert_eq!(vm.frames(), 3);
    assert_eq!(vm.pages(), 12);

    let t = vm.translate(VirtAddr(5)).unwrap();
    assert_eq!(t.paddr, PhysAddr(5));

    let top = vm.translate(VirtAddr(u64::MAX)).unwrap();
    assert_eq!(top.page, 3);
    assert_eq!(top.frame, 1);
    assert_eq!(top.paddr, PhysAddr((1 << 63) - 1));
}

#[test]
fn test_max_address_is_out_of_range() {
    let mut vm = translator(64, 16, ReplacementPolicy::Lru);
    let vaddr = VirtAddr(u64::MAX);
    assert_eq!(
        vm.translate(vaddr),
        Err(TranslateError::OutOfRange { vaddr, pages: 16 })
    );
}
