//! Demand-Paged Virtual Memory.
//!
//! A single-level page table translating virtual addresses to physical frames.
//! It provides:
//! 1. **Demand Paging:** Pages are loaded into a frame on first touch.
//! 2. **Eviction:** With every frame taken, the resident page with the smallest
//!    recency stamp gives up its frame (FIFO or LRU, set process-wide).
//! 3. **Ownership:** A frame-to-page table keeps the page/frame mapping a bijection.
//!
//! The virtual space is a fixed multiple ([`VM_OVERCOMMIT`]) of the physical
//! frame count so that sustained access to distinct pages forces eviction.

use serde::Serialize;
use tracing::{debug, warn};

use crate::common::{
    ConfigError, MAX_PAGES, PhysAddr, TranslateError, VM_OVERCOMMIT, VirtAddr, try_table,
};
use crate::config::ReplacementPolicy;
use crate::policy::{RecencyPolicy, select_victim};
use crate::stats::VmStats;

/// A single page-table entry.
#[derive(Clone, Copy, Debug, Default)]
struct PageTableEntry {
    valid: bool,
    frame: u64,
    /// Load time (FIFO) or last access time (LRU).
    stamp: u64,
}

/// Outcome of a successful translation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Translation {
    /// Translated physical address.
    pub paddr: PhysAddr,
    /// Virtual page number of the access.
    pub page: u64,
    /// Frame now holding the page.
    pub frame: u64,
    /// True if the page had to be loaded.
    pub fault: bool,
    /// Page that lost its frame to satisfy the fault, if any.
    pub evicted: Option<u64>,
}

/// Virtual-to-physical address translator.
///
/// Instances are plain values; they are not safe for concurrent mutation
/// without external synchronization.
#[derive(Debug)]
pub struct AddressTranslator {
    page_size: u64,
    page_table: Vec<PageTableEntry>,
    frame_to_page: Vec<Option<u64>>,
    policy: Box<dyn RecencyPolicy>,
    /// Logical clock, advanced once per translation.
    time: u64,
    hits: u64,
    faults: u64,
    evictions: u64,
    invalid: u64,
}

impl AddressTranslator {
    /// Creates a translator with every page unmapped and every frame free.
    ///
    /// # Arguments
    ///
    /// * `physical_size` - Physical memory size in bytes; `physical_size / page_size` frames.
    /// * `page_size` - Page and frame size in bytes.
    /// * `policy` - Replacement policy for choosing eviction victims.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroPageSize`] or [`ConfigError::NoFrames`] if the
    /// geometry yields no usable frame, and [`ConfigError::PageTableTooLarge`] if
    /// it needs more than [`MAX_PAGES`] virtual pages.
    pub fn new(
        physical_size: u64,
        page_size: u64,
        policy: ReplacementPolicy,
    ) -> Result<Self, ConfigError> {
        if page_size == 0 {
            warn!("rejected zero page size");
            return Err(ConfigError::ZeroPageSize);
        }
        let frames = physical_size / page_size;
        if frames == 0 {
            warn!(physical_size, page_size, "rejected memory without frames");
            return Err(ConfigError::NoFrames {
                physical: physical_size,
                page_size,
            });
        }
        let tables = frames
            .checked_mul(VM_OVERCOMMIT)
            .filter(|&pages| pages <= MAX_PAGES)
            .and_then(|pages| {
                Some((
                    try_table(pages, PageTableEntry::default())?,
                    try_table(frames, None::<u64>)?,
                ))
            });
        let Some((page_table, frame_to_page)) = tables else {
            warn!(physical_size, page_size, "rejected oversized virtual memory");
            return Err(ConfigError::PageTableTooLarge {
                physical: physical_size,
                page_size,
            });
        };
        debug!(frames, pages = page_table.len(), page_size, "virtual memory initialized");
        Ok(Self {
            page_size,
            page_table,
            frame_to_page,
            policy: policy.build(),
            time: 0,
            hits: 0,
            faults: 0,
            evictions: 0,
            invalid: 0,
        })
    }

    /// Switches the replacement policy; resident pages keep their stamps.
    pub fn set_policy(&mut self, policy: ReplacementPolicy) {
        self.policy = policy.build();
    }

    /// Replacement policy in use.
    pub fn policy(&self) -> ReplacementPolicy {
        self.policy.kind()
    }

    /// Translates `vaddr`, loading its page on a fault.
    ///
    /// # Errors
    ///
    /// Returns [`TranslateError::OutOfRange`] if the page lies beyond the virtual
    /// space. The clock still advances and the access is counted as invalid, but
    /// it is neither a hit nor a fault.
    pub fn translate(&mut self, vaddr: VirtAddr) -> Result<Translation, TranslateError> {
        self.time += 1;
        let now = self.time;
        let (page, offset) = vaddr.split(self.page_size);

        let Some(entry) = self.page_table.get_mut(page as usize) else {
            self.invalid += 1;
            warn!(%vaddr, "invalid virtual address");
            return Err(TranslateError::OutOfRange {
                vaddr,
                pages: self.page_table.len() as u64,
            });
        };

        if entry.valid {
            self.policy.on_hit(&mut entry.stamp, now);
            self.hits += 1;
            let frame = entry.frame;
            return Ok(Translation {
                paddr: PhysAddr(frame * self.page_size) + offset,
                page,
                frame,
                fault: false,
                evicted: None,
            });
        }

        self.faults += 1;
        let (frame, evicted) = self.claim_frame();

        self.page_table[page as usize] = PageTableEntry {
            valid: true,
            frame,
            stamp: now,
        };
        self.frame_to_page[frame as usize] = Some(page);
        debug!(page, frame, ?evicted, "page loaded");

        Ok(Translation {
            paddr: PhysAddr(frame * self.page_size) + offset,
            page,
            frame,
            fault: true,
            evicted,
        })
    }

    /// Picks the frame for a faulting page: the lowest free frame, or else the
    /// frame of the resident page with the smallest stamp, which is unmapped.
    ///
    /// Every frame is owned when none is free, so the victim search always has
    /// a candidate; stamps are unique, so frame order never breaks a tie.
    fn claim_frame(&mut self) -> (u64, Option<u64>) {
        if let Some(free) = self.frame_to_page.iter().position(Option::is_none) {
            return (free as u64, None);
        }

        let page_table = &self.page_table;
        let frame = select_victim(
            self.frame_to_page
                .iter()
                .enumerate()
                .filter_map(|(f, owner)| owner.map(|p| (f, page_table[p as usize].stamp))),
        )
        .unwrap_or(0);

        let evicted = self.frame_to_page[frame].take();
        if let Some(page) = evicted {
            self.page_table[page as usize].valid = false;
            self.evictions += 1;
            debug!(page, frame, "page evicted");
        }
        (frame as u64, evicted)
    }

    /// Resident pages as `(page, frame)`, in page order.
    pub fn mappings(&self) -> impl Iterator<Item = (u64, u64)> + '_ {
        self.page_table
            .iter()
            .enumerate()
            .filter(|(_, e)| e.valid)
            .map(|(p, e)| (p as u64, e.frame))
    }

    /// Page that currently owns `frame`, if any.
    pub fn owner_of(&self, frame: u64) -> Option<u64> {
        self.frame_to_page.get(frame as usize).copied().flatten()
    }

    /// Page size in bytes.
    pub const fn page_size(&self) -> u64 {
        self.page_size
    }

    /// Number of physical frames.
    pub fn frames(&self) -> u64 {
        self.frame_to_page.len() as u64
    }

    /// Number of virtual pages.
    pub fn pages(&self) -> u64 {
        self.page_table.len() as u64
    }

    /// Computes a statistics snapshot.
    pub fn stats(&self) -> VmStats {
        VmStats {
            hits: self.hits,
            faults: self.faults,
            evictions: self.evictions,
            invalid: self.invalid,
            frames: self.frames(),
            pages: self.pages(),
        }
    }
}
