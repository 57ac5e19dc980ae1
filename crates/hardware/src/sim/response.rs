//! Typed command results and their text rendering.

use std::fmt;

use serde::Serialize;

use crate::alloc::{AllocId, Block};
use crate::common::AllocError;
use crate::hierarchy::{AccessOutcome, VirtualAccess};
use crate::stats::{AccessStats, AllocatorStats, BuddyStats, CacheStats, VmStats};

/// Result of a successfully dispatched command.
///
/// Recoverable allocator outcomes (a failed `malloc`, an unknown id passed to
/// `free`) are responses, not errors: they are part of the normal protocol.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum Response {
    /// Command applied; nothing to report.
    Done,
    /// `malloc` succeeded.
    Allocated(AllocId),
    /// `malloc` failed.
    AllocFailed(AllocError),
    /// `free` succeeded.
    Freed,
    /// `free` named no live allocation.
    InvalidId(AllocId),
    /// Contiguous allocator layout.
    Layout(Vec<Block>),
    /// Buddy free lists as `(size, addresses)`.
    BuddyLayout(Vec<(u64, Vec<u64>)>),
    /// Contiguous allocator statistics.
    AllocatorStats(AllocatorStats),
    /// Buddy allocator statistics.
    BuddyStats(BuddyStats),
    /// Physical access through the hierarchy.
    Access(AccessOutcome),
    /// Virtual access through the translator and the hierarchy.
    VmAccess(VirtualAccess),
    /// Translator statistics.
    VmStats(VmStats),
    /// Resident `(page, frame)` mappings.
    PageTable(Vec<(u64, u64)>),
    /// Cache and access time statistics.
    CacheStats {
        /// L1, L2, and L3 counters.
        caches: [CacheStats; 3],
        /// Hierarchy access totals.
        access: AccessStats,
    },
    /// The session should end.
    Exit,
}

impl Response {
    /// Returns true for responses that report statistics.
    pub const fn is_stats(&self) -> bool {
        matches!(
            self,
            Self::AllocatorStats(_) | Self::BuddyStats(_) | Self::VmStats(_) | Self::CacheStats { .. }
        )
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Done | Self::Exit => Ok(()),
            Self::Allocated(id) => writeln!(f, "Allocated id={id}"),
            Self::AllocFailed(_) => writeln!(f, "Allocation failed"),
            Self::Freed => writeln!(f, "Freed"),
            Self::InvalidId(_) => writeln!(f, "Invalid id"),
            Self::Layout(blocks) => {
                for b in blocks {
                    let end = b.end() - 1;
                    write!(f, "[{} - {end}] ({:#x} - {end:#x}) ", b.start, b.start)?;
                    match b.owner {
                        None => writeln!(f, "FREE")?,
                        Some(id) => writeln!(f, "USED (id={id})")?,
                    }
                }
                Ok(())
            }
            Self::BuddyLayout(lists) => {
                writeln!(f, "Buddy Free Lists:")?;
                for (size, addrs) in lists {
                    write!(f, "Block size {size}: ")?;
                    for addr in addrs {
                        write!(f, "[{addr}] ")?;
                    }
                    writeln!(f)?;
                }
                Ok(())
            }
            Self::AllocatorStats(stats) => write!(f, "{stats}"),
            Self::BuddyStats(stats) => write!(f, "{stats}"),
            Self::Access(outcome) => writeln!(f, "{}", outcome.level),
            Self::VmAccess(access) => writeln!(f, "{}", access.outcome.level),
            Self::VmStats(stats) => write!(f, "{stats}"),
            Self::PageTable(mappings) => {
                for (page, frame) in mappings {
                    writeln!(f, "Page {page} -> Frame {frame}")?;
                }
                Ok(())
            }
            Self::CacheStats { caches, access } => {
                for cache in caches {
                    write!(f, "{cache}")?;
                }
                write!(f, "{access}")
            }
        }
    }
}
