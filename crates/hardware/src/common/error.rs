//! Error definitions for the simulator.
//!
//! This module defines the error taxonomy shared by all engines. It provides:
//! 1. **Configuration Errors:** Rejected cache geometry, buddy sizes, and page geometry.
//! 2. **Allocation Errors:** Recoverable failures of the contiguous and buddy allocators.
//! 3. **Translation Errors:** Out-of-range virtual addresses and use before initialization.
//! 4. **Top-level Errors:** The `SimError` wrapper returned by the command dispatcher.
//!
//! Every error is local to the operation that raised it; failed operations never
//! leave partially mutated state behind.

use serde::Serialize;
use thiserror::Error;

use super::addr::VirtAddr;
use crate::alloc::AllocId;

/// An engine could not be constructed from the supplied parameters.
///
/// Construction fails as a whole: no partially configured engine is produced
/// and any engine it would have replaced is left untouched.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Cache block (line) size of zero.
    #[error("{cache}: block size must be nonzero")]
    ZeroBlockSize {
        /// Name of the offending cache level.
        cache: String,
    },

    /// Cache associativity of zero.
    #[error("{cache}: associativity must be nonzero")]
    ZeroAssociativity {
        /// Name of the offending cache level.
        cache: String,
    },

    /// Cache size is not a whole number of sets.
    #[error("{cache}: size {size} is not divisible by block size {block_size} x associativity {ways}")]
    UnevenGeometry {
        /// Name of the offending cache level.
        cache: String,
        /// Requested total cache size in bytes.
        size: u64,
        /// Requested block size in bytes.
        block_size: u64,
        /// Requested associativity.
        ways: u64,
    },

    /// Cache level needs more lines than can be simulated.
    #[error("{cache}: size {size} with block size {block_size} needs too many lines")]
    CacheTooLarge {
        /// Name of the offending cache level.
        cache: String,
        /// Requested total cache size in bytes.
        size: u64,
        /// Requested block size in bytes.
        block_size: u64,
    },

    /// Buddy memory size is zero or not a power of two.
    #[error("buddy memory size must be a power of two, got {0}")]
    NotPowerOfTwo(u64),

    /// Page size of zero.
    #[error("page size must be nonzero")]
    ZeroPageSize,

    /// Physical memory holds no complete frame.
    #[error("physical memory of {physical} bytes holds no {page_size}-byte frame")]
    NoFrames {
        /// Requested physical memory size.
        physical: u64,
        /// Requested page size.
        page_size: u64,
    },

    /// Virtual address space needs more pages than can be simulated.
    #[error("physical memory of {physical} bytes with {page_size}-byte pages needs too many pages")]
    PageTableTooLarge {
        /// Requested physical memory size.
        physical: u64,
        /// Requested page size.
        page_size: u64,
    },

    /// Contiguous memory size of zero.
    #[error("memory size must be nonzero")]
    ZeroMemory,

    /// Configuration file could not be read or parsed.
    #[error("invalid configuration: {0}")]
    Parse(String),
}

/// A recoverable allocator failure.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AllocError {
    /// No free block (or power-of-two segment) can satisfy the request.
    #[error("out of memory (requested {requested} bytes)")]
    OutOfMemory {
        /// Size originally requested by the caller.
        requested: u64,
    },

    /// Requests of zero bytes are rejected.
    #[error("allocation of zero bytes")]
    ZeroSize,

    /// The id does not name a live allocation.
    #[error("unknown allocation id {0}")]
    UnknownId(AllocId),

    /// The active allocator was used before being initialized.
    #[error("allocator is not initialized")]
    NotInitialized,
}

/// A recoverable address-translation failure.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TranslateError {
    /// The virtual page lies beyond the virtual address space.
    #[error("invalid virtual address {vaddr} (virtual space has {pages} pages)")]
    OutOfRange {
        /// The faulting virtual address.
        vaddr: VirtAddr,
        /// Number of virtual pages in the address space.
        pages: u64,
    },

    /// Virtual memory was used before `init_vm`.
    #[error("virtual memory is not initialized")]
    NotInitialized,
}

/// Errors surfaced by the command dispatcher.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SimError {
    /// A command line could not be parsed.
    #[error("parse error: {0}")]
    Parse(String),

    /// Rejected configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Allocator failure.
    #[error(transparent)]
    Alloc(#[from] AllocError),

    /// Translation failure.
    #[error(transparent)]
    Translate(#[from] TranslateError),
}
