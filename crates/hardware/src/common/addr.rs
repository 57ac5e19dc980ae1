//! Physical and Virtual Address types.
//!
//! This module defines strong types for physical and virtual addresses to prevent
//! accidental mixing of address spaces. It provides the following:
//! 1. **Type Safety:** Distinguishes between virtual and physical address spaces at compile time.
//! 2. **Address Manipulation:** Page and block decomposition helpers used by the cache and translator.
//! 3. **Translation Integration:** The translator consumes `VirtAddr` and yields `PhysAddr`.
//!
//! No memory is ever touched: addresses are bookkeeping numbers only.

use std::fmt;
use std::ops::Add;

use serde::Serialize;

/// A virtual address issued by the simulated program.
///
/// Virtual addresses must be translated to physical addresses through the
/// [`AddressTranslator`](crate::vm::AddressTranslator) before probing the caches.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct VirtAddr(pub u64);

/// A physical address in the simulated machine.
///
/// Physical addresses are what the cache hierarchy indexes on and what the
/// allocators hand out.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct PhysAddr(pub u64);

impl VirtAddr {
    /// Returns the raw 64-bit address value.
    #[inline(always)]
    pub const fn val(&self) -> u64 {
        self.0
    }

    /// Splits the address into `(page number, offset within page)`.
    ///
    /// # Arguments
    ///
    /// * `page_size` - Page size in bytes; must be nonzero.
    #[inline]
    pub const fn split(&self, page_size: u64) -> (u64, u64) {
        (self.0 / page_size, self.0 % page_size)
    }
}

impl PhysAddr {
    /// Returns the raw 64-bit address value.
    #[inline(always)]
    pub const fn val(&self) -> u64 {
        self.0
    }

    /// Returns the block number this address falls in for a given block size.
    #[inline]
    pub const fn block(&self, block_size: u64) -> u64 {
        self.0 / block_size
    }
}

impl From<u64> for VirtAddr {
    fn from(addr: u64) -> Self {
        Self(addr)
    }
}

impl From<u64> for PhysAddr {
    fn from(addr: u64) -> Self {
        Self(addr)
    }
}

impl Add<u64> for PhysAddr {
    type Output = Self;

    fn add(self, rhs: u64) -> Self {
        Self(self.0 + rhs)
    }
}

impl fmt::Display for VirtAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

impl fmt::Display for PhysAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}
