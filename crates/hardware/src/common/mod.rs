//! Common utilities and types used throughout the memory simulator.
//!
//! This module provides fundamental building blocks that are shared across all engines.
//! It includes:
//! 1. **Address Types:** Strong types for virtual and physical addresses.
//! 2. **Constants:** Alignment, over-commit ratio, and hierarchy latencies.
//! 3. **Error Handling:** Configuration, allocation, and translation error types.

/// Address type definitions (physical and virtual addresses).
pub mod addr;

/// Common constants used throughout the simulator.
pub mod constants;

/// Error types for every engine.
pub mod error;

pub use addr::{PhysAddr, VirtAddr};
pub use constants::{ALIGNMENT, MAX_CACHE_LINES, MAX_PAGES, VM_OVERCOMMIT, align_up, try_table};
pub use error::{AllocError, ConfigError, SimError, TranslateError};
