//! # Unit Tests
//!
//! Engine-level tests, organized by subsystem.


/// Buddy allocator splitting, merging, and accounting.
pub mod buddy_allocator;

/// Set-associative cache lookup and replacement.
pub mod cache;





/// Statistics snapshots and their text reports.
pub mod stats;

/// Demand paging and frame replacement.
pub mod vm;
