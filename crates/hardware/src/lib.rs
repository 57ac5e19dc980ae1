//! Memory subsystem simulator library.
//!
//! This crate models a computer's memory subsystem for experimentation, with the following:
//! 1. **Allocators:** A contiguous heap with first/best/worst-fit placement and a buddy allocator.
//! 2. **Caches:** Set-associative cache levels with FIFO or LRU replacement, chained as L1/L2/L3.
//! 3. **Virtual Memory:** A demand-paged translator with FIFO or LRU frame eviction.
//! 4. **Simulation:** A command-driven context, configuration, and statistics reporting.
//!
//! No real memory is touched: every engine is pure bookkeeping over address numbers.

/// Contiguous and buddy allocators.
pub mod alloc;
/// Set-associative cache level.
pub mod cache;
/// Common types and constants (addresses, errors, alignment, latencies).
pub mod common;
/// Simulator configuration (defaults, enums, hierarchical config structures).
pub mod config;
/// Cache hierarchy access coordination and latency accounting.
pub mod hierarchy;
/// Recency-based replacement policies shared by caches and virtual memory.
pub mod policy;
/// Simulation context, command parsing, and responses.
pub mod sim;
/// Statistics snapshots and reporting.
pub mod stats;
/// Demand-paged virtual memory.
pub mod vm;

/// Root configuration type; use `Config::default()` or load from JSON.
pub use crate::config::Config;
/// Cache hierarchy; probes L1, L2, L3, then memory.
pub use crate::hierarchy::CacheHierarchy;
/// Top-level simulator; construct with `Simulator::new`.
pub use crate::sim::Simulator;
