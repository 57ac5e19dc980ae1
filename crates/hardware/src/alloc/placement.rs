//! Placement Strategies.
//!
//! Selects which free block of the contiguous allocator satisfies a request.
//!
//! # Strategies
//!
//! - `FirstFit`: Lowest-addressed free block that is large enough.
//! - `BestFit`: Smallest free block that is large enough.
//! - `WorstFit`: Largest free block.
//!
//! Ties between equally sized candidates always go to the lowest address.

use std::fmt;

use super::block::Block;
use crate::config::Placement;

/// Trait for placement strategies.
pub trait PlacementPolicy: fmt::Debug + Send + Sync {
    /// Picks the index of the block that will hold an aligned request.
    ///
    /// # Arguments
    ///
    /// * `blocks` - The allocator's block list in address order.
    /// * `size` - The aligned request size.
    ///
    /// # Returns
    ///
    /// The index of a free block of at least `size` bytes, or `None`.
    fn select(&self, blocks: &[Block], size: u64) -> Option<usize>;

    /// Returns the configuration selector this strategy implements.
    fn kind(&self) -> Placement;
}

/// Free blocks large enough for `size`, with their indices.
fn candidates(blocks: &[Block], size: u64) -> impl Iterator<Item = (usize, &Block)> {
    blocks
        .iter()
        .enumerate()
        .filter(move |(_, b)| b.is_free() && b.size >= size)
}

/// First-fit placement.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstFit;

impl PlacementPolicy for FirstFit {
    fn select(&self, blocks: &[Block], size: u64) -> Option<usize> {
        candidates(blocks, size).map(|(i, _)| i).next()
    }

    fn kind(&self) -> Placement {
        Placement::FirstFit
    }
}

/// Best-fit placement.
#[derive(Debug, Clone, Copy, Default)]
pub struct BestFit;

impl PlacementPolicy for BestFit {
    fn select(&self, blocks: &[Block], size: u64) -> Option<usize> {
        // min_by_key keeps the first of equal minima.
        candidates(blocks, size)
            .min_by_key(|(_, b)| b.size)
            .map(|(i, _)| i)
    }

    fn kind(&self) -> Placement {
        Placement::BestFit
    }
}

/// Worst-fit placement.
#[derive(Debug, Clone, Copy, Default)]
pub struct WorstFit;

impl PlacementPolicy for WorstFit {
    fn select(&self, blocks: &[Block], size: u64) -> Option<usize> {
        // max_by_key keeps the last of equal maxima, so flip the index into the key.
        candidates(blocks, size)
            .max_by_key(|&(i, b)| (b.size, std::cmp::Reverse(i)))
            .map(|(i, _)| i)
    }

    fn kind(&self) -> Placement {
        Placement::WorstFit
    }
}
