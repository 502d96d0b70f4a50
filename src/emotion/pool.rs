//! Weighted Pool — the expanded sampling domain behind random draws.
//!
//! Each record index is repeated `weight` times, in catalog order. A uniform
//! pick from the pool therefore lands on record `i` with probability
//! `weight(i) / total_weight`.

use crate::error::CatalogError;
use rand::seq::SliceRandom;
use rand::Rng;

#[derive(Debug, Clone, Default)]
pub struct WeightedPool {
    slots: Vec<usize>,
}

impl WeightedPool {
    /// Expand `weights` (one per record, in catalog order) into pool slots.
    pub fn build<I>(weights: I) -> Self
    where
        I: IntoIterator<Item = u32>,
    {
        let mut slots = Vec::new();
        for (index, weight) in weights.into_iter().enumerate() {
            slots.extend(std::iter::repeat(index).take(weight as usize));
        }
        Self { slots }
    }

    /// Pick one record index uniformly from the pool.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<usize, CatalogError> {
        self.slots
            .choose(rng)
            .copied()
            .ok_or(CatalogError::EmptyPool)
    }

    /// Number of slots, equal to the sum of all weights.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Raw slot layout (record indices).
    pub fn slots(&self) -> &[usize] {
        &self.slots
    }
}
