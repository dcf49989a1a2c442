use super::error::Result;
use rand::distributions::{Distribution, Uniform, WeightedError, WeightedIndex};
use rand::Rng;

/// Draws indices into a population with probability proportional to their weights,
/// with replacement.
///
/// If every weight is zero, the sampler falls back to drawing uniformly from the whole
/// population; weight zero only excludes an item if at least one other item has a
/// positive weight.
#[derive(Clone, Debug)]
pub enum WeightedSampler {
    Weighted(WeightedIndex<f64>),
    Uniform(Uniform<usize>),
}

impl WeightedSampler {
    /// Fails with `WeightedError::NoItem` on an empty population and with
    /// `WeightedError::InvalidWeight` for negative or non-finite weights.
    pub fn new(weights: &[f64]) -> Result<Self> {
        match WeightedIndex::new(weights) {
            Ok(index) => Ok(Self::Weighted(index)),
            Err(WeightedError::AllWeightsZero) => {
                Ok(Self::Uniform(Uniform::new(0, weights.len())))
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn sample_index(&self, rng: &mut impl Rng) -> usize {
        match self {
            Self::Weighted(index) => index.sample(rng),
            Self::Uniform(uniform) => uniform.sample(rng),
        }
    }

    /// Picks one of `items`; `items` must be aligned with the weights the sampler was built from.
    pub fn choose<'a, T>(&self, rng: &mut impl Rng, items: &'a [T]) -> &'a T {
        &items[self.sample_index(rng)]
    }
}
