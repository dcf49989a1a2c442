use super::error::{Result, SimulationError};
use std::cmp::Ordering;

const NUM_PRECOMPUTED: usize = 100;

#[derive(Clone, Debug)]
pub struct WeightFunction {
    exponent: f64,
    offset: f64,
    precomputed: [f64; NUM_PRECOMPUTED],
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Regime {
    Sublinear,
    Linear,
    Superlinear,
}

/// Attachment weight `f(d) = d**exponent + offset` of an article with total degree `d`,
/// with pre-computation of the first few values.
///
/// The citation rule of the model uses `exponent = 1` and `offset = 1`, so that
/// articles nobody cited yet still have a positive chance of being drawn.
///
/// # Example
/// ```
/// use rust_citation_pa::weight_function::WeightFunction;
/// let wf = WeightFunction::new(1.0, 1.0).unwrap();
///
/// assert_eq!(wf.get(0), 1.0);
/// assert_eq!(wf.get(9), 10.0);
/// ```
impl WeightFunction {
    pub fn new(exponent: f64, offset: f64) -> Result<Self> {
        if !exponent.is_finite() || exponent < 0.0 {
            return Err(SimulationError::InvalidConfiguration(format!(
                "attachment exponent must be finite and non-negative, got {}",
                exponent
            )));
        }
        if !offset.is_finite() || offset < 0.0 {
            return Err(SimulationError::InvalidConfiguration(format!(
                "attachment offset must be finite and non-negative, got {}",
                offset
            )));
        }

        Ok(Self::precompute(exponent, offset))
    }

    /// Linear attachment with unit offset: `f(d) = d + 1`.
    pub fn linear() -> Self {
        Self::precompute(1.0, 1.0)
    }

    fn precompute(exponent: f64, offset: f64) -> Self {
        let mut precomputed = [0.0; NUM_PRECOMPUTED];

        for (degree, weight) in precomputed.iter_mut().enumerate() {
            *weight = Self::compute(exponent, offset, degree);
        }

        Self {
            exponent,
            offset,
            precomputed,
        }
    }

    pub fn get(&self, degree: usize) -> f64 {
        match self.precomputed.get(degree) {
            Some(&weight) => weight,
            None => Self::compute(self.exponent, self.offset, degree),
        }
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn exponent(&self) -> f64 {
        self.exponent
    }

    pub fn regime(&self) -> Regime {
        // exponent is finite, checked in new
        match self.exponent.partial_cmp(&1.0).unwrap_or(Ordering::Equal) {
            Ordering::Less => Regime::Sublinear,
            Ordering::Equal => Regime::Linear,
            Ordering::Greater => Regime::Superlinear,
        }
    }

    #[inline]
    fn compute(exponent: f64, offset: f64, degree: usize) -> f64 {
        (degree as f64).powf(exponent) + offset
    }
}

impl Default for WeightFunction {
    fn default() -> Self {
        Self::linear()
    }
}
