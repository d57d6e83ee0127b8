use crate::error::{GenespaceError, Result};
use crate::types::{Code, Gene};
use rand::{Rng, RngCore};
use rand_distr::{Distribution, Normal};

/// Normalize a code that should hold exactly one value.
///
/// Leaf checks accept either a bare scalar or a length-1 slice wrapping it;
/// anything longer is a shape problem.
pub(crate) fn extract_single(code: &[Gene]) -> Option<Gene> {
    match code {
        [gene] => Some(*gene),
        _ => None,
    }
}

fn shape_error(expected: usize, actual: usize) -> GenespaceError {
    GenespaceError::Shape { expected, actual }
}

/// Bounded integer dimension, always one slot wide.
///
/// `fits` only accepts `Gene::Int` values: the `Gene` variant is the
/// numeric-kind check, so `Gene::Float(2.0)` does not fit even though the
/// value is integral.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntegerType {
    lower: i64,
    upper: i64,
}

impl IntegerType {
    pub fn new(lower: i64, upper: i64) -> Result<Self> {
        if lower > upper {
            return Err(GenespaceError::Configuration(format!(
                "Integer bounds reversed: lower = {}, upper = {}",
                lower, upper
            )));
        }
        Ok(Self { lower, upper })
    }

    pub fn lower(&self) -> i64 {
        self.lower
    }

    pub fn upper(&self) -> i64 {
        self.upper
    }

    pub fn sample_random(&self, rng: &mut dyn RngCore) -> Code {
        vec![Gene::Int(rng.gen_range(self.lower..=self.upper))]
    }

    /// Uniform delta in the closed interval spanning 10% of the range.
    ///
    /// For spans below five the rounded bound is zero and the value cannot
    /// move; clamping at a border may likewise reproduce the input.
    fn mutation_difference(&self, rng: &mut dyn RngCore) -> i64 {
        let bound = ((self.upper - self.lower) as f64 * 0.1).round() as i64;
        rng.gen_range(-bound..=bound)
    }

    pub fn mutate_random(&self, code: &mut [Gene], rng: &mut dyn RngCore) -> Result<()> {
        let gene = extract_single(code).ok_or_else(|| shape_error(1, code.len()))?;
        let value = gene.as_int().ok_or_else(|| {
            GenespaceError::Validation(format!(
                "cannot mutate non-integer gene {:?} with int({}, {})",
                gene, self.lower, self.upper
            ))
        })?;
        let mutated = (value + self.mutation_difference(rng)).clamp(self.lower, self.upper);
        code[0] = Gene::Int(mutated);
        Ok(())
    }

    pub fn fits(&self, code: &[Gene]) -> bool {
        match extract_single(code) {
            Some(Gene::Int(value)) => self.lower <= value && value <= self.upper,
            _ => false,
        }
    }
}

/// Bounded float dimension, always one slot wide.
///
/// Unlike `IntegerType`, an integer gene inside the borders fits: the value
/// is compared as `f64`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FloatType {
    lower: f64,
    upper: f64,
}

impl FloatType {
    pub fn new(lower: f64, upper: f64) -> Result<Self> {
        if !lower.is_finite() || !upper.is_finite() {
            return Err(GenespaceError::Configuration(format!(
                "Float bounds must be finite: lower = {}, upper = {}",
                lower, upper
            )));
        }
        if lower > upper {
            return Err(GenespaceError::Configuration(format!(
                "Float bounds reversed: lower = {}, upper = {}",
                lower, upper
            )));
        }
        Ok(Self { lower, upper })
    }

    pub fn lower(&self) -> f64 {
        self.lower
    }

    pub fn upper(&self) -> f64 {
        self.upper
    }

    pub fn sample_random(&self, rng: &mut dyn RngCore) -> Code {
        vec![Gene::Float(rng.gen_range(self.lower..=self.upper))]
    }

    /// Normal delta with sigma at 10% of the range, clamped at the borders.
    fn mutation_difference(&self, rng: &mut dyn RngCore) -> Result<f64> {
        let sigma = (self.upper - self.lower) * 0.1;
        let normal = Normal::new(0.0, sigma).map_err(|e| {
            GenespaceError::Validation(format!("invalid mutation distribution: {}", e))
        })?;
        Ok(normal.sample(rng))
    }

    pub fn mutate_random(&self, code: &mut [Gene], rng: &mut dyn RngCore) -> Result<()> {
        let gene = extract_single(code).ok_or_else(|| shape_error(1, code.len()))?;
        let mutated = (gene.as_f64() + self.mutation_difference(rng)?).clamp(self.lower, self.upper);
        code[0] = Gene::Float(mutated);
        Ok(())
    }

    pub fn fits(&self, code: &[Gene]) -> bool {
        match extract_single(code) {
            Some(gene) => {
                let value = gene.as_f64();
                self.lower <= value && value <= self.upper
            }
            None => false,
        }
    }
}
