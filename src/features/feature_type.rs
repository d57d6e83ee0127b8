use crate::error::{GenespaceError, Result};
use crate::features::bundle::FeatureBundle;
use crate::features::matrix::MatrixType;
use crate::features::native::{extract_single, FloatType, IntegerType};
use crate::features::options::FeatureOption;
use crate::features::permutation::FeaturePermutation;
use crate::types::{Code, Gene, MappedValue};
use rand::RngCore;
use std::fmt::Debug;
use std::sync::Arc;

/// Capability set for adapter-supplied feature types.
///
/// Implementors slot into `FeatureType::Custom` and take part in sampling,
/// fit-checking and codec walks like any built-in variant. Mutation has a
/// default that fails: reaching it means the adapter author skipped a
/// capability the caller relies on, which is a programming error rather
/// than a recoverable condition.
pub trait FeatureCapability: Debug + Send + Sync {
    fn sample_random(&self, rng: &mut dyn RngCore) -> Code;

    fn mutate_random(&self, _code: &mut [Gene], _rng: &mut dyn RngCore) -> Result<()> {
        Err(GenespaceError::NotImplemented(format!(
            "mutate_random on {:?}",
            self
        )))
    }

    fn fits(&self, code: &[Gene]) -> bool;

    fn min_size(&self) -> usize;

    fn max_size(&self) -> usize;
}

/// A feature type describes one dimension or sub-space of a genetic
/// encoding (bounds, alternatives or nested structure), not a value.
///
/// The hierarchy is closed: every variant implements the shared capability
/// set (sample, mutate, fits, length), and `Custom` is the extension point
/// for adapter-supplied types.
#[derive(Debug, Clone)]
pub enum FeatureType {
    Integer(IntegerType),
    Float(FloatType),
    Bundle(FeatureBundle),
    Options(FeatureOption),
    Permutation(FeaturePermutation),
    Matrix(MatrixType),
    Custom(Arc<dyn FeatureCapability>),
}

impl FeatureType {
    pub fn sample_random(&self, rng: &mut dyn RngCore) -> Code {
        match self {
            FeatureType::Integer(t) => t.sample_random(rng),
            FeatureType::Float(t) => t.sample_random(rng),
            FeatureType::Bundle(t) => t.sample_random(rng),
            FeatureType::Options(t) => t.sample_random(rng),
            FeatureType::Permutation(t) => t.sample_random(rng),
            FeatureType::Matrix(t) => t.sample_random(rng),
            FeatureType::Custom(t) => t.sample_random(rng),
        }
    }

    /// Mutate `code` in place. The slice length never changes; re-sampling a
    /// dynamically-sized feature into a differently-shaped branch is the
    /// caller's job (see `GeneCode::mutate_random`).
    pub fn mutate_random(&self, code: &mut [Gene], rng: &mut dyn RngCore) -> Result<()> {
        match self {
            FeatureType::Integer(t) => t.mutate_random(code, rng),
            FeatureType::Float(t) => t.mutate_random(code, rng),
            FeatureType::Bundle(t) => t.mutate_random(code, rng),
            FeatureType::Options(t) => t.mutate_random(code, rng),
            FeatureType::Permutation(t) => t.mutate_random(code, rng),
            FeatureType::Matrix(t) => t.mutate_random(code, rng),
            FeatureType::Custom(t) => t.mutate_random(code, rng),
        }
    }

    /// Membership test: structural mismatches surface as `false`, never as
    /// an error.
    pub fn fits(&self, code: &[Gene]) -> bool {
        match self {
            FeatureType::Integer(t) => t.fits(code),
            FeatureType::Float(t) => t.fits(code),
            FeatureType::Bundle(t) => t.fits(code),
            FeatureType::Options(t) => t.fits(code),
            FeatureType::Permutation(t) => t.fits(code),
            FeatureType::Matrix(t) => t.fits(code),
            FeatureType::Custom(t) => t.fits(code),
        }
    }

    pub fn min_size(&self) -> usize {
        match self {
            FeatureType::Integer(_) | FeatureType::Float(_) => 1,
            FeatureType::Bundle(t) => t.min_size(),
            FeatureType::Options(t) => t.min_size(),
            FeatureType::Permutation(t) => t.encoded_length(),
            FeatureType::Matrix(t) => t.size(),
            FeatureType::Custom(t) => t.min_size(),
        }
    }

    pub fn max_size(&self) -> usize {
        match self {
            FeatureType::Integer(_) | FeatureType::Float(_) => 1,
            FeatureType::Bundle(t) => t.max_size(),
            FeatureType::Options(t) => t.max_size(),
            FeatureType::Permutation(t) => t.encoded_length(),
            FeatureType::Matrix(t) => t.size(),
            FeatureType::Custom(t) => t.max_size(),
        }
    }

    /// Encoded dimensionality; for dynamically-sized types this is the
    /// maximum number of slots a code may occupy.
    pub fn len(&self) -> usize {
        self.max_size()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn dynamically_sized(&self) -> bool {
        self.min_size() != self.max_size()
    }

    /// Decode a concrete slice into the structured view of this feature.
    pub fn decode(&self, code: &[Gene]) -> Result<MappedValue> {
        match self {
            FeatureType::Integer(_) | FeatureType::Float(_) => extract_single(code)
                .map(MappedValue::Scalar)
                .ok_or(GenespaceError::Shape {
                    expected: 1,
                    actual: code.len(),
                }),
            FeatureType::Bundle(t) => t.decode(code),
            FeatureType::Options(t) => t.decode(code),
            FeatureType::Permutation(t) => Ok(MappedValue::Items(t.decode(code)?)),
            FeatureType::Matrix(t) => t.decode(code),
            FeatureType::Custom(_) => Ok(MappedValue::Raw(code.to_vec())),
        }
    }
}

impl PartialEq for FeatureType {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (FeatureType::Integer(a), FeatureType::Integer(b)) => a == b,
            (FeatureType::Float(a), FeatureType::Float(b)) => a == b,
            (FeatureType::Bundle(a), FeatureType::Bundle(b)) => a == b,
            (FeatureType::Options(a), FeatureType::Options(b)) => a == b,
            (FeatureType::Permutation(a), FeatureType::Permutation(b)) => a == b,
            (FeatureType::Matrix(a), FeatureType::Matrix(b)) => a == b,
            // Adapter-supplied types have no structural identity; compare by
            // instance.
            (FeatureType::Custom(a), FeatureType::Custom(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<IntegerType> for FeatureType {
    fn from(t: IntegerType) -> Self {
        FeatureType::Integer(t)
    }
}

impl From<FloatType> for FeatureType {
    fn from(t: FloatType) -> Self {
        FeatureType::Float(t)
    }
}

impl From<FeatureBundle> for FeatureType {
    fn from(t: FeatureBundle) -> Self {
        FeatureType::Bundle(t)
    }
}

impl From<FeatureOption> for FeatureType {
    fn from(t: FeatureOption) -> Self {
        FeatureType::Options(t)
    }
}

impl From<FeaturePermutation> for FeatureType {
    fn from(t: FeaturePermutation) -> Self {
        FeatureType::Permutation(t)
    }
}

impl From<MatrixType> for FeatureType {
    fn from(t: MatrixType) -> Self {
        FeatureType::Matrix(t)
    }
}

impl From<Arc<dyn FeatureCapability>> for FeatureType {
    fn from(t: Arc<dyn FeatureCapability>) -> Self {
        FeatureType::Custom(t)
    }
}

/// Resolve how many leading slots of `tail` the feature consumes.
///
/// Fixed-size features consume exactly their declared length. For
/// dynamically-sized features, candidate lengths are probed from the largest
/// feasible downward and the first accepted one wins. This is greedy and
/// non-backtracking: once a length is committed the caller does not revisit
/// it, even if a later sibling then fails to fit the remainder.
pub(crate) fn resolve_slice_len(ftype: &FeatureType, tail: &[Gene]) -> Option<usize> {
    if !ftype.dynamically_sized() {
        let size = ftype.len();
        if tail.len() < size || !ftype.fits(&tail[..size]) {
            return None;
        }
        return Some(size);
    }

    let upper = ftype.max_size().min(tail.len());
    let lower = ftype.min_size();
    if upper < lower {
        return None;
    }
    (lower..=upper).rev().find(|&cand| ftype.fits(&tail[..cand]))
}
