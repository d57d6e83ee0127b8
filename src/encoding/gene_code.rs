use crate::encoding::space::GeneticEncoding;
use crate::error::{GenespaceError, Result};
use crate::types::{Code, Gene, MappedValue};
use rand::RngCore;
use std::sync::Arc;

/// Key into a gene code: a position in the top-level feature list, or a
/// feature name at any nesting depth.
#[derive(Debug, Clone, Copy)]
pub enum FeatureKey<'a> {
    Position(usize),
    Name(&'a str),
}

impl From<usize> for FeatureKey<'_> {
    fn from(position: usize) -> Self {
        FeatureKey::Position(position)
    }
}

impl<'a> From<&'a str> for FeatureKey<'a> {
    fn from(name: &'a str) -> Self {
        FeatureKey::Name(name)
    }
}

/// A flat gene vector bound to its encoding space.
///
/// Construction validates membership, so an invalid gene code never exists.
/// Sub-slice boundaries are re-derived from the space on every access; for
/// dynamically-sized spaces they are not stable across mutations.
#[derive(Debug, Clone)]
pub struct GeneCode {
    genes: Code,
    space: Arc<GeneticEncoding>,
}

impl GeneCode {
    /// Bind a raw vector to a space. Fails with a validation error naming
    /// the offending feature if the vector is not a member of the space.
    pub fn new(genes: Code, space: Arc<GeneticEncoding>) -> Result<Self> {
        space.validate(&genes)?;
        Ok(Self { genes, space })
    }

    /// Sample a fresh member of `space`.
    pub fn sample_random(space: &Arc<GeneticEncoding>) -> Self {
        crate::rng::with_global(|rng| Self::sample_random_with(space, rng))
    }

    pub fn sample_random_with(space: &Arc<GeneticEncoding>, rng: &mut dyn RngCore) -> Self {
        Self {
            genes: space.sample_code_with(rng),
            space: Arc::clone(space),
        }
    }

    pub fn genes(&self) -> &[Gene] {
        &self.genes
    }

    pub fn space(&self) -> &Arc<GeneticEncoding> {
        &self.space
    }

    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    /// Stable content key for deduplication and fitness memoization.
    pub fn canonical_key(&self) -> String {
        serde_json::to_string(&self.genes).unwrap_or_else(|_| String::new())
    }

    /// The raw slice of the addressed feature, resolved against the current
    /// vector.
    pub fn feature_slice<'a, K: Into<FeatureKey<'a>>>(&self, key: K) -> Result<&[Gene]> {
        let (start, len) = match key.into() {
            FeatureKey::Position(position) => self.space.feature_span(&self.genes, position)?,
            FeatureKey::Name(name) => {
                let (start, len, _) = self.space.named_span(&self.genes, name)?;
                (start, len)
            }
        };
        Ok(&self.genes[start..start + len])
    }

    /// The decoded value of the addressed feature.
    pub fn feature<'a, K: Into<FeatureKey<'a>>>(&self, key: K) -> Result<MappedValue> {
        match key.into() {
            FeatureKey::Position(position) => {
                let (start, len) = self.space.feature_span(&self.genes, position)?;
                let feature = self
                    .space
                    .feature_at(position)
                    .ok_or_else(|| GenespaceError::Lookup(position.to_string()))?;
                feature.feature_type().decode(&self.genes[start..start + len])
            }
            FeatureKey::Name(name) => {
                let (start, len, ftype) = self.space.named_span(&self.genes, name)?;
                ftype.decode(&self.genes[start..start + len])
            }
        }
    }

    /// Decode the whole vector into its nested named structure.
    pub fn map(&self) -> Result<MappedValue> {
        self.space.map(&self.genes)
    }

    /// Mutate in place using the process-wide RNG.
    pub fn mutate_random(&mut self) -> Result<()> {
        crate::rng::with_global(|rng| self.mutate_random_with(rng))
    }

    /// Walk the space's top-level features and mutate each slice.
    ///
    /// Fixed-size features mutate in place via their own mutation rule.
    /// Dynamically-sized features are re-sampled whole and spliced in, which
    /// may change the vector length. Offsets of later features shift
    /// accordingly, so callers must not cache slice boundaries across
    /// mutations.
    pub fn mutate_random_with(&mut self, rng: &mut dyn RngCore) -> Result<()> {
        let mut offset = 0;
        for position in 0..self.space.feature_count() {
            let feature = self
                .space
                .feature_at(position)
                .ok_or_else(|| GenespaceError::Lookup(position.to_string()))?
                .clone();
            let (start, len) = self.space.feature_span(&self.genes, position)?;
            debug_assert_eq!(start, offset);

            if feature.feature_type().dynamically_sized() {
                let fresh = feature.feature_type().sample_random(rng);
                let fresh_len = fresh.len();
                self.genes.splice(start..start + len, fresh);
                offset = start + fresh_len;
            } else {
                feature
                    .feature_type()
                    .mutate_random(&mut self.genes[start..start + len], rng)?;
                offset = start + len;
            }
        }
        debug_assert!(self.space.fits(&self.genes));
        Ok(())
    }
}

impl PartialEq for GeneCode {
    fn eq(&self, other: &Self) -> bool {
        self.genes == other.genes && self.space == other.space
    }
}
