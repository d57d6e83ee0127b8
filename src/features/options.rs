use crate::error::{GenespaceError, Result};
use crate::features::bundle::find_named_in;
use crate::features::feature_type::FeatureType;
use crate::types::{Code, Gene, MappedValue};
use rand::{Rng, RngCore};

/// A choice among alternative sub-feature types.
///
/// Implicit/dynamic encoding: the first slot is the 0-based selector of the
/// chosen alternative, followed by that alternative's code. The encoded
/// length therefore varies with the branch, which makes every option list a
/// dynamically-sized feature unless all alternatives share one size.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureOption {
    alternatives: Vec<FeatureType>,
    min_size: usize,
    max_size: usize,
}

impl FeatureOption {
    pub fn new(alternatives: Vec<FeatureType>) -> Result<Self> {
        if alternatives.is_empty() {
            return Err(GenespaceError::Configuration(
                "an option list needs at least one alternative".to_string(),
            ));
        }
        let min_size = 1 + alternatives.iter().map(|a| a.min_size()).min().unwrap_or(0);
        let max_size = 1 + alternatives.iter().map(|a| a.max_size()).max().unwrap_or(0);
        Ok(Self {
            alternatives,
            min_size,
            max_size,
        })
    }

    pub fn alternatives(&self) -> &[FeatureType] {
        &self.alternatives
    }

    pub fn min_size(&self) -> usize {
        self.min_size
    }

    /// One selector slot plus the widest alternative.
    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// True iff any alternative carries a payload beyond the selector slot.
    pub fn has_wide_alternative(&self) -> bool {
        self.alternatives.iter().any(|a| a.len() > 1)
    }

    pub fn sample_random(&self, rng: &mut dyn RngCore) -> Code {
        let index = rng.gen_range(0..self.alternatives.len());
        let mut code = vec![Gene::Int(index as i64)];
        code.extend(self.alternatives[index].sample_random(rng));
        code
    }

    /// Read the selector; out-of-range or non-integral selectors surface as
    /// `None`, never as an error.
    fn selector(&self, code: &[Gene]) -> Option<usize> {
        let index = code.first()?.as_int()?;
        if index < 0 || index as usize >= self.alternatives.len() {
            return None;
        }
        Some(index as usize)
    }

    /// The selector picks the branch, and the branch must account for the
    /// entire remaining slice: this feature type does not probe candidate
    /// lengths, it trusts the index.
    pub fn fits(&self, code: &[Gene]) -> bool {
        match self.selector(code) {
            Some(index) => self.alternatives[index].fits(&code[1..]),
            None => false,
        }
    }

    /// In-place mutation keeps the selector and mutates the chosen branch.
    ///
    /// Re-drawing the selector would generally change the encoded length,
    /// which a fixed slice cannot express; whole-feature re-sampling happens
    /// at the gene-code level where splicing is possible.
    pub fn mutate_random(&self, code: &mut [Gene], rng: &mut dyn RngCore) -> Result<()> {
        let index = self.selector(code).ok_or_else(|| {
            GenespaceError::Validation(
                "cannot mutate a code whose selector does not address an alternative".to_string(),
            )
        })?;
        self.alternatives[index].mutate_random(&mut code[1..], rng)
    }

    pub fn decode(&self, code: &[Gene]) -> Result<MappedValue> {
        let index = self.selector(code).ok_or_else(|| {
            GenespaceError::Validation(
                "cannot decode a code whose selector does not address an alternative".to_string(),
            )
        })?;
        Ok(MappedValue::Choice {
            index,
            value: Box::new(self.alternatives[index].decode(&code[1..])?),
        })
    }

    /// Descend into the selected branch looking for a named feature.
    pub(crate) fn find_named<'a>(
        &'a self,
        code: &[Gene],
        name: &str,
    ) -> Option<(usize, usize, &'a FeatureType)> {
        let index = self.selector(code)?;
        let (start, len, ftype) = find_named_in(&self.alternatives[index], &code[1..], name)?;
        Some((start + 1, len, ftype))
    }
}
