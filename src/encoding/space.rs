use crate::error::{GenespaceError, Result};
use crate::features::bundle::find_named_in;
use crate::features::feature_type::{resolve_slice_len, FeatureType};
use crate::types::{Code, Gene, MappedValue};
use rand::RngCore;
use std::collections::HashMap;

/// One top-level entry of an encoding space.
#[derive(Debug, Clone, PartialEq)]
pub struct SpaceFeature {
    name: String,
    ftype: FeatureType,
    /// Nominal start of this feature's slice, assuming every predecessor
    /// occupies its maximal size. Concrete vectors with dynamically-sized
    /// predecessors are re-resolved by fit-probing instead.
    offset: usize,
    /// True iff a selector slot is followed by a payload wider than one
    /// slot. Precomputed at add time; see `add_feature_with_selector` for
    /// the explicit override.
    one_hot: bool,
}

impl SpaceFeature {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn feature_type(&self) -> &FeatureType {
        &self.ftype
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn one_hot(&self) -> bool {
        self.one_hot
    }
}

/// Description of a genetic encoding space: a named, versioned, append-only
/// ordered collection of top-level feature types.
///
/// The order of `add_feature` calls permanently fixes the flat vector
/// layout; features cannot be removed or reordered.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneticEncoding {
    name: String,
    version: semver::Version,
    features: Vec<SpaceFeature>,
    positions: HashMap<String, usize>,
}

impl GeneticEncoding {
    pub fn new(name: &str, version: &str) -> Result<Self> {
        let version = semver::Version::parse(version).map_err(|e| {
            GenespaceError::Configuration(format!(
                "invalid semantic version '{}' for encoding space: {}",
                version, e
            ))
        })?;
        Ok(Self {
            name: name.to_string(),
            version,
            features: Vec::new(),
            positions: HashMap::new(),
        })
    }

    /// Build a space and add the given features in one go.
    pub fn with_features(
        name: &str,
        version: &str,
        features: Vec<(&str, FeatureType)>,
    ) -> Result<Self> {
        let mut space = Self::new(name, version)?;
        for (feature_name, ftype) in features {
            space.add_feature(feature_name, ftype)?;
        }
        Ok(space)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &semver::Version {
        &self.version
    }

    /// Append a feature, inferring the selector flag: an option list whose
    /// alternatives carry payload beyond the selector slot is marked
    /// one-hot.
    pub fn add_feature(&mut self, name: &str, ftype: impl Into<FeatureType>) -> Result<()> {
        let ftype = ftype.into();
        let one_hot = match &ftype {
            FeatureType::Options(options) => options.has_wide_alternative(),
            _ => false,
        };
        self.push_feature(name, ftype, one_hot)
    }

    /// Append a feature with an explicit selector flag instead of the
    /// inferred heuristic.
    pub fn add_feature_with_selector(
        &mut self,
        name: &str,
        ftype: impl Into<FeatureType>,
        one_hot: bool,
    ) -> Result<()> {
        self.push_feature(name, ftype.into(), one_hot)
    }

    fn push_feature(&mut self, name: &str, ftype: FeatureType, one_hot: bool) -> Result<()> {
        if self.positions.contains_key(name) {
            return Err(GenespaceError::DuplicateFeature(name.to_string()));
        }
        let offset = self
            .features
            .last()
            .map(|prev| prev.offset + prev.ftype.len())
            .unwrap_or(0);
        log::debug!(
            "space '{}': feature '{}' at offset {} ({} slots)",
            self.name,
            name,
            offset,
            ftype.len()
        );
        self.positions.insert(name.to_string(), self.features.len());
        self.features.push(SpaceFeature {
            name: name.to_string(),
            ftype,
            offset,
            one_hot,
        });
        Ok(())
    }

    pub fn has_feature(&self, name: &str) -> bool {
        self.positions.contains_key(name)
    }

    pub fn feature(&self, name: &str) -> Option<&SpaceFeature> {
        self.positions.get(name).map(|&pos| &self.features[pos])
    }

    pub fn feature_at(&self, position: usize) -> Option<&SpaceFeature> {
        self.features.get(position)
    }

    pub fn features(&self) -> &[SpaceFeature] {
        &self.features
    }

    pub fn feature_count(&self) -> usize {
        self.features.len()
    }

    /// Total encoded dimensionality at maximal sizes.
    pub fn len(&self) -> usize {
        self.features.iter().map(|f| f.ftype.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn min_size(&self) -> usize {
        self.features.iter().map(|f| f.ftype.min_size()).sum()
    }

    pub fn dynamically_sized(&self) -> bool {
        self.min_size() != self.len()
    }

    /// Sample a flat code by concatenating every feature's sample in layout
    /// order. See `GeneCode::sample_random` for the bound variant.
    pub fn sample_code_with(&self, rng: &mut dyn RngCore) -> Code {
        let mut code = Vec::with_capacity(self.len());
        for feature in &self.features {
            code.extend(feature.ftype.sample_random(rng));
        }
        code
    }

    /// Sample using the process-wide RNG.
    pub fn sample_code(&self) -> Code {
        crate::rng::with_global(|rng| self.sample_code_with(rng))
    }

    /// Membership test over a raw vector. Data problems surface as `false`.
    pub fn fits(&self, code: &[Gene]) -> bool {
        self.validate(code).is_ok()
    }

    /// Membership test that transparently unwraps a bound gene code.
    pub fn contains(&self, code: &crate::encoding::GeneCode) -> bool {
        self.fits(code.genes())
    }

    /// Error-reporting twin of `fits`: names the offending feature and the
    /// expected vs. actual dimensions.
    pub fn validate(&self, code: &[Gene]) -> Result<()> {
        let (min, max) = (self.min_size(), self.len());
        if code.len() < min || code.len() > max {
            return Err(GenespaceError::Validation(format!(
                "code length {} outside [{}, {}] for space '{}'",
                code.len(),
                min,
                max,
                self.name
            )));
        }
        let mut offset = 0;
        for feature in &self.features {
            match resolve_slice_len(&feature.ftype, &code[offset..]) {
                Some(consumed) => offset += consumed,
                None => {
                    return Err(GenespaceError::Validation(format!(
                        "feature '{}' of space '{}' does not fit at offset {}: expected {}..={} dimensions, {} remaining",
                        feature.name,
                        self.name,
                        offset,
                        feature.ftype.min_size(),
                        feature.ftype.len(),
                        code.len() - offset
                    )))
                }
            }
        }
        if offset != code.len() {
            return Err(GenespaceError::Validation(format!(
                "{} trailing dimensions after the last feature of space '{}'",
                code.len() - offset,
                self.name
            )));
        }
        Ok(())
    }

    /// Resolve the concrete `(start, len)` slice of every top-level feature
    /// for this vector, fit-probing dynamically-sized features.
    pub(crate) fn split(&self, code: &[Gene]) -> Result<Vec<(usize, usize)>> {
        let mut splits = Vec::with_capacity(self.features.len());
        let mut offset = 0;
        for feature in &self.features {
            let consumed =
                resolve_slice_len(&feature.ftype, &code[offset..]).ok_or_else(|| {
                    GenespaceError::Validation(format!(
                        "feature '{}' does not fit at offset {}",
                        feature.name, offset
                    ))
                })?;
            splits.push((offset, consumed));
            offset += consumed;
        }
        Ok(splits)
    }

    /// The concrete slice of the feature at `position` within this vector.
    pub fn feature_span(&self, code: &[Gene], position: usize) -> Result<(usize, usize)> {
        if position >= self.features.len() {
            return Err(GenespaceError::Lookup(format!(
                "position {} exceeds the {} features of space '{}'",
                position,
                self.features.len(),
                self.name
            )));
        }
        Ok(self.split(code)?[position])
    }

    /// Locate a named feature at any nesting depth, returning its concrete
    /// span and type.
    pub fn named_span<'a>(
        &'a self,
        code: &[Gene],
        name: &str,
    ) -> Result<(usize, usize, &'a FeatureType)> {
        let splits = self.split(code)?;
        for ((start, len), feature) in splits.into_iter().zip(&self.features) {
            if feature.name == name {
                return Ok((start, len, &feature.ftype));
            }
            if let Some((inner_start, inner_len, inner)) =
                find_named_in(&feature.ftype, &code[start..start + len], name)
            {
                return Ok((start + inner_start, inner_len, inner));
            }
        }
        Err(GenespaceError::Lookup(format!(
            "unknown feature '{}' in space '{}'",
            name, self.name
        )))
    }

    /// Decode a flat code into the nested named structure it describes,
    /// consuming selector slots at option features and expanding
    /// permutations into item sequences.
    pub fn map(&self, code: &[Gene]) -> Result<MappedValue> {
        self.validate(code)?;
        let splits = self.split(code)?;
        let mut children = Vec::with_capacity(self.features.len());
        for ((start, len), feature) in splits.into_iter().zip(&self.features) {
            children.push((
                feature.name.clone(),
                feature.ftype.decode(&code[start..start + len])?,
            ));
        }
        Ok(MappedValue::Bundle(children))
    }
}
