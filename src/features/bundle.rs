use crate::error::{GenespaceError, Result};
use crate::features::feature_type::{resolve_slice_len, FeatureType};
use crate::types::{Code, Gene, MappedValue};
use rand::RngCore;
use std::collections::{HashMap, HashSet};

/// A named, ordered composite of child feature types.
///
/// Each child contributes a contiguous slice to the flat layout; the order
/// fixes both iteration and slice positions. Without an explicit order the
/// children iterate lexicographically by name, so
/// `FeatureBundle::new([("y", ..), ("x", ..)])` lays out `x` before `y`.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureBundle {
    names: Vec<String>,
    features: HashMap<String, FeatureType>,
    min_size: usize,
    max_size: usize,
}

impl FeatureBundle {
    /// Build from named children with the default lexicographic order.
    pub fn new<N: Into<String>>(children: Vec<(N, FeatureType)>) -> Result<Self> {
        let mut names: Vec<String> = Vec::with_capacity(children.len());
        let mut features = HashMap::with_capacity(children.len());
        for (name, ftype) in children {
            let name = name.into();
            if features.insert(name.clone(), ftype).is_some() {
                return Err(GenespaceError::DuplicateFeature(name));
            }
            names.push(name);
        }
        names.sort();
        Self::build(names, features)
    }

    /// Build from named children with an explicit order, which must be a
    /// permutation of the child names.
    pub fn with_order<N: Into<String>>(
        children: Vec<(N, FeatureType)>,
        order: Vec<String>,
    ) -> Result<Self> {
        let mut features = HashMap::with_capacity(children.len());
        for (name, ftype) in children {
            let name = name.into();
            if features.insert(name.clone(), ftype).is_some() {
                return Err(GenespaceError::DuplicateFeature(name));
            }
        }
        let given: HashSet<&String> = order.iter().collect();
        if given.len() != order.len() || order.len() != features.len()
            || !order.iter().all(|name| features.contains_key(name))
        {
            return Err(GenespaceError::Configuration(
                "order list does not match up with the feature names".to_string(),
            ));
        }
        Self::build(order, features)
    }

    /// Build from positional children, auto-named by index. Insertion order
    /// is kept as the explicit order.
    pub fn from_list(children: Vec<FeatureType>) -> Result<Self> {
        let mut names = Vec::with_capacity(children.len());
        let mut features = HashMap::with_capacity(children.len());
        for (position, ftype) in children.into_iter().enumerate() {
            let name = position.to_string();
            names.push(name.clone());
            features.insert(name, ftype);
        }
        Self::build(names, features)
    }

    fn build(names: Vec<String>, features: HashMap<String, FeatureType>) -> Result<Self> {
        if names.is_empty() {
            return Err(GenespaceError::Configuration(
                "a feature bundle needs at least one child".to_string(),
            ));
        }
        let min_size = names.iter().map(|n| features[n].min_size()).sum();
        let max_size = names.iter().map(|n| features[n].max_size()).sum();
        Ok(Self {
            names,
            features,
            min_size,
            max_size,
        })
    }

    pub fn order(&self) -> &[String] {
        &self.names
    }

    pub fn get(&self, name: &str) -> Option<&FeatureType> {
        self.features.get(name)
    }

    /// Children in layout order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FeatureType)> {
        self.names
            .iter()
            .map(move |name| (name.as_str(), &self.features[name]))
    }

    pub fn min_size(&self) -> usize {
        self.min_size
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    pub fn sample_random(&self, rng: &mut dyn RngCore) -> Code {
        let mut code = Vec::with_capacity(self.max_size);
        for (_, ftype) in self.iter() {
            code.extend(ftype.sample_random(rng));
        }
        code
    }

    /// Greedy length-first membership test.
    ///
    /// Children consume the code in order. Dynamically-sized children probe
    /// candidate lengths from the largest feasible downward and commit to
    /// the first accepted split; the walk never backtracks, so two adjacent
    /// dynamically-sized children can reject a code a smarter parse would
    /// accept. The whole slice must be consumed.
    pub fn fits(&self, code: &[Gene]) -> bool {
        if code.len() < self.min_size || code.len() > self.max_size {
            return false;
        }
        match self.split(code) {
            Some(splits) => splits.iter().map(|(_, len)| len).sum::<usize>() == code.len(),
            None => false,
        }
    }

    /// Resolve the `(start, len)` slice of every child for a concrete code.
    pub(crate) fn split(&self, code: &[Gene]) -> Option<Vec<(usize, usize)>> {
        let mut splits = Vec::with_capacity(self.names.len());
        let mut offset = 0;
        for (_, ftype) in self.iter() {
            let consumed = resolve_slice_len(ftype, &code[offset..])?;
            splits.push((offset, consumed));
            offset += consumed;
        }
        Some(splits)
    }

    /// Mutate every child slice in place, re-deriving the same split as
    /// sampling would produce.
    pub fn mutate_random(&self, code: &mut [Gene], rng: &mut dyn RngCore) -> Result<()> {
        if code.len() < self.min_size || code.len() > self.max_size {
            return Err(GenespaceError::Shape {
                expected: self.max_size,
                actual: code.len(),
            });
        }
        let splits = self.split(code).ok_or_else(|| {
            GenespaceError::Validation("cannot mutate a code that does not fit this bundle".to_string())
        })?;
        for ((start, len), (_, ftype)) in splits.into_iter().zip(self.iter()) {
            ftype.mutate_random(&mut code[start..start + len], rng)?;
        }
        Ok(())
    }

    /// Decode a concrete slice into named children, preserving layout order.
    pub fn decode(&self, code: &[Gene]) -> Result<MappedValue> {
        let splits = self.split(code).ok_or_else(|| {
            GenespaceError::Validation("cannot decode a code that does not fit this bundle".to_string())
        })?;
        let mut children = Vec::with_capacity(self.names.len());
        for ((start, len), (name, ftype)) in splits.into_iter().zip(self.iter()) {
            children.push((name.to_string(), ftype.decode(&code[start..start + len])?));
        }
        Ok(MappedValue::Bundle(children))
    }

    /// Locate a named feature at any nesting depth within a concrete code.
    ///
    /// Returns the absolute `(start, len)` span relative to `code` and the
    /// feature type at that node. Depth-first in layout order; the first
    /// match wins.
    pub(crate) fn find_named<'a>(
        &'a self,
        code: &[Gene],
        name: &str,
    ) -> Option<(usize, usize, &'a FeatureType)> {
        let splits = self.split(code)?;
        for ((start, len), (child_name, ftype)) in splits.into_iter().zip(self.iter()) {
            if child_name == name {
                return Some((start, len, ftype));
            }
            if let Some((inner_start, inner_len, inner)) =
                find_named_in(ftype, &code[start..start + len], name)
            {
                return Some((start + inner_start, inner_len, inner));
            }
        }
        None
    }
}

/// Descend into composites looking for a named feature.
pub(crate) fn find_named_in<'a>(
    ftype: &'a FeatureType,
    code: &[Gene],
    name: &str,
) -> Option<(usize, usize, &'a FeatureType)> {
    match ftype {
        FeatureType::Bundle(bundle) => bundle.find_named(code, name),
        FeatureType::Options(options) => options.find_named(code, name),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::native::{FloatType, IntegerType};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn natint() -> FeatureType {
        IntegerType::new(1, 5000).unwrap().into()
    }

    fn unitfloat() -> FeatureType {
        FloatType::new(0.0, 1.0).unwrap().into()
    }

    #[test]
    fn test_default_order_is_lexicographic() {
        let bundle = FeatureBundle::new(vec![("y", natint()), ("x", unitfloat())]).unwrap();
        assert_eq!(bundle.order(), ["x", "y"]);
    }

    #[test]
    fn test_explicit_order_overrides() {
        let bundle = FeatureBundle::with_order(
            vec![("y", natint()), ("x", unitfloat())],
            vec!["y".to_string(), "x".to_string()],
        )
        .unwrap();
        assert_eq!(bundle.order(), ["y", "x"]);
    }

    #[test]
    fn test_mismatched_order_fails() {
        let result = FeatureBundle::with_order(
            vec![("a", natint())],
            vec!["a".to_string(), "b".to_string()],
        );
        assert!(matches!(result, Err(GenespaceError::Configuration(_))));
    }

    #[test]
    fn test_duplicate_name_fails() {
        let result = FeatureBundle::new(vec![("a", natint()), ("a", unitfloat())]);
        assert!(matches!(result, Err(GenespaceError::DuplicateFeature(_))));
    }

    #[test]
    fn test_greedy_split_consumes_whole_code() {
        let bundle = FeatureBundle::new(vec![("a", natint()), ("b", unitfloat())]).unwrap();
        assert!(bundle.fits(&[Gene::Int(5), Gene::Float(0.8)]));
        // Trailing slack is a mismatch, not a partial fit.
        assert!(!bundle.fits(&[Gene::Int(5), Gene::Float(0.8), Gene::Int(1)]));
    }

    #[test]
    fn test_split_positions() {
        let bundle = FeatureBundle::new(vec![("a", natint()), ("b", unitfloat())]).unwrap();
        let code = [Gene::Int(5), Gene::Float(0.8)];
        let splits = bundle.split(&code).unwrap();
        assert_eq!(splits, vec![(0, 1), (1, 1)]);
    }

    #[test]
    fn test_sample_matches_declared_length() {
        let mut rng = StdRng::seed_from_u64(11);
        let bundle =
            FeatureBundle::new(vec![("a", natint()), ("b", unitfloat()), ("c", natint())])
                .unwrap();
        let code = bundle.sample_random(&mut rng);
        assert_eq!(code.len(), bundle.max_size());
        assert!(bundle.fits(&code));
    }
}
