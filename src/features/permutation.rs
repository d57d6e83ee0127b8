use crate::error::{GenespaceError, Result};
use crate::features::native::{extract_single, IntegerType};
use crate::types::{Code, Gene, Value};
use rand::seq::SliceRandom;
use rand::{Rng, RngCore};
use std::fmt::Debug;
use std::sync::Arc;

/// Widest base sequence an indexed encoder can address: 21! overflows the
/// `i64` a `Gene` carries.
const MAX_INDEXED_ITEMS: usize = 20;

fn factorial(n: usize) -> i64 {
    (1..=n as i64).product()
}

/// The permutation at `index` in the lexicographic enumeration of all
/// permutations of `items`, via factorial-number-system decomposition.
/// Agrees with exhaustive enumeration for the same index.
fn nth_permutation(items: &[Value], index: i64) -> Vec<Value> {
    let mut pool = items.to_vec();
    let mut remainder = index;
    let mut permutation = Vec::with_capacity(pool.len());
    for position in (0..pool.len()).rev() {
        let block = factorial(position);
        let choice = (remainder / block) as usize;
        remainder %= block;
        permutation.push(pool.remove(choice));
    }
    permutation
}

/// Strategy family translating an abstract permutation into a code.
///
/// `encoded_length` is the number of vector slots a code occupies;
/// `decoded_length` is the number of items being permuted. The two only
/// coincide for the explicit scheme.
pub trait PermutationEncoder: Debug + Send + Sync {
    fn describe(&self) -> &'static str;

    fn version(&self) -> u32 {
        1
    }

    /// The base sequence in its canonical (unpermuted) order.
    fn items(&self) -> &[Value];

    fn encoded_length(&self) -> usize;

    fn decoded_length(&self) -> usize;

    fn sample_random(&self, rng: &mut dyn RngCore) -> Code;

    fn mutate_random(&self, code: &mut [Gene], rng: &mut dyn RngCore) -> Result<()>;

    fn fits(&self, code: &[Gene]) -> bool;

    /// Deterministically decode a code into the permuted item sequence.
    fn decode(&self, code: &[Gene]) -> Result<Vec<Value>>;
}

/// The code is the reordering itself, stored as a permutation of the
/// 0-based item indices; one slot per item.
#[derive(Debug, Clone, PartialEq)]
pub struct ExplicitPermutationEncoder {
    items: Vec<Value>,
}

impl ExplicitPermutationEncoder {
    pub fn new(items: Vec<Value>) -> Result<Self> {
        if items.is_empty() {
            return Err(GenespaceError::Configuration(
                "a permutation needs at least one item".to_string(),
            ));
        }
        Ok(Self { items })
    }

    fn indices(&self, code: &[Gene]) -> Option<Vec<usize>> {
        if code.len() != self.items.len() {
            return None;
        }
        let mut seen = vec![false; self.items.len()];
        let mut indices = Vec::with_capacity(code.len());
        for gene in code {
            let index = gene.as_int()?;
            if index < 0 || index as usize >= self.items.len() || seen[index as usize] {
                return None;
            }
            seen[index as usize] = true;
            indices.push(index as usize);
        }
        Some(indices)
    }
}

impl PermutationEncoder for ExplicitPermutationEncoder {
    fn describe(&self) -> &'static str {
        "ExplicitPermutationEncoder"
    }

    fn items(&self) -> &[Value] {
        &self.items
    }

    fn encoded_length(&self) -> usize {
        self.items.len()
    }

    fn decoded_length(&self) -> usize {
        self.items.len()
    }

    /// Fisher-Yates shuffle over the item indices.
    fn sample_random(&self, rng: &mut dyn RngCore) -> Code {
        let mut indices: Vec<usize> = (0..self.items.len()).collect();
        indices.shuffle(rng);
        indices.into_iter().map(|i| Gene::Int(i as i64)).collect()
    }

    /// Swap two random positions; a single-item permutation has nothing to
    /// move.
    fn mutate_random(&self, code: &mut [Gene], rng: &mut dyn RngCore) -> Result<()> {
        if code.len() != self.items.len() {
            return Err(GenespaceError::Shape {
                expected: self.items.len(),
                actual: code.len(),
            });
        }
        if code.len() < 2 {
            return Ok(());
        }
        let first = rng.gen_range(0..code.len());
        let mut second = rng.gen_range(0..code.len());
        while second == first {
            second = rng.gen_range(0..code.len());
        }
        code.swap(first, second);
        Ok(())
    }

    fn fits(&self, code: &[Gene]) -> bool {
        self.indices(code).is_some()
    }

    fn decode(&self, code: &[Gene]) -> Result<Vec<Value>> {
        let indices = self.indices(code).ok_or_else(|| {
            GenespaceError::Validation(
                "code is not a permutation of the item indices".to_string(),
            )
        })?;
        Ok(indices.into_iter().map(|i| self.items[i].clone()).collect())
    }
}

/// The code is a single integer in `[0, n!-1]`, the index of the
/// permutation in the canonical lexicographic enumeration.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexPermutationEncoder {
    items: Vec<Value>,
    index_type: IntegerType,
    cardinality: i64,
}

impl IndexPermutationEncoder {
    pub fn new(items: Vec<Value>) -> Result<Self> {
        if items.is_empty() {
            return Err(GenespaceError::Configuration(
                "a permutation needs at least one item".to_string(),
            ));
        }
        if items.len() > MAX_INDEXED_ITEMS {
            return Err(GenespaceError::Configuration(format!(
                "indexed permutations support at most {} items, got {}",
                MAX_INDEXED_ITEMS,
                items.len()
            )));
        }
        let cardinality = factorial(items.len());
        let index_type = IntegerType::new(0, cardinality - 1)?;
        Ok(Self {
            items,
            index_type,
            cardinality,
        })
    }

    pub fn cardinality(&self) -> i64 {
        self.cardinality
    }
}

impl PermutationEncoder for IndexPermutationEncoder {
    fn describe(&self) -> &'static str {
        "IndexPermutationEncoder"
    }

    fn items(&self) -> &[Value] {
        &self.items
    }

    fn encoded_length(&self) -> usize {
        1
    }

    fn decoded_length(&self) -> usize {
        self.items.len()
    }

    fn sample_random(&self, rng: &mut dyn RngCore) -> Code {
        self.index_type.sample_random(rng)
    }

    /// Bounded perturbation of the index, same rule as an integer leaf over
    /// `[0, n!-1]`.
    fn mutate_random(&self, code: &mut [Gene], rng: &mut dyn RngCore) -> Result<()> {
        self.index_type.mutate_random(code, rng)
    }

    fn fits(&self, code: &[Gene]) -> bool {
        self.index_type.fits(code)
    }

    fn decode(&self, code: &[Gene]) -> Result<Vec<Value>> {
        let index = extract_single(code)
            .and_then(|gene| gene.as_int())
            .filter(|&index| 0 <= index && index < self.cardinality)
            .ok_or_else(|| {
                GenespaceError::Validation(format!(
                    "permutation index must be a single integer in [0, {})",
                    self.cardinality
                ))
            })?;
        Ok(nth_permutation(&self.items, index))
    }
}

/// Indexed encoder over an inclusive integer range described as
/// `"start:end"`.
#[derive(Debug, Clone, PartialEq)]
pub struct RangePermutationEncoder {
    start: i64,
    end: i64,
    inner: IndexPermutationEncoder,
}

impl RangePermutationEncoder {
    pub fn new(start: i64, end: i64) -> Result<Self> {
        if start > end {
            return Err(GenespaceError::Configuration(format!(
                "permutation range reversed: {}:{}",
                start, end
            )));
        }
        let items = (start..=end).map(Value::Integer).collect();
        Ok(Self {
            start,
            end,
            inner: IndexPermutationEncoder::new(items)?,
        })
    }

    /// Parse a colon-delimited inclusive range such as `"1:8"`.
    pub fn parse(description: &str) -> Result<Self> {
        let parts: Vec<&str> = description.split(':').collect();
        let [start, end] = parts.as_slice() else {
            return Err(GenespaceError::Configuration(format!(
                "expected a start:end range, got '{}'",
                description
            )));
        };
        let parse = |s: &str| {
            s.trim().parse::<i64>().map_err(|_| {
                GenespaceError::Configuration(format!("'{}' is not an integer bound", s))
            })
        };
        Self::new(parse(start)?, parse(end)?)
    }
}

impl PermutationEncoder for RangePermutationEncoder {
    fn describe(&self) -> &'static str {
        "RangePermutationEncoder"
    }

    fn items(&self) -> &[Value] {
        self.inner.items()
    }

    fn encoded_length(&self) -> usize {
        self.inner.encoded_length()
    }

    fn decoded_length(&self) -> usize {
        self.inner.decoded_length()
    }

    fn sample_random(&self, rng: &mut dyn RngCore) -> Code {
        self.inner.sample_random(rng)
    }

    fn mutate_random(&self, code: &mut [Gene], rng: &mut dyn RngCore) -> Result<()> {
        self.inner.mutate_random(code, rng)
    }

    fn fits(&self, code: &[Gene]) -> bool {
        self.inner.fits(code)
    }

    fn decode(&self, code: &[Gene]) -> Result<Vec<Value>> {
        self.inner.decode(code)
    }
}

/// What a permutation feature is built from.
pub enum PermutationSource {
    /// Explicit ordered labels, e.g. A, B, C, D.
    Labels(Vec<Value>),
    /// A colon-delimited numeric range string, e.g. `"1:8"`.
    Description(String),
}

/// Resolve an encoder from a description; labels get the explicit scheme,
/// range strings the indexed range scheme.
pub fn create_encoder(source: PermutationSource) -> Result<Arc<dyn PermutationEncoder>> {
    match source {
        PermutationSource::Labels(labels) => {
            Ok(Arc::new(ExplicitPermutationEncoder::new(labels)?))
        }
        PermutationSource::Description(text) if text.contains(':') => {
            Ok(Arc::new(RangePermutationEncoder::parse(&text)?))
        }
        PermutationSource::Description(text) => Err(GenespaceError::Configuration(format!(
            "could not find an appropriate encoder for permutation '{}'",
            text
        ))),
    }
}

/// Feature type encoding an ordering over labeled items.
#[derive(Debug, Clone)]
pub struct FeaturePermutation {
    encoder: Arc<dyn PermutationEncoder>,
}

impl FeaturePermutation {
    pub fn new(source: PermutationSource) -> Result<Self> {
        Ok(Self {
            encoder: create_encoder(source)?,
        })
    }

    /// Explicit scheme over the given labels; one slot per item.
    pub fn explicit(labels: Vec<Value>) -> Result<Self> {
        Ok(Self {
            encoder: Arc::new(ExplicitPermutationEncoder::new(labels)?),
        })
    }

    /// Indexed scheme over the given labels; a single index slot.
    pub fn indexed(labels: Vec<Value>) -> Result<Self> {
        Ok(Self {
            encoder: Arc::new(IndexPermutationEncoder::new(labels)?),
        })
    }

    /// Indexed scheme over an inclusive `"start:end"` range.
    pub fn parse(description: &str) -> Result<Self> {
        Ok(Self {
            encoder: Arc::new(RangePermutationEncoder::parse(description)?),
        })
    }

    pub fn with_encoder(encoder: Arc<dyn PermutationEncoder>) -> Self {
        Self { encoder }
    }

    pub fn encoder(&self) -> &Arc<dyn PermutationEncoder> {
        &self.encoder
    }

    pub fn encoded_length(&self) -> usize {
        self.encoder.encoded_length()
    }

    pub fn decoded_length(&self) -> usize {
        self.encoder.decoded_length()
    }

    pub fn sample_random(&self, rng: &mut dyn RngCore) -> Code {
        self.encoder.sample_random(rng)
    }

    pub fn mutate_random(&self, code: &mut [Gene], rng: &mut dyn RngCore) -> Result<()> {
        self.encoder.mutate_random(code, rng)
    }

    pub fn fits(&self, code: &[Gene]) -> bool {
        self.encoder.fits(code)
    }

    pub fn decode(&self, code: &[Gene]) -> Result<Vec<Value>> {
        self.encoder.decode(code)
    }
}

impl PartialEq for FeaturePermutation {
    fn eq(&self, other: &Self) -> bool {
        self.encoder.describe() == other.encoder.describe()
            && self.encoder.encoded_length() == other.encoder.encoded_length()
            && self.encoder.items() == other.encoder.items()
    }
}
