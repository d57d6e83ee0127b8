//! Composable description language for genetic encoding spaces.
//!
//! A space is assembled from primitive feature types (bounded integers and
//! floats, permutations, matrices) and composites (named bundles, option
//! lists). Every feature type supports random sampling, membership testing
//! (`fits`) and localized mutation; the encoding space adds name/offset
//! bookkeeping and a recursive codec between flat gene vectors and nested
//! named structures, resolving dynamically-sized sub-features as it walks.

pub mod encoding;
pub mod error;
pub mod features;
pub mod population;
pub mod rng;
pub mod types;

pub use encoding::{FeatureKey, GeneCode, GeneticEncoding, SpaceFeature, SpaceSchema};
pub use error::{GenespaceError, Result};
pub use features::{
    FeatureBundle, FeatureCapability, FeatureOption, FeaturePermutation, FeatureType, FloatType,
    IntegerType, MatrixType, PermutationSource,
};
pub use population::{DelayedRandomFitness, FitnessFunction, MemoizedFitness, Population};
pub use types::{Code, Gene, MappedValue, Value};
