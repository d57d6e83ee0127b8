pub mod bundle;
pub mod feature_type;
pub mod matrix;
pub mod native;
pub mod options;
pub mod permutation;

pub use bundle::FeatureBundle;
pub use feature_type::{FeatureCapability, FeatureType};
pub use matrix::MatrixType;
pub use native::{FloatType, IntegerType};
pub use options::FeatureOption;
pub use permutation::{
    create_encoder, ExplicitPermutationEncoder, FeaturePermutation, IndexPermutationEncoder,
    PermutationEncoder, PermutationSource, RangePermutationEncoder,
};
