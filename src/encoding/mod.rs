pub mod gene_code;
pub mod schema;
pub mod space;

pub use gene_code::{FeatureKey, GeneCode};
pub use schema::{FeatureEntry, FeatureSchema, SpaceSchema};
pub use space::{GeneticEncoding, SpaceFeature};
