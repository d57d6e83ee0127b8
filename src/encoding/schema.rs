use crate::encoding::space::GeneticEncoding;
use crate::error::{GenespaceError, Result};
use crate::features::{
    FeatureBundle, FeatureOption, FeaturePermutation, FeatureType, FloatType, IntegerType,
    MatrixType,
};
use crate::types::Value;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Declarative description of one feature type.
///
/// The tag makes every node unambiguous; malformed or ambiguous input is
/// rejected at parse/build time with a configuration error rather than
/// guessed at.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FeatureSchema {
    Int {
        lower: i64,
        upper: i64,
    },
    Float {
        lower: f64,
        upper: f64,
    },
    Bundle {
        features: Vec<FeatureEntry>,
        #[serde(default)]
        order: Option<Vec<String>>,
    },
    Options {
        alternatives: Vec<FeatureSchema>,
    },
    Permutation {
        #[serde(default)]
        labels: Option<Vec<Value>>,
        #[serde(default)]
        range: Option<String>,
        /// Use the single-index scheme for labels; range permutations are
        /// always indexed.
        #[serde(default)]
        indexed: bool,
    },
    Matrix {
        rows: usize,
        cols: usize,
        lower: f64,
        upper: f64,
    },
}

/// A named feature inside a bundle or space description.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureEntry {
    pub name: String,
    #[serde(flatten)]
    pub feature: FeatureSchema,
}

/// Declarative description of a whole encoding space, loadable from TOML or
/// JSON. Features keep their listed order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpaceSchema {
    pub name: String,
    pub version: String,
    pub features: Vec<FeatureEntry>,
}

impl FeatureSchema {
    /// Resolve this description into a concrete feature type.
    pub fn build(&self) -> Result<FeatureType> {
        match self {
            FeatureSchema::Int { lower, upper } => Ok(IntegerType::new(*lower, *upper)?.into()),
            FeatureSchema::Float { lower, upper } => Ok(FloatType::new(*lower, *upper)?.into()),
            FeatureSchema::Bundle { features, order } => {
                let children: Vec<(String, FeatureType)> = features
                    .iter()
                    .map(|entry| Ok((entry.name.clone(), entry.feature.build()?)))
                    .collect::<Result<_>>()?;
                let bundle = match order {
                    Some(order) => FeatureBundle::with_order(children, order.clone())?,
                    None => FeatureBundle::new(children)?,
                };
                Ok(bundle.into())
            }
            FeatureSchema::Options { alternatives } => {
                let alternatives: Vec<FeatureType> = alternatives
                    .iter()
                    .map(FeatureSchema::build)
                    .collect::<Result<_>>()?;
                Ok(FeatureOption::new(alternatives)?.into())
            }
            FeatureSchema::Permutation {
                labels,
                range,
                indexed,
            } => {
                let permutation = match (labels, range) {
                    (Some(labels), None) if *indexed => {
                        FeaturePermutation::indexed(labels.clone())?
                    }
                    (Some(labels), None) => FeaturePermutation::explicit(labels.clone())?,
                    (None, Some(range)) => FeaturePermutation::parse(range)?,
                    _ => {
                        return Err(GenespaceError::Configuration(
                            "a permutation needs exactly one of 'labels' or 'range'".to_string(),
                        ))
                    }
                };
                Ok(permutation.into())
            }
            FeatureSchema::Matrix {
                rows,
                cols,
                lower,
                upper,
            } => Ok(MatrixType::new(*rows, *cols, *lower, *upper)?.into()),
        }
    }
}

impl SpaceSchema {
    /// Build the described encoding space, parsing the whole schema once.
    pub fn build(&self) -> Result<GeneticEncoding> {
        let mut space = GeneticEncoding::new(&self.name, &self.version)?;
        for entry in &self.features {
            space.add_feature(&entry.name, entry.feature.build()?)?;
        }
        log::debug!(
            "built encoding space '{}' v{} with {} features",
            self.name,
            self.version,
            self.features.len()
        );
        Ok(space)
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    pub fn from_json(contents: &str) -> Result<Self> {
        Ok(serde_json::from_str(contents)?)
    }

    /// Load a space description from a `.toml` or `.json` file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<GeneticEncoding> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let schema = match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml(&contents)?,
            Some("json") => Self::from_json(&contents)?,
            other => {
                return Err(GenespaceError::Configuration(format!(
                    "unsupported space description format: {:?}",
                    other
                )))
            }
        };
        schema.build()
    }
}
