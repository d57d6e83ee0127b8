use serde::{Deserialize, Serialize};

/// One slot of a flat gene vector.
///
/// The variant carries the numeric kind: an `IntegerType` only accepts
/// `Gene::Int`, so `Gene::Float(2.0)` is rejected even though the value is
/// integral. `FloatType` accepts either variant and compares as `f64`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Gene {
    Int(i64),
    Float(f64),
}

impl Gene {
    pub fn as_f64(&self) -> f64 {
        match self {
            Gene::Int(v) => *v as f64,
            Gene::Float(v) => *v,
        }
    }

    /// The integer payload, or `None` for a float slot.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Gene::Int(v) => Some(*v),
            Gene::Float(_) => None,
        }
    }
}

impl From<i64> for Gene {
    fn from(v: i64) -> Self {
        Gene::Int(v)
    }
}

impl From<f64> for Gene {
    fn from(v: f64) -> Self {
        Gene::Float(v)
    }
}

/// A flat gene vector, the raw exchanged representation of one candidate.
pub type Code = Vec<Gene>;

/// Phenotype-side scalar, e.g. a decoded permutation item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Integer(i64),
    Float(f64),
    String(String),
    Bool(bool),
}

/// Decoded, named view of a flat code produced by `GeneticEncoding::map`.
///
/// Bundles keep their declared feature order, which is why children are
/// `(name, value)` pairs rather than a map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum MappedValue {
    Scalar(Gene),
    /// An option feature: which alternative was selected, and its decoded code.
    Choice {
        index: usize,
        value: Box<MappedValue>,
    },
    Bundle(Vec<(String, MappedValue)>),
    /// A decoded permutation, in permuted order.
    Items(Vec<Value>),
    Matrix(Vec<Vec<Gene>>),
    /// Opaque slice owned by an adapter-supplied feature type.
    Raw(Code),
}

impl MappedValue {
    /// Convenience accessor for the scalar payload, if this is a leaf.
    pub fn as_scalar(&self) -> Option<Gene> {
        match self {
            MappedValue::Scalar(g) => Some(*g),
            _ => None,
        }
    }

    /// Look up a named child of a bundle.
    pub fn get(&self, name: &str) -> Option<&MappedValue> {
        match self {
            MappedValue::Bundle(children) => children
                .iter()
                .find(|(child, _)| child == name)
                .map(|(_, value)| value),
            _ => None,
        }
    }
}
