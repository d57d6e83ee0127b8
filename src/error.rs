use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenespaceError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Duplicate feature: {0}")]
    DuplicateFeature(String),

    #[error("Shape mismatch: expected {expected} dimensions, got {actual}")]
    Shape { expected: usize, actual: usize },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unknown feature: {0}")]
    Lookup(String),

    #[error("Capability not implemented: {0}")]
    NotImplemented(String),

    #[error("Adapter error: {0}")]
    Adapter(#[from] anyhow::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serde error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, GenespaceError>;
