//! Error types for interactive-parts.

use thiserror::Error;

/// Reasons a model definition is rejected by [`crate::model::interactive`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("part at index {index} has an empty id")]
    EmptyId { index: usize },

    #[error("duplicate part id '{0}'")]
    DuplicateId(String),

    #[error("part '{part}' links to unknown part '{target}'")]
    DanglingLink { part: String, target: String },

    #[error("part '{part}' has unknown constraint type '{kind}'")]
    InvalidConstraintType { part: String, kind: String },

    #[error("part '{part}' has an invalid range: min {min} is greater than max {max}")]
    Range { part: String, min: f32, max: f32 },
}

/// Failures while reading or writing a serialized interaction snapshot.
#[derive(Error, Debug)]
pub enum StateError {
    #[error("unsupported snapshot version {found}, expected {expected}")]
    UnsupportedVersion { found: u32, expected: u32 },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type ModelResult<T> = std::result::Result<T, ModelError>;
