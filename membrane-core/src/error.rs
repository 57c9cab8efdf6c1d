//! Error types for membrane-core.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimError {
    #[error("unknown primitive kind: {0:?}")]
    InvalidPrimitiveKind(String),

    #[error("a closed path needs at least 3 vertices, got {count}")]
    InsufficientVertices { count: usize },

    #[error("viewport must have a positive, finite size, got {width}x{height}")]
    InvalidViewport { width: f32, height: f32 },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, SimError>;
