//! Error types for GeoPattern

use thiserror::Error;

/// Main error type for GeoPattern operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Empty input: {what}")]
    EmptyInput { what: &'static str },

    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("Degenerate input: {0}")]
    DegenerateInput(String),

    #[error("Incompatible extent: expected {expected}, found {found}")]
    IncompatibleExtent { expected: String, found: String },

    #[error("Invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("Invalid raster dimensions: {rows}x{cols}")]
    InvalidDimensions { rows: usize, cols: usize },

    #[error("Index out of bounds: ({row}, {col}) in raster of size ({rows}, {cols})")]
    IndexOutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    #[error("Raster size mismatch: expected ({er}, {ec}), got ({ar}, {ac})")]
    SizeMismatch { er: usize, ec: usize, ar: usize, ac: usize },
}

impl Error {
    /// Shorthand for [`Error::InvalidParameter`]
    pub fn invalid_parameter(
        name: &'static str,
        value: impl ToString,
        reason: impl Into<String>,
    ) -> Self {
        Error::InvalidParameter {
            name,
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for GeoPattern operations
pub type Result<T> = std::result::Result<T, Error>;
