//! Error types for resistor combination searches.

use thiserror::Error;

/// Everything that can go wrong while setting up or running a search.
///
/// Finding no combination within tolerance is not an error; that outcome is an
/// empty [`RRes`](crate::RRes).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalcError {
    /// Target is missing, unparseable, zero, negative or not finite.
    #[error("invalid target resistance: {0}")]
    InvalidTarget(String),

    /// Tolerance, size limits, result count or decade count out of range.
    #[error("invalid search parameters: {0}")]
    DegenerateInput(String),

    /// The value cannot be expressed with three colour bands.
    #[error("{0} cannot be encoded as three colour bands")]
    NotEncodable(f64),

    /// Something that valid input should never produce.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Result type alias for calculator operations.
pub type Result<T> = std::result::Result<T, CalcError>;

impl CalcError {
    pub fn invalid_target(msg: impl Into<String>) -> Self {
        Self::InvalidTarget(msg.into())
    }

    pub fn degenerate(msg: impl Into<String>) -> Self {
        Self::DegenerateInput(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// True for errors caused by bad user input rather than by the calculator.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::InvalidTarget(_) | Self::DegenerateInput(_))
    }
}
