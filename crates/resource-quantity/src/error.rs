// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

use thiserror::Error;

/// Convenient result alias for quantity operations.
pub type Result<T> = std::result::Result<T, QuantityFormatError>;

/// Errors produced while parsing a quantity string.
///
/// Every variant keeps the raw input so callers can point users at the exact
/// value that needs fixing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuantityFormatError {
    /// The input was the empty string.
    #[error("quantity is empty")]
    Empty,

    /// The input does not start with a decimal number.
    #[error("quantity {raw:?} does not start with a number")]
    InvalidNumber { raw: String },

    /// The number is followed by something that is not a known unit.
    #[error("quantity {raw:?} has unknown unit suffix {suffix:?}")]
    UnknownSuffix { raw: String, suffix: String },

    /// Mantissa or exponent does not fit the exact representation.
    #[error("quantity {raw:?} is out of range")]
    OutOfRange { raw: String },
}

impl QuantityFormatError {
    /// The raw input that failed to parse.
    pub fn raw(&self) -> &str {
        match self {
            Self::Empty => "",
            Self::InvalidNumber { raw }
            | Self::UnknownSuffix { raw, .. }
            | Self::OutOfRange { raw } => raw,
        }
    }
}
