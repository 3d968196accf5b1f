//! # Error Types
//!
//! Structured error handling for the calculation engine.
//!
//! All errors are serializable for API responses and carry enough context to
//! pinpoint the offending input or derived quantity. The engine never
//! substitutes guessed values: every failure propagates to the caller.
//!
//! ## Example
//!
//! ```
//! use emd_core::errors::DesignError;
//!
//! let err = DesignError::prerequisite_missing("stator.pole_pitch");
//! assert_eq!(err.error_code(), "PREREQUISITE_MISSING");
//! assert!(err.is_recoverable());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for calculation operations
pub type DesignResult<T> = Result<T, DesignError>;

/// Errors that can occur during machine design calculations
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum DesignError {
    /// Input specification failed validation
    #[error("Invalid specification: {field} = {value} ({reason})")]
    InvalidSpec {
        field: String,
        value: String,
        reason: String,
    },

    /// A derived quantity was read before it was computed
    #[error("Quantity '{quantity}' read before it was computed")]
    PrerequisiteMissing { quantity: String },

    /// A derived quantity was computed a second time
    #[error("Quantity '{quantity}' was already computed")]
    Recompute { quantity: String },

    /// A material id was not found in the catalog
    #[error("Unknown material: '{material_id}'")]
    UnknownMaterial { material_id: String },

    /// A lookup argument fell outside the tabulated domain of a curve
    #[error("Value {value} outside tabulated range [{min}, {max}] of '{curve}'")]
    OutOfRange {
        curve: String,
        value: f64,
        min: f64,
        max: f64,
    },

    /// An unknown quantity name was passed to the query interface
    #[error("Unknown quantity name: '{quantity}'")]
    UnknownQuantity { quantity: String },
}

impl DesignError {
    /// Create an invalid-specification error
    pub fn invalid_spec(
        field: impl Into<String>,
        value: impl ToString,
        reason: impl Into<String>,
    ) -> Self {
        DesignError::InvalidSpec {
            field: field.into(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    /// Create a prerequisite-missing error
    pub fn prerequisite_missing(quantity: impl Into<String>) -> Self {
        DesignError::PrerequisiteMissing {
            quantity: quantity.into(),
        }
    }

    /// Create a recompute error
    pub fn recompute(quantity: impl Into<String>) -> Self {
        DesignError::Recompute {
            quantity: quantity.into(),
        }
    }

    /// Create an unknown-material error
    pub fn unknown_material(material_id: impl Into<String>) -> Self {
        DesignError::UnknownMaterial {
            material_id: material_id.into(),
        }
    }

    /// Create an out-of-range error
    pub fn out_of_range(curve: impl Into<String>, value: f64, min: f64, max: f64) -> Self {
        DesignError::OutOfRange {
            curve: curve.into(),
            value,
            min,
            max,
        }
    }

    /// Create an unknown-quantity error
    pub fn unknown_quantity(quantity: impl Into<String>) -> Self {
        DesignError::UnknownQuantity {
            quantity: quantity.into(),
        }
    }

    /// Get error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            DesignError::InvalidSpec { .. } => "INVALID_SPEC",
            DesignError::PrerequisiteMissing { .. } => "PREREQUISITE_MISSING",
            DesignError::Recompute { .. } => "RECOMPUTE",
            DesignError::UnknownMaterial { .. } => "UNKNOWN_MATERIAL",
            DesignError::OutOfRange { .. } => "OUT_OF_RANGE",
            DesignError::UnknownQuantity { .. } => "UNKNOWN_QUANTITY",
        }
    }

    /// Check if error is recoverable.
    ///
    /// Only `PrerequisiteMissing` is: the caller may compute the named
    /// prerequisite and retry. A `Recompute` is never retried.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, DesignError::PrerequisiteMissing { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DesignError::invalid_spec("core_length_mm", -100.0, "must be positive");
        assert!(err.to_string().contains("core_length_mm"));
        assert!(err.to_string().contains("-100"));
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            DesignError::recompute("stator.pole_pitch").error_code(),
            "RECOMPUTE"
        );
        assert_eq!(
            DesignError::unknown_material("m999-50a").error_code(),
            "UNKNOWN_MATERIAL"
        );
        assert_eq!(
            DesignError::out_of_range("2414 B-H", 2.5, 0.0, 1.752).error_code(),
            "OUT_OF_RANGE"
        );
    }

    #[test]
    fn test_recoverable() {
        assert!(DesignError::prerequisite_missing("rotor.turn_count").is_recoverable());
        assert!(!DesignError::recompute("rotor.turn_count").is_recoverable());
        assert!(!DesignError::unknown_quantity("rotor.bogus").is_recoverable());
    }

    #[test]
    fn test_error_serialization() {
        let err = DesignError::prerequisite_missing("magnetic.total_mmf");
        let json = serde_json::to_string(&err).unwrap();
        assert!(json.contains("PrerequisiteMissing"));
        assert!(json.contains("magnetic.total_mmf"));

        let back: DesignError = serde_json::from_str(&json).unwrap();
        assert_eq!(back, err);
    }
}
