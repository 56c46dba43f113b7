//! Shared threshold validation helpers.
//!
//! Provides reusable range-checking functions used by the classifier,
//! alert thresholds, and snapshot ingestion.

use crate::error::CoreError;

/// Validate that a value falls within `[0.0, 1.0]`.
///
/// Returns a `CoreError::Validation` naming the field if out of range.
/// `NaN` is always rejected.
pub fn validate_unit_range(value: f64, name: &str) -> Result<(), CoreError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(CoreError::Validation(format!(
            "{name} must be between 0.0 and 1.0, got {value}"
        )));
    }
    Ok(())
}

/// Validate that a value is finite and not negative.
pub fn validate_non_negative(value: f64, name: &str) -> Result<(), CoreError> {
    if !value.is_finite() || value < 0.0 {
        return Err(CoreError::Validation(format!(
            "{name} must be a non-negative number, got {value}"
        )));
    }
    Ok(())
}

/// Validate that `lower <= upper`, naming both fields in the error.
pub fn validate_ordered(lower: f64, lower_name: &str, upper: f64, upper_name: &str) -> Result<(), CoreError> {
    if lower > upper {
        return Err(CoreError::Validation(format!(
            "{lower_name} ({lower}) must not exceed {upper_name} ({upper})"
        )));
    }
    Ok(())
}
