//! Shared validation helpers.
//!
//! Used by the pattern catalog when thresholds are loaded and by the API when
//! classifier output is recorded.

use crate::error::CoreError;

/// Longest label accepted for classifier vocabulary fields.
pub const MAX_LABEL_LEN: usize = 64;

/// Validate that a value falls within `[0.0, 1.0]`.
///
/// Returns a `CoreError::Validation` naming the field if out of range.
pub fn validate_unit_range(value: f64, name: &str) -> Result<(), CoreError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(CoreError::Validation(format!(
            "{name} must be between 0.0 and 1.0, got {value}"
        )));
    }
    Ok(())
}

/// Validate that a count or duration is strictly positive.
pub fn validate_positive(value: i64, name: &str) -> Result<(), CoreError> {
    if value <= 0 {
        return Err(CoreError::Validation(format!(
            "{name} must be greater than zero, got {value}"
        )));
    }
    Ok(())
}

/// Validate a classifier label: non-blank and at most [`MAX_LABEL_LEN`] characters.
pub fn validate_label(value: &str, name: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::Validation(format!("{name} must not be empty")));
    }
    if value.chars().count() > MAX_LABEL_LEN {
        return Err(CoreError::Validation(format!(
            "{name} must be at most {MAX_LABEL_LEN} characters"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_range_accepts_boundary_values() {
        assert!(validate_unit_range(0.0, "confidence").is_ok());
        assert!(validate_unit_range(1.0, "confidence").is_ok());
    }

    #[test]
    fn unit_range_rejects_out_of_range() {
        assert!(validate_unit_range(-0.01, "confidence").is_err());
        assert!(validate_unit_range(1.01, "confidence").is_err());
        assert!(validate_unit_range(f64::NAN, "confidence").is_err());
    }

    #[test]
    fn positive_rejects_zero_and_negative() {
        assert!(validate_positive(1, "threshold").is_ok());
        assert!(validate_positive(0, "threshold").is_err());
        assert!(validate_positive(-3, "threshold").is_err());
    }

    #[test]
    fn label_rejects_blank_and_overlong() {
        assert!(validate_label("ansioso", "emotional_state").is_ok());
        assert!(validate_label("   ", "emotional_state").is_err());
        let long = "a".repeat(MAX_LABEL_LEN + 1);
        let err = validate_label(&long, "emotional_state").unwrap_err();
        assert!(err.to_string().contains("at most 64"));
    }
}
