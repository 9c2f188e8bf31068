//! Input validation helpers.
//!
//! Standardizes validation across the crate using `!is_finite()` to reject
//! NaN, +Inf, and -Inf uniformly. Chain and price checks report
//! [`MaxPainError::InvalidInput`]; configuration checks report
//! [`MaxPainError::InvalidConfig`].

use crate::error::{self, MaxPainError};

#[derive(Clone, Copy)]
enum Bound {
    Positive,
    NonNegative,
    Any,
}

impl Bound {
    fn admits(self, value: f64) -> bool {
        value.is_finite()
            && match self {
                Bound::Positive => value > 0.0,
                Bound::NonNegative => value >= 0.0,
                Bound::Any => true,
            }
    }

    fn requirement(self) -> &'static str {
        match self {
            Bound::Positive => "positive and finite",
            Bound::NonNegative => "non-negative and finite",
            Bound::Any => "finite",
        }
    }
}

fn check(value: f64, name: &str, bound: Bound, config: bool) -> error::Result<f64> {
    if bound.admits(value) {
        return Ok(value);
    }
    let message = format!("{name} must be {}, got {value}", bound.requirement());
    Err(if config {
        MaxPainError::InvalidConfig { message }
    } else {
        MaxPainError::InvalidInput { message }
    })
}

/// Strike, price or open-interest value that must be strictly positive.
pub(crate) fn validate_positive(value: f64, name: &str) -> error::Result<f64> {
    check(value, name, Bound::Positive, false)
}

pub(crate) fn validate_non_negative(value: f64, name: &str) -> error::Result<f64> {
    check(value, name, Bound::NonNegative, false)
}

/// Greeks may be negative; only NaN and infinities are rejected.
pub(crate) fn validate_finite(value: f64, name: &str) -> error::Result<f64> {
    check(value, name, Bound::Any, false)
}

/// Configuration knob that must be strictly positive.
pub(crate) fn config_positive(value: f64, name: &str) -> error::Result<f64> {
    check(value, name, Bound::Positive, true)
}

pub(crate) fn config_non_negative(value: f64, name: &str) -> error::Result<f64> {
    check(value, name, Bound::NonNegative, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_rejects_zero_nan_and_inf() {
        assert!(validate_positive(0.0, "price").is_err());
        assert!(validate_positive(-1.0, "price").is_err());
        assert!(validate_positive(f64::NAN, "price").is_err());
        assert!(validate_positive(f64::INFINITY, "price").is_err());
        assert_eq!(validate_positive(105.0, "price").unwrap(), 105.0);
    }

    #[test]
    fn non_negative_accepts_zero() {
        assert_eq!(validate_non_negative(0.0, "oi").unwrap(), 0.0);
        assert!(validate_non_negative(-0.5, "oi").is_err());
    }

    #[test]
    fn finite_accepts_negative_delta() {
        assert_eq!(validate_finite(-0.45, "delta").unwrap(), -0.45);
        assert!(validate_finite(f64::NEG_INFINITY, "delta").is_err());
    }

    #[test]
    fn config_checks_report_config_errors() {
        let err = config_positive(0.0, "step").unwrap_err();
        assert!(matches!(err, MaxPainError::InvalidConfig { .. }));
        let err = config_non_negative(-0.1, "extension").unwrap_err();
        assert!(matches!(err, MaxPainError::InvalidConfig { .. }));
        assert_eq!(config_non_negative(0.0, "extension").unwrap(), 0.0);
    }

    #[test]
    fn message_names_the_field() {
        let err = validate_positive(-3.0, "current_price").unwrap_err();
        assert!(format!("{err}").contains("current_price"));
    }

    #[test]
    fn message_states_the_requirement() {
        let err = validate_finite(f64::NAN, "gamma").unwrap_err();
        assert!(format!("{err}").contains("gamma must be finite"));
        let err = config_non_negative(f64::INFINITY, "band").unwrap_err();
        assert!(format!("{err}").contains("non-negative and finite"));
    }
}
