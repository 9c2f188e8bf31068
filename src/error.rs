//! Error types for the maxpain library.
//!
//! Fallible operations return `Result<T, MaxPainError>` rather than panicking.
//! Most analytics are total over a validated chain; errors are reserved for
//! caller contract violations (bad prices, malformed chains, invalid
//! configuration) and for capabilities the chain does not carry.

use thiserror::Error;

/// Convenience type alias for results in this crate.
pub type Result<T> = std::result::Result<T, MaxPainError>;

/// Errors that can occur while building chains or running an analysis.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum MaxPainError {
    /// Input data is invalid (e.g., non-positive price, duplicate strike, negative OI).
    #[error("invalid input: {message}")]
    InvalidInput { message: String },

    /// Analysis configuration is invalid (e.g., zero step, inverted thresholds).
    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Delta/gamma exposure was requested but the chain lacks greeks.
    #[error("greeks unavailable: missing delta at strike {strike:?}")]
    GreeksUnavailable {
        /// First strike found without a usable delta, if the chain is non-empty.
        strike: Option<f64>,
    },

    /// A renderer failed to produce its output.
    #[error("render failed: {message}")]
    Render { message: String },
}

impl From<serde_json::Error> for MaxPainError {
    fn from(err: serde_json::Error) -> Self {
        MaxPainError::Render {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_input_message_accessible() {
        let err = MaxPainError::InvalidInput {
            message: "current_price must be positive".into(),
        };
        match &err {
            MaxPainError::InvalidInput { message } => {
                assert!(message.contains("positive"));
            }
            _ => panic!("wrong variant"),
        }
    }

    #[test]
    fn greeks_unavailable_fields_accessible() {
        let err = MaxPainError::GreeksUnavailable {
            strike: Some(105.0),
        };
        match &err {
            MaxPainError::GreeksUnavailable { strike } => {
                assert_eq!(*strike, Some(105.0));
            }
            _ => panic!("wrong variant"),
        }
    }

    #[test]
    fn error_display_includes_message() {
        let err = MaxPainError::InvalidInput {
            message: "bad input".into(),
        };
        assert!(format!("{err}").contains("bad input"));

        let err2 = MaxPainError::InvalidConfig {
            message: "top_n must be at least 1".into(),
        };
        assert!(format!("{err2}").contains("top_n"));

        let err3 = MaxPainError::Render {
            message: "broken pipe".into(),
        };
        assert!(format!("{err3}").contains("broken pipe"));
    }

    #[test]
    fn serde_json_error_maps_to_render() {
        let parse = serde_json::from_str::<f64>("not json").unwrap_err();
        let err: MaxPainError = parse.into();
        assert!(matches!(err, MaxPainError::Render { .. }));
    }

    #[test]
    fn error_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<MaxPainError>();
    }
}
