//! Delta and gamma exposure carried by option writers.
//!
//! Only meaningful when the chain publishes greeks for every open side; see
//! [`OptionChain::greeks_available`]. A chain without them is rejected
//! rather than summed as zeros.

use serde::{Deserialize, Serialize};

use crate::chain::OptionChain;
use crate::error::{self, MaxPainError};

/// Sign of an aggregate exposure from the writers' point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExposureSign {
    /// Writers gain when the quantity grows (rising price for delta,
    /// larger moves for gamma).
    Positive,
    /// Writers lose when the quantity grows.
    Negative,
    /// Flat.
    Neutral,
}

impl ExposureSign {
    fn of(value: f64) -> Self {
        if value > 0.0 {
            ExposureSign::Positive
        } else if value < 0.0 {
            ExposureSign::Negative
        } else {
            ExposureSign::Neutral
        }
    }
}

/// Open-interest weighted greeks for holders and the offsetting writer book.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GreekExposure {
    /// Σ callDelta · callOI.
    pub call_delta: f64,
    /// Σ putDelta · putOI.
    pub put_delta: f64,
    /// Σ callGamma · callOI.
    pub call_gamma: f64,
    /// Σ putGamma · putOI.
    pub put_gamma: f64,
    /// −(call_delta + put_delta).
    pub seller_delta: f64,
    /// −(call_gamma + put_gamma).
    pub seller_gamma: f64,
    /// Sign of `seller_delta`.
    pub delta_bias: ExposureSign,
    /// Sign of `seller_gamma`.
    pub gamma_bias: ExposureSign,
}

/// Aggregate delta and gamma exposure.
///
/// # Errors
/// Returns [`MaxPainError::GreeksUnavailable`] when the chain is empty or
/// some side carrying open interest has a zero delta.
pub fn greek_exposure(chain: &OptionChain) -> error::Result<GreekExposure> {
    if !chain.greeks_available() {
        return Err(MaxPainError::GreeksUnavailable {
            strike: chain.first_missing_greek(),
        });
    }

    let mut e = GreekExposure {
        call_delta: 0.0,
        put_delta: 0.0,
        call_gamma: 0.0,
        put_gamma: 0.0,
        seller_delta: 0.0,
        seller_gamma: 0.0,
        delta_bias: ExposureSign::Neutral,
        gamma_bias: ExposureSign::Neutral,
    };
    for p in chain.points() {
        e.call_delta += p.call_delta * p.call_open_interest;
        e.put_delta += p.put_delta * p.put_open_interest;
        e.call_gamma += p.call_gamma * p.call_open_interest;
        e.put_gamma += p.put_gamma * p.put_open_interest;
    }
    e.seller_delta = -(e.call_delta + e.put_delta);
    e.seller_gamma = -(e.call_gamma + e.put_gamma);
    e.delta_bias = ExposureSign::of(e.seller_delta);
    e.gamma_bias = ExposureSign::of(e.seller_gamma);
    Ok(e)
}
