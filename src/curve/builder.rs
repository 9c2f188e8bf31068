//! Uniform price sweep of aggregate seller PnL.
//!
//! The sweep runs from `minK·(1 − ext)` to `maxK·(1 + ext)` so that
//! break-evens beyond the listed strikes are still found. Samples are placed
//! at `start + i·step` rather than by repeated addition, so the grid does not
//! drift over long sweeps.

use serde::{Deserialize, Serialize};

use crate::chain::OptionChain;
use crate::config::CurveConfig;
use crate::payoff::{self, PnlSample};
use crate::search::grid_len;

/// Sampled seller PnL, ascending by price.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PnlCurve {
    /// Samples in ascending price order.
    pub samples: Vec<PnlSample>,
    /// Spacing actually used (may exceed the requested step when the sample
    /// ceiling applies). Zero for an empty curve.
    pub step: f64,
}

impl PnlCurve {
    /// Whether the curve has no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Sample closest to `price`; the lower one on an exact tie.
    pub fn nearest(&self, price: f64) -> Option<&PnlSample> {
        self.samples.iter().min_by(|a, b| {
            (a.price - price)
                .abs()
                .total_cmp(&(b.price - price).abs())
        })
    }

    /// Lowest and highest sampled prices.
    pub fn domain(&self) -> Option<(f64, f64)> {
        Some((self.samples.first()?.price, self.samples.last()?.price))
    }
}

/// Sample seller PnL across the extended strike range.
///
/// The step is `reference_price · config.price_step_fraction`. An empty
/// chain, or a step that is not positive and finite, yields an empty curve.
///
/// # Examples
///
/// ```
/// use maxpain::chain::{OptionChain, OptionChainPoint};
/// use maxpain::config::CurveConfig;
/// use maxpain::curve::build_curve;
///
/// let chain = OptionChain::new(vec![
///     OptionChainPoint::new(100.0, 10.0, 10.0).with_prices(4.0, 4.0),
/// ])?;
/// let curve = build_curve(&chain, 100.0, &CurveConfig::default());
/// let (lo, hi) = curve.domain().unwrap();
/// assert!((lo - 70.0).abs() < 1e-9);
/// assert!(hi <= 130.0 + 1e-9);
/// assert!((curve.step - 0.1).abs() < 1e-12);
/// # Ok::<(), maxpain::MaxPainError>(())
/// ```
pub fn build_curve(chain: &OptionChain, reference_price: f64, config: &CurveConfig) -> PnlCurve {
    let (Some(min_strike), Some(max_strike)) = (chain.min_strike(), chain.max_strike()) else {
        return PnlCurve::default();
    };
    let start = min_strike * (1.0 - config.range_extension);
    let end = max_strike * (1.0 + config.range_extension);

    let mut step = reference_price * config.price_step_fraction;
    let mut count = grid_len(start, end, step);
    if count == 0 {
        return PnlCurve::default();
    }
    if count > config.max_samples && config.max_samples >= 2 {
        let widened = (end - start) / (config.max_samples - 1) as f64;
        #[cfg(feature = "logging")]
        tracing::debug!(
            requested_step = step,
            widened_step = widened,
            requested_samples = count,
            max_samples = config.max_samples,
            "pnl curve step widened"
        );
        step = widened;
        count = grid_len(start, end, step).min(config.max_samples);
    }

    let samples: Vec<PnlSample> = (0..count)
        .map(|i| payoff::seller_pnl(chain, start + i as f64 * step))
        .collect();

    #[cfg(feature = "logging")]
    tracing::debug!(samples = samples.len(), step, start, end, "pnl curve built");

    PnlCurve { samples, step }
}
