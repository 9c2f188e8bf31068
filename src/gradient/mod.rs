//! How fast holder losses grow as the price moves away from a level.
//!
//! Around max pain the aggregate holder loss `L(s)` is at its minimum; the
//! slopes on either side indicate which direction writers defend harder.
//! All slopes here are finite differences of [`payoff::holder_losses`] with
//! one step `h = max_pain · step_fraction`, reused at the current price so
//! the two readings are comparable.

pub mod equilibrium;
pub mod threshold;

pub use equilibrium::{Equilibrium, equilibrium_search};
pub use threshold::{BandPosition, PainBand, ThresholdLevel, pain_band, threshold_level};

use serde::{Deserialize, Serialize};

use crate::chain::OptionChain;
use crate::config::GradientConfig;
use crate::payoff::{self, LossComponents};

/// Which side of a level losses grow faster on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GradientAsymmetry {
    /// `|up| > threshold · |down|`.
    SteeperUp,
    /// `|down| > threshold · |up|`.
    SteeperDown,
    /// Neither side dominates.
    Balanced,
}

/// Whether call holders gain faster on a rise than put holders on a fall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SidePressure {
    /// Call losses grow faster upward: writers resist a rally.
    CallsHeavier,
    /// Put losses grow faster downward: writers resist a decline.
    PutsHeavier,
    /// Within the side-pressure multiplier.
    Balanced,
}

/// Loss slopes around one anchor price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LossGradients {
    /// Price the differences are taken around.
    pub anchor: f64,
    /// Step `h`.
    pub step: f64,
    /// `L(anchor)`.
    pub base: LossComponents,
    /// `(L(anchor + h) − L(anchor)) / h`.
    pub up: LossComponents,
    /// `(L(anchor) − L(anchor − h)) / h`; negative where losses grow downward.
    pub down: LossComponents,
    /// Total-loss asymmetry.
    pub asymmetry: GradientAsymmetry,
    /// Call growth upward against put growth downward.
    pub side_pressure: SidePressure,
}

impl LossGradients {
    /// Call-loss growth per unit of upward move.
    pub fn call_growth_up(&self) -> f64 {
        self.up.call
    }

    /// Put-loss growth per unit of downward move.
    pub fn put_growth_down(&self) -> f64 {
        -self.down.put
    }
}

/// Upward and downward loss slopes at `anchor` with step `h`.
///
/// Returns `None` when `h` is not positive and finite.
///
/// # Examples
///
/// ```
/// use maxpain::chain::{OptionChain, OptionChainPoint};
/// use maxpain::config::GradientConfig;
/// use maxpain::gradient::{gradients_at, GradientAsymmetry};
///
/// let chain = OptionChain::new(vec![
///     OptionChainPoint::new(100.0, 30.0, 10.0),
/// ])?;
/// let g = gradients_at(&chain, 100.0, 1.0, &GradientConfig::default()).unwrap();
/// assert_eq!(g.up.total, 30.0);
/// assert_eq!(g.down.total, -10.0);
/// assert_eq!(g.asymmetry, GradientAsymmetry::SteeperUp);
/// # Ok::<(), maxpain::MaxPainError>(())
/// ```
pub fn gradients_at(
    chain: &OptionChain,
    anchor: f64,
    h: f64,
    config: &GradientConfig,
) -> Option<LossGradients> {
    if !(h.is_finite() && h > 0.0) {
        return None;
    }
    let base = payoff::holder_losses(chain, anchor);
    let above = payoff::holder_losses(chain, anchor + h);
    let below = payoff::holder_losses(chain, anchor - h);
    let up = above.slope_from(&base, h);
    let down = base.slope_from(&below, h);

    let (up_mag, down_mag) = (up.total.abs(), down.total.abs());
    let asymmetry = if up_mag > config.asymmetry_threshold * down_mag {
        GradientAsymmetry::SteeperUp
    } else if down_mag > config.asymmetry_threshold * up_mag {
        GradientAsymmetry::SteeperDown
    } else {
        GradientAsymmetry::Balanced
    };

    let call_growth = up.call;
    let put_growth = -down.put;
    let side_pressure = if call_growth > put_growth * config.side_pressure_multiplier {
        SidePressure::CallsHeavier
    } else if put_growth > call_growth * config.side_pressure_multiplier {
        SidePressure::PutsHeavier
    } else {
        SidePressure::Balanced
    };

    Some(LossGradients {
        anchor,
        step: h,
        base,
        up,
        down,
        asymmetry,
        side_pressure,
    })
}

/// Gradient readings at max pain and at the current price, plus the
/// pain band and gradient equilibrium.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradientAnalysis {
    /// Step `h` used throughout.
    pub step: f64,
    /// Slopes around max pain.
    pub at_max_pain: LossGradients,
    /// Slopes around the current price.
    pub at_current: LossGradients,
    /// Prices where losses exceed the max-pain minimum by the threshold.
    pub band: PainBand,
    /// Price where the total loss slope is closest to zero.
    pub equilibrium: Option<Equilibrium>,
}

/// Run the full gradient analysis anchored on `max_pain_strike`.
///
/// Returns `None` when the derived step is unusable (empty chain, or a
/// max-pain strike that is zero).
pub fn analyze_gradients(
    chain: &OptionChain,
    max_pain_strike: f64,
    current_price: f64,
    config: &GradientConfig,
) -> Option<GradientAnalysis> {
    let h = max_pain_strike * config.step_fraction;
    let at_max_pain = gradients_at(chain, max_pain_strike, h, config)?;
    let at_current = gradients_at(chain, current_price, h, config)?;
    let band = pain_band(chain, max_pain_strike, current_price, h, config);
    let equilibrium = equilibrium_search(chain, h, config);

    #[cfg(feature = "logging")]
    tracing::debug!(
        step = h,
        asymmetry = ?at_max_pain.asymmetry,
        lower = band.lower.price,
        upper = band.upper.price,
        "gradient analysis complete"
    );

    Some(GradientAnalysis {
        step: h,
        at_max_pain,
        at_current,
        band,
        equilibrium,
    })
}
