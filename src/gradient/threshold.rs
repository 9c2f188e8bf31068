//! Bounded walks to the price where holder losses have risen by a target.

use serde::{Deserialize, Serialize};

use crate::chain::OptionChain;
use crate::config::GradientConfig;
use crate::payoff;
use crate::search::{PriceWalk, walk_until};
use crate::types::Direction;

/// Result of a threshold walk.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdLevel {
    /// First price meeting the target, or the last price visited.
    pub price: f64,
    /// `L(price) − start_loss`.
    pub loss_increase: f64,
    /// Steps taken.
    pub iterations: usize,
    /// Whether the target was met.
    pub converged: bool,
}

/// Walk from `start` in `direction` by `step` until total holder loss has
/// grown by at least `target` over `start_loss`.
///
/// The walk is capped at `max_iterations` steps and, downward, stops before
/// the price reaches zero. When the cap is hit the last price visited is
/// returned with `converged == false`.
pub fn threshold_level(
    chain: &OptionChain,
    start: f64,
    start_loss: f64,
    target: f64,
    step: f64,
    direction: Direction,
    max_iterations: usize,
) -> ThresholdLevel {
    let walk = PriceWalk::new(start, direction.sign() * step, max_iterations);
    let outcome = walk_until(walk, start, |price| {
        payoff::holder_losses(chain, price).total - start_loss >= target
    });
    let loss_increase = payoff::holder_losses(chain, outcome.value).total - start_loss;

    #[cfg(feature = "logging")]
    if !outcome.converged {
        tracing::debug!(
            start,
            ?direction,
            target,
            reached = loss_increase,
            iterations = outcome.steps,
            "threshold walk did not reach target"
        );
    }

    ThresholdLevel {
        price: outcome.value,
        loss_increase,
        iterations: outcome.steps,
        converged: outcome.converged,
    }
}

/// Where the current price sits relative to the pain band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BandPosition {
    /// Between the two threshold levels, edges included.
    Inside,
    /// Below the lower level.
    Below,
    /// Above the upper level.
    Above,
}

/// Price range around max pain within which holder losses stay under the
/// configured increase.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PainBand {
    /// Total holder loss at max pain.
    pub max_pain_loss: f64,
    /// `max_pain_loss · pain_threshold_percent`.
    pub target_increase: f64,
    /// Downward threshold level.
    pub lower: ThresholdLevel,
    /// Upward threshold level.
    pub upper: ThresholdLevel,
    /// `upper.price − lower.price`.
    pub width: f64,
    /// `width / max_pain`.
    pub relative_width: f64,
    /// Current price relative to the band.
    pub current: BandPosition,
}

/// Threshold levels on both sides of `max_pain` with step `h`.
pub fn pain_band(
    chain: &OptionChain,
    max_pain: f64,
    current_price: f64,
    h: f64,
    config: &GradientConfig,
) -> PainBand {
    let max_pain_loss = payoff::holder_losses(chain, max_pain).total;
    let target_increase = max_pain_loss * config.pain_threshold_percent;
    let level = |direction| {
        threshold_level(
            chain,
            max_pain,
            max_pain_loss,
            target_increase,
            h,
            direction,
            config.max_iterations,
        )
    };
    let lower = level(Direction::Down);
    let upper = level(Direction::Up);
    let width = upper.price - lower.price;

    let current = if current_price < lower.price {
        BandPosition::Below
    } else if current_price > upper.price {
        BandPosition::Above
    } else {
        BandPosition::Inside
    };

    PainBand {
        max_pain_loss,
        target_increase,
        lower,
        upper,
        width,
        relative_width: width / max_pain,
        current,
    }
}
