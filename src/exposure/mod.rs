//! Open-interest exposure metrics.
//!
//! Ratio and sentiment, centers of gravity, intrinsic payout split at a
//! price, strike rankings and nearby support/resistance, and greek
//! exposure. Quantities that divide by a side's total open interest are
//! `None` when that total is zero; nothing here produces NaN.

pub mod greeks;
pub mod ranking;

pub use greeks::{ExposureSign, GreekExposure, greek_exposure};
pub use ranking::{
    KeyLevel, NearbyLevels, OpenInterestRanking, RankedStrike, nearby_levels,
    open_interest_ranking,
};

use serde::{Deserialize, Serialize};

use crate::chain::OptionChain;
use crate::config::SentimentThresholds;
use crate::payoff;

/// Skew label derived from the call/put open-interest ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OiSentiment {
    /// Calls dominate.
    BullishSkew,
    /// Neither side dominates.
    Balanced,
    /// Puts dominate.
    BearishSkew,
}

/// Call/put open-interest split.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CallPutRatio {
    /// Σ call open interest.
    pub total_call: f64,
    /// Σ put open interest.
    pub total_put: f64,
    /// `call / (call + put)`, 0 without open interest.
    pub call_share: f64,
    /// `1 − call_share`, 0 without open interest.
    pub put_share: f64,
    /// `call / put`, `None` when put open interest is zero.
    pub ratio: Option<f64>,
    /// `None` without any open interest.
    pub sentiment: Option<OiSentiment>,
}

/// Compute the call/put open-interest split and its sentiment label.
///
/// # Examples
///
/// ```
/// use maxpain::chain::{OptionChain, OptionChainPoint};
/// use maxpain::config::SentimentThresholds;
/// use maxpain::exposure::{call_put_ratio, OiSentiment};
///
/// let chain = OptionChain::new(vec![
///     OptionChainPoint::new(100.0, 300.0, 100.0),
/// ])?;
/// let r = call_put_ratio(&chain, &SentimentThresholds::default());
/// assert_eq!(r.call_share, 0.75);
/// assert_eq!(r.ratio, Some(3.0));
/// assert_eq!(r.sentiment, Some(OiSentiment::BullishSkew));
/// # Ok::<(), maxpain::MaxPainError>(())
/// ```
pub fn call_put_ratio(chain: &OptionChain, thresholds: &SentimentThresholds) -> CallPutRatio {
    let total_call = chain.total_call_open_interest();
    let total_put = chain.total_put_open_interest();
    let total = total_call + total_put;

    let (call_share, put_share) = if total > 0.0 {
        let call_share = total_call / total;
        (call_share, 1.0 - call_share)
    } else {
        (0.0, 0.0)
    };

    let ratio = (total_put > 0.0).then(|| total_call / total_put);
    let sentiment = match ratio {
        Some(r) if r > thresholds.bullish_above => Some(OiSentiment::BullishSkew),
        Some(r) if r >= thresholds.bearish_below => Some(OiSentiment::Balanced),
        Some(_) => Some(OiSentiment::BearishSkew),
        None if total_call > 0.0 => Some(OiSentiment::BullishSkew),
        None => None,
    };

    CallPutRatio {
        total_call,
        total_put,
        call_share,
        put_share,
        ratio,
        sentiment,
    }
}

/// Open-interest weighted mean strikes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CentersOfGravity {
    /// Σ(K·callOI)/Σ callOI.
    pub call_center: Option<f64>,
    /// Σ(K·putOI)/Σ putOI.
    pub put_center: Option<f64>,
    /// Midpoint of the two centers, only when both exist.
    pub equilibrium: Option<f64>,
}

/// Compute the call and put centers of gravity.
pub fn centers_of_gravity(chain: &OptionChain) -> CentersOfGravity {
    let weighted = |oi: fn(&crate::chain::OptionChainPoint) -> f64| {
        let (num, den) = chain
            .points()
            .iter()
            .fold((0.0, 0.0), |(n, d), p| (n + p.strike * oi(p), d + oi(p)));
        (den > 0.0).then(|| num / den)
    };
    let call_center = weighted(|p| p.call_open_interest);
    let put_center = weighted(|p| p.put_open_interest);
    let equilibrium = match (call_center, put_center) {
        (Some(c), Some(p)) => Some((c + p) / 2.0),
        _ => None,
    };
    CentersOfGravity {
        call_center,
        put_center,
        equilibrium,
    }
}

/// Where the gravity equilibrium pulls the price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GravityBias {
    /// Equilibrium lies above the price.
    Upside {
        /// Level the price is drawn toward.
        target: f64,
        /// Put center, acting as support beneath the move.
        support: f64,
        /// The price is below even the put center.
        oversold: bool,
    },
    /// Equilibrium lies below the price.
    Downside {
        /// Level the price is drawn toward.
        target: f64,
        /// Call center, acting as resistance above the move.
        resistance: f64,
        /// The price is above even the call center.
        overbought: bool,
    },
    /// Price sits on the equilibrium.
    AtEquilibrium,
}

/// Classify the pull of the gravity equilibrium on `price`.
///
/// `None` unless both centers are defined.
pub fn gravity_bias(centers: &CentersOfGravity, price: f64) -> Option<GravityBias> {
    let (call_center, put_center, eq) =
        match (centers.call_center, centers.put_center, centers.equilibrium) {
            (Some(c), Some(p), Some(e)) => (c, p, e),
            _ => return None,
        };
    let bias = if eq > price {
        let oversold = put_center > price;
        GravityBias::Upside {
            target: if oversold { put_center } else { eq },
            support: put_center,
            oversold,
        }
    } else if eq < price {
        let overbought = price > call_center;
        GravityBias::Downside {
            target: if overbought { call_center } else { eq },
            resistance: call_center,
            overbought,
        }
    } else {
        GravityBias::AtEquilibrium
    };
    Some(bias)
}

/// Which side's holders are owed more intrinsic value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PayoutDominance {
    /// Call holders' intrinsic value dominates.
    Calls,
    /// Put holders' intrinsic value dominates.
    Puts,
    /// Neither side dominates.
    Balanced,
}

/// Intrinsic payout owed to holders if the chain settled at `price`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IntrinsicAtPrice {
    /// Settlement price evaluated.
    pub price: f64,
    /// Call holders' intrinsic value.
    pub call: f64,
    /// Put holders' intrinsic value.
    pub put: f64,
    /// `call + put`.
    pub total: f64,
    /// Call share of the total, 0 when nothing is in the money.
    pub call_share: f64,
    /// Put share of the total, 0 when nothing is in the money.
    pub put_share: f64,
    /// `call / put`, `None` when put payout is zero.
    pub ratio: Option<f64>,
    /// Dominant side at `multiplier`.
    pub dominance: PayoutDominance,
}

/// Split the holders' intrinsic value at `price` by side.
///
/// A side dominates when its payout exceeds the other's by `multiplier`.
pub fn intrinsic_at_price(chain: &OptionChain, price: f64, multiplier: f64) -> IntrinsicAtPrice {
    let losses = payoff::holder_losses(chain, price);
    let (call_share, put_share) = if losses.total > 0.0 {
        (losses.call / losses.total, losses.put / losses.total)
    } else {
        (0.0, 0.0)
    };
    let dominance = if losses.call > losses.put * multiplier {
        PayoutDominance::Calls
    } else if losses.put > losses.call * multiplier {
        PayoutDominance::Puts
    } else {
        PayoutDominance::Balanced
    };
    IntrinsicAtPrice {
        price,
        call: losses.call,
        put: losses.put,
        total: losses.total,
        call_share,
        put_share,
        ratio: (losses.put > 0.0).then(|| losses.call / losses.put),
        dominance,
    }
}
