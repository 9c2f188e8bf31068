//! Max-pain settlement search.
//!
//! Max pain is evaluated only at listed strikes: for every candidate
//! settlement `s` in the chain, sum what holders would collect at expiry and
//! pick the strike where that sum is smallest.
//!
//! # Accounting variants
//!
//! - [`PainAccounting::IntrinsicLoss`] sums `callOI·max(0, s − K)` and
//!   `putOI·max(0, K − s)` over every strike. The in-the-money test is
//!   inclusive: a strike equal to the settlement is evaluated, contributing
//!   zero.
//! - [`PainAccounting::NotionalValue`] follows the aggregate-notional
//!   methodology published by data vendors: call terms only where `s > K`,
//!   put terms only where `s < K`. The test is strict; the `s == K` term is
//!   excluded outright.
//!
//! Both produce the same totals. They differ in which terms are counted,
//! visible through [`PainResult::in_the_money`].

use serde::{Deserialize, Serialize};

use crate::chain::OptionChain;
use crate::payoff;

/// How holder value is accumulated for a candidate settlement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PainAccounting {
    /// Inclusive intrinsic loss via `max(0, ·)`.
    #[default]
    IntrinsicLoss,
    /// Strictly in-the-money notional value.
    NotionalValue,
}

/// Aggregate holder value if the chain settled at `strike`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PainResult {
    /// Candidate settlement strike.
    pub strike: f64,
    /// Call holders' value.
    pub call_losses: f64,
    /// Put holders' value.
    pub put_losses: f64,
    /// `call_losses + put_losses`.
    pub total_losses: f64,
    /// Number of (strike, side) terms with open interest that the
    /// accounting treated as in the money.
    pub in_the_money: usize,
}

/// Outcome of a max-pain search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaxPain {
    /// Strike minimizing total holder value; lowest strike on ties.
    pub strike: f64,
    /// Accounting used.
    pub accounting: PainAccounting,
    /// Every candidate, ascending by total value, ties by ascending strike.
    pub ranked: Vec<PainResult>,
}

impl MaxPain {
    /// The winning candidate.
    pub fn best(&self) -> Option<&PainResult> {
        self.ranked.first()
    }

    /// First `n` candidates: the strongest attraction levels.
    pub fn attraction_levels(&self, n: usize) -> &[PainResult] {
        &self.ranked[..n.min(self.ranked.len())]
    }
}

/// Evaluate one candidate settlement under `accounting`.
pub fn pain_at(chain: &OptionChain, settle: f64, accounting: PainAccounting) -> PainResult {
    let (call_losses, put_losses, in_the_money) = match accounting {
        PainAccounting::IntrinsicLoss => {
            let losses = payoff::holder_losses(chain, settle);
            let counted = chain
                .points()
                .iter()
                .map(|p| {
                    usize::from(p.call_open_interest > 0.0 && settle >= p.strike)
                        + usize::from(p.put_open_interest > 0.0 && settle <= p.strike)
                })
                .sum();
            (losses.call, losses.put, counted)
        }
        PainAccounting::NotionalValue => {
            let mut call = 0.0;
            let mut put = 0.0;
            let mut counted = 0;
            for p in chain.points() {
                if settle > p.strike {
                    call += p.call_open_interest * (settle - p.strike);
                    counted += usize::from(p.call_open_interest > 0.0);
                }
                if settle < p.strike {
                    put += p.put_open_interest * (p.strike - settle);
                    counted += usize::from(p.put_open_interest > 0.0);
                }
            }
            (call, put, counted)
        }
    };
    PainResult {
        strike: settle,
        call_losses,
        put_losses,
        total_losses: call_losses + put_losses,
        in_the_money,
    }
}

/// Find the max-pain strike over the chain's own strikes.
///
/// Returns `None` for an empty chain. O(n²).
///
/// # Examples
///
/// ```
/// use maxpain::chain::{OptionChain, OptionChainPoint};
/// use maxpain::maxpain::{solve, PainAccounting};
///
/// let chain = OptionChain::new(vec![
///     OptionChainPoint::new(90.0, 0.0, 50.0),
///     OptionChainPoint::new(100.0, 20.0, 20.0),
///     OptionChainPoint::new(110.0, 50.0, 0.0),
/// ])?;
/// let mp = solve(&chain, PainAccounting::IntrinsicLoss).unwrap();
/// assert_eq!(mp.strike, 100.0);
/// assert_eq!(mp.attraction_levels(2).len(), 2);
/// # Ok::<(), maxpain::MaxPainError>(())
/// ```
pub fn solve(chain: &OptionChain, accounting: PainAccounting) -> Option<MaxPain> {
    let mut ranked: Vec<PainResult> = chain
        .strikes()
        .map(|s| pain_at(chain, s, accounting))
        .collect();
    // Stable: equal totals keep ascending strike order.
    ranked.sort_by(|a, b| a.total_losses.total_cmp(&b.total_losses));
    let strike = ranked.first()?.strike;
    Some(MaxPain {
        strike,
        accounting,
        ranked,
    })
}

/// Where the current price sits relative to max pain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PainSide {
    /// Within the proximity band.
    Near,
    /// Below the band: settlement pressure points up.
    Below,
    /// Above the band: settlement pressure points down.
    Above,
}

/// Distance from the current price to the max-pain strike.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MaxPainPosition {
    /// `price − strike`.
    pub distance: f64,
    /// `distance / strike`.
    pub relative_distance: f64,
    /// Band classification.
    pub side: PainSide,
}

/// Classify `price` against the max-pain strike with a relative `proximity` band.
pub fn position(max_pain_strike: f64, price: f64, proximity: f64) -> MaxPainPosition {
    let distance = price - max_pain_strike;
    let relative_distance = distance / max_pain_strike;
    let side = if relative_distance.abs() <= proximity {
        PainSide::Near
    } else if price < max_pain_strike {
        PainSide::Below
    } else {
        PainSide::Above
    };
    MaxPainPosition {
        distance,
        relative_distance,
        side,
    }
}
