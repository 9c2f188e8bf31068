//! Zero crossings, profit zones and extremes of a sampled seller PnL curve.

use serde::{Deserialize, Serialize};

use crate::curve::builder::PnlCurve;
use crate::payoff::PnlSample;
use crate::search::{crosses_zero, linear_root};

/// A maximal price range where writers are at or above break-even.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProfitZone {
    /// Lower edge.
    pub lower: f64,
    /// Upper edge.
    pub upper: f64,
    /// The lower edge is the first sample of the curve, not a crossing:
    /// the zone may extend further down.
    pub open_below: bool,
    /// The upper edge is the last sample of the curve.
    pub open_above: bool,
    /// Price of the first profitable sample in the run.
    pub first_sample: f64,
    /// Price of the last profitable sample in the run.
    pub last_sample: f64,
}

impl ProfitZone {
    /// `upper − lower`.
    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }

    /// Whether `price` lies within the zone, edges included.
    pub fn contains(&self, price: f64) -> bool {
        price >= self.lower && price <= self.upper
    }

    /// Distance from `price` to the closer edge; zero inside the zone.
    pub fn distance_to(&self, price: f64) -> f64 {
        if self.contains(price) {
            0.0
        } else {
            (self.lower - price).abs().min((self.upper - price).abs())
        }
    }
}

/// Which fifth of the break-even band a price falls in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BandZone {
    /// Position below 0.2.
    NearLower,
    /// Position in [0.2, 0.4).
    LowerHalf,
    /// Position in [0.4, 0.6].
    Middle,
    /// Position in (0.6, 0.8].
    UpperHalf,
    /// Position above 0.8.
    NearUpper,
}

impl BandZone {
    fn classify(position: f64) -> Self {
        if position < 0.2 {
            BandZone::NearLower
        } else if position < 0.4 {
            BandZone::LowerHalf
        } else if position <= 0.6 {
            BandZone::Middle
        } else if position <= 0.8 {
            BandZone::UpperHalf
        } else {
            BandZone::NearUpper
        }
    }
}

/// Which break-even is materially closer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BandSkew {
    /// The lower break-even is closer: downside room is thinner.
    Downside,
    /// The upper break-even is closer.
    Upside,
    /// Neither side is closer by the skew multiplier.
    Balanced,
}

/// The reference price's place between its nearest break-evens.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BreakEvenBand {
    /// Nearest break-even strictly below the reference.
    pub lower: f64,
    /// Nearest break-even strictly above the reference.
    pub upper: f64,
    /// `upper − lower`.
    pub width: f64,
    /// `(reference − lower) / width`, in (0, 1).
    pub position: f64,
    /// Fifth of the band containing `position`.
    pub zone: BandZone,
    /// Proximity skew.
    pub skew: BandSkew,
}

impl BreakEvenBand {
    /// Build the band around `reference`; `None` when the edges do not
    /// bracket it.
    pub fn new(lower: f64, upper: f64, reference: f64, skew_multiplier: f64) -> Option<Self> {
        if !(lower < reference && reference < upper) {
            return None;
        }
        let width = upper - lower;
        let position = (reference - lower) / width;
        let to_lower = reference - lower;
        let to_upper = upper - reference;
        let skew = if to_lower * skew_multiplier < to_upper {
            BandSkew::Downside
        } else if to_upper * skew_multiplier < to_lower {
            BandSkew::Upside
        } else {
            BandSkew::Balanced
        };
        Some(Self {
            lower,
            upper,
            width,
            position,
            zone: BandZone::classify(position),
            skew,
        })
    }
}

/// Break-even structure of a curve relative to a reference price.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BreakEvenAnalysis {
    /// Every zero crossing, ascending.
    pub points: Vec<f64>,
    /// Profit zones, ascending.
    pub zones: Vec<ProfitZone>,
    /// Highest break-even strictly below the reference.
    pub nearest_below: Option<f64>,
    /// Lowest break-even strictly above the reference.
    pub nearest_above: Option<f64>,
    /// Sample with the greatest seller PnL (lowest price on ties).
    pub max_profit: Option<PnlSample>,
    /// Sample with the smallest seller PnL (lowest price on ties).
    pub max_loss: Option<PnlSample>,
    /// Present when both nearest break-evens exist.
    pub band: Option<BreakEvenBand>,
}

impl BreakEvenAnalysis {
    /// The profit zone nearest `price`, by distance to its closer edge.
    ///
    /// A zone containing the price wins outright. The lower zone wins ties.
    pub fn nearest_profit_zone(&self, price: f64) -> Option<&ProfitZone> {
        self.zones
            .iter()
            .min_by(|a, b| a.distance_to(price).total_cmp(&b.distance_to(price)))
    }
}

/// Interpolated zero crossings of `total_pnl`, ascending.
///
/// Zero counts as non-negative, so a curve touching zero and turning back up
/// yields no crossing, while one that reaches zero and then goes negative
/// yields one.
///
/// # Examples
///
/// ```
/// use maxpain::curve::find_break_evens;
/// use maxpain::payoff::PnlSample;
///
/// let sample = |price: f64, pnl: f64| PnlSample {
///     price,
///     total_pnl: pnl,
///     call_pnl: pnl,
///     put_pnl: 0.0,
/// };
/// let points = find_break_evens(&[sample(-10.0, -100.0), sample(10.0, 100.0)]);
/// assert_eq!(points, vec![0.0]);
/// ```
pub fn find_break_evens(samples: &[PnlSample]) -> Vec<f64> {
    samples
        .windows(2)
        .filter(|w| crosses_zero(w[0].total_pnl, w[1].total_pnl))
        .map(|w| crossing(&w[0], &w[1]))
        .collect()
}

fn crossing(a: &PnlSample, b: &PnlSample) -> f64 {
    linear_root(a.price, a.total_pnl, b.price, b.total_pnl)
}

/// Maximal runs of non-negative seller PnL.
///
/// Interior edges sit on the interpolated break-even; edges at either end of
/// the sampled domain use the boundary sample and are flagged open. The
/// sampled extent of each run is kept alongside as `first_sample` and
/// `last_sample`.
pub fn profit_zones(samples: &[PnlSample]) -> Vec<ProfitZone> {
    let mut zones = Vec::new();
    let last = samples.len().saturating_sub(1);
    let mut start: Option<usize> = None;

    for (i, s) in samples.iter().enumerate() {
        let profitable = s.total_pnl >= 0.0;
        match (start, profitable) {
            (None, true) => start = Some(i),
            (Some(from), false) => {
                zones.push(zone_between(samples, from, i - 1, last));
                start = None;
            }
            _ => {}
        }
    }
    if let Some(from) = start {
        zones.push(zone_between(samples, from, last, last));
    }
    zones
}

fn zone_between(samples: &[PnlSample], from: usize, to: usize, last: usize) -> ProfitZone {
    let open_below = from == 0;
    let open_above = to == last;
    let lower = if open_below {
        samples[from].price
    } else {
        crossing(&samples[from - 1], &samples[from])
    };
    let upper = if open_above {
        samples[to].price
    } else {
        crossing(&samples[to], &samples[to + 1])
    };
    ProfitZone {
        lower,
        upper,
        open_below,
        open_above,
        first_sample: samples[from].price,
        last_sample: samples[to].price,
    }
}

/// Break-evens, profit zones and extremes of `curve` around `reference`.
///
/// `skew_multiplier` sets how much closer one break-even must be before the
/// band is reported as skewed. An always-losing curve yields no points and
/// no zones; the extremes are still reported.
pub fn analyze_break_evens(
    curve: &PnlCurve,
    reference: f64,
    skew_multiplier: f64,
) -> BreakEvenAnalysis {
    let samples = &curve.samples;
    let points = find_break_evens(samples);
    let zones = profit_zones(samples);

    let nearest_below = points.iter().rev().copied().find(|&b| b < reference);
    let nearest_above = points.iter().copied().find(|&b| b > reference);

    let mut max_profit: Option<PnlSample> = None;
    let mut max_loss: Option<PnlSample> = None;
    for s in samples {
        if max_profit.is_none_or(|m| s.total_pnl > m.total_pnl) {
            max_profit = Some(*s);
        }
        if max_loss.is_none_or(|m| s.total_pnl < m.total_pnl) {
            max_loss = Some(*s);
        }
    }

    let band = match (nearest_below, nearest_above) {
        (Some(lower), Some(upper)) => {
            BreakEvenBand::new(lower, upper, reference, skew_multiplier)
        }
        _ => None,
    };

    BreakEvenAnalysis {
        points,
        zones,
        nearest_below,
        nearest_above,
        max_profit,
        max_loss,
        band,
    }
}
