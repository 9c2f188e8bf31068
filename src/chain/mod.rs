//! Option-chain snapshot model.
//!
//! An [`OptionChain`] is the single input every analytic consumes: one
//! [`OptionChainPoint`] per strike, aggregating both sides, sorted by strike
//! and validated once at construction. Chains are immutable; analyses borrow
//! them and never mutate.
//!
//! Raw per-side rows can be merged into a chain with
//! [`OptionChain::from_quotes`].

pub mod merge;

pub use merge::SideQuote;

use serde::{Deserialize, Serialize};

use crate::error::{self, MaxPainError};
use crate::validate::{validate_finite, validate_non_negative, validate_positive};

/// Aggregated call and put state at one strike.
///
/// Prices are theoretical or mark values in underlying-price units. Greeks
/// default to zero when the data source does not publish them.
///
/// # Examples
///
/// ```
/// use maxpain::chain::OptionChainPoint;
///
/// let point = OptionChainPoint::new(100.0, 250.0, 180.0)
///     .with_prices(4.2, 3.1)
///     .with_implied_vol(0.55);
/// assert_eq!(point.strike, 100.0);
/// assert_eq!(point.call_price, 4.2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OptionChainPoint {
    /// Strike price.
    pub strike: f64,
    /// Outstanding call contracts.
    pub call_open_interest: f64,
    /// Outstanding put contracts.
    pub put_open_interest: f64,
    /// Implied volatility, zero when unknown.
    pub implied_vol: f64,
    /// Call theoretical value.
    pub call_price: f64,
    /// Put theoretical value.
    pub put_price: f64,
    /// Call delta.
    pub call_delta: f64,
    /// Call gamma.
    pub call_gamma: f64,
    /// Put delta.
    pub put_delta: f64,
    /// Put gamma.
    pub put_gamma: f64,
}

impl OptionChainPoint {
    /// Create a point with open interest only; prices, vol and greeks are zero.
    pub fn new(strike: f64, call_open_interest: f64, put_open_interest: f64) -> Self {
        Self {
            strike,
            call_open_interest,
            put_open_interest,
            ..Self::default()
        }
    }

    /// Set the call and put theoretical prices.
    pub fn with_prices(mut self, call_price: f64, put_price: f64) -> Self {
        self.call_price = call_price;
        self.put_price = put_price;
        self
    }

    /// Set the implied volatility.
    pub fn with_implied_vol(mut self, implied_vol: f64) -> Self {
        self.implied_vol = implied_vol;
        self
    }

    /// Set delta and gamma for both sides.
    pub fn with_greeks(
        mut self,
        call_delta: f64,
        call_gamma: f64,
        put_delta: f64,
        put_gamma: f64,
    ) -> Self {
        self.call_delta = call_delta;
        self.call_gamma = call_gamma;
        self.put_delta = put_delta;
        self.put_gamma = put_gamma;
        self
    }

    /// Combined call and put open interest.
    pub fn total_open_interest(&self) -> f64 {
        self.call_open_interest + self.put_open_interest
    }

    fn validate(&self) -> error::Result<()> {
        validate_positive(self.strike, "strike")?;
        let at = self.strike;
        let checks = [
            (self.call_open_interest, "call_open_interest"),
            (self.put_open_interest, "put_open_interest"),
            (self.implied_vol, "implied_vol"),
            (self.call_price, "call_price"),
            (self.put_price, "put_price"),
        ];
        for (value, name) in checks {
            validate_non_negative(value, &format!("{name} at strike {at}"))?;
        }
        let greeks = [
            (self.call_delta, "call_delta"),
            (self.call_gamma, "call_gamma"),
            (self.put_delta, "put_delta"),
            (self.put_gamma, "put_gamma"),
        ];
        for (value, name) in greeks {
            validate_finite(value, &format!("{name} at strike {at}"))?;
        }
        Ok(())
    }
}

/// Validated, strike-ascending, duplicate-free option chain for one expiry.
///
/// # Examples
///
/// ```
/// use maxpain::chain::{OptionChain, OptionChainPoint};
///
/// let chain = OptionChain::new(vec![
///     OptionChainPoint::new(110.0, 0.0, 10.0),
///     OptionChainPoint::new(100.0, 10.0, 0.0),
/// ])?;
/// assert_eq!(chain.strikes().collect::<Vec<_>>(), vec![100.0, 110.0]);
/// assert_eq!(chain.total_call_open_interest(), 10.0);
/// # Ok::<(), maxpain::MaxPainError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<OptionChainPoint>", into = "Vec<OptionChainPoint>")]
pub struct OptionChain {
    points: Vec<OptionChainPoint>,
}

impl OptionChain {
    /// Validate and sort a set of per-strike points.
    ///
    /// # Errors
    /// Returns [`MaxPainError::InvalidInput`] if any strike is non-positive
    /// or non-finite, any open interest, price or vol is negative or
    /// non-finite, any greek is non-finite, or two points share a strike.
    pub fn new(mut points: Vec<OptionChainPoint>) -> error::Result<Self> {
        for point in &points {
            point.validate()?;
        }
        points.sort_by(|a, b| a.strike.total_cmp(&b.strike));
        if let Some(pair) = points.windows(2).find(|w| w[0].strike == w[1].strike) {
            return Err(MaxPainError::InvalidInput {
                message: format!("duplicate strike {} in chain", pair[0].strike),
            });
        }
        Ok(Self { points })
    }

    /// An empty chain. Every analytic returns its "no data" result for it.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Points in ascending strike order.
    pub fn points(&self) -> &[OptionChainPoint] {
        &self.points
    }

    /// Number of strikes.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the chain has no strikes.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Strikes in ascending order.
    pub fn strikes(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.strike)
    }

    /// Lowest listed strike.
    pub fn min_strike(&self) -> Option<f64> {
        self.points.first().map(|p| p.strike)
    }

    /// Highest listed strike.
    pub fn max_strike(&self) -> Option<f64> {
        self.points.last().map(|p| p.strike)
    }

    /// Σ call open interest.
    pub fn total_call_open_interest(&self) -> f64 {
        self.points.iter().map(|p| p.call_open_interest).sum()
    }

    /// Σ put open interest.
    pub fn total_put_open_interest(&self) -> f64 {
        self.points.iter().map(|p| p.put_open_interest).sum()
    }

    /// Whether delta/gamma exposure can be aggregated from this chain.
    ///
    /// Requires a non-empty chain where every side carrying open interest
    /// publishes a non-zero delta. A zero delta on a side with open interest
    /// means the source did not provide greeks for that row.
    pub fn greeks_available(&self) -> bool {
        !self.is_empty() && self.first_missing_greek().is_none()
    }

    /// First strike whose open-interest-carrying side lacks a delta.
    pub(crate) fn first_missing_greek(&self) -> Option<f64> {
        self.points
            .iter()
            .find(|p| {
                (p.call_open_interest > 0.0 && p.call_delta == 0.0)
                    || (p.put_open_interest > 0.0 && p.put_delta == 0.0)
            })
            .map(|p| p.strike)
    }
}

impl TryFrom<Vec<OptionChainPoint>> for OptionChain {
    type Error = MaxPainError;

    fn try_from(points: Vec<OptionChainPoint>) -> error::Result<Self> {
        Self::new(points)
    }
}

impl From<OptionChain> for Vec<OptionChainPoint> {
    fn from(chain: OptionChain) -> Self {
        chain.points
    }
}
