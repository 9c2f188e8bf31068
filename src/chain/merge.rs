//! Merging raw per-side quotes into per-strike chain points.
//!
//! Data sources usually publish one row per instrument (one call row and one
//! put row per strike). The analytics need one row per strike, so the sides
//! are folded together here before the chain is validated.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{OptionChain, OptionChainPoint};
use crate::error::{self, MaxPainError};
use crate::types::OptionType;
use crate::validate::validate_positive;

/// One side of one strike as published by a data source.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SideQuote {
    /// Strike price.
    pub strike: f64,
    /// Which side this row describes.
    pub option_type: OptionType,
    /// Outstanding contracts.
    pub open_interest: f64,
    /// Mark or theoretical value in underlying-price units.
    pub mark_price: f64,
    /// Implied volatility, zero when unknown.
    #[serde(default)]
    pub implied_vol: f64,
    /// Delta, zero when unknown.
    #[serde(default)]
    pub delta: f64,
    /// Gamma, zero when unknown.
    #[serde(default)]
    pub gamma: f64,
}

/// Strike key that orders floats totally so they can live in a `BTreeMap`.
#[derive(Debug, Clone, Copy, PartialEq)]
struct StrikeKey(f64);

impl Eq for StrikeKey {}

impl PartialOrd for StrikeKey {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for StrikeKey {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.total_cmp(&other.0)
    }
}

#[derive(Default)]
struct Sides {
    call: Option<SideQuote>,
    put: Option<SideQuote>,
}

impl OptionChain {
    /// Build a chain by merging call and put rows that share a strike.
    ///
    /// A strike with only one side listed gets zeros for the other side.
    /// When both sides publish an implied vol the call side's is kept,
    /// otherwise whichever side has one.
    ///
    /// # Errors
    /// Returns [`MaxPainError::InvalidInput`] if two rows describe the same
    /// (strike, side) pair, if a strike is invalid, or if the merged points
    /// fail [`OptionChain::new`] validation.
    ///
    /// # Examples
    ///
    /// ```
    /// use maxpain::chain::{OptionChain, SideQuote};
    /// use maxpain::OptionType;
    ///
    /// let quotes = [
    ///     SideQuote { strike: 100.0, option_type: OptionType::Call, open_interest: 12.0,
    ///                 mark_price: 3.5, implied_vol: 0.6, delta: 0.52, gamma: 0.01 },
    ///     SideQuote { strike: 100.0, option_type: OptionType::Put, open_interest: 7.0,
    ///                 mark_price: 3.1, implied_vol: 0.62, delta: -0.48, gamma: 0.01 },
    /// ];
    /// let chain = OptionChain::from_quotes(&quotes)?;
    /// assert_eq!(chain.len(), 1);
    /// assert_eq!(chain.points()[0].put_open_interest, 7.0);
    /// # Ok::<(), maxpain::MaxPainError>(())
    /// ```
    pub fn from_quotes(quotes: &[SideQuote]) -> error::Result<Self> {
        let mut by_strike: BTreeMap<StrikeKey, Sides> = BTreeMap::new();
        for quote in quotes {
            validate_positive(quote.strike, "strike")?;
            let sides = by_strike.entry(StrikeKey(quote.strike)).or_default();
            let slot = match quote.option_type {
                OptionType::Call => &mut sides.call,
                OptionType::Put => &mut sides.put,
            };
            if slot.is_some() {
                return Err(MaxPainError::InvalidInput {
                    message: format!(
                        "duplicate {:?} quote at strike {}",
                        quote.option_type, quote.strike
                    ),
                });
            }
            *slot = Some(*quote);
        }

        let points = by_strike
            .into_iter()
            .map(|(StrikeKey(strike), sides)| merge_sides(strike, &sides))
            .collect();
        OptionChain::new(points)
    }
}

fn merge_sides(strike: f64, sides: &Sides) -> OptionChainPoint {
    let mut point = OptionChainPoint::new(strike, 0.0, 0.0);
    if let Some(call) = sides.call {
        point.call_open_interest = call.open_interest;
        point.call_price = call.mark_price;
        point.call_delta = call.delta;
        point.call_gamma = call.gamma;
    }
    if let Some(put) = sides.put {
        point.put_open_interest = put.open_interest;
        point.put_price = put.mark_price;
        point.put_delta = put.delta;
        point.put_gamma = put.gamma;
    }
    point.implied_vol = match (sides.call, sides.put) {
        (Some(call), _) if call.implied_vol > 0.0 => call.implied_vol,
        (_, Some(put)) => put.implied_vol,
        _ => 0.0,
    };
    point
}
