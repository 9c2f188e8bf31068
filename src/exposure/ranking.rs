//! Strike rankings by open interest and nearby support/resistance.

use serde::{Deserialize, Serialize};

use crate::chain::{OptionChain, OptionChainPoint};
use crate::types::LevelRole;

/// One strike in an open-interest ranking.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RankedStrike {
    /// Strike price.
    pub strike: f64,
    /// Call open interest at the strike.
    pub call_open_interest: f64,
    /// Put open interest at the strike.
    pub put_open_interest: f64,
    /// Combined open interest.
    pub total_open_interest: f64,
    /// Resistance when calls outnumber puts, otherwise support.
    pub role: LevelRole,
}

impl From<&OptionChainPoint> for RankedStrike {
    fn from(p: &OptionChainPoint) -> Self {
        Self {
            strike: p.strike,
            call_open_interest: p.call_open_interest,
            put_open_interest: p.put_open_interest,
            total_open_interest: p.total_open_interest(),
            role: LevelRole::from_open_interest(p.call_open_interest, p.put_open_interest),
        }
    }
}

/// Top strikes by call, put and combined open interest.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OpenInterestRanking {
    /// Highest call open interest first.
    pub by_call: Vec<RankedStrike>,
    /// Highest put open interest first.
    pub by_put: Vec<RankedStrike>,
    /// Highest combined open interest first.
    pub by_total: Vec<RankedStrike>,
}

/// Rank the top `n` strikes by call, put and combined open interest.
///
/// Sorting is stable and descending; equal open interest keeps the chain's
/// ascending strike order.
///
/// # Examples
///
/// ```
/// use maxpain::chain::{OptionChain, OptionChainPoint};
/// use maxpain::exposure::open_interest_ranking;
/// use maxpain::LevelRole;
///
/// let chain = OptionChain::new(vec![
///     OptionChainPoint::new(90.0, 5.0, 40.0),
///     OptionChainPoint::new(100.0, 30.0, 30.0),
///     OptionChainPoint::new(110.0, 50.0, 5.0),
/// ])?;
/// let ranking = open_interest_ranking(&chain, 2);
/// assert_eq!(ranking.by_call[0].strike, 110.0);
/// assert_eq!(ranking.by_total[0].strike, 100.0);
/// assert_eq!(ranking.by_total[1].role, LevelRole::Resistance);
/// # Ok::<(), maxpain::MaxPainError>(())
/// ```
pub fn open_interest_ranking(chain: &OptionChain, n: usize) -> OpenInterestRanking {
    let top = |key: fn(&OptionChainPoint) -> f64| -> Vec<RankedStrike> {
        let mut points: Vec<&OptionChainPoint> = chain.points().iter().collect();
        points.sort_by(|a, b| key(b).total_cmp(&key(a)));
        points.into_iter().take(n).map(RankedStrike::from).collect()
    };
    OpenInterestRanking {
        by_call: top(|p| p.call_open_interest),
        by_put: top(|p| p.put_open_interest),
        by_total: top(|p| p.total_open_interest()),
    }
}

/// A support or resistance strike near the current price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KeyLevel {
    /// Strike price.
    pub strike: f64,
    /// Dominant-side OI over the other side's OI, `None` when the other is zero.
    pub dominance_ratio: Option<f64>,
}

/// Support and resistance strikes adjacent to a price.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NearbyLevels {
    /// Call-dominated strikes above the price, nearest first.
    pub resistance: Vec<KeyLevel>,
    /// Put-dominated strikes below the price, nearest first.
    pub support: Vec<KeyLevel>,
}

impl NearbyLevels {
    /// Lowest resistance strike above the price.
    pub fn nearest_resistance(&self) -> Option<f64> {
        self.resistance.first().map(|l| l.strike)
    }

    /// Highest support strike below the price.
    pub fn nearest_support(&self) -> Option<f64> {
        self.support.first().map(|l| l.strike)
    }
}

/// Inspect the `window` strikes on each side of `price`.
///
/// Of the `window` nearest strikes strictly above the price, those where
/// call open interest exceeds put open interest are resistance; of the
/// `window` nearest strictly below, those where puts exceed calls are
/// support.
pub fn nearby_levels(chain: &OptionChain, price: f64, window: usize) -> NearbyLevels {
    let points = chain.points();
    let split = points.partition_point(|p| p.strike <= price);
    let below_end = points.partition_point(|p| p.strike < price);

    let resistance = points[split..]
        .iter()
        .take(window)
        .filter(|p| p.call_open_interest > p.put_open_interest)
        .map(|p| KeyLevel {
            strike: p.strike,
            dominance_ratio: (p.put_open_interest > 0.0)
                .then(|| p.call_open_interest / p.put_open_interest),
        })
        .collect();

    let support = points[..below_end]
        .iter()
        .rev()
        .take(window)
        .filter(|p| p.put_open_interest > p.call_open_interest)
        .map(|p| KeyLevel {
            strike: p.strike,
            dominance_ratio: (p.call_open_interest > 0.0)
                .then(|| p.put_open_interest / p.call_open_interest),
        })
        .collect();

    NearbyLevels {
        resistance,
        support,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::tests::sample_chain;

    fn chain(rows: &[(f64, f64, f64)]) -> OptionChain {
        OptionChain::new(
            rows.iter()
                .map(|&(k, c, p)| OptionChainPoint::new(k, c, p))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn ties_broken_by_ascending_strike() {
        let c = chain(&[(120.0, 10.0, 0.0), (100.0, 10.0, 0.0), (110.0, 10.0, 0.0)]);
        let r = open_interest_ranking(&c, 3);
        let strikes: Vec<f64> = r.by_call.iter().map(|s| s.strike).collect();
        assert_eq!(strikes, vec![100.0, 110.0, 120.0]);
    }

    #[test]
    fn ranking_truncates_to_n() {
        let r = open_interest_ranking(&sample_chain(), 5);
        assert_eq!(r.by_call.len(), 5);
        assert_eq!(r.by_call[0].strike, 110.0);
        assert_eq!(r.by_put[0].strike, 90.0);
        for pair in r.by_total.windows(2) {
            assert!(pair[0].total_open_interest >= pair[1].total_open_interest);
        }
    }

    #[test]
    fn ranking_of_empty_chain_is_empty() {
        let r = open_interest_ranking(&OptionChain::empty(), 5);
        assert!(r.by_call.is_empty() && r.by_put.is_empty() && r.by_total.is_empty());
    }

    #[test]
    fn roles_follow_dominant_side() {
        let r = open_interest_ranking(&sample_chain(), 9);
        for s in &r.by_total {
            let expected = if s.call_open_interest > s.put_open_interest {
                LevelRole::Resistance
            } else {
                LevelRole::Support
            };
            assert_eq!(s.role, expected);
        }
    }

    #[test]
    fn nearby_levels_filter_by_dominance() {
        let levels = nearby_levels(&sample_chain(), 100.0, 3);
        let res: Vec<f64> = levels.resistance.iter().map(|l| l.strike).collect();
        let sup: Vec<f64> = levels.support.iter().map(|l| l.strike).collect();
        assert_eq!(res, vec![105.0, 110.0, 115.0]);
        assert_eq!(sup, vec![95.0, 90.0, 85.0]);
        assert_eq!(levels.nearest_resistance(), Some(105.0));
        assert_eq!(levels.nearest_support(), Some(95.0));
    }

    #[test]
    fn window_counts_strikes_before_filtering() {
        // Second strike above is put-heavy: it consumes a window slot.
        let c = chain(&[
            (90.0, 1.0, 9.0),
            (110.0, 9.0, 1.0),
            (120.0, 1.0, 9.0),
            (130.0, 9.0, 0.0),
        ]);
        let levels = nearby_levels(&c, 100.0, 2);
        assert_eq!(levels.resistance.len(), 1);
        assert_eq!(levels.resistance[0].strike, 110.0);
        assert_eq!(levels.resistance[0].dominance_ratio, Some(9.0));

        let wide = nearby_levels(&c, 100.0, 3);
        assert_eq!(wide.resistance[1].strike, 130.0);
        assert_eq!(wide.resistance[1].dominance_ratio, None);
    }

    #[test]
    fn strike_at_price_is_neither_side() {
        let levels = nearby_levels(&chain(&[(100.0, 9.0, 1.0)]), 100.0, 3);
        assert!(levels.resistance.is_empty());
        assert!(levels.support.is_empty());
    }
}
