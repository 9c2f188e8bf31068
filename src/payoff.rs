//! Expiry payoff reconstruction over an option chain.
//!
//! Every solver in the crate reduces to these sums. Each evaluation is
//! O(n) in the number of strikes; sweeping m prices costs O(n·m).
//!
//! "Holder loss" follows the market convention used by max-pain analysis:
//! the intrinsic value the option writers owe at settlement, i.e. what the
//! buyers collectively extract. Minimizing it maximizes the buyers' pain.

use serde::{Deserialize, Serialize};

use crate::chain::OptionChain;

/// Aggregate intrinsic value owed on each side at one settlement price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LossComponents {
    /// Σ callOI · max(0, s − K).
    pub call: f64,
    /// Σ putOI · max(0, K − s).
    pub put: f64,
    /// `call + put`.
    pub total: f64,
}

impl LossComponents {
    /// Component-wise `(self − other) / step`.
    pub(crate) fn slope_from(&self, other: &LossComponents, step: f64) -> LossComponents {
        LossComponents {
            call: (self.call - other.call) / step,
            put: (self.put - other.put) / step,
            total: (self.total - other.total) / step,
        }
    }
}

/// Seller profit and loss at one underlying price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PnlSample {
    /// Underlying price.
    pub price: f64,
    /// `call_pnl + put_pnl`.
    pub total_pnl: f64,
    /// Premium collected on calls minus call payout.
    pub call_pnl: f64,
    /// Premium collected on puts minus put payout.
    pub put_pnl: f64,
}

/// Premium collected by writers across the chain.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Premium {
    /// Σ callOI · callPrice.
    pub call: f64,
    /// Σ putOI · putPrice.
    pub put: f64,
    /// `call + put`.
    pub total: f64,
}

/// Σ callOI · max(0, s − K).
pub fn holder_call_loss(chain: &OptionChain, settle_price: f64) -> f64 {
    chain
        .points()
        .iter()
        .map(|p| p.call_open_interest * (settle_price - p.strike).max(0.0))
        .sum()
}

/// Σ putOI · max(0, K − s).
pub fn holder_put_loss(chain: &OptionChain, settle_price: f64) -> f64 {
    chain
        .points()
        .iter()
        .map(|p| p.put_open_interest * (p.strike - settle_price).max(0.0))
        .sum()
}

/// Call, put and total holder loss in one pass.
pub fn holder_losses(chain: &OptionChain, settle_price: f64) -> LossComponents {
    let (call, put) = chain.points().iter().fold((0.0, 0.0), |(c, p), pt| {
        (
            c + pt.call_open_interest * (settle_price - pt.strike).max(0.0),
            p + pt.put_open_interest * (pt.strike - settle_price).max(0.0),
        )
    });
    LossComponents {
        call,
        put,
        total: call + put,
    }
}

/// Σ callOI · (callPrice − max(0, p − K)).
pub fn seller_call_pnl(chain: &OptionChain, price: f64) -> f64 {
    chain
        .points()
        .iter()
        .map(|p| p.call_open_interest * (p.call_price - (price - p.strike).max(0.0)))
        .sum()
}

/// Σ putOI · (putPrice − max(0, K − p)).
pub fn seller_put_pnl(chain: &OptionChain, price: f64) -> f64 {
    chain
        .points()
        .iter()
        .map(|p| p.put_open_interest * (p.put_price - (p.strike - price).max(0.0)))
        .sum()
}

/// Seller PnL split by side at `price`.
pub fn seller_pnl(chain: &OptionChain, price: f64) -> PnlSample {
    let call_pnl = seller_call_pnl(chain, price);
    let put_pnl = seller_put_pnl(chain, price);
    PnlSample {
        price,
        total_pnl: call_pnl + put_pnl,
        call_pnl,
        put_pnl,
    }
}

/// Premium collected by writers on each side.
pub fn premium(chain: &OptionChain) -> Premium {
    let (call, put) = chain.points().iter().fold((0.0, 0.0), |(c, p), pt| {
        (
            c + pt.call_open_interest * pt.call_price,
            p + pt.put_open_interest * pt.put_price,
        )
    });
    Premium {
        call,
        put,
        total: call + put,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::tests::{sample_chain, two_strike_chain};
    use approx::assert_abs_diff_eq;

    #[test]
    fn holder_losses_at_strikes() {
        let chain = two_strike_chain();
        // At 105: calls 10·5, puts 10·5
        assert_eq!(holder_call_loss(&chain, 105.0), 50.0);
        assert_eq!(holder_put_loss(&chain, 105.0), 50.0);
        let l = holder_losses(&chain, 105.0);
        assert_eq!(l.total, 100.0);
    }

    #[test]
    fn holder_losses_zero_out_of_the_money() {
        let chain = two_strike_chain();
        assert_eq!(holder_call_loss(&chain, 95.0), 0.0);
        assert_eq!(holder_put_loss(&chain, 115.0), 0.0);
    }

    #[test]
    fn combined_pass_matches_separate_sums() {
        let chain = sample_chain();
        for s in [70.0, 92.5, 100.0, 107.3, 130.0] {
            let l = holder_losses(&chain, s);
            assert_abs_diff_eq!(l.call, holder_call_loss(&chain, s), epsilon = 1e-9);
            assert_abs_diff_eq!(l.put, holder_put_loss(&chain, s), epsilon = 1e-9);
        }
    }

    #[test]
    fn seller_keeps_full_premium_between_strikes() {
        let chain = two_strike_chain();
        let pnl = seller_pnl(&chain, 100.0);
        // Calls at 100 settle worthless at 100, puts at 110 pay 10 each
        assert_eq!(pnl.call_pnl, 50.0);
        assert_eq!(pnl.put_pnl, 10.0 * (5.0 - 10.0));
        assert_eq!(pnl.total_pnl, pnl.call_pnl + pnl.put_pnl);
    }

    #[test]
    fn seller_pnl_equals_premium_minus_holder_loss() {
        let chain = sample_chain();
        let prem = premium(&chain);
        for s in [75.0, 98.0, 104.0, 125.0] {
            let pnl = seller_pnl(&chain, s);
            let loss = holder_losses(&chain, s);
            assert_abs_diff_eq!(pnl.total_pnl, prem.total - loss.total, epsilon = 1e-9);
        }
    }

    #[test]
    fn empty_chain_sums_to_zero() {
        let chain = OptionChain::empty();
        assert_eq!(holder_losses(&chain, 100.0).total, 0.0);
        assert_eq!(seller_pnl(&chain, 100.0).total_pnl, 0.0);
        assert_eq!(premium(&chain).total, 0.0);
    }
}
