//! One-call analysis of an option chain.
//!
//! [`Analyzer`] owns a validated [`AnalysisConfig`] and runs every metric in
//! the crate against a chain and a current price, collecting the outputs in
//! an [`AnalysisResult`]. Independent expirations can be analyzed together
//! with [`Analyzer::analyze_all`], which fans out across threads when the
//! `parallel` feature is enabled.
//!
//! ```
//! use maxpain::{Analyzer, AnalysisConfig};
//! use maxpain::chain::{OptionChain, OptionChainPoint};
//!
//! let chain = OptionChain::new(vec![
//!     OptionChainPoint::new(90.0, 5.0, 40.0).with_prices(11.0, 0.5),
//!     OptionChainPoint::new(100.0, 30.0, 30.0).with_prices(3.0, 3.0),
//!     OptionChainPoint::new(110.0, 45.0, 5.0).with_prices(0.4, 10.5),
//! ])?;
//! let analyzer = Analyzer::new(AnalysisConfig::default())?;
//! let result = analyzer.analyze(&chain, 102.0)?;
//! assert_eq!(result.max_pain.as_ref().map(|m| m.strike), Some(100.0));
//! # Ok::<(), maxpain::MaxPainError>(())
//! ```

use serde::{Deserialize, Serialize};

use crate::chain::OptionChain;
use crate::config::AnalysisConfig;
use crate::curve::{self, BreakEvenAnalysis, PnlCurve, ProfitZone};
use crate::exposure::{
    self, CallPutRatio, CentersOfGravity, GravityBias, GreekExposure, IntrinsicAtPrice,
    NearbyLevels, OpenInterestRanking,
};
use crate::gradient::{self, GradientAnalysis, GradientAsymmetry};
use crate::maxpain::{self, MaxPainPosition, PainAccounting, PainResult};
use crate::payoff::{self, LossComponents, PnlSample, Premium};
use crate::scenario::{self, Scenario, ScenarioInputs};
use crate::validate::validate_positive;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Max pain under one accounting, with its strongest candidates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaxPainSummary {
    /// Winning strike.
    pub strike: f64,
    /// Accounting used.
    pub accounting: PainAccounting,
    /// Top candidates, best first.
    pub candidates: Vec<PainResult>,
    /// Current price relative to `strike`.
    pub position: MaxPainPosition,
}

/// Centers of gravity with their pull on the price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GravitySummary {
    /// Call and put centers and their midpoint.
    pub centers: CentersOfGravity,
    /// Direction of the pull, when both centers exist.
    pub bias: Option<GravityBias>,
    /// Holder losses if settlement landed on the call center.
    pub loss_at_call_center: Option<LossComponents>,
    /// Holder losses if settlement landed on the put center.
    pub loss_at_put_center: Option<LossComponents>,
    /// Holder losses if settlement landed on the equilibrium.
    pub loss_at_equilibrium: Option<LossComponents>,
}

/// The aggregate writer book at the current price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SellerPosition {
    /// Premium collected.
    pub premium: Premium,
    /// PnL evaluated exactly at the current price.
    pub current: PnlSample,
    /// `current.total_pnl / premium.total`, `None` without premium.
    pub pnl_to_premium: Option<f64>,
    /// Break-evens, profit zones, extremes and band.
    pub break_evens: BreakEvenAnalysis,
    /// Profit zone nearest the current price.
    pub nearest_profit_zone: Option<ProfitZone>,
    /// Holder-loss asymmetry around the current price.
    pub current_asymmetry: Option<GradientAsymmetry>,
    /// Sampled curve, kept only when configured.
    pub curve: Option<PnlCurve>,
}

/// Everything computed for one chain and price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Price the analysis was anchored on.
    pub current_price: f64,
    /// Number of strikes analyzed.
    pub strikes: usize,
    /// Call/put open-interest ratio and sentiment.
    pub open_interest: CallPutRatio,
    /// Top strikes by open interest.
    pub ranking: OpenInterestRanking,
    /// Support and resistance next to the price.
    pub levels: NearbyLevels,
    /// Max pain under intrinsic-loss accounting.
    pub max_pain: Option<MaxPainSummary>,
    /// Max pain under notional-value accounting.
    pub notional_max_pain: Option<MaxPainSummary>,
    /// Centers of gravity.
    pub gravity: GravitySummary,
    /// Holder payout split at the current price.
    pub intrinsic: IntrinsicAtPrice,
    /// Writer book.
    pub seller: SellerPosition,
    /// Gradient readings; `None` without max pain.
    pub gradients: Option<GradientAnalysis>,
    /// Delta and gamma exposure; `None` when the chain lacks greeks.
    pub greeks: Option<GreekExposure>,
    /// Scenario; `None` without max pain.
    pub scenario: Option<Scenario>,
}

/// A chain snapshot to analyze in a batch, typically one per expiration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainSnapshot {
    /// Caller's label, e.g. an expiration date.
    pub label: String,
    /// The chain.
    pub chain: OptionChain,
    /// Underlying price for this snapshot.
    pub current_price: f64,
}

/// Result of one snapshot in a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotAnalysis {
    /// Label copied from the snapshot.
    pub label: String,
    /// Analysis output.
    pub result: AnalysisResult,
}

/// Runs the full analysis with one configuration.
#[derive(Debug, Clone, Default)]
pub struct Analyzer {
    config: AnalysisConfig,
}

impl Analyzer {
    /// Create an analyzer.
    ///
    /// # Errors
    /// Returns [`MaxPainError::InvalidConfig`](crate::MaxPainError::InvalidConfig)
    /// when the configuration fails [`AnalysisConfig::validate`].
    pub fn new(config: AnalysisConfig) -> crate::error::Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Configuration in use.
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Analyze one chain at `current_price`.
    ///
    /// An empty chain is not an error: every block reports "no data".
    ///
    /// # Errors
    /// Returns [`MaxPainError::InvalidInput`](crate::MaxPainError::InvalidInput)
    /// when `current_price` is not positive and finite.
    pub fn analyze(
        &self,
        chain: &OptionChain,
        current_price: f64,
    ) -> crate::error::Result<AnalysisResult> {
        validate_positive(current_price, "current_price")?;
        let cfg = &self.config;

        #[cfg(feature = "logging")]
        tracing::debug!(strikes = chain.len(), current_price, "analysis started");

        let open_interest = exposure::call_put_ratio(chain, &cfg.sentiment);
        let ranking = exposure::open_interest_ranking(chain, cfg.top_n);
        let levels = exposure::nearby_levels(chain, current_price, cfg.level_window);

        let summarize = |accounting| {
            maxpain::solve(chain, accounting).map(|mp| MaxPainSummary {
                strike: mp.strike,
                accounting,
                candidates: mp.attraction_levels(cfg.top_n).to_vec(),
                position: maxpain::position(mp.strike, current_price, cfg.max_pain_proximity),
            })
        };
        let max_pain = summarize(PainAccounting::IntrinsicLoss);
        let notional_max_pain = summarize(PainAccounting::NotionalValue);

        let centers = exposure::centers_of_gravity(chain);
        let loss_at = |level: Option<f64>| level.map(|p| payoff::holder_losses(chain, p));
        let gravity = GravitySummary {
            centers,
            bias: exposure::gravity_bias(&centers, current_price),
            loss_at_call_center: loss_at(centers.call_center),
            loss_at_put_center: loss_at(centers.put_center),
            loss_at_equilibrium: loss_at(centers.equilibrium),
        };

        let intrinsic =
            exposure::intrinsic_at_price(chain, current_price, cfg.payout_dominance_multiplier);

        let gradients = max_pain.as_ref().and_then(|mp| {
            gradient::analyze_gradients(chain, mp.strike, current_price, &cfg.gradient)
        });

        let pnl_curve = curve::build_curve(chain, current_price, &cfg.curve);
        let break_evens =
            curve::analyze_break_evens(&pnl_curve, current_price, cfg.band_skew_multiplier);
        let premium = payoff::premium(chain);
        let current = payoff::seller_pnl(chain, current_price);
        let seller = SellerPosition {
            premium,
            current,
            pnl_to_premium: (premium.total > 0.0).then(|| current.total_pnl / premium.total),
            nearest_profit_zone: break_evens.nearest_profit_zone(current_price).copied(),
            break_evens,
            current_asymmetry: gradients.as_ref().map(|g| g.at_current.asymmetry),
            curve: cfg.retain_curve.then_some(pnl_curve),
        };

        let greeks = match exposure::greek_exposure(chain) {
            Ok(greeks) => Some(greeks),
            Err(_err) => {
                #[cfg(feature = "logging")]
                tracing::debug!(error = %_err, "greek exposure skipped");
                None
            }
        };

        let scenario = max_pain.as_ref().map(|mp| {
            let inputs = ScenarioInputs {
                price: current_price,
                max_pain: mp.strike,
                ratio: open_interest.ratio,
                centers: &centers,
                levels: &levels,
            };
            scenario::classify(&inputs, &cfg.scenario)
        });

        #[cfg(feature = "logging")]
        tracing::debug!(
            max_pain = ?max_pain.as_ref().map(|m| m.strike),
            break_evens = seller.break_evens.points.len(),
            scenario = ?scenario.as_ref().map(|s| s.kind),
            "analysis complete"
        );

        Ok(AnalysisResult {
            current_price,
            strikes: chain.len(),
            open_interest,
            ranking,
            levels,
            max_pain,
            notional_max_pain,
            gravity,
            intrinsic,
            seller,
            gradients,
            greeks,
            scenario,
        })
    }

    /// Analyze several independent snapshots, preserving their order.
    ///
    /// # Errors
    /// Fails on the first snapshot whose price is invalid.
    pub fn analyze_all(
        &self,
        snapshots: &[ChainSnapshot],
    ) -> crate::error::Result<Vec<SnapshotAnalysis>> {
        #[cfg(feature = "logging")]
        tracing::debug!(snapshots = snapshots.len(), "batch analysis started");

        let run = |snap: &ChainSnapshot| -> crate::error::Result<SnapshotAnalysis> {
            Ok(SnapshotAnalysis {
                label: snap.label.clone(),
                result: self.analyze(&snap.chain, snap.current_price)?,
            })
        };

        #[cfg(feature = "parallel")]
        let results = snapshots
            .par_iter()
            .map(run)
            .collect::<crate::error::Result<Vec<_>>>()?;
        #[cfg(not(feature = "parallel"))]
        let results = snapshots
            .iter()
            .map(run)
            .collect::<crate::error::Result<Vec<_>>>()?;

        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MaxPainError;
    use crate::chain::OptionChainPoint;
    use crate::chain::tests::{sample_chain, two_strike_chain};
    use crate::config::CurveConfig;

    #[test]
    fn rejects_bad_price() {
        let analyzer = Analyzer::default();
        for price in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let err = analyzer.analyze(&sample_chain(), price).unwrap_err();
            assert!(matches!(err, MaxPainError::InvalidInput { .. }));
        }
    }

    #[test]
    fn rejects_bad_config() {
        let config = AnalysisConfig {
            top_n: 0,
            ..AnalysisConfig::default()
        };
        assert!(matches!(
            Analyzer::new(config),
            Err(MaxPainError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn empty_chain_reports_no_data() {
        let r = Analyzer::default()
            .analyze(&OptionChain::empty(), 100.0)
            .unwrap();
        assert_eq!(r.strikes, 0);
        assert!(r.max_pain.is_none());
        assert!(r.notional_max_pain.is_none());
        assert!(r.gradients.is_none());
        assert!(r.scenario.is_none());
        assert!(r.greeks.is_none());
        assert!(r.seller.break_evens.points.is_empty());
        assert!(r.gravity.bias.is_none());
        assert_eq!(r.open_interest.sentiment, None);
    }

    #[test]
    fn two_strike_chain_settles_at_lower_strike() {
        let r = Analyzer::default().analyze(&two_strike_chain(), 105.0).unwrap();
        let mp = r.max_pain.unwrap();
        assert_eq!(mp.strike, 100.0);
        assert_eq!(mp.candidates.len(), 2);
        assert_eq!(mp.candidates[0].total_losses, 100.0);
        assert_eq!(mp.candidates[1].total_losses, 100.0);
        assert_eq!(r.notional_max_pain.unwrap().strike, 100.0);
    }

    #[test]
    fn sample_chain_produces_every_block() {
        let r = Analyzer::default().analyze(&sample_chain(), 104.0).unwrap();
        let mp = r.max_pain.as_ref().unwrap();
        assert_eq!(mp.candidates.len(), 5);
        assert!(r.gradients.is_some());
        assert!(r.scenario.is_some());
        assert!(r.gravity.loss_at_equilibrium.is_some());
        assert!(r.seller.current_asymmetry.is_some());
        assert!(r.seller.curve.is_none());
        assert_eq!(r.seller.current.price, 104.0);
        // No greeks were published for the sample chain.
        assert!(r.greeks.is_none());
    }

    #[test]
    fn retained_curve_matches_config() {
        let config = AnalysisConfig {
            retain_curve: true,
            curve: CurveConfig {
                price_step_fraction: 0.01,
                ..CurveConfig::default()
            },
            ..AnalysisConfig::default()
        };
        let r = Analyzer::new(config)
            .unwrap()
            .analyze(&sample_chain(), 100.0)
            .unwrap();
        let curve = r.seller.curve.unwrap();
        assert!(!curve.is_empty());
        assert!((curve.step - 1.0).abs() < 1e-12);
    }

    #[test]
    fn tiny_price_caps_curve_instead_of_overflowing() {
        let config = AnalysisConfig {
            retain_curve: true,
            curve: CurveConfig {
                max_samples: 1_000,
                ..CurveConfig::default()
            },
            ..AnalysisConfig::default()
        };
        let r = Analyzer::new(config)
            .unwrap()
            .analyze(&two_strike_chain(), 1e-300)
            .unwrap();
        let curve = r.seller.curve.unwrap();
        assert_eq!(curve.len(), 1_000);
        let (lo, hi) = curve.domain().unwrap();
        assert!((lo - 70.0).abs() < 1e-9);
        assert!(hi <= 143.0 + 1e-9);
    }

    #[test]
    fn greeks_reported_when_published() {
        let chain = OptionChain::new(vec![
            OptionChainPoint::new(100.0, 10.0, 20.0).with_greeks(0.6, 0.02, -0.4, 0.02),
        ])
        .unwrap();
        let r = Analyzer::default().analyze(&chain, 100.0).unwrap();
        assert!(r.greeks.is_some());
    }

    #[test]
    fn repeated_analysis_is_identical() {
        let analyzer = Analyzer::default();
        let a = analyzer.analyze(&sample_chain(), 103.0).unwrap();
        let b = analyzer.analyze(&sample_chain(), 103.0).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn batch_preserves_order_and_fails_fast() {
        let analyzer = Analyzer::default();
        let snaps = vec![
            ChainSnapshot {
                label: "near".into(),
                chain: sample_chain(),
                current_price: 101.0,
            },
            ChainSnapshot {
                label: "far".into(),
                chain: two_strike_chain(),
                current_price: 105.0,
            },
        ];
        let out = analyzer.analyze_all(&snaps).unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].label, "near");
        assert_eq!(out[1].label, "far");
        assert_eq!(out[1].result.max_pain.as_ref().map(|m| m.strike), Some(100.0));

        let mut bad = snaps;
        bad[1].current_price = -5.0;
        assert!(analyzer.analyze_all(&bad).is_err());
    }
}
