//! Analysis configuration.
//!
//! Every threshold, step and multiplier the analytics use lives here with a
//! named default, so the same knob is never duplicated as a literal across
//! modules. All structs deserialize with per-field defaults, letting callers
//! load a partial configuration from JSON:
//!
//! ```
//! use maxpain::config::AnalysisConfig;
//!
//! let config: AnalysisConfig = serde_json::from_str(r#"{"top_n": 3}"#)?;
//! assert_eq!(config.top_n, 3);
//! assert_eq!(config.curve.price_step_fraction, 0.001);
//! config.validate()?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{self, MaxPainError};
use crate::validate::{config_non_negative, config_positive};

/// Sampling grid for the seller PnL curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurveConfig {
    /// Sample spacing as a fraction of the reference price.
    pub price_step_fraction: f64,
    /// How far beyond the listed strikes to sweep, as a fraction of the
    /// outermost strikes.
    pub range_extension: f64,
    /// Upper bound on samples; the step is widened to respect it.
    pub max_samples: usize,
}

impl Default for CurveConfig {
    fn default() -> Self {
        Self {
            price_step_fraction: 0.001,
            range_extension: 0.3,
            max_samples: 200_000,
        }
    }
}

/// Finite-difference and search parameters for loss gradients.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GradientConfig {
    /// Finite-difference step as a fraction of the max-pain strike.
    pub step_fraction: f64,
    /// One directional gradient must exceed the other by this factor to
    /// count as asymmetric.
    pub asymmetry_threshold: f64,
    /// Factor comparing call-loss growth upward with put-loss growth downward.
    pub side_pressure_multiplier: f64,
    /// Loss increase over the max-pain minimum that defines the pain band.
    pub pain_threshold_percent: f64,
    /// Iteration cap for the threshold walk.
    pub max_iterations: usize,
    /// The equilibrium grid spans `[(1 − ext)·minK, (1 + ext)·maxK]`.
    pub equilibrium_extension: f64,
    /// Upper bound on equilibrium grid samples; the grid step is widened to
    /// respect it.
    pub max_samples: usize,
}

impl Default for GradientConfig {
    fn default() -> Self {
        Self {
            step_fraction: 0.01,
            asymmetry_threshold: 1.5,
            side_pressure_multiplier: 1.2,
            pain_threshold_percent: 0.10,
            max_iterations: 100,
            equilibrium_extension: 0.1,
            max_samples: 100_000,
        }
    }
}

/// Call/put open-interest ratio bands for the sentiment label.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SentimentThresholds {
    /// `call/put` above this is a bullish skew.
    pub bullish_above: f64,
    /// `call/put` below this is a bearish skew.
    pub bearish_below: f64,
}

impl Default for SentimentThresholds {
    fn default() -> Self {
        Self {
            bullish_above: 1.5,
            bearish_below: 0.75,
        }
    }
}

/// A directional rule the scenario classifier can evaluate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScenarioRule {
    /// Price below max pain, call-heavy ratio, call center above put center.
    Bullish,
    /// Price above max pain, put-heavy ratio, call center below put center.
    Bearish,
    /// Price within the neutral band around max pain.
    Neutral,
}

/// Rule order and thresholds for the scenario classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioRules {
    /// Rules evaluated in order; the first match wins, otherwise `Mixed`.
    pub order: Vec<ScenarioRule>,
    /// `call/put` above this supports a bullish call.
    pub bullish_ratio: f64,
    /// `call/put` below this supports a bearish call.
    pub bearish_ratio: f64,
    /// Relative distance to max pain treated as "at max pain".
    pub neutral_band: f64,
}

impl Default for ScenarioRules {
    fn default() -> Self {
        Self {
            order: vec![
                ScenarioRule::Bullish,
                ScenarioRule::Bearish,
                ScenarioRule::Neutral,
            ],
            bullish_ratio: 1.2,
            bearish_ratio: 0.8,
            neutral_band: 0.01,
        }
    }
}

/// Top-level configuration for [`Analyzer`](crate::analysis::Analyzer).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Seller PnL curve sampling.
    pub curve: CurveConfig,
    /// Gradient, equilibrium and pain-band search.
    pub gradient: GradientConfig,
    /// Open-interest sentiment bands.
    pub sentiment: SentimentThresholds,
    /// Scenario rules.
    pub scenario: ScenarioRules,
    /// Length of each ranked list (OI rankings, max-pain candidates).
    pub top_n: usize,
    /// Strikes inspected on each side of the price for support/resistance.
    pub level_window: usize,
    /// Relative distance within which the price counts as at max pain.
    pub max_pain_proximity: f64,
    /// One side's intrinsic payout must exceed the other's by this factor
    /// to dominate.
    pub payout_dominance_multiplier: f64,
    /// Break-even band skew factor (distance comparison).
    pub band_skew_multiplier: f64,
    /// Keep the sampled seller curve in the result.
    pub retain_curve: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            curve: CurveConfig::default(),
            gradient: GradientConfig::default(),
            sentiment: SentimentThresholds::default(),
            scenario: ScenarioRules::default(),
            top_n: 5,
            level_window: 3,
            max_pain_proximity: 0.01,
            payout_dominance_multiplier: 1.5,
            band_skew_multiplier: 1.2,
            retain_curve: false,
        }
    }
}

impl AnalysisConfig {
    /// Check every knob.
    ///
    /// # Errors
    /// Returns [`MaxPainError::InvalidConfig`] on non-positive steps or
    /// multipliers, negative extensions, zero-length lists, inverted
    /// sentiment or scenario bands, or a repeated scenario rule.
    pub fn validate(&self) -> error::Result<()> {
        config_positive(self.curve.price_step_fraction, "curve.price_step_fraction")?;
        config_non_negative(self.curve.range_extension, "curve.range_extension")?;
        if self.curve.range_extension >= 1.0 {
            return Err(MaxPainError::InvalidConfig {
                message: format!(
                    "curve.range_extension must be below 1, got {}",
                    self.curve.range_extension
                ),
            });
        }
        if self.curve.max_samples < 2 {
            return Err(MaxPainError::InvalidConfig {
                message: "curve.max_samples must be at least 2".into(),
            });
        }

        let g = &self.gradient;
        config_positive(g.step_fraction, "gradient.step_fraction")?;
        config_positive(g.asymmetry_threshold, "gradient.asymmetry_threshold")?;
        config_positive(g.side_pressure_multiplier, "gradient.side_pressure_multiplier")?;
        config_non_negative(g.pain_threshold_percent, "gradient.pain_threshold_percent")?;
        config_non_negative(g.equilibrium_extension, "gradient.equilibrium_extension")?;
        if g.max_iterations == 0 {
            return Err(MaxPainError::InvalidConfig {
                message: "gradient.max_iterations must be at least 1".into(),
            });
        }
        if g.max_samples < 2 {
            return Err(MaxPainError::InvalidConfig {
                message: "gradient.max_samples must be at least 2".into(),
            });
        }

        let s = &self.sentiment;
        config_positive(s.bullish_above, "sentiment.bullish_above")?;
        config_non_negative(s.bearish_below, "sentiment.bearish_below")?;
        if s.bearish_below > s.bullish_above {
            return Err(MaxPainError::InvalidConfig {
                message: format!(
                    "sentiment.bearish_below ({}) exceeds sentiment.bullish_above ({})",
                    s.bearish_below, s.bullish_above
                ),
            });
        }

        let r = &self.scenario;
        config_positive(r.bullish_ratio, "scenario.bullish_ratio")?;
        config_non_negative(r.bearish_ratio, "scenario.bearish_ratio")?;
        config_non_negative(r.neutral_band, "scenario.neutral_band")?;
        if r.bearish_ratio > r.bullish_ratio {
            return Err(MaxPainError::InvalidConfig {
                message: format!(
                    "scenario.bearish_ratio ({}) exceeds scenario.bullish_ratio ({})",
                    r.bearish_ratio, r.bullish_ratio
                ),
            });
        }
        for (i, rule) in r.order.iter().enumerate() {
            if r.order[..i].contains(rule) {
                return Err(MaxPainError::InvalidConfig {
                    message: format!("scenario rule {rule:?} listed twice"),
                });
            }
        }

        if self.top_n == 0 {
            return Err(MaxPainError::InvalidConfig {
                message: "top_n must be at least 1".into(),
            });
        }
        if self.level_window == 0 {
            return Err(MaxPainError::InvalidConfig {
                message: "level_window must be at least 1".into(),
            });
        }
        config_non_negative(self.max_pain_proximity, "max_pain_proximity")?;
        config_positive(self.payout_dominance_multiplier, "payout_dominance_multiplier")?;
        config_positive(self.band_skew_multiplier, "band_skew_multiplier")?;
        Ok(())
    }
}
