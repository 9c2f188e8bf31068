//! Directional scenario from max pain, open-interest skew and the centers
//! of gravity.
//!
//! Rules run in the configured order and the first match wins. A rule that
//! needs the call/put ratio or a center of gravity fails when that figure is
//! undefined, so a chain with no put open interest can never be classified
//! as bullish on ratio grounds.

use serde::{Deserialize, Serialize};

use crate::config::{ScenarioRule, ScenarioRules};
use crate::exposure::{CentersOfGravity, NearbyLevels};

/// Scenario label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScenarioKind {
    /// Price below max pain with call-heavy positioning.
    Bullish,
    /// Price above max pain with put-heavy positioning.
    Bearish,
    /// Price pinned near max pain.
    Neutral,
    /// No rule matched.
    Mixed,
}

/// Ratio tilt reported alongside a `Mixed` scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RatioLean {
    /// Ratio above the bullish threshold.
    Bullish,
    /// Ratio below the bearish threshold.
    Bearish,
}

/// Classified scenario with its supporting levels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// Label.
    pub kind: ScenarioKind,
    /// Rule that matched; `None` for `Mixed`.
    pub matched_rule: Option<ScenarioRule>,
    /// Ratio tilt, reported only for `Mixed`.
    pub lean: Option<RatioLean>,
    /// Projected price target.
    pub target: Option<f64>,
    /// Further objective past the target: the call center when bullish,
    /// the put center when bearish.
    pub extension: Option<f64>,
    /// Sideways range between the two centers, reported for `Neutral`.
    pub neutral_range: Option<(f64, f64)>,
    /// Lowest resistance strike above the price.
    pub nearest_resistance: Option<f64>,
    /// Highest support strike below the price.
    pub nearest_support: Option<f64>,
}

/// Inputs shared by every rule.
#[derive(Debug, Clone, Copy)]
pub struct ScenarioInputs<'a> {
    /// Current underlying price.
    pub price: f64,
    /// Max-pain strike.
    pub max_pain: f64,
    /// Call/put open-interest ratio, `None` without put open interest.
    pub ratio: Option<f64>,
    /// Open-interest centers of gravity.
    pub centers: &'a CentersOfGravity,
    /// Support and resistance near the price.
    pub levels: &'a NearbyLevels,
}

impl ScenarioInputs<'_> {
    fn matches(&self, rule: ScenarioRule, rules: &ScenarioRules) -> bool {
        let centers = self.centers.call_center.zip(self.centers.put_center);
        match rule {
            ScenarioRule::Bullish => {
                self.price < self.max_pain
                    && self.ratio.is_some_and(|r| r > rules.bullish_ratio)
                    && centers.is_some_and(|(call, put)| call > put)
            }
            ScenarioRule::Bearish => {
                self.price > self.max_pain
                    && self.ratio.is_some_and(|r| r < rules.bearish_ratio)
                    && centers.is_some_and(|(call, put)| call < put)
            }
            ScenarioRule::Neutral => {
                ((self.price - self.max_pain) / self.max_pain).abs() <= rules.neutral_band
            }
        }
    }
}

/// Classify the scenario.
///
/// # Examples
///
/// ```
/// use maxpain::config::ScenarioRules;
/// use maxpain::exposure::{CentersOfGravity, NearbyLevels};
/// use maxpain::scenario::{classify, ScenarioInputs, ScenarioKind};
///
/// let centers = CentersOfGravity {
///     call_center: Some(104.0),
///     put_center: Some(96.0),
///     equilibrium: Some(100.0),
/// };
/// let levels = NearbyLevels::default();
/// let inputs = ScenarioInputs {
///     price: 100.4,
///     max_pain: 100.0,
///     ratio: Some(1.0),
///     centers: &centers,
///     levels: &levels,
/// };
/// let s = classify(&inputs, &ScenarioRules::default());
/// assert_eq!(s.kind, ScenarioKind::Neutral);
/// assert_eq!(s.target, Some(100.0));
/// ```
pub fn classify(inputs: &ScenarioInputs<'_>, rules: &ScenarioRules) -> Scenario {
    let nearest_resistance = inputs.levels.nearest_resistance();
    let nearest_support = inputs.levels.nearest_support();
    let centers = inputs.centers;

    let matched = rules
        .order
        .iter()
        .copied()
        .find(|&rule| inputs.matches(rule, rules));

    let mut scenario = Scenario {
        kind: ScenarioKind::Mixed,
        matched_rule: matched,
        lean: None,
        target: None,
        extension: None,
        neutral_range: None,
        nearest_resistance,
        nearest_support,
    };

    match matched {
        Some(ScenarioRule::Bullish) => {
            scenario.kind = ScenarioKind::Bullish;
            scenario.target = Some(nearest_resistance.unwrap_or(inputs.max_pain));
            scenario.extension = centers.call_center;
        }
        Some(ScenarioRule::Bearish) => {
            scenario.kind = ScenarioKind::Bearish;
            scenario.target = Some(nearest_support.unwrap_or(inputs.max_pain));
            scenario.extension = centers.put_center;
        }
        Some(ScenarioRule::Neutral) => {
            scenario.kind = ScenarioKind::Neutral;
            scenario.target = Some(inputs.max_pain);
            scenario.neutral_range = centers
                .call_center
                .zip(centers.put_center)
                .map(|(c, p)| (c.min(p), c.max(p)));
        }
        None => {
            scenario.target = centers.equilibrium;
            scenario.lean = inputs.ratio.and_then(|r| {
                if r > rules.bullish_ratio {
                    Some(RatioLean::Bullish)
                } else if r < rules.bearish_ratio {
                    Some(RatioLean::Bearish)
                } else {
                    None
                }
            });
        }
    }

    #[cfg(feature = "logging")]
    tracing::debug!(kind = ?scenario.kind, target = ?scenario.target, "scenario classified");

    scenario
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exposure::KeyLevel;

    fn centers(call: f64, put: f64) -> CentersOfGravity {
        CentersOfGravity {
            call_center: Some(call),
            put_center: Some(put),
            equilibrium: Some((call + put) / 2.0),
        }
    }

    fn levels(resistance: &[f64], support: &[f64]) -> NearbyLevels {
        let level = |&strike: &f64| KeyLevel {
            strike,
            dominance_ratio: None,
        };
        NearbyLevels {
            resistance: resistance.iter().map(level).collect(),
            support: support.iter().map(level).collect(),
        }
    }

    fn run(price: f64, ratio: Option<f64>, c: &CentersOfGravity, l: &NearbyLevels) -> Scenario {
        let inputs = ScenarioInputs {
            price,
            max_pain: 100.0,
            ratio,
            centers: c,
            levels: l,
        };
        classify(&inputs, &ScenarioRules::default())
    }

    #[test]
    fn bullish_targets_nearest_resistance() {
        let c = centers(108.0, 95.0);
        let l = levels(&[97.0, 99.0], &[90.0]);
        let s = run(96.0, Some(1.5), &c, &l);
        assert_eq!(s.kind, ScenarioKind::Bullish);
        assert_eq!(s.target, Some(97.0));
        assert_eq!(s.extension, Some(108.0));
        assert_eq!(s.nearest_support, Some(90.0));
    }

    #[test]
    fn bullish_without_resistance_targets_max_pain() {
        let c = centers(108.0, 95.0);
        let s = run(96.0, Some(1.5), &c, &NearbyLevels::default());
        assert_eq!(s.target, Some(100.0));
    }

    #[test]
    fn bearish_targets_nearest_support() {
        let c = centers(95.0, 108.0);
        let l = levels(&[], &[103.0]);
        let s = run(105.0, Some(0.5), &c, &l);
        assert_eq!(s.kind, ScenarioKind::Bearish);
        assert_eq!(s.target, Some(103.0));
        assert_eq!(s.extension, Some(108.0));
    }

    #[test]
    fn undefined_ratio_fails_directional_rules() {
        let c = centers(108.0, 95.0);
        let s = run(96.0, None, &c, &NearbyLevels::default());
        assert_eq!(s.kind, ScenarioKind::Mixed);
        assert_eq!(s.lean, None);
        assert_eq!(s.target, Some(101.5));
    }

    #[test]
    fn missing_center_fails_directional_rules() {
        let c = CentersOfGravity {
            call_center: None,
            put_center: Some(95.0),
            equilibrium: None,
        };
        let s = run(96.0, Some(2.0), &c, &NearbyLevels::default());
        assert_eq!(s.kind, ScenarioKind::Mixed);
        assert_eq!(s.lean, Some(RatioLean::Bullish));
        assert_eq!(s.target, None);
    }

    #[test]
    fn neutral_band_is_inclusive() {
        let c = centers(104.0, 96.0);
        let s = run(101.0, Some(1.0), &c, &NearbyLevels::default());
        assert_eq!(s.kind, ScenarioKind::Neutral);
        assert_eq!(s.neutral_range, Some((96.0, 104.0)));
    }

    #[test]
    fn first_matching_rule_wins() {
        // Both bullish and neutral hold; order decides.
        let c = centers(108.0, 95.0);
        let l = NearbyLevels::default();
        assert_eq!(run(99.5, Some(1.5), &c, &l).kind, ScenarioKind::Bullish);

        let inputs = ScenarioInputs {
            price: 99.5,
            max_pain: 100.0,
            ratio: Some(1.5),
            centers: &c,
            levels: &l,
        };
        let rules = ScenarioRules {
            order: vec![ScenarioRule::Neutral, ScenarioRule::Bullish],
            ..ScenarioRules::default()
        };
        let s = classify(&inputs, &rules);
        assert_eq!(s.kind, ScenarioKind::Neutral);
        assert_eq!(s.matched_rule, Some(ScenarioRule::Neutral));
    }

    #[test]
    fn mixed_reports_bearish_lean() {
        let c = centers(104.0, 96.0);
        let s = run(90.0, Some(0.5), &c, &NearbyLevels::default());
        assert_eq!(s.kind, ScenarioKind::Mixed);
        assert_eq!(s.lean, Some(RatioLean::Bearish));
        assert_eq!(s.target, Some(100.0));
    }
}
