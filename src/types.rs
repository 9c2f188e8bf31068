//! Small shared enums used across the analytics.
//!
//! Prices and open interest stay bare `f64`: every quantity in this crate is
//! measured in underlying-price units or contract counts, and the result
//! records name each field explicitly. The enums below carry the discrete
//! labels that would otherwise be stringly typed.
//!
//! # Why no `Eq` on float-carrying records?
//! Result records wrap `f64`, which does not implement `Eq` because `NaN`
//! breaks total ordering. Only the fieldless enums here derive `Eq`.

use serde::{Deserialize, Serialize};

/// Option type: call or put.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OptionType {
    /// Right to buy at strike price.
    Call,
    /// Right to sell at strike price.
    Put,
}

/// Direction of a price move away from a reference level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Toward higher underlying prices.
    Up,
    /// Toward lower underlying prices.
    Down,
}

impl Direction {
    /// `+1.0` for [`Up`](Direction::Up), `-1.0` for [`Down`](Direction::Down).
    pub fn sign(self) -> f64 {
        match self {
            Direction::Up => 1.0,
            Direction::Down => -1.0,
        }
    }
}

/// Role a strike plays given which side dominates its open interest.
///
/// Call-heavy strikes act as resistance (writers defend them from above),
/// put-heavy strikes act as support.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LevelRole {
    /// Call open interest exceeds put open interest.
    Resistance,
    /// Put open interest is at least call open interest.
    Support,
}

impl LevelRole {
    /// Classify a strike from its two open-interest figures.
    pub fn from_open_interest(call_oi: f64, put_oi: f64) -> Self {
        if call_oi > put_oi {
            LevelRole::Resistance
        } else {
            LevelRole::Support
        }
    }
}
