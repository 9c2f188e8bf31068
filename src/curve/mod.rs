//! Seller profit-and-loss curve and its break-even structure.
//!
//! [`build_curve`] samples the aggregate writer PnL over a continuous price
//! range; [`analyze_break_evens`] finds where that curve crosses zero, the
//! contiguous profit zones, and the curve's extremes.

pub mod breakeven;
pub mod builder;

pub use breakeven::{
    BandSkew, BandZone, BreakEvenAnalysis, BreakEvenBand, ProfitZone, analyze_break_evens,
    find_break_evens, profit_zones,
};
pub use builder::{PnlCurve, build_curve};
