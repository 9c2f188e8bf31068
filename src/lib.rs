//! # maxpain
//!
//! Open-interest and payoff analytics for a single option expiration.
//!
//! Takes an in-memory option chain (one row per strike with call and put
//! open interest, prices and optional greeks) plus the underlying price, and
//! computes the market-structure figures traders use to read positioning:
//! call/put skew, the max-pain settlement strike, open-interest centers of
//! gravity, the aggregate writer's profit curve with its break-evens, and
//! the loss-gradient equilibrium.
//!
//! ## Architecture
//!
//! - **`chain`** — Validated, strike-ordered chain and per-side quote merging
//! - **`exposure`** — Ratio, rankings, centers of gravity, support/resistance, greeks
//! - **`payoff`** — Holder loss and writer PnL at a settlement price
//! - **`maxpain`** — Max-pain search under two accounting conventions
//! - **`curve`** — Writer PnL sweep, break-evens and profit zones
//! - **`gradient`** — Loss slopes, pain band and gradient equilibrium
//! - **`scenario`** — Ordered directional rules
//! - **`analysis`** — [`Analyzer`] running all of the above
//! - **`report`** — JSON and text renderers over the result
//!
//! ## Design
//!
//! - **Plain data out.** Every result is an owned serde struct; nothing
//!   formats text except the renderers in [`report`].
//! - **No panics.** Invalid prices, chains and configuration surface as
//!   [`MaxPainError`]. Missing data (empty chain, zero open interest on a
//!   side) is reported as `None`, never as NaN.
//! - **Bounded searches.** Every iterative search has a cap and reports
//!   whether it converged.
//! - **Thread-safe.** Inputs are immutable and all types are `Send + Sync`;
//!   with the `parallel` feature, [`Analyzer::analyze_all`] fans out across
//!   expirations with rayon.
//!
//! ```
//! use maxpain::{Analyzer, AnalysisConfig};
//! use maxpain::chain::{OptionChain, OptionChainPoint};
//! use maxpain::report::{ReportRenderer, TextRenderer};
//!
//! let chain = OptionChain::new(vec![
//!     OptionChainPoint::new(95.0, 10.0, 60.0).with_prices(6.0, 1.0),
//!     OptionChainPoint::new(100.0, 40.0, 40.0).with_prices(2.5, 2.5),
//!     OptionChainPoint::new(105.0, 70.0, 10.0).with_prices(0.8, 5.5),
//! ])?;
//! let result = Analyzer::new(AnalysisConfig::default())?.analyze(&chain, 101.0)?;
//! assert_eq!(result.max_pain.as_ref().map(|m| m.strike), Some(100.0));
//! println!("{}", TextRenderer.render(&result)?);
//! # Ok::<(), maxpain::MaxPainError>(())
//! ```

pub mod analysis;
pub mod chain;
pub mod config;
pub mod curve;
pub mod error;
pub mod exposure;
pub mod gradient;
pub mod maxpain;
pub mod payoff;
pub mod report;
pub mod scenario;
mod search;
pub mod types;
mod validate;

#[doc(inline)]
pub use analysis::{AnalysisResult, Analyzer, ChainSnapshot};
#[doc(inline)]
pub use chain::{OptionChain, OptionChainPoint};
#[doc(inline)]
pub use config::AnalysisConfig;
#[doc(inline)]
pub use error::{MaxPainError, Result};
#[doc(inline)]
pub use report::ReportRenderer;
#[doc(inline)]
pub use types::{Direction, LevelRole, OptionType};
