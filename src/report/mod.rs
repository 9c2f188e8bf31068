//! Presentation of an [`AnalysisResult`].
//!
//! Computation never formats anything; renderers consume the result as plain
//! data. Two are provided:
//!
//! - [`JsonRenderer`]: the full result as JSON, compact or pretty
//! - [`TextRenderer`]: a short plain-text summary for terminals and logs

pub mod text;

pub use text::TextRenderer;

use crate::analysis::AnalysisResult;
use crate::error;

/// Turns an [`AnalysisResult`] into some output representation.
///
/// All implementations must be `Send + Sync` so one renderer can serve
/// results produced on several threads.
///
/// # Examples
///
/// ```
/// use maxpain::{Analyzer, AnalysisConfig};
/// use maxpain::chain::{OptionChain, OptionChainPoint};
/// use maxpain::report::{JsonRenderer, ReportRenderer};
///
/// let chain = OptionChain::new(vec![OptionChainPoint::new(100.0, 10.0, 10.0)])?;
/// let result = Analyzer::new(AnalysisConfig::default())?.analyze(&chain, 100.0)?;
/// let json = JsonRenderer::compact().render(&result)?;
/// assert!(json.contains("\"current_price\":100.0"));
/// # Ok::<(), maxpain::MaxPainError>(())
/// ```
pub trait ReportRenderer: Send + Sync {
    /// Rendered form.
    type Output;

    /// Render one result.
    ///
    /// # Errors
    /// Returns [`MaxPainError::Render`](crate::MaxPainError::Render) when the
    /// output cannot be produced.
    fn render(&self, result: &AnalysisResult) -> error::Result<Self::Output>;
}

/// Serializes the full result with `serde_json`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRenderer {
    pretty: bool,
}

impl JsonRenderer {
    /// Single-line output.
    pub fn compact() -> Self {
        Self { pretty: false }
    }

    /// Indented output.
    pub fn pretty() -> Self {
        Self { pretty: true }
    }
}

impl ReportRenderer for JsonRenderer {
    type Output = String;

    fn render(&self, result: &AnalysisResult) -> error::Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(result)?
        } else {
            serde_json::to_string(result)?
        };
        Ok(json)
    }
}
