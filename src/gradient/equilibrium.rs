//! Price where the total holder-loss slope flattens out.
//!
//! The loss curve is convex and piecewise linear, so its slope rises through
//! zero once. The search scans a grid over the strike range widened by
//! `equilibrium_extension`, takes forward differences at half the gradient
//! step, and refines the flattest sample by interpolating the nearest strict
//! sign change of the slope. The grid is capped at `max_samples`; a finer
//! request widens the step.

use serde::{Deserialize, Serialize};

use crate::chain::OptionChain;
use crate::config::GradientConfig;
use crate::payoff;
use crate::search::{grid_len, linear_root, strict_sign_change};

/// Outcome of [`equilibrium_search`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Equilibrium {
    /// Equilibrium price: the refined crossing when one was found, else the
    /// flattest grid sample.
    pub price: f64,
    /// Grid sample with the smallest `|gradient|` (first on ties).
    pub grid_price: f64,
    /// Total-loss gradient at `grid_price`.
    pub grid_gradient: f64,
    /// A strict sign change was interpolated.
    pub refined: bool,
    /// The slope was shown to pass through zero: a refined sign change, or a
    /// flat bottom with a falling slope before it and a rising slope after.
    /// One-sided and flat grids never converge.
    pub converged: bool,
    /// Number of grid samples scanned.
    pub grid_points: usize,
    /// Grid spacing actually used; wider than `h / 2` when the sample
    /// ceiling applied.
    pub grid_step: f64,
}

/// Locate the gradient equilibrium with gradient step `h`.
///
/// Returns `None` for an empty chain or when `h` is not positive and finite.
///
/// # Examples
///
/// ```
/// use maxpain::chain::{OptionChain, OptionChainPoint};
/// use maxpain::config::GradientConfig;
/// use maxpain::gradient::equilibrium_search;
///
/// let chain = OptionChain::new(vec![OptionChainPoint::new(100.0, 10.0, 10.0)])?;
/// let eq = equilibrium_search(&chain, 2.0, &GradientConfig::default()).unwrap();
/// assert!(eq.converged);
/// assert!((eq.price - 99.5).abs() < 1e-9);
/// # Ok::<(), maxpain::MaxPainError>(())
/// ```
pub fn equilibrium_search(
    chain: &OptionChain,
    h: f64,
    config: &GradientConfig,
) -> Option<Equilibrium> {
    let (min_strike, max_strike) = (chain.min_strike()?, chain.max_strike()?);
    let mut step = h / 2.0;
    let start = min_strike * (1.0 - config.equilibrium_extension);
    let end = max_strike * (1.0 + config.equilibrium_extension);
    let mut count = grid_len(start, end, step);
    if count == 0 {
        return None;
    }
    if count > config.max_samples && config.max_samples >= 2 {
        let widened = (end - start) / (config.max_samples - 1) as f64;
        #[cfg(feature = "logging")]
        tracing::debug!(
            requested_step = step,
            widened_step = widened,
            requested_samples = count,
            max_samples = config.max_samples,
            "equilibrium grid step widened"
        );
        step = widened;
        count = grid_len(start, end, step).min(config.max_samples);
    }

    let gradient = |x: f64| {
        let here = payoff::holder_losses(chain, x);
        payoff::holder_losses(chain, x + step)
            .slope_from(&here, step)
            .total
    };

    let mut best = (start, f64::INFINITY, 0.0);
    let mut crossings: Vec<((f64, f64), (f64, f64))> = Vec::new();
    let mut falling = false;
    let mut flat_after_fall = false;
    let mut flat_bottom = false;
    let mut prev: Option<(f64, f64)> = None;

    for i in 0..count {
        let x = start + i as f64 * step;
        let g = gradient(x);
        if g.abs() < best.1 {
            best = (x, g.abs(), g);
        }
        if g < 0.0 {
            falling = true;
        } else if g == 0.0 {
            flat_after_fall |= falling;
        } else {
            flat_bottom |= flat_after_fall;
        }
        if let Some(p) = prev
            && strict_sign_change(p.1, g)
        {
            crossings.push((p, (x, g)));
        }
        prev = Some((x, g));
    }

    let (grid_price, _, grid_gradient) = best;
    let nearest = crossings.iter().min_by(|a, b| {
        let da = ((a.0.0 + a.1.0) / 2.0 - grid_price).abs();
        let db = ((b.0.0 + b.1.0) / 2.0 - grid_price).abs();
        da.total_cmp(&db)
    });

    let (price, refined) = match nearest {
        Some(((x1, g1), (x2, g2))) => (linear_root(*x1, *g1, *x2, *g2), true),
        None => (grid_price, false),
    };
    let converged = refined || flat_bottom;

    #[cfg(feature = "logging")]
    tracing::debug!(
        price,
        grid_price,
        grid_gradient,
        refined,
        converged,
        grid_points = count,
        grid_step = step,
        "gradient equilibrium"
    );

    Some(Equilibrium {
        price,
        grid_price,
        grid_gradient,
        refined,
        converged,
        grid_points: count,
        grid_step: step,
    })
}
