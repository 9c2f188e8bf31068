//! Internal root-finding and bounded search utilities.

/// Root of the line through `(x1, y1)` and `(x2, y2)`.
///
/// `x1 + (0 − y1)·(x2 − x1)/(y2 − y1)`. Callers guarantee `y1 != y2`, which
/// holds whenever the two ordinates straddle zero.
pub(crate) fn linear_root(x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    x1 + (0.0 - y1) * (x2 - x1) / (y2 - y1)
}

/// Whether `a` and `b` lie on opposite sides of zero, counting zero as
/// non-negative.
pub(crate) fn crosses_zero(a: f64, b: f64) -> bool {
    (a >= 0.0 && b < 0.0) || (a < 0.0 && b >= 0.0)
}

/// Whether `a` and `b` have strictly opposite signs (neither is zero).
pub(crate) fn strict_sign_change(a: f64, b: f64) -> bool {
    (a > 0.0 && b < 0.0) || (a < 0.0 && b > 0.0)
}

/// Number of points on `start, start + step, …` not exceeding `end`.
///
/// Returns 0 for a non-positive or non-finite step or an inverted range.
/// A small relative tolerance keeps the end point when it is hit exactly up
/// to rounding. Counts too large for `usize` saturate at `usize::MAX`;
/// callers clamp them against their own sample ceiling.
pub(crate) fn grid_len(start: f64, end: f64, step: f64) -> usize {
    if !(step.is_finite() && step > 0.0 && start.is_finite() && end.is_finite()) || end < start {
        return 0;
    }
    let span = ((end - start) / step + 1e-9).floor();
    if span.is_nan() {
        return 0;
    }
    // `as` saturates for out-of-range floats.
    (span as usize).saturating_add(1)
}

/// Bounded walk of prices away from a start level.
///
/// Yields `start ± step`, `start ± 2·step`, … for at most `max_steps`
/// items. A downward walk ends early once the next price would be
/// non-positive, since no settlement below zero exists.
#[derive(Debug, Clone)]
pub(crate) struct PriceWalk {
    start: f64,
    step: f64,
    taken: usize,
    max_steps: usize,
}

impl PriceWalk {
    /// `step` is signed: positive walks up, negative walks down.
    pub(crate) fn new(start: f64, step: f64, max_steps: usize) -> Self {
        Self {
            start,
            step,
            taken: 0,
            max_steps,
        }
    }
}

impl Iterator for PriceWalk {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        if self.taken >= self.max_steps {
            return None;
        }
        let price = self.start + self.step * (self.taken + 1) as f64;
        if price <= 0.0 {
            self.taken = self.max_steps;
            return None;
        }
        self.taken += 1;
        Some(price)
    }
}

/// Outcome of a bounded search: the value plus whether it met its target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Bounded<T> {
    pub value: T,
    pub steps: usize,
    pub converged: bool,
}

/// Walk until `reached(price)` holds, returning the first hit or the last
/// price visited (`converged == false`) once the walk is exhausted.
///
/// An empty walk returns `start` unconverged.
pub(crate) fn walk_until<F>(walk: PriceWalk, start: f64, mut reached: F) -> Bounded<f64>
where
    F: FnMut(f64) -> bool,
{
    let mut last = start;
    let mut steps = 0;
    for price in walk {
        steps += 1;
        last = price;
        if reached(price) {
            return Bounded {
                value: price,
                steps,
                converged: true,
            };
        }
    }
    Bounded {
        value: last,
        steps,
        converged: false,
    }
}
