//! Plain-text summary renderer.

use std::fmt::{self, Write};

use crate::analysis::AnalysisResult;
use crate::error::{self, MaxPainError};
use crate::report::ReportRenderer;

/// Renders a compact multi-section text summary.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextRenderer;

impl ReportRenderer for TextRenderer {
    type Output = String;

    fn render(&self, result: &AnalysisResult) -> error::Result<String> {
        let mut out = String::new();
        write_summary(&mut out, result).map_err(|e| MaxPainError::Render {
            message: e.to_string(),
        })?;
        Ok(out)
    }
}

fn opt(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{v:.2}"))
}

fn write_summary(out: &mut String, r: &AnalysisResult) -> fmt::Result {
    writeln!(out, "price {:.2}  strikes {}", r.current_price, r.strikes)?;

    let oi = &r.open_interest;
    writeln!(
        out,
        "open interest  calls {:.0} ({:.1}%)  puts {:.0} ({:.1}%)  ratio {}  sentiment {:?}",
        oi.total_call,
        oi.call_share * 100.0,
        oi.total_put,
        oi.put_share * 100.0,
        opt(oi.ratio),
        oi.sentiment,
    )?;

    match &r.max_pain {
        Some(mp) => {
            writeln!(
                out,
                "max pain  {:.2}  distance {:+.2} ({:+.2}%)  {:?}",
                mp.strike,
                mp.position.distance,
                mp.position.relative_distance * 100.0,
                mp.position.side,
            )?;
            for c in &mp.candidates {
                writeln!(out, "  {:>10.2}  loss {:.0}", c.strike, c.total_losses)?;
            }
        }
        None => writeln!(out, "max pain  n/a")?,
    }
    if let Some(n) = &r.notional_max_pain {
        writeln!(out, "max pain (notional)  {:.2}", n.strike)?;
    }

    let g = &r.gravity.centers;
    writeln!(
        out,
        "gravity  calls {}  puts {}  equilibrium {}",
        opt(g.call_center),
        opt(g.put_center),
        opt(g.equilibrium),
    )?;
    if let Some(bias) = &r.gravity.bias {
        writeln!(out, "  bias {bias:?}")?;
    }

    if !r.levels.resistance.is_empty() || !r.levels.support.is_empty() {
        let strikes = |levels: &[crate::exposure::KeyLevel]| {
            levels
                .iter()
                .map(|l| format!("{:.2}", l.strike))
                .collect::<Vec<_>>()
                .join(", ")
        };
        writeln!(
            out,
            "levels  resistance [{}]  support [{}]",
            strikes(&r.levels.resistance),
            strikes(&r.levels.support),
        )?;
    }

    let s = &r.seller;
    writeln!(
        out,
        "seller  premium {:.0}  pnl {:.0}  of premium {}",
        s.premium.total,
        s.current.total_pnl,
        s.pnl_to_premium
            .map_or_else(|| "n/a".to_string(), |f| format!("{:.1}%", f * 100.0)),
    )?;
    let be = &s.break_evens;
    writeln!(
        out,
        "  break-evens {}  below {}  above {}",
        be.points.len(),
        opt(be.nearest_below),
        opt(be.nearest_above),
    )?;
    if let Some(band) = &be.band {
        writeln!(
            out,
            "  band {:.2}..{:.2}  {:?}  skew {:?}",
            band.lower, band.upper, band.zone, band.skew
        )?;
    }

    if let Some(gr) = &r.gradients {
        writeln!(
            out,
            "gradients  step {:.2}  at max pain {:?}/{:?}  at price {:?}",
            gr.step, gr.at_max_pain.asymmetry, gr.at_max_pain.side_pressure, gr.at_current.asymmetry,
        )?;
        writeln!(
            out,
            "  pain band {:.2}..{:.2}  price {:?}",
            gr.band.lower.price, gr.band.upper.price, gr.band.current,
        )?;
        if let Some(eq) = &gr.equilibrium {
            writeln!(
                out,
                "  equilibrium {:.2}{}",
                eq.price,
                if eq.converged { "" } else { " (unconverged)" }
            )?;
        }
    }

    if let Some(gk) = &r.greeks {
        writeln!(
            out,
            "greeks  seller delta {:.2} ({:?})  seller gamma {:.4} ({:?})",
            gk.seller_delta, gk.delta_bias, gk.seller_gamma, gk.gamma_bias,
        )?;
    }

    if let Some(sc) = &r.scenario {
        writeln!(
            out,
            "scenario {:?}  target {}  lean {:?}",
            sc.kind,
            opt(sc.target),
            sc.lean
        )?;
    }
    Ok(())
}
