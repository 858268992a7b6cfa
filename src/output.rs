// src/output.rs
use crate::convergence::ConvergencePoint;
use crate::error::{PricerError, PricerResult};
use crate::mc::confidence::ConfidenceLevel;
use crate::mc::mc_engine::{MonteCarloResult, TrialOutcome};
use serde::Serialize;
use std::fmt::Write as _;
use std::path::Path;

/// One CSV line of a convergence study
#[derive(Debug, Serialize)]
struct ConvergenceRow {
    #[serde(rename = "Simulations")]
    simulations: usize,
    #[serde(rename = "Price")]
    price: f64,
    #[serde(rename = "StandardError")]
    standard_error: f64,
    #[serde(rename = "CILower")]
    ci_lower: f64,
    #[serde(rename = "CIUpper")]
    ci_upper: f64,
}

impl From<&ConvergencePoint> for ConvergenceRow {
    fn from(p: &ConvergencePoint) -> Self {
        ConvergenceRow {
            simulations: p.simulations,
            price: p.result.price,
            standard_error: p.result.standard_error,
            ci_lower: p.result.ci_lower,
            ci_upper: p.result.ci_upper,
        }
    }
}

#[derive(Debug, Serialize)]
struct TrialRow {
    trial: usize,
    terminal_price: f64,
    payoff: f64,
    discounted_payoff: f64,
}

fn report_error(path: &Path, e: impl std::fmt::Display) -> PricerError {
    PricerError::Report {
        target: path.display().to_string(),
        reason: e.to_string(),
    }
}

fn write_rows<T: Serialize>(path: &Path, rows: impl IntoIterator<Item = T>) -> PricerResult<()> {
    let mut writer = csv::Writer::from_path(path).map_err(|e| report_error(path, e))?;
    for row in rows {
        writer.serialize(row).map_err(|e| report_error(path, e))?;
    }
    writer.flush().map_err(|e| report_error(path, e))?;
    Ok(())
}

/// Header `Simulations,Price,StandardError,CILower,CIUpper`, one row per point
pub fn write_convergence_csv(path: &Path, points: &[ConvergencePoint]) -> PricerResult<()> {
    write_rows(path, points.iter().map(ConvergenceRow::from))
}

/// Header `trial,terminal_price,payoff,discounted_payoff`
pub fn write_trials_to_csv(path: &Path, trials: &[TrialOutcome]) -> PricerResult<()> {
    write_rows(
        path,
        trials.iter().enumerate().map(|(trial, t)| TrialRow {
            trial,
            terminal_price: t.terminal_price,
            payoff: t.payoff,
            discounted_payoff: t.discounted_payoff,
        }),
    )
}

/// Fixed-width console table for a convergence study
pub fn format_convergence_table(points: &[ConvergencePoint], level: ConfidenceLevel) -> String {
    let pct = level.percent();
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Simulations | Price       | Std. Error  | {pct}% CI Lower | {pct}% CI Upper"
    );
    let _ = writeln!(
        out,
        "------------|-------------|-------------|--------------|--------------"
    );
    for p in points {
        let r = &p.result;
        let _ = writeln!(
            out,
            "{:>11} | {:>11.6} | {:>11.6} | {:>12.6} | {:>12.6}",
            p.simulations, r.price, r.standard_error, r.ci_lower, r.ci_upper
        );
    }
    out.push_str(&"-".repeat(66));
    out.push('\n');
    out
}

/// Four-line summary of one priced option
pub fn format_result_summary(
    label: &str,
    result: &MonteCarloResult,
    level: ConfidenceLevel,
) -> String {
    let pct = level.percent();
    let mut out = String::new();
    let _ = writeln!(out, "Estimated {label} Price: {:.6}", result.price);
    let _ = writeln!(out, "{label} Price Standard Error: {:.6}", result.standard_error);
    let _ = writeln!(out, "{label} Price {pct}% Margin of Error: {:.6}", result.half_width());
    let _ = writeln!(
        out,
        "{label} Price {pct}% Confidence Interval: [{:.6}, {:.6}]",
        result.ci_lower, result.ci_upper
    );
    out
}

/// Header `workers,paths,elapsed_ms,paths_per_sec,price,standard_error` for
/// the benchmark binary's records
pub fn write_benchmark_csv<T: Serialize>(path: &Path, records: &[T]) -> PricerResult<()> {
    write_rows(path, records)
}
