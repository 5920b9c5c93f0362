use crate::domain::portfolio::{Performer, PortfolioAnalysis};
use crate::domain::records::{Holding, PortfolioSnapshot};
use std::collections::HashSet;

/// Valuation snapshots considered (newest first).
pub const SNAPSHOT_WINDOW: usize = 30;

pub const BENCHMARK_ANNUAL_RETURN_PCT: f64 = 8.0;
pub const RISK_FREE_RATE_PCT: f64 = 2.0;

const PERIODS_PER_YEAR: f64 = 12.0;
const TOP_PERFORMERS: usize = 3;
const UNDER_PERFORMERS: usize = 2;

/// Computes returns, volatility, risk and diversification for a set of
/// holdings. `snapshots` must be ordered newest first.
pub fn analyze_portfolio(
    holdings: &[Holding],
    snapshots: &[PortfolioSnapshot],
) -> PortfolioAnalysis {
    let snapshots = &snapshots[..snapshots.len().min(SNAPSHOT_WINDOW)];

    let invested: f64 = holdings.iter().map(|h| h.investment.amount).sum();
    let current_value: f64 = holdings
        .iter()
        .map(|h| h.investment.amount + h.investment.current_returns)
        .sum();

    let annualized_return = annualized_return(snapshots);
    let volatility = volatility(snapshots);
    let sharpe_ratio = if volatility == 0.0 {
        0.0
    } else {
        (annualized_return - RISK_FREE_RATE_PCT) / volatility
    };

    let (top_performers, under_performers) = performers(holdings);

    PortfolioAnalysis {
        current_value,
        total_return: current_value - invested,
        annualized_return,
        volatility,
        sharpe_ratio,
        diversification_score: diversification_score(holdings),
        risk_score: risk_score(holdings),
        performance_vs_benchmark: annualized_return - BENCHMARK_ANNUAL_RETURN_PCT,
        top_performers,
        under_performers,
    }
}

/// Distinct plans relative to 60% of the holding count, capped at 1.
pub fn diversification_score(holdings: &[Holding]) -> f64 {
    let unique_plans = holdings
        .iter()
        .map(|h| h.investment.plan_id)
        .collect::<HashSet<_>>()
        .len() as f64;
    let denominator = (holdings.len() as f64 * 0.6).max(1.0);
    (unique_plans / denominator).clamp(0.0, 1.0)
}

/// Mean stated yield divided by three, kept within [1, 10].
pub fn risk_score(holdings: &[Holding]) -> f64 {
    let yields: Vec<f64> = holdings
        .iter()
        .filter_map(Holding::stated_yield)
        .filter(|y| y.is_finite())
        .collect();

    let average_apy = if yields.is_empty() {
        0.0
    } else {
        yields.iter().sum::<f64>() / yields.len() as f64
    };

    (average_apy / 3.0).clamp(1.0, 10.0)
}

/// Chronological (oldest first) values from a newest-first series.
fn chronological(snapshots: &[PortfolioSnapshot]) -> Vec<f64> {
    snapshots.iter().rev().map(|s| s.total_value).collect()
}

/// Compound growth from the oldest to the newest snapshot, scaled to a year
/// of monthly periods. Percent.
pub fn annualized_return(snapshots: &[PortfolioSnapshot]) -> f64 {
    if snapshots.len() < 2 {
        return 0.0;
    }

    let values = chronological(snapshots);
    let earliest = values[0];
    let latest = values[values.len() - 1];
    if earliest <= 0.0 || latest < 0.0 {
        return 0.0;
    }

    let periods = (values.len() - 1) as f64;
    let growth = (latest / earliest).powf(PERIODS_PER_YEAR / periods) - 1.0;
    if growth.is_finite() {
        growth * 100.0
    } else {
        0.0
    }
}

/// Annualized standard deviation of period-over-period returns. Percent.
pub fn volatility(snapshots: &[PortfolioSnapshot]) -> f64 {
    if snapshots.len() < 2 {
        return 0.0;
    }

    let values = chronological(snapshots);
    let returns: Vec<f64> = values
        .windows(2)
        .filter(|w| w[0] > 0.0)
        .map(|w| w[1] / w[0] - 1.0)
        .collect();

    if returns.is_empty() {
        return 0.0;
    }

    let mean = returns.iter().sum::<f64>() / returns.len() as f64;
    let variance =
        returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / returns.len() as f64;

    variance.sqrt() * PERIODS_PER_YEAR.sqrt() * 100.0
}

fn performers(holdings: &[Holding]) -> (Vec<Performer>, Vec<Performer>) {
    let mut ranked: Vec<Performer> = holdings
        .iter()
        .map(|h| Performer {
            name: h.plan_name(),
            return_pct: if h.investment.amount > 0.0 {
                h.investment.current_returns / h.investment.amount * 100.0
            } else {
                0.0
            },
            weight: h.investment.amount,
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.return_pct
            .partial_cmp(&a.return_pct)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    let top = ranked.iter().take(TOP_PERFORMERS).cloned().collect();

    ranked.reverse();
    let under = ranked.into_iter().take(UNDER_PERFORMERS).collect();

    (top, under)
}
