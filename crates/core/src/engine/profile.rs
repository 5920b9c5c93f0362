use crate::domain::profile::{Experience, FinancialProfile, RiskTolerance};
use crate::domain::records::{Holding, TransactionKind, TransactionRecord, UserRecord};
use std::collections::{BTreeSet, HashSet};

/// Transactions considered when building a profile (newest first).
pub const PROFILE_TRANSACTION_WINDOW: usize = 50;

/// Age is not derivable from the records we receive. Product has not decided
/// on a source yet, so every profile carries this value.
pub const PLACEHOLDER_AGE: u32 = 35;

const DEFAULT_TIME_HORIZON_MONTHS: u32 = 12;
const DAYS_PER_MONTH: i64 = 30;
const CASHFLOW_SAMPLE: usize = 6;
const WEALTH_BUILDING_THRESHOLD: f64 = 10_000.0;
const DIVERSIFICATION_GOAL_MIN_HOLDINGS: usize = 5;

/// Derives a profile from a user's records. `transactions` must be ordered
/// newest first; anything past the window is ignored.
pub fn build_profile(
    user: &UserRecord,
    holdings: &[Holding],
    transactions: &[TransactionRecord],
) -> FinancialProfile {
    let transactions = &transactions[..transactions.len().min(PROFILE_TRANSACTION_WINDOW)];

    FinancialProfile {
        user_id: user.id,
        risk_tolerance: risk_tolerance(holdings, transactions),
        investment_goals: investment_goals(holdings),
        time_horizon: time_horizon(holdings),
        monthly_income: recent_mean(transactions, TransactionKind::Deposit),
        monthly_expenses: recent_mean(transactions, TransactionKind::Withdrawal),
        current_savings: user.balance,
        age: PLACEHOLDER_AGE,
        experience: experience(holdings, transactions),
    }
}

pub fn risk_tolerance(holdings: &[Holding], transactions: &[TransactionRecord]) -> RiskTolerance {
    let total_deposits: f64 = transactions
        .iter()
        .filter(|t| t.kind == TransactionKind::Deposit)
        .map(|t| t.amount)
        .sum();

    if total_deposits <= 0.0 {
        tracing::debug!("no deposits on record; defaulting risk tolerance to conservative");
        return RiskTolerance::Conservative;
    }

    let average_investment = if holdings.is_empty() {
        0.0
    } else {
        holdings.iter().map(|h| h.investment.amount).sum::<f64>() / holdings.len() as f64
    };

    let ratio = average_investment / total_deposits;
    if ratio < 0.2 {
        RiskTolerance::Conservative
    } else if ratio < 0.5 {
        RiskTolerance::Moderate
    } else {
        RiskTolerance::Aggressive
    }
}

pub fn experience(holdings: &[Holding], transactions: &[TransactionRecord]) -> Experience {
    let transaction_count = transactions.len();
    let distinct_plans = holdings
        .iter()
        .map(|h| h.investment.plan_id)
        .collect::<HashSet<_>>()
        .len();

    if transaction_count < 10 || distinct_plans < 2 {
        Experience::Beginner
    } else if transaction_count < 25 || distinct_plans < 4 {
        Experience::Intermediate
    } else {
        Experience::Expert
    }
}

pub fn investment_goals(holdings: &[Holding]) -> BTreeSet<String> {
    let mut goals = BTreeSet::new();
    goals.insert("capital_growth".to_string());
    if holdings
        .iter()
        .any(|h| h.investment.amount > WEALTH_BUILDING_THRESHOLD)
    {
        goals.insert("wealth_building".to_string());
    }
    if holdings.len() > DIVERSIFICATION_GOAL_MIN_HOLDINGS {
        goals.insert("diversification".to_string());
    }
    goals
}

/// Mean holding duration in whole months, rounded. Each holding counts for at
/// least one month.
pub fn time_horizon(holdings: &[Holding]) -> u32 {
    if holdings.is_empty() {
        return DEFAULT_TIME_HORIZON_MONTHS;
    }

    let total_months: i64 = holdings
        .iter()
        .map(|h| {
            let days = (h.investment.end_date - h.investment.start_date).num_days();
            (days.div_euclid(DAYS_PER_MONTH)).max(1)
        })
        .sum();

    let mean = total_months as f64 / holdings.len() as f64;
    (mean.round() as u32).max(1)
}

fn recent_mean(transactions: &[TransactionRecord], kind: TransactionKind) -> f64 {
    let sample: Vec<f64> = transactions
        .iter()
        .filter(|t| t.kind == kind)
        .take(CASHFLOW_SAMPLE)
        .map(|t| t.amount)
        .collect();

    if sample.is_empty() {
        0.0
    } else {
        sample.iter().sum::<f64>() / sample.len() as f64
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::domain::records::{InvestmentPlanRecord, InvestmentRecord};
    use chrono::{Duration, TimeZone, Utc};

    pub(crate) fn holding(id: i64, plan_id: i64, amount: f64, returns: f64, days: i64) -> Holding {
        let start = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        Holding {
            investment: InvestmentRecord {
                id,
                user_id: 1,
                plan_id,
                amount,
                current_returns: returns,
                start_date: start,
                end_date: start + Duration::days(days),
            },
            plan: Some(InvestmentPlanRecord {
                id: plan_id,
                name: format!("Plan {plan_id}"),
                apy_rate: Some(12.0),
            }),
            expected_return: None,
        }
    }

    pub(crate) fn tx(id: i64, kind: TransactionKind, amount: f64) -> TransactionRecord {
        TransactionRecord {
            id,
            user_id: 1,
            kind,
            amount,
            created_at: Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap() - Duration::days(id),
        }
    }

    fn user() -> UserRecord {
        UserRecord { id: 1, balance: 2_500.0 }
    }

    #[test]
    fn no_deposits_means_conservative() {
        let holdings = vec![holding(1, 1, 50_000.0, 0.0, 365)];
        let txs = vec![tx(1, TransactionKind::Withdrawal, 100.0)];
        assert_eq!(risk_tolerance(&holdings, &txs), RiskTolerance::Conservative);
    }

    #[test]
    fn risk_tolerance_thresholds() {
        let txs = vec![tx(1, TransactionKind::Deposit, 1_000.0)];
        assert_eq!(
            risk_tolerance(&[holding(1, 1, 100.0, 0.0, 30)], &txs),
            RiskTolerance::Conservative
        );
        assert_eq!(
            risk_tolerance(&[holding(1, 1, 300.0, 0.0, 30)], &txs),
            RiskTolerance::Moderate
        );
        assert_eq!(
            risk_tolerance(&[holding(1, 1, 500.0, 0.0, 30)], &txs),
            RiskTolerance::Aggressive
        );
    }

    #[test]
    fn experience_needs_both_activity_and_breadth() {
        let many_txs: Vec<_> = (1..=30).map(|i| tx(i, TransactionKind::Deposit, 10.0)).collect();
        let one_plan = vec![holding(1, 1, 10.0, 0.0, 30), holding(2, 1, 10.0, 0.0, 30)];
        assert_eq!(experience(&one_plan, &many_txs), Experience::Beginner);

        let three_plans: Vec<_> = (1..=3).map(|i| holding(i, i, 10.0, 0.0, 30)).collect();
        assert_eq!(experience(&three_plans, &many_txs), Experience::Intermediate);

        let five_plans: Vec<_> = (1..=5).map(|i| holding(i, i, 10.0, 0.0, 30)).collect();
        assert_eq!(experience(&five_plans, &many_txs), Experience::Expert);
        assert_eq!(experience(&five_plans, &many_txs[..12]), Experience::Intermediate);
        assert_eq!(experience(&five_plans, &many_txs[..9]), Experience::Beginner);
    }

    #[test]
    fn goals_always_include_capital_growth() {
        let goals = investment_goals(&[]);
        assert_eq!(goals.len(), 1);
        assert!(goals.contains("capital_growth"));

        let holdings: Vec<_> = (1..=6)
            .map(|i| holding(i, i, if i == 1 { 10_001.0 } else { 10.0 }, 0.0, 30))
            .collect();
        let goals = investment_goals(&holdings);
        assert!(goals.contains("wealth_building"));
        assert!(goals.contains("diversification"));
    }

    #[test]
    fn time_horizon_floors_per_holding_and_rounds_mean() {
        assert_eq!(time_horizon(&[]), 12);
        // 10 days -> 1 month (minimum), 95 days -> 3 months; mean 2.
        let holdings = vec![holding(1, 1, 1.0, 0.0, 10), holding(2, 1, 1.0, 0.0, 95)];
        assert_eq!(time_horizon(&holdings), 2);
        // 1 and 2 months -> mean 1.5 rounds to 2.
        let holdings = vec![holding(1, 1, 1.0, 0.0, 30), holding(2, 1, 1.0, 0.0, 60)];
        assert_eq!(time_horizon(&holdings), 2);
    }

    #[test]
    fn cashflow_uses_six_most_recent_of_each_kind() {
        let mut txs: Vec<_> = (1..=6).map(|i| tx(i, TransactionKind::Deposit, 100.0)).collect();
        txs.push(tx(7, TransactionKind::Deposit, 10_000.0));
        txs.push(tx(8, TransactionKind::Withdrawal, 40.0));
        txs.push(tx(9, TransactionKind::Withdrawal, 60.0));

        let profile = build_profile(&user(), &[], &txs);
        assert_eq!(profile.monthly_income, 100.0);
        assert_eq!(profile.monthly_expenses, 50.0);
        assert_eq!(profile.current_savings, 2_500.0);
        assert_eq!(profile.age, PLACEHOLDER_AGE);
    }

    #[test]
    fn window_ignores_older_transactions() {
        let mut txs: Vec<_> = (1..=50).map(|i| tx(i, TransactionKind::Withdrawal, 1.0)).collect();
        txs.push(tx(51, TransactionKind::Deposit, 500.0));
        let profile = build_profile(&user(), &[], &txs);
        assert_eq!(profile.monthly_income, 0.0);
        assert_eq!(profile.risk_tolerance, RiskTolerance::Conservative);
    }
}
