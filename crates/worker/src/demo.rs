use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use finrec_core::domain::records::{
    Holding, InvestmentPlanRecord, InvestmentRecord, PortfolioSnapshot, TransactionKind,
    TransactionRecord, UserRecord,
};
use finrec_core::storage::memory::InMemoryRecordStore;

#[derive(Debug, Clone)]
pub struct DemoOptions {
    /// Number of synthetic users (must be 1..=1000).
    pub users: usize,

    /// Anchor for generated dates.
    pub as_of: DateTime<Utc>,
}

impl Default for DemoOptions {
    fn default() -> Self {
        Self {
            users: 3,
            as_of: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).single().unwrap_or_else(Utc::now),
        }
    }
}

const PLANS: [(&str, f64); 4] = [
    ("Capital Preserve", 4.5),
    ("Balanced Income", 9.0),
    ("Global Growth", 18.0),
    ("Frontier Tech", 30.0),
];

/// Deterministic fixture: user `n` holds `n + 1` investments spread over the
/// first `n` plans, with a steadily growing valuation history.
pub fn build_demo_store(opts: &DemoOptions) -> anyhow::Result<InMemoryRecordStore> {
    anyhow::ensure!(
        (1..=1000).contains(&opts.users),
        "demo user count must be 1..=1000 (got {})",
        opts.users
    );

    let plans: Vec<InvestmentPlanRecord> = PLANS
        .iter()
        .enumerate()
        .map(|(i, (name, apy))| InvestmentPlanRecord {
            id: i as i64 + 1,
            name: name.to_string(),
            apy_rate: Some(*apy),
        })
        .collect();

    let mut store = InMemoryRecordStore::default();
    let mut investment_id: i64 = 0;
    let mut transaction_id: i64 = 0;

    for n in 1..=opts.users as i64 {
        store = store.with_user(UserRecord {
            id: n,
            balance: 2_500.0 * n as f64,
        });

        let plan_span = (n as usize).min(plans.len());
        for k in 0..=n {
            investment_id += 1;
            let plan = &plans[k as usize % plan_span];
            let start = opts.as_of - Duration::days(30 * (k + 3));
            let amount = 1_500.0 * (k + 1) as f64;
            store = store.with_holding(Holding {
                investment: InvestmentRecord {
                    id: investment_id,
                    user_id: n,
                    plan_id: plan.id,
                    amount,
                    current_returns: amount * plan.apy_rate.unwrap_or(0.0) / 100.0 * 0.25,
                    start_date: start,
                    end_date: start + Duration::days(30 * (6 + 3 * k)),
                },
                plan: Some(plan.clone()),
                expected_return: None,
            });
        }

        for k in 0..(8 * n) {
            transaction_id += 1;
            let kind = if k % 4 == 3 {
                TransactionKind::Withdrawal
            } else {
                TransactionKind::Deposit
            };
            store = store.with_transaction(TransactionRecord {
                id: transaction_id,
                user_id: n,
                kind,
                amount: 800.0 + 50.0 * k as f64,
                created_at: opts.as_of - Duration::days(7 * k),
            });
        }

        let first: NaiveDate = (opts.as_of - Duration::days(30 * 12)).date_naive();
        for m in 0..=12 {
            let wobble = if m % 2 == 0 { 1.0 } else { 0.985 };
            let growth = (1.0 + 0.01 * n as f64).powi(m as i32);
            store = store.with_snapshot(
                n,
                PortfolioSnapshot {
                    date: first + Duration::days(30 * m),
                    total_value: 5_000.0 * n as f64 * growth * wobble,
                },
            );
        }
    }

    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use finrec_core::storage::RecordStore;

    #[test]
    fn rejects_out_of_range_user_count() {
        let opts = DemoOptions {
            users: 0,
            ..DemoOptions::default()
        };
        assert!(build_demo_store(&opts).is_err());
    }

    #[tokio::test]
    async fn demo_users_have_records() {
        let store = build_demo_store(&DemoOptions::default()).unwrap();
        assert_eq!(store.list_user_ids().await.unwrap(), vec![1, 2, 3]);

        let holdings = store.fetch_holdings(2).await.unwrap();
        assert_eq!(holdings.len(), 3);

        let txs = store.fetch_recent_transactions(3, 50).await.unwrap();
        assert_eq!(txs.len(), 24);
        assert!(txs.windows(2).all(|w| w[0].created_at >= w[1].created_at));

        let snaps = store.fetch_portfolio_snapshots(1, 30).await.unwrap();
        assert_eq!(snaps.len(), 13);
    }
}
