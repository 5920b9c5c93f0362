use crate::domain::records::{
    Holding, InvestmentPlanRecord, InvestmentRecord, PortfolioSnapshot, TransactionKind,
    TransactionRecord, UserRecord,
};
use crate::storage::RecordStore;
use anyhow::Context;
use chrono::{DateTime, NaiveDate, Utc};

/// Read model backed by the platform's Postgres tables. Never writes.
#[derive(Debug, Clone)]
pub struct PgRecordStore {
    pool: sqlx::PgPool,
}

impl PgRecordStore {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str, max_connections: u32) -> anyhow::Result<Self> {
        let pool = sqlx::postgres::PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .context("connect DATABASE_URL failed")?;
        Ok(Self::new(pool))
    }
}

type HoldingRow = (
    i64,
    i64,
    i64,
    f64,
    f64,
    DateTime<Utc>,
    DateTime<Utc>,
    Option<f64>,
    Option<i64>,
    Option<String>,
    Option<f64>,
);

#[async_trait::async_trait]
impl RecordStore for PgRecordStore {
    async fn fetch_user(&self, user_id: i64) -> anyhow::Result<Option<UserRecord>> {
        let row = sqlx::query_as::<_, (i64, f64)>(
            "SELECT id, balance::DOUBLE PRECISION FROM users WHERE id = $1",
        )
        .persistent(false)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .with_context(|| format!("select users failed (user_id={user_id})"))?;

        Ok(row.map(|(id, balance)| UserRecord { id, balance }))
    }

    async fn fetch_holdings(&self, user_id: i64) -> anyhow::Result<Vec<Holding>> {
        let rows = sqlx::query_as::<_, HoldingRow>(
            "SELECT i.id, i.user_id, i.plan_id, \
                    i.amount::DOUBLE PRECISION, i.current_returns::DOUBLE PRECISION, \
                    i.start_date, i.end_date, i.expected_return::DOUBLE PRECISION, \
                    p.id, p.name, p.apy_rate::DOUBLE PRECISION \
             FROM investments i \
             LEFT JOIN investment_plans p ON p.id = i.plan_id \
             WHERE i.user_id = $1 \
             ORDER BY i.id ASC",
        )
        .persistent(false)
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .with_context(|| format!("select investments failed (user_id={user_id})"))?;

        let mut out = Vec::with_capacity(rows.len());
        for (
            id,
            user_id,
            plan_id,
            amount,
            current_returns,
            start_date,
            end_date,
            expected_return,
            joined_plan_id,
            plan_name,
            apy_rate,
        ) in rows
        {
            let plan = joined_plan_id.map(|pid| InvestmentPlanRecord {
                id: pid,
                name: plan_name.unwrap_or_default(),
                apy_rate,
            });
            out.push(Holding {
                investment: InvestmentRecord {
                    id,
                    user_id,
                    plan_id,
                    amount,
                    current_returns,
                    start_date,
                    end_date,
                },
                plan,
                expected_return,
            });
        }
        Ok(out)
    }

    async fn fetch_recent_transactions(
        &self,
        user_id: i64,
        limit: usize,
    ) -> anyhow::Result<Vec<TransactionRecord>> {
        let rows = sqlx::query_as::<_, (i64, i64, String, f64, DateTime<Utc>)>(
            "SELECT id, user_id, type, amount::DOUBLE PRECISION, created_at \
             FROM transactions \
             WHERE user_id = $1 AND type IN ('deposit', 'withdrawal') \
             ORDER BY created_at DESC, id DESC \
             LIMIT $2",
        )
        .persistent(false)
        .bind(user_id)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .with_context(|| format!("select transactions failed (user_id={user_id})"))?;

        let mut out = Vec::with_capacity(rows.len());
        for (id, user_id, kind, amount, created_at) in rows {
            let Some(kind) = TransactionKind::parse(&kind) else {
                tracing::warn!(transaction_id = id, %kind, "skipping unknown transaction type");
                continue;
            };
            out.push(TransactionRecord {
                id,
                user_id,
                kind,
                amount,
                created_at,
            });
        }
        Ok(out)
    }

    async fn fetch_portfolio_snapshots(
        &self,
        user_id: i64,
        limit: usize,
    ) -> anyhow::Result<Vec<PortfolioSnapshot>> {
        let rows = sqlx::query_as::<_, (NaiveDate, f64)>(
            "SELECT date, total_value::DOUBLE PRECISION \
             FROM portfolio_snapshots \
             WHERE user_id = $1 \
             ORDER BY date DESC \
             LIMIT $2",
        )
        .persistent(false)
        .bind(user_id)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .with_context(|| format!("select portfolio_snapshots failed (user_id={user_id})"))?;

        Ok(rows
            .into_iter()
            .map(|(date, total_value)| PortfolioSnapshot { date, total_value })
            .collect())
    }

    async fn list_user_ids(&self) -> anyhow::Result<Vec<i64>> {
        let rows = sqlx::query_as::<_, (i64,)>("SELECT id FROM users ORDER BY id ASC")
            .persistent(false)
            .fetch_all(&self.pool)
            .await
            .context("select user ids failed")?;
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }
}
