pub mod memory;
pub mod postgres;

use crate::domain::records::{Holding, PortfolioSnapshot, TransactionRecord, UserRecord};

/// Read-only access to the records the engine consumes.
///
/// List-returning methods order newest first where a time axis exists.
#[async_trait::async_trait]
pub trait RecordStore: Send + Sync {
    async fn fetch_user(&self, user_id: i64) -> anyhow::Result<Option<UserRecord>>;

    async fn fetch_holdings(&self, user_id: i64) -> anyhow::Result<Vec<Holding>>;

    async fn fetch_recent_transactions(
        &self,
        user_id: i64,
        limit: usize,
    ) -> anyhow::Result<Vec<TransactionRecord>>;

    async fn fetch_portfolio_snapshots(
        &self,
        user_id: i64,
        limit: usize,
    ) -> anyhow::Result<Vec<PortfolioSnapshot>>;

    async fn list_user_ids(&self) -> anyhow::Result<Vec<i64>>;
}
