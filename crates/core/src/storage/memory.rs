use crate::domain::records::{Holding, PortfolioSnapshot, TransactionRecord, UserRecord};
use crate::storage::RecordStore;
use std::collections::{BTreeMap, HashMap};

/// Fixture-backed store for tests and demo runs.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRecordStore {
    users: BTreeMap<i64, UserRecord>,
    holdings: Vec<Holding>,
    transactions: Vec<TransactionRecord>,
    snapshots: HashMap<i64, Vec<PortfolioSnapshot>>,
}

impl InMemoryRecordStore {
    pub fn with_user(mut self, user: UserRecord) -> Self {
        self.users.insert(user.id, user);
        self
    }

    pub fn with_holding(mut self, holding: Holding) -> Self {
        self.holdings.push(holding);
        self
    }

    pub fn with_transaction(mut self, transaction: TransactionRecord) -> Self {
        self.transactions.push(transaction);
        self
    }

    pub fn with_snapshot(mut self, user_id: i64, snapshot: PortfolioSnapshot) -> Self {
        self.snapshots.entry(user_id).or_default().push(snapshot);
        self
    }
}

#[async_trait::async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn fetch_user(&self, user_id: i64) -> anyhow::Result<Option<UserRecord>> {
        Ok(self.users.get(&user_id).cloned())
    }

    async fn fetch_holdings(&self, user_id: i64) -> anyhow::Result<Vec<Holding>> {
        Ok(self
            .holdings
            .iter()
            .filter(|h| h.investment.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn fetch_recent_transactions(
        &self,
        user_id: i64,
        limit: usize,
    ) -> anyhow::Result<Vec<TransactionRecord>> {
        let mut out: Vec<_> = self
            .transactions
            .iter()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect();
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));
        out.truncate(limit);
        Ok(out)
    }

    async fn fetch_portfolio_snapshots(
        &self,
        user_id: i64,
        limit: usize,
    ) -> anyhow::Result<Vec<PortfolioSnapshot>> {
        let mut out = self.snapshots.get(&user_id).cloned().unwrap_or_default();
        out.sort_by(|a, b| b.date.cmp(&a.date));
        out.truncate(limit);
        Ok(out)
    }

    async fn list_user_ids(&self) -> anyhow::Result<Vec<i64>> {
        Ok(self.users.keys().copied().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::records::TransactionKind;
    use chrono::{Duration, NaiveDate, TimeZone, Utc};

    #[tokio::test]
    async fn transactions_come_back_newest_first_and_limited() {
        let base = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let mut store = InMemoryRecordStore::default();
        for i in 0..60 {
            store = store.with_transaction(TransactionRecord {
                id: i,
                user_id: 1,
                kind: TransactionKind::Deposit,
                amount: i as f64,
                created_at: base + Duration::hours(i),
            });
        }
        store = store.with_transaction(TransactionRecord {
            id: 999,
            user_id: 2,
            kind: TransactionKind::Deposit,
            amount: 1.0,
            created_at: base,
        });

        let txs = store.fetch_recent_transactions(1, 50).await.unwrap();
        assert_eq!(txs.len(), 50);
        assert_eq!(txs[0].id, 59);
        assert_eq!(txs[49].id, 10);
        assert!(txs.iter().all(|t| t.user_id == 1));
    }

    #[tokio::test]
    async fn snapshots_are_sorted_by_date_descending() {
        let d = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        let store = InMemoryRecordStore::default()
            .with_snapshot(1, PortfolioSnapshot { date: d, total_value: 1.0 })
            .with_snapshot(1, PortfolioSnapshot { date: d + Duration::days(1), total_value: 2.0 });

        let snaps = store.fetch_portfolio_snapshots(1, 30).await.unwrap();
        assert_eq!(snaps[0].total_value, 2.0);
        assert!(store.fetch_portfolio_snapshots(2, 30).await.unwrap().is_empty());
    }
}
