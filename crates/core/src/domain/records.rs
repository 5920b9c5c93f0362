//! Read-only records supplied by the data-access layer.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: i64,
    pub balance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestmentRecord {
    pub id: i64,
    pub user_id: i64,
    pub plan_id: i64,
    pub amount: f64,
    pub current_returns: f64,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestmentPlanRecord {
    pub id: i64,
    pub name: String,
    pub apy_rate: Option<f64>,
}

/// An investment joined with the plan it was placed in.
///
/// `expected_return` is the figure recorded on the investment itself and is
/// only consulted when the plan carries no stated APY.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    pub investment: InvestmentRecord,
    pub plan: Option<InvestmentPlanRecord>,
    pub expected_return: Option<f64>,
}

impl Holding {
    pub fn plan_name(&self) -> String {
        match &self.plan {
            Some(plan) if !plan.name.trim().is_empty() => plan.name.trim().to_string(),
            _ => format!("Plan #{}", self.investment.plan_id),
        }
    }

    pub fn stated_yield(&self) -> Option<f64> {
        self.plan
            .as_ref()
            .and_then(|p| p.apy_rate)
            .or(self.expected_return)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Deposit,
    Withdrawal,
}

impl TransactionKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "deposit" => Some(TransactionKind::Deposit),
            "withdrawal" => Some(TransactionKind::Withdrawal),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub id: i64,
    pub user_id: i64,
    pub kind: TransactionKind,
    pub amount: f64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSnapshot {
    pub date: NaiveDate,
    pub total_value: f64,
}
