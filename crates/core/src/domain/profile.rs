use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskTolerance {
    Conservative,
    Moderate,
    Aggressive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Experience {
    Beginner,
    Intermediate,
    Expert,
}

/// Per-request view of a user's finances. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialProfile {
    pub user_id: i64,
    pub risk_tolerance: RiskTolerance,
    pub investment_goals: BTreeSet<String>,
    /// Months, always >= 1.
    pub time_horizon: u32,
    pub monthly_income: f64,
    pub monthly_expenses: f64,
    pub current_savings: f64,
    pub age: u32,
    pub experience: Experience,
}
