use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationType {
    Investment,
    PortfolioRebalance,
    RiskAdjustment,
    Diversification,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

impl Priority {
    pub fn weight(self) -> f64 {
        match self {
            Priority::Critical => 4.0,
            Priority::High => 3.0,
            Priority::Medium => 2.0,
            Priority::Low => 1.0,
        }
    }

    pub fn is_urgent(self) -> bool {
        matches!(self, Priority::High | Priority::Critical)
    }
}

/// A single actionable suggestion. Built once per request and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialRecommendation {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: RecommendationType,
    pub title: String,
    pub description: String,
    pub priority: Priority,
    /// Percent, signed.
    pub expected_return: f64,
    /// Signed change in risk exposure.
    pub risk_level: f64,
    pub timeframe: String,
    pub action_items: Vec<String>,
    pub reasoning: String,
    /// Within [0, 1].
    pub confidence: f64,
    pub potential_gains: f64,
    pub potential_losses: f64,
    pub market_factors: Vec<String>,
}

impl FinancialRecommendation {
    /// Ranking key: priority weight times confidence.
    pub fn score(&self) -> f64 {
        self.priority.weight() * self.confidence
    }
}
