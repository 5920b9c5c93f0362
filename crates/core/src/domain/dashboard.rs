use crate::domain::education::EducationalContent;
use crate::domain::market::{MarketCondition, MarketInsight};
use crate::domain::portfolio::PortfolioAnalysis;
use crate::domain::profile::FinancialProfile;
use crate::domain::recommendation::FinancialRecommendation;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Outcome of one dashboard branch. A failed branch does not sink the others.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Section<T> {
    Ready { value: T },
    Failed { error: String },
}

impl<T> Section<T> {
    pub fn value(&self) -> Option<&T> {
        match self {
            Section::Ready { value } => Some(value),
            Section::Failed { .. } => None,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Section::Ready { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthRating {
    Excellent,
    Good,
    Fair,
    Poor,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioHealth {
    /// Not clamped. A low risk score pushes it well above 100 and a negative
    /// Sharpe ratio can take it below 0.
    pub score: i64,
    pub rating: HealthRating,
    pub diversification_score: f64,
    pub risk_score: f64,
    pub sharpe_ratio: f64,
    pub performance_vs_benchmark: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardOverview {
    pub urgent_recommendations: Vec<FinancialRecommendation>,
    pub key_insights: Vec<MarketInsight>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketSummary {
    pub conditions: MarketCondition,
    pub insights: Vec<MarketInsight>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardPayload {
    pub user_id: i64,
    pub generated_at: DateTime<Utc>,
    pub recommendations: Section<Vec<FinancialRecommendation>>,
    pub profile: Section<FinancialProfile>,
    pub portfolio: Section<PortfolioAnalysis>,
    pub market: Section<MarketSummary>,
    pub education: Section<Vec<EducationalContent>>,
    pub portfolio_health: Option<PortfolioHealth>,
    pub overview: DashboardOverview,
    pub warnings: Vec<String>,
}
