use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Performer {
    pub name: String,
    /// Percent.
    #[serde(rename = "return")]
    pub return_pct: f64,
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioAnalysis {
    pub current_value: f64,
    pub total_return: f64,
    pub annualized_return: f64,
    pub volatility: f64,
    pub sharpe_ratio: f64,
    /// Always within [0, 1].
    pub diversification_score: f64,
    /// Always within [1, 10].
    pub risk_score: f64,
    pub performance_vs_benchmark: f64,
    pub top_performers: Vec<Performer>,
    pub under_performers: Vec<Performer>,
}
