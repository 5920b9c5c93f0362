use crate::domain::dashboard::{DashboardOverview, HealthRating, PortfolioHealth};
use crate::domain::market::MarketInsight;
use crate::domain::portfolio::PortfolioAnalysis;
use crate::domain::recommendation::FinancialRecommendation;

const OVERVIEW_RECOMMENDATIONS: usize = 3;
const OVERVIEW_INSIGHTS: usize = 3;

/// Weighted health score. Each term is bounded by its inputs; the total is
/// not clamped again, so extreme inputs can land outside [0, 100].
pub fn health_score(analysis: &PortfolioAnalysis) -> i64 {
    let diversification = analysis.diversification_score * 30.0;
    let risk = (10.0 - analysis.risk_score).max(0.0) * 20.0;
    let sharpe = (analysis.sharpe_ratio * 10.0).min(30.0);
    let performance = if analysis.performance_vs_benchmark > 0.0 {
        20.0
    } else {
        0.0
    };

    (diversification + risk + sharpe + performance).round() as i64
}

pub fn health_rating(score: i64) -> HealthRating {
    match score {
        s if s >= 80 => HealthRating::Excellent,
        s if s >= 60 => HealthRating::Good,
        s if s >= 40 => HealthRating::Fair,
        _ => HealthRating::Poor,
    }
}

pub fn portfolio_health(analysis: &PortfolioAnalysis) -> PortfolioHealth {
    let score = health_score(analysis);
    PortfolioHealth {
        score,
        rating: health_rating(score),
        diversification_score: analysis.diversification_score,
        risk_score: analysis.risk_score,
        sharpe_ratio: analysis.sharpe_ratio,
        performance_vs_benchmark: analysis.performance_vs_benchmark,
    }
}

/// Condensed view: the first urgent recommendations of an already ranked list
/// and the leading insights.
pub fn build_overview(
    recommendations: &[FinancialRecommendation],
    insights: &[MarketInsight],
) -> DashboardOverview {
    DashboardOverview {
        urgent_recommendations: recommendations
            .iter()
            .filter(|r| r.priority.is_urgent())
            .take(OVERVIEW_RECOMMENDATIONS)
            .cloned()
            .collect(),
        key_insights: insights.iter().take(OVERVIEW_INSIGHTS).cloned().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::profile::RiskTolerance;
    use crate::domain::recommendation::Priority;
    use crate::engine::market::{condition_from_scalars, curated_insights};
    use crate::engine::recommend::generate_recommendations;
    use crate::engine::recommend::tests::{profile, quiet_analysis};

    #[test]
    fn health_score_combines_weighted_terms() {
        let mut analysis = quiet_analysis();
        analysis.diversification_score = 0.5;
        analysis.risk_score = 8.0;
        analysis.sharpe_ratio = 1.2;
        analysis.performance_vs_benchmark = 1.0;
        // 15 + 40 + 12 + 20
        assert_eq!(health_score(&analysis), 87);
        assert_eq!(portfolio_health(&analysis).rating, HealthRating::Excellent);
    }

    #[test]
    fn sharpe_term_is_capped_but_can_go_negative() {
        let mut analysis = quiet_analysis();
        analysis.diversification_score = 0.0;
        analysis.risk_score = 10.0;
        analysis.performance_vs_benchmark = -1.0;

        analysis.sharpe_ratio = 9.0;
        assert_eq!(health_score(&analysis), 30);

        analysis.sharpe_ratio = -2.0;
        assert_eq!(health_score(&analysis), -20);
        assert_eq!(health_rating(-20), HealthRating::Poor);
    }

    #[test]
    fn low_risk_score_can_push_past_one_hundred() {
        let mut analysis = quiet_analysis();
        analysis.diversification_score = 1.0;
        analysis.risk_score = 1.0;
        analysis.sharpe_ratio = 3.0;
        analysis.performance_vs_benchmark = 2.0;
        assert_eq!(health_score(&analysis), 260);
    }

    #[test]
    fn overview_keeps_only_urgent_recommendations() {
        let mut analysis = quiet_analysis();
        analysis.diversification_score = 0.3;
        analysis.risk_score = 9.0;
        analysis.performance_vs_benchmark = 5.0;
        analysis.total_return = 2_000.0;
        let recs = generate_recommendations(
            &profile(RiskTolerance::Moderate, 12, 35),
            &analysis,
            &condition_from_scalars(0.0, 0.5, 0.9),
        );
        assert_eq!(recs.len(), 4);

        let overview = build_overview(&recs, &curated_insights());
        assert_eq!(overview.urgent_recommendations.len(), 2);
        assert!(overview
            .urgent_recommendations
            .iter()
            .all(|r| r.priority == Priority::High));
        assert_eq!(overview.key_insights.len(), 3);
    }
}
