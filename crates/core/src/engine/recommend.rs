use crate::domain::market::{MarketCondition, MarketTrend, VolatilityLevel};
use crate::domain::portfolio::PortfolioAnalysis;
use crate::domain::profile::{FinancialProfile, RiskTolerance};
use crate::domain::recommendation::{FinancialRecommendation, Priority, RecommendationType};
use uuid::Uuid;

const DIVERSIFICATION_THRESHOLD: f64 = 0.6;
const REBALANCE_BENCHMARK_GAP: f64 = 3.0;
const RISK_GAP: f64 = 1.5;
const OPPORTUNITY_MIN_CONFIDENCE: f64 = 0.8;
const TAX_OPTIMIZATION_MIN_GAIN: f64 = 1_000.0;

pub fn priority_weight(priority: Priority) -> f64 {
    priority.weight()
}

/// Risk score the profile should be carrying, within [1, 10].
pub fn target_risk(profile: &FinancialProfile) -> f64 {
    let mut target = 5.0;

    target += match profile.risk_tolerance {
        RiskTolerance::Conservative => -2.0,
        RiskTolerance::Moderate => 0.0,
        RiskTolerance::Aggressive => 2.0,
    };

    if profile.time_horizon < 6 {
        target -= 1.0;
    } else if profile.time_horizon > 24 {
        target += 1.0;
    }

    if profile.age < 30 {
        target += 1.0;
    } else if profile.age > 50 {
        target -= 1.0;
    }

    f64::clamp(target, 1.0, 10.0)
}

/// Runs every rule and returns the fired recommendations, best first.
///
/// Ordering is by `priority_weight * confidence`, descending. The sort is
/// stable so equal scores keep rule order.
pub fn generate_recommendations(
    profile: &FinancialProfile,
    analysis: &PortfolioAnalysis,
    market: &MarketCondition,
) -> Vec<FinancialRecommendation> {
    let mut out = Vec::new();

    out.extend(diversification(analysis));
    out.extend(rebalance(analysis));
    out.extend(risk_adjustment(profile, analysis));
    out.extend(market_opportunity(profile, market));
    out.extend(tax_optimization(analysis));

    rank(&mut out);
    out
}

pub fn rank(recommendations: &mut [FinancialRecommendation]) {
    recommendations.sort_by(|a, b| {
        b.score()
            .partial_cmp(&a.score())
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}

fn diversification(analysis: &PortfolioAnalysis) -> Option<FinancialRecommendation> {
    if analysis.diversification_score >= DIVERSIFICATION_THRESHOLD {
        return None;
    }

    let value = analysis.current_value;
    Some(FinancialRecommendation {
        id: Uuid::new_v4(),
        kind: RecommendationType::Diversification,
        title: "Diversify your portfolio".to_string(),
        description: format!(
            "Your holdings are concentrated in few plans (diversification score {:.2}). Spreading capital across more plans lowers single-plan risk.",
            analysis.diversification_score
        ),
        priority: Priority::High,
        expected_return: 2.5,
        risk_level: -1.0,
        timeframe: "3-6 months".to_string(),
        action_items: vec![
            "Add at least two plans with different underlying strategies".to_string(),
            "Cap any single plan at 30% of the portfolio".to_string(),
            "Direct new deposits to under-weighted plans first".to_string(),
        ],
        reasoning: "A low diversification score means returns depend heavily on a small number of plans.".to_string(),
        confidence: 0.85,
        potential_gains: value * 0.15,
        potential_losses: value * 0.05,
        market_factors: vec![
            "Sector concentration".to_string(),
            "Market volatility".to_string(),
        ],
    })
}

fn rebalance(analysis: &PortfolioAnalysis) -> Option<FinancialRecommendation> {
    let gap = analysis.performance_vs_benchmark;
    if gap.abs() <= REBALANCE_BENCHMARK_GAP {
        return None;
    }

    let value = analysis.current_value;
    let direction = if gap > 0.0 { "ahead of" } else { "behind" };
    Some(FinancialRecommendation {
        id: Uuid::new_v4(),
        kind: RecommendationType::PortfolioRebalance,
        title: "Rebalance your portfolio".to_string(),
        description: format!(
            "Your annualized return is {:.1} points {direction} the 8% benchmark. Rebalancing brings allocations back to target.",
            gap.abs()
        ),
        priority: Priority::Medium,
        expected_return: 1.8,
        risk_level: 0.0,
        timeframe: "1-3 months".to_string(),
        action_items: vec![
            "Review current allocation against your target mix".to_string(),
            "Trim plans that have drifted above target weight".to_string(),
            "Reinvest proceeds in plans below target weight".to_string(),
        ],
        reasoning: format!(
            "Performance {direction} the benchmark by more than {REBALANCE_BENCHMARK_GAP} points usually signals allocation drift."
        ),
        confidence: 0.78,
        potential_gains: value * 0.08,
        potential_losses: value * 0.02,
        market_factors: vec!["Benchmark divergence".to_string()],
    })
}

fn risk_adjustment(
    profile: &FinancialProfile,
    analysis: &PortfolioAnalysis,
) -> Option<FinancialRecommendation> {
    let target = target_risk(profile);
    let gap = analysis.risk_score - target;
    if gap.abs() <= RISK_GAP {
        return None;
    }

    let value = analysis.current_value;
    let rec = if gap > 0.0 {
        FinancialRecommendation {
            id: Uuid::new_v4(),
            kind: RecommendationType::RiskAdjustment,
            title: "Reduce portfolio risk".to_string(),
            description: format!(
                "Your portfolio risk score of {:.1} is above the {target:.1} that fits your profile.",
                analysis.risk_score
            ),
            priority: Priority::High,
            expected_return: -0.5,
            risk_level: -gap,
            timeframe: "1-2 months".to_string(),
            action_items: vec![
                "Shift part of high-yield holdings into lower-volatility plans".to_string(),
                "Keep an emergency reserve outside invested plans".to_string(),
                "Avoid adding to the highest-APY plans until risk is back in range".to_string(),
            ],
            reasoning: "Carrying more risk than your tolerance and horizon support raises the chance of forced selling in a drawdown.".to_string(),
            confidence: 0.82,
            potential_gains: value * 0.03,
            potential_losses: value * 0.08,
            market_factors: vec!["Market volatility".to_string()],
        }
    } else {
        FinancialRecommendation {
            id: Uuid::new_v4(),
            kind: RecommendationType::RiskAdjustment,
            title: "Increase growth exposure".to_string(),
            description: format!(
                "Your portfolio risk score of {:.1} is below the {target:.1} your profile can support.",
                analysis.risk_score
            ),
            priority: Priority::Medium,
            expected_return: 2.2,
            risk_level: -gap,
            timeframe: "3-6 months".to_string(),
            action_items: vec![
                "Allocate a portion of new deposits to growth-oriented plans".to_string(),
                "Increase exposure gradually over several months".to_string(),
                "Review the allocation again after each quarter".to_string(),
            ],
            reasoning: "A portfolio well below your risk capacity is likely to leave long-term returns on the table.".to_string(),
            confidence: 0.82,
            potential_gains: value * 0.12,
            potential_losses: value * 0.05,
            market_factors: vec!["Growth opportunities".to_string()],
        }
    };

    Some(rec)
}

fn market_opportunity(
    profile: &FinancialProfile,
    market: &MarketCondition,
) -> Option<FinancialRecommendation> {
    if market.trend != MarketTrend::Bullish || market.confidence <= OPPORTUNITY_MIN_CONFIDENCE {
        return None;
    }

    let savings = profile.current_savings;
    let volatility_note = match market.volatility {
        VolatilityLevel::Low => "Volatility is low",
        VolatilityLevel::Medium => "Volatility is moderate",
        VolatilityLevel::High => "Volatility is high, so stage entries",
    };

    Some(FinancialRecommendation {
        id: Uuid::new_v4(),
        kind: RecommendationType::Investment,
        title: "Capitalize on bullish market conditions".to_string(),
        description: format!(
            "Markets are trending up with {:.0}% confidence. {volatility_note}.",
            market.confidence * 100.0
        ),
        priority: Priority::Medium,
        expected_return: 4.2,
        risk_level: 1.0,
        timeframe: "1-3 months".to_string(),
        action_items: vec![
            "Deploy part of idle savings into growth plans".to_string(),
            "Split the entry into several tranches".to_string(),
            "Set a review date to lock in gains".to_string(),
        ],
        reasoning: "A confident bullish trend improves the odds that new capital compounds quickly.".to_string(),
        confidence: market.confidence,
        potential_gains: savings * 0.20,
        potential_losses: savings * 0.08,
        market_factors: market.factors.clone(),
    })
}

fn tax_optimization(analysis: &PortfolioAnalysis) -> Option<FinancialRecommendation> {
    if analysis.total_return <= TAX_OPTIMIZATION_MIN_GAIN {
        return None;
    }

    Some(FinancialRecommendation {
        id: Uuid::new_v4(),
        kind: RecommendationType::Investment,
        title: "Optimize taxes on your gains".to_string(),
        description: format!(
            "You have {:.2} in unrealized gains. Timing realizations can reduce the tax you owe.",
            analysis.total_return
        ),
        priority: Priority::Low,
        expected_return: 1.2,
        risk_level: 0.0,
        timeframe: "Before year end".to_string(),
        action_items: vec![
            "Offset gains with any realized losses".to_string(),
            "Prefer tax-advantaged accounts for new contributions".to_string(),
            "Consult a tax professional before realizing large gains".to_string(),
        ],
        reasoning: "Gains above the threshold are large enough for tax planning to matter.".to_string(),
        confidence: 0.70,
        potential_gains: analysis.total_return * 0.15,
        potential_losses: 0.0,
        market_factors: vec!["Tax policy".to_string()],
    })
}
