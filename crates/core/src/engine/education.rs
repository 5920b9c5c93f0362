use crate::domain::education::{Difficulty, EducationalContent};
use crate::domain::profile::{Experience, FinancialProfile, RiskTolerance};

fn article(
    id: &str,
    title: &str,
    description: &str,
    difficulty: Difficulty,
    estimated_minutes: u32,
    topics: &[&str],
) -> EducationalContent {
    EducationalContent {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        content_type: "article".to_string(),
        difficulty,
        estimated_minutes,
        topics: topics.iter().map(|t| t.to_string()).collect(),
    }
}

/// Curated reading list for a profile. Order is fixed: basics, advanced,
/// then market timing.
pub fn select_education(profile: &FinancialProfile) -> Vec<EducationalContent> {
    let mut out = Vec::with_capacity(3);

    if profile.experience == Experience::Beginner {
        out.push(article(
            "risk-basics",
            "Understanding investment risk",
            "How risk and return relate, and why a diversified portfolio rides out bad months better.",
            Difficulty::Beginner,
            8,
            &["risk", "diversification"],
        ));
    }

    if profile.risk_tolerance == RiskTolerance::Aggressive {
        out.push(article(
            "advanced-portfolio-optimization",
            "Advanced portfolio optimization",
            "Position sizing, rebalancing bands and risk budgeting for growth-focused investors.",
            Difficulty::Advanced,
            15,
            &["optimization", "rebalancing", "risk_budgeting"],
        ));
    }

    let timing_difficulty = if profile.experience == Experience::Beginner {
        Difficulty::Beginner
    } else {
        Difficulty::Intermediate
    };
    out.push(article(
        "market-timing",
        "Market timing versus time in the market",
        "Why staying invested usually beats trying to pick entry and exit points.",
        timing_difficulty,
        10,
        &["market_timing", "long_term_investing"],
    ));

    out
}
