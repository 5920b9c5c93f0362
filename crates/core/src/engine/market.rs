use crate::domain::market::{
    Impact, InsightCategory, InsightTimeframe, MarketCondition, MarketInsight, MarketTrend,
    VolatilityLevel,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::sync::Mutex;

pub const MIN_CONFIDENCE: f64 = 0.75;
pub const MAX_CONFIDENCE: f64 = 0.95;

const MARKET_FACTORS: [&str; 4] = [
    "Central bank interest rate policy",
    "Inflation trajectory",
    "Corporate earnings season",
    "Geopolitical developments",
];

/// Source of market state for the recommendation engine.
#[async_trait::async_trait]
pub trait MarketDataProvider: Send + Sync {
    fn provider_name(&self) -> &'static str;

    async fn condition(&self) -> anyhow::Result<MarketCondition>;

    async fn insights(&self) -> anyhow::Result<Vec<MarketInsight>>;
}

/// Maps raw scalars onto a snapshot. `trend` is expected in [-1, 1],
/// `volatility` in [0, 1]; `confidence` is clamped to the allowed band.
pub fn condition_from_scalars(trend: f64, volatility: f64, confidence: f64) -> MarketCondition {
    let trend = if trend > 0.3 {
        MarketTrend::Bullish
    } else if trend < -0.3 {
        MarketTrend::Bearish
    } else {
        MarketTrend::Neutral
    };

    let volatility = if volatility < 0.4 {
        VolatilityLevel::Low
    } else if volatility < 0.7 {
        VolatilityLevel::Medium
    } else {
        VolatilityLevel::High
    };

    MarketCondition {
        trend,
        volatility,
        confidence: confidence.clamp(MIN_CONFIDENCE, MAX_CONFIDENCE),
        factors: MARKET_FACTORS.iter().map(|s| s.to_string()).collect(),
    }
}

/// Draws a fresh snapshot on every call. Seed it for reproducible runs.
#[derive(Debug)]
pub struct SimulatedMarket {
    rng: Mutex<ChaCha8Rng>,
}

impl SimulatedMarket {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Self {
            rng: Mutex::new(rng),
        }
    }

    fn draw(&self) -> anyhow::Result<MarketCondition> {
        let mut rng = self
            .rng
            .lock()
            .map_err(|_| anyhow::anyhow!("market rng lock poisoned"))?;
        let trend = rng.gen_range(-1.0..=1.0);
        let volatility = rng.gen_range(0.0..=1.0);
        let confidence = rng.gen_range(MIN_CONFIDENCE..=MAX_CONFIDENCE);
        Ok(condition_from_scalars(trend, volatility, confidence))
    }
}

#[async_trait::async_trait]
impl MarketDataProvider for SimulatedMarket {
    fn provider_name(&self) -> &'static str {
        "simulated"
    }

    async fn condition(&self) -> anyhow::Result<MarketCondition> {
        self.draw()
    }

    async fn insights(&self) -> anyhow::Result<Vec<MarketInsight>> {
        Ok(curated_insights())
    }
}

/// Always reports the same snapshot.
#[derive(Debug, Clone)]
pub struct FixedMarket {
    condition: MarketCondition,
    insights: Vec<MarketInsight>,
}

impl FixedMarket {
    pub fn new(condition: MarketCondition) -> Self {
        Self {
            condition,
            insights: curated_insights(),
        }
    }

    pub fn with_insights(mut self, insights: Vec<MarketInsight>) -> Self {
        self.insights = insights;
        self
    }
}

#[async_trait::async_trait]
impl MarketDataProvider for FixedMarket {
    fn provider_name(&self) -> &'static str {
        "fixed"
    }

    async fn condition(&self) -> anyhow::Result<MarketCondition> {
        Ok(self.condition.clone())
    }

    async fn insights(&self) -> anyhow::Result<Vec<MarketInsight>> {
        Ok(self.insights.clone())
    }
}

#[allow(clippy::too_many_arguments)]
fn insight(
    category: InsightCategory,
    title: &str,
    description: &str,
    impact: Impact,
    severity: u8,
    timeframe: InsightTimeframe,
    sectors: &[&str],
    recommendation: &str,
) -> MarketInsight {
    MarketInsight {
        category,
        title: title.to_string(),
        description: description.to_string(),
        impact,
        severity,
        timeframe,
        affected_sectors: sectors.iter().map(|s| s.to_string()).collect(),
        recommendation: recommendation.to_string(),
    }
}

/// Seed catalog of insights. Independent of the current snapshot.
pub fn curated_insights() -> Vec<MarketInsight> {
    vec![
        insight(
            InsightCategory::Trend,
            "Technology sector momentum",
            "Large-cap technology names continue to lead broad index gains on steady earnings revisions.",
            Impact::Positive,
            7,
            InsightTimeframe::MediumTerm,
            &["technology", "communication_services"],
            "Hold core technology exposure but cap any single sector near a quarter of the portfolio.",
        ),
        insight(
            InsightCategory::Economic,
            "Interest rate outlook",
            "Policy rates look set to stay elevated for longer, pressuring rate-sensitive assets.",
            Impact::Negative,
            6,
            InsightTimeframe::ShortTerm,
            &["real_estate", "utilities", "financials"],
            "Favor shorter-duration fixed income and review leverage in rate-sensitive plans.",
        ),
        insight(
            InsightCategory::Opportunity,
            "Emerging market valuations",
            "Emerging market equities trade at a wide discount to developed markets.",
            Impact::Positive,
            5,
            InsightTimeframe::LongTerm,
            &["emerging_markets", "materials"],
            "Consider a small, gradually built allocation for long-horizon portfolios.",
        ),
        insight(
            InsightCategory::Risk,
            "Elevated market concentration",
            "A handful of mega-cap stocks drive an outsized share of index returns.",
            Impact::Neutral,
            8,
            InsightTimeframe::Immediate,
            &["technology", "consumer_discretionary"],
            "Check index funds for overlap and rebalance toward equal-weight or value exposures.",
        ),
    ]
}
