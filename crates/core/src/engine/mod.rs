//! The recommendation engine: pure scoring functions plus a stateless service
//! that fetches records through a [`RecordStore`] and composes them.

pub mod dashboard;
pub mod education;
pub mod market;
pub mod portfolio;
pub mod profile;
pub mod recommend;

use crate::domain::dashboard::{DashboardPayload, MarketSummary, Section};
use crate::domain::education::EducationalContent;
use crate::domain::market::MarketInsight;
use crate::domain::portfolio::PortfolioAnalysis;
use crate::domain::profile::FinancialProfile;
use crate::domain::recommendation::FinancialRecommendation;
use crate::domain::records::UserRecord;
use crate::error::{EngineError, EngineResult};
use crate::storage::RecordStore;
use chrono::{DateTime, Utc};
use market::MarketDataProvider;
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Acceptance {
    pub user_id: i64,
    pub recommendation_id: Uuid,
    pub accepted_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct RecommendationEngine {
    store: Option<Arc<dyn RecordStore>>,
    market: Arc<dyn MarketDataProvider>,
}

impl RecommendationEngine {
    pub fn new(store: Arc<dyn RecordStore>, market: Arc<dyn MarketDataProvider>) -> Self {
        Self {
            store: Some(store),
            market,
        }
    }

    /// Engine without a record store. Market operations work; anything that
    /// needs user records fails with `Unavailable`.
    pub fn market_only(market: Arc<dyn MarketDataProvider>) -> Self {
        Self {
            store: None,
            market,
        }
    }

    fn store(&self) -> EngineResult<&dyn RecordStore> {
        self.store.as_deref().ok_or(EngineError::Unavailable)
    }

    async fn require_user(&self, user_id: i64) -> EngineResult<UserRecord> {
        self.store()?
            .fetch_user(user_id)
            .await?
            .ok_or_else(|| EngineError::NotFound(format!("user {user_id} not found")))
    }

    pub async fn financial_profile(&self, user_id: i64) -> EngineResult<FinancialProfile> {
        let store = self.store()?;
        let user = self.require_user(user_id).await?;
        let (holdings, transactions) = tokio::try_join!(
            store.fetch_holdings(user_id),
            store.fetch_recent_transactions(user_id, profile::PROFILE_TRANSACTION_WINDOW),
        )?;
        Ok(profile::build_profile(&user, &holdings, &transactions))
    }

    pub async fn portfolio_analysis(&self, user_id: i64) -> EngineResult<PortfolioAnalysis> {
        let store = self.store()?;
        self.require_user(user_id).await?;
        let (holdings, snapshots) = tokio::try_join!(
            store.fetch_holdings(user_id),
            store.fetch_portfolio_snapshots(user_id, portfolio::SNAPSHOT_WINDOW),
        )?;
        Ok(portfolio::analyze_portfolio(&holdings, &snapshots))
    }

    pub async fn market_insights(&self) -> EngineResult<Vec<MarketInsight>> {
        Ok(self.market.insights().await?)
    }

    pub async fn market_conditions(&self) -> EngineResult<MarketSummary> {
        let (conditions, insights) =
            tokio::try_join!(self.market.condition(), self.market.insights())?;
        Ok(MarketSummary {
            conditions,
            insights,
        })
    }

    pub async fn recommendations(
        &self,
        user_id: i64,
    ) -> EngineResult<Vec<FinancialRecommendation>> {
        let t0 = std::time::Instant::now();
        let store = self.store()?;
        let user = self.require_user(user_id).await?;
        let (holdings, transactions, snapshots, market) = tokio::try_join!(
            store.fetch_holdings(user_id),
            store.fetch_recent_transactions(user_id, profile::PROFILE_TRANSACTION_WINDOW),
            store.fetch_portfolio_snapshots(user_id, portfolio::SNAPSHOT_WINDOW),
            self.market.condition(),
        )?;

        let profile = profile::build_profile(&user, &holdings, &transactions);
        let analysis = portfolio::analyze_portfolio(&holdings, &snapshots);
        let recs = recommend::generate_recommendations(&profile, &analysis, &market);
        tracing::info!(
            user_id,
            count = recs.len(),
            elapsed_ms = t0.elapsed().as_millis(),
            "generated recommendations"
        );
        Ok(recs)
    }

    /// Looks up a recommendation in a freshly generated set. Ids are not
    /// stable across generations, so a second lookup may miss.
    pub async fn recommendation(
        &self,
        user_id: i64,
        recommendation_id: Uuid,
    ) -> EngineResult<FinancialRecommendation> {
        self.recommendations(user_id)
            .await?
            .into_iter()
            .find(|r| r.id == recommendation_id)
            .ok_or_else(|| {
                EngineError::NotFound(format!("recommendation {recommendation_id} not found"))
            })
    }

    /// Acknowledges acceptance. Nothing is executed or stored.
    pub async fn accept_recommendation(
        &self,
        user_id: i64,
        recommendation_id: Uuid,
    ) -> EngineResult<Acceptance> {
        self.store()?;
        let accepted_at = Utc::now();
        tracing::info!(user_id, %recommendation_id, %accepted_at, "recommendation accepted");
        Ok(Acceptance {
            user_id,
            recommendation_id,
            accepted_at,
        })
    }

    pub async fn education(&self, user_id: i64) -> EngineResult<Vec<EducationalContent>> {
        let profile = self.financial_profile(user_id).await?;
        Ok(education::select_education(&profile))
    }

    /// Fetches every input once, concurrently, then derives each section from
    /// the shared results. A missing user fails the whole call; any other
    /// failure only degrades the sections that depend on it.
    pub async fn dashboard(&self, user_id: i64) -> EngineResult<DashboardPayload> {
        let store = self.store()?;
        let user = self.require_user(user_id).await?;

        let (holdings, transactions, snapshots, condition, insights) = tokio::join!(
            store.fetch_holdings(user_id),
            store.fetch_recent_transactions(user_id, profile::PROFILE_TRANSACTION_WINDOW),
            store.fetch_portfolio_snapshots(user_id, portfolio::SNAPSHOT_WINDOW),
            self.market.condition(),
            self.market.insights(),
        );

        let holdings = holdings.map_err(|e| failure("holdings", e));
        let transactions = transactions.map_err(|e| failure("transactions", e));
        let snapshots = snapshots.map_err(|e| failure("portfolio snapshots", e));
        let condition = condition.map_err(|e| failure("market condition", e));
        let insights = insights.map_err(|e| failure("market insights", e));

        let profile = match (&holdings, &transactions) {
            (Ok(h), Ok(t)) => Ok(profile::build_profile(&user, h, t)),
            (Err(e), _) | (_, Err(e)) => Err(e.clone()),
        };
        let analysis = match (&holdings, &snapshots) {
            (Ok(h), Ok(s)) => Ok(portfolio::analyze_portfolio(h, s)),
            (Err(e), _) | (_, Err(e)) => Err(e.clone()),
        };
        let market = match (&condition, &insights) {
            (Ok(c), Ok(i)) => Ok(MarketSummary {
                conditions: c.clone(),
                insights: i.clone(),
            }),
            (Err(e), _) | (_, Err(e)) => Err(e.clone()),
        };
        let recommendations = match (&profile, &analysis, &condition) {
            (Ok(p), Ok(a), Ok(c)) => Ok(recommend::generate_recommendations(p, a, c)),
            (Err(e), _, _) | (_, Err(e), _) | (_, _, Err(e)) => Err(e.clone()),
        };
        let education = match &profile {
            Ok(p) => Ok(education::select_education(p)),
            Err(e) => Err(e.clone()),
        };

        let mut warnings = Vec::new();
        let recommendations = section("recommendations", recommendations, &mut warnings);
        let profile = section("profile", profile, &mut warnings);
        let portfolio = section("portfolio", analysis, &mut warnings);
        let market = section("market", market, &mut warnings);
        let education = section("education", education, &mut warnings);

        if !warnings.is_empty() {
            tracing::warn!(user_id, ?warnings, "dashboard assembled with missing sections");
        }

        let portfolio_health = portfolio.value().map(dashboard::portfolio_health);
        let overview = dashboard::build_overview(
            recommendations.value().map(Vec::as_slice).unwrap_or_default(),
            market
                .value()
                .map(|m| m.insights.as_slice())
                .unwrap_or_default(),
        );

        Ok(DashboardPayload {
            user_id,
            generated_at: Utc::now(),
            recommendations,
            profile,
            portfolio,
            market,
            education,
            portfolio_health,
            overview,
            warnings,
        })
    }
}

fn failure(what: &str, err: anyhow::Error) -> String {
    EngineError::from(err.context(format!("fetch {what} failed"))).to_string()
}

fn section<T>(name: &str, result: Result<T, String>, warnings: &mut Vec<String>) -> Section<T> {
    match result {
        Ok(value) => Section::Ready { value },
        Err(error) => {
            warnings.push(format!("{name}: {error}"));
            Section::Failed { error }
        }
    }
}
