use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use finrec_core::domain::dashboard::{DashboardPayload, MarketSummary};
use finrec_core::domain::education::EducationalContent;
use finrec_core::domain::market::MarketInsight;
use finrec_core::domain::portfolio::PortfolioAnalysis;
use finrec_core::domain::profile::FinancialProfile;
use finrec_core::domain::recommendation::FinancialRecommendation;
use finrec_core::engine::market::{MarketDataProvider, SimulatedMarket};
use finrec_core::engine::{Acceptance, RecommendationEngine};
use finrec_core::error::{parse_recommendation_id, parse_user_id};
use finrec_core::storage::postgres::PgRecordStore;

mod error;

use error::ApiError;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = finrec_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer())
        .init();

    let market: Arc<dyn MarketDataProvider> = Arc::new(SimulatedMarket::new(settings.market_seed));
    tracing::info!(
        provider = market.provider_name(),
        seed = ?settings.market_seed,
        "market provider ready"
    );

    let engine = match settings.require_database_url() {
        Ok(db_url) => match PgRecordStore::connect(db_url, settings.db_max_connections).await {
            Ok(store) => RecommendationEngine::new(Arc::new(store), market),
            Err(e) => {
                sentry_anyhow::capture_anyhow(&e);
                tracing::error!(error = %e, "db connect failed; starting API in degraded mode");
                RecommendationEngine::market_only(market)
            }
        },
        Err(e) => {
            sentry_anyhow::capture_anyhow(&e);
            tracing::error!(error = %e, "DATABASE_URL missing; starting API in degraded mode");
            RecommendationEngine::market_only(market)
        }
    };

    let app = router(AppState { engine });

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], settings.port));
    tracing::info!(%addr, "api listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/recommendations/:user_id", get(get_recommendations))
        .route("/profile/:user_id", get(get_profile))
        .route("/portfolio/:user_id", get(get_portfolio))
        .route("/market-conditions", get(get_market_conditions))
        .route("/market-insights", get(get_market_insights))
        .route("/education/:user_id", get(get_education))
        .route("/dashboard/:user_id", get(get_dashboard))
        .route(
            "/recommendation/:user_id/:recommendation_id",
            get(get_recommendation),
        )
        .route(
            "/recommendation/:user_id/:recommendation_id/accept",
            post(accept_recommendation),
        )
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

async fn healthz() -> &'static str {
    "ok"
}

/// Without a database the engine is market-only and user-scoped routes
/// answer 503.
#[derive(Clone)]
struct AppState {
    engine: RecommendationEngine,
}

#[derive(Debug, Serialize)]
struct Envelope<T> {
    success: bool,
    data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

impl<T> Envelope<T> {
    fn ok(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            data,
            count: None,
            message: None,
        })
    }
}

impl<T> Envelope<Vec<T>> {
    fn list(data: Vec<T>) -> Json<Self> {
        let count = data.len();
        Json(Self {
            success: true,
            data,
            count: Some(count),
            message: None,
        })
    }
}

type ApiResult<T> = Result<Json<Envelope<T>>, ApiError>;

async fn get_recommendations(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> ApiResult<Vec<FinancialRecommendation>> {
    let user_id = parse_user_id(&user_id)?;
    let recs = state.engine.recommendations(user_id).await?;
    Ok(Envelope::list(recs))
}

async fn get_profile(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> ApiResult<FinancialProfile> {
    let user_id = parse_user_id(&user_id)?;
    Ok(Envelope::ok(state.engine.financial_profile(user_id).await?))
}

async fn get_portfolio(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> ApiResult<PortfolioAnalysis> {
    let user_id = parse_user_id(&user_id)?;
    Ok(Envelope::ok(state.engine.portfolio_analysis(user_id).await?))
}

async fn get_market_conditions(State(state): State<AppState>) -> ApiResult<MarketSummary> {
    Ok(Envelope::ok(state.engine.market_conditions().await?))
}

async fn get_market_insights(State(state): State<AppState>) -> ApiResult<Vec<MarketInsight>> {
    Ok(Envelope::list(state.engine.market_insights().await?))
}

async fn get_education(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> ApiResult<Vec<EducationalContent>> {
    let user_id = parse_user_id(&user_id)?;
    Ok(Envelope::list(state.engine.education(user_id).await?))
}

async fn get_dashboard(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> ApiResult<DashboardPayload> {
    let user_id = parse_user_id(&user_id)?;
    Ok(Envelope::ok(state.engine.dashboard(user_id).await?))
}

async fn get_recommendation(
    State(state): State<AppState>,
    Path((user_id, recommendation_id)): Path<(String, String)>,
) -> ApiResult<FinancialRecommendation> {
    let user_id = parse_user_id(&user_id)?;
    let recommendation_id = parse_recommendation_id(&recommendation_id)?;
    let rec = state.engine.recommendation(user_id, recommendation_id).await?;
    Ok(Envelope::ok(rec))
}

async fn accept_recommendation(
    State(state): State<AppState>,
    Path((user_id, recommendation_id)): Path<(String, String)>,
) -> ApiResult<Acceptance> {
    let user_id = parse_user_id(&user_id)?;
    let recommendation_id = parse_recommendation_id(&recommendation_id)?;
    let ack = state.engine.accept_recommendation(user_id, recommendation_id).await?;
    Ok(Json(Envelope {
        success: true,
        data: ack,
        count: None,
        message: Some("Recommendation accepted".to_string()),
    }))
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}

fn init_sentry(settings: &finrec_core::config::Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use finrec_core::domain::records::{
        Holding, InvestmentPlanRecord, InvestmentRecord, UserRecord,
    };
    use finrec_core::engine::market::{condition_from_scalars, FixedMarket};
    use finrec_core::storage::memory::InMemoryRecordStore;
    use serde_json::Value;
    use tower::ServiceExt;

    fn state(with_engine: bool) -> AppState {
        let market: Arc<dyn MarketDataProvider> =
            Arc::new(FixedMarket::new(condition_from_scalars(0.9, 0.2, 0.9)));
        let start = chrono::Utc::now() - chrono::Duration::days(400);
        let store = InMemoryRecordStore::default()
            .with_user(UserRecord {
                id: 1,
                balance: 1_000.0,
            })
            .with_holding(Holding {
                investment: InvestmentRecord {
                    id: 1,
                    user_id: 1,
                    plan_id: 3,
                    amount: 10_000.0,
                    current_returns: 1_500.0,
                    start_date: start,
                    end_date: start + chrono::Duration::days(365),
                },
                plan: Some(InvestmentPlanRecord {
                    id: 3,
                    name: "Balanced".to_string(),
                    apy_rate: Some(15.0),
                }),
                expected_return: None,
            });

        let engine = if with_engine {
            RecommendationEngine::new(Arc::new(store), market)
        } else {
            RecommendationEngine::market_only(market)
        };
        AppState { engine }
    }

    async fn call(state: AppState, method: &str, uri: &str) -> (StatusCode, Value) {
        let res = router(state)
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = res.status();
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    #[tokio::test]
    async fn recommendations_are_wrapped_in_envelope() {
        let (status, body) = call(state(true), "GET", "/recommendations/1").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        let recs = body["data"].as_array().unwrap();
        assert_eq!(body["count"], recs.len());
        let tax = recs
            .iter()
            .find(|r| r["title"] == "Optimize taxes on your gains")
            .unwrap();
        let gains = tax["potentialGains"].as_f64().unwrap();
        assert!((gains - 225.0).abs() < 1e-9);
        assert_eq!(tax["priority"], "low");
        assert_eq!(tax["type"], "investment");
    }

    #[tokio::test]
    async fn non_numeric_user_id_is_bad_request() {
        let (status, body) = call(state(true), "GET", "/profile/abc").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "invalid_input");
        assert!(body["message"].as_str().unwrap().contains("userId"));
    }

    #[tokio::test]
    async fn unknown_user_is_not_found() {
        let (status, body) = call(state(true), "GET", "/dashboard/404").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "not_found");
    }

    #[tokio::test]
    async fn profile_uses_camel_case_fields() {
        let (status, body) = call(state(true), "GET", "/profile/1").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["userId"], 1);
        assert_eq!(body["data"]["riskTolerance"], "conservative");
        assert_eq!(body["data"]["timeHorizon"], 12);
    }

    #[tokio::test]
    async fn dashboard_reports_health_and_overview() {
        let (status, body) = call(state(true), "GET", "/dashboard/1").await;
        assert_eq!(status, StatusCode::OK);
        let data = &body["data"];
        assert_eq!(data["portfolio"]["status"], "ready");
        assert!(data["portfolioHealth"]["score"].is_i64());
        assert_eq!(data["overview"]["keyInsights"].as_array().unwrap().len(), 3);
        assert_eq!(data["warnings"].as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn market_endpoints_work_without_database() {
        let (status, body) = call(state(false), "GET", "/market-conditions").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["conditions"]["trend"], "bullish");
        assert_eq!(body["data"]["insights"].as_array().unwrap().len(), 4);

        let (status, body) = call(state(false), "GET", "/market-insights").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 4);

        let (status, body) = call(state(false), "GET", "/portfolio/1").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["error"], "unavailable");

        let uri = format!("/recommendation/1/{}/accept", uuid::Uuid::new_v4());
        let (status, _) = call(state(false), "POST", &uri).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn unknown_user_portfolio_is_not_found() {
        let (status, body) = call(state(true), "GET", "/portfolio/404").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "not_found");
    }

    #[tokio::test]
    async fn stale_recommendation_id_is_not_found() {
        let uri = format!("/recommendation/1/{}", uuid::Uuid::new_v4());
        let (status, _) = call(state(true), "GET", &uri).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = call(state(true), "GET", "/recommendation/1/1700000000000").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn accept_only_acknowledges() {
        let id = uuid::Uuid::new_v4();
        let uri = format!("/recommendation/1/{id}/accept");
        let (status, body) = call(state(true), "POST", &uri).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["recommendationId"], id.to_string());
        assert_eq!(body["message"], "Recommendation accepted");
    }
}
