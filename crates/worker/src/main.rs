use anyhow::Context;
use clap::{Parser, ValueEnum};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use finrec_core::engine::market::{MarketDataProvider, SimulatedMarket};
use finrec_core::engine::RecommendationEngine;
use finrec_core::storage::postgres::PgRecordStore;
use finrec_core::storage::RecordStore;

mod demo;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Section {
    Dashboard,
    Recommendations,
}

#[derive(Debug, Parser)]
#[command(name = "finrec_worker")]
struct Args {
    /// Run for a single user. Defaults to every user in the store.
    #[arg(long)]
    user_id: Option<i64>,

    /// Seed for the simulated market. Overrides MARKET_SEED.
    #[arg(long)]
    seed: Option<u64>,

    /// Use a synthetic in-memory store instead of DATABASE_URL.
    #[arg(long)]
    demo: bool,

    /// Which engine output to print.
    #[arg(long, value_enum, default_value = "dashboard")]
    section: Section,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = finrec_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer())
        .init();

    let args = Args::parse();

    let store: Arc<dyn RecordStore> = if args.demo {
        Arc::new(demo::build_demo_store(&demo::DemoOptions::default())?)
    } else {
        let db_url = settings.require_database_url()?;
        Arc::new(PgRecordStore::connect(db_url, settings.db_max_connections).await?)
    };

    let seed = args.seed.or(settings.market_seed);
    let market: Arc<dyn MarketDataProvider> = Arc::new(SimulatedMarket::new(seed));
    let engine = RecommendationEngine::new(store.clone(), market);

    let user_ids = match args.user_id {
        Some(id) => vec![id],
        None => store.list_user_ids().await.context("list users failed")?,
    };

    tracing::info!(
        users = user_ids.len(),
        demo = args.demo,
        ?seed,
        section = ?args.section,
        "engine sweep starting"
    );

    let t0 = std::time::Instant::now();
    let mut failed: usize = 0;
    for user_id in &user_ids {
        match run_one(&engine, *user_id, args.section).await {
            Ok(line) => println!("{line}"),
            Err(err) => {
                failed += 1;
                sentry_anyhow::capture_anyhow(&err);
                tracing::error!(user_id, error = %err, "engine run failed");
            }
        }
    }

    tracing::info!(
        users = user_ids.len(),
        failed,
        elapsed_ms = t0.elapsed().as_millis(),
        "engine sweep finished"
    );

    anyhow::ensure!(
        failed < user_ids.len() || user_ids.is_empty(),
        "every engine run failed ({failed} users)"
    );
    Ok(())
}

async fn run_one(
    engine: &RecommendationEngine,
    user_id: i64,
    section: Section,
) -> anyhow::Result<String> {
    let value = match section {
        Section::Dashboard => {
            let payload = engine.dashboard(user_id).await?;
            if let Some(health) = &payload.portfolio_health {
                tracing::info!(
                    user_id,
                    score = health.score,
                    rating = ?health.rating,
                    "portfolio health"
                );
            }
            serde_json::to_value(&payload)?
        }
        Section::Recommendations => {
            let recs = engine.recommendations(user_id).await?;
            serde_json::json!({ "userId": user_id, "recommendations": recs })
        }
    };
    Ok(serde_json::to_string(&value)?)
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
