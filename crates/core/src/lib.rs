pub mod domain;
pub mod engine;
pub mod error;
pub mod storage;

pub mod config {
    use anyhow::Context;

    const DEFAULT_PORT: u16 = 3000;
    const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;

    #[derive(Debug, Clone)]
    pub struct Settings {
        pub database_url: Option<String>,
        pub sentry_dsn: Option<String>,
        pub market_seed: Option<u64>,
        pub port: u16,
        pub db_max_connections: u32,
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            let market_seed = match std::env::var("MARKET_SEED") {
                Ok(s) if !s.trim().is_empty() => {
                    let seed = s.trim().parse::<u64>().with_context(|| {
                        format!("MARKET_SEED must be an unsigned integer (got {s:?})")
                    })?;
                    Some(seed)
                }
                _ => None,
            };

            Ok(Self {
                database_url: std::env::var("DATABASE_URL").ok(),
                sentry_dsn: std::env::var("SENTRY_DSN").ok(),
                market_seed,
                port: std::env::var("PORT")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(DEFAULT_PORT),
                db_max_connections: std::env::var("DB_MAX_CONNECTIONS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .filter(|n| *n >= 1)
                    .unwrap_or(DEFAULT_DB_MAX_CONNECTIONS),
            })
        }

        pub fn require_database_url(&self) -> anyhow::Result<&str> {
            self.database_url
                .as_deref()
                .context("DATABASE_URL is required")
        }
    }
}
