use std::env;
use std::time::Duration;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Redis URL for the shared TTL cache. Absent means in-memory fallback.
    pub redis_url: Option<String>,
    /// SQLite database path for the rewards ledger (":memory:" allowed).
    pub database_path: String,
    /// How long a cached price stays live.
    pub price_ttl: Duration,
    /// How often the background refresher re-primes held symbols.
    pub refresh_interval: Duration,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port: u16 = env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(3001);

        let price_ttl_secs: u64 = env::var("PRICE_TTL_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(600);

        let refresh_interval_secs: u64 = env::var("REFRESH_INTERVAL_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(3600);

        Self {
            host,
            port,
            redis_url: env::var("REDIS_URL").ok(),
            database_path: env::var("DATABASE_PATH").unwrap_or_else(|_| "stocky.db".to_string()),
            price_ttl: Duration::from_secs(price_ttl_secs),
            refresh_interval: Duration::from_secs(refresh_interval_secs),
        }
    }
}
