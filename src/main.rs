use anyhow::Context;
use axum::Router;
use std::sync::Arc;
use stocky::config::Config;
use stocky::services::{
    spawn_price_refresher, IdempotencyService, LedgerStore, MemoryKv, PriceService,
    RedisKv, ReferralService, RewardService, TtlStore, UserService,
};
use stocky::{api, AppState};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stocky=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Arc::new(Config::from_env());
    info!("Starting Stocky server on {}:{}", config.host, config.port);

    // Shared TTL cache: Redis when configured, in-process otherwise
    let kv: Arc<dyn TtlStore> = match config.redis_url.as_deref() {
        Some(url) => Arc::new(
            RedisKv::connect(url)
                .await
                .context("failed to connect to Redis")?,
        ),
        None => {
            warn!("REDIS_URL not set; using in-process price/idempotency cache");
            Arc::new(MemoryKv::new())
        }
    };

    // Rewards ledger
    let ledger = Arc::new(
        LedgerStore::new(&config.database_path).context("failed to open ledger database")?,
    );

    // Wire services
    let prices = Arc::new(PriceService::new(kv.clone(), config.price_ttl));
    let idempotency = Arc::new(IdempotencyService::new(kv.clone()));
    let rewards = Arc::new(RewardService::new(ledger.clone(), prices.clone()));
    let users = Arc::new(UserService::new(ledger.clone(), rewards.clone()));
    let referrals = Arc::new(ReferralService::new(ledger.clone(), rewards.clone()));

    // Start the periodic price refresher
    spawn_price_refresher(prices.clone(), ledger.clone(), config.refresh_interval);

    let state = AppState {
        config: config.clone(),
        prices,
        idempotency,
        rewards,
        users,
        referrals,
    };

    // Build CORS layer
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build the router
    let app = Router::new()
        .merge(api::router())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start the server
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Stocky server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
