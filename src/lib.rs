//! Stocky - stock rewards ledger server with cached synthetic pricing

pub mod api;
pub mod config;
pub mod error;
pub mod services;
pub mod types;

use config::Config;
use services::{
    IdempotencyService, LedgerStore, PriceService, ReferralService, RewardService, UserService,
};
use std::sync::Arc;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub prices: Arc<PriceService>,
    pub idempotency: Arc<IdempotencyService>,
    pub rewards: Arc<RewardService>,
    pub users: Arc<UserService>,
    pub referrals: Arc<ReferralService>,
}

pub use error::{AppError, Result};
