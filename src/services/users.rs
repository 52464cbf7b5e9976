//! User registration and onboarding rewards.

use crate::error::{AppError, Result};
use crate::services::ledger::LedgerStore;
use crate::services::rewards::RewardService;
use crate::types::{Reward, RewardRequest, User};
use chrono::Utc;
use std::sync::Arc;
use tracing::info;

/// Handles user creation and the onboarding reward grant.
pub struct UserService {
    ledger: Arc<LedgerStore>,
    rewards: Arc<RewardService>,
}

impl UserService {
    pub fn new(ledger: Arc<LedgerStore>, rewards: Arc<RewardService>) -> Self {
        Self { ledger, rewards }
    }

    /// Insert a new user, then grant 1.0 of a random stock.
    ///
    /// The two writes are independent committed steps: a reward failure
    /// surfaces as the request error but does not roll back the user row.
    pub async fn register(&self, name: &str) -> Result<(User, Reward)> {
        if name.trim().is_empty() {
            return Err(AppError::Validation("name is required".to_string()));
        }

        let user = self.ledger.insert_user(name, Utc::now())?;

        let reward = self
            .rewards
            .create_reward(RewardRequest {
                user_id: user.id,
                symbol: None,
                quantity: 1.0,
            })
            .await?;

        info!("Registered user {} ({})", user.name, user.id);
        Ok((user, reward))
    }
}
