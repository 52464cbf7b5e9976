//! Referrals: persisting the referral row and granting the referrer's reward.

use crate::error::{AppError, Result};
use crate::services::ledger::LedgerStore;
use crate::services::rewards::RewardService;
use crate::types::{Referral, Reward, RewardRequest};
use chrono::Utc;
use std::sync::Arc;
use tracing::info;

pub struct ReferralService {
    ledger: Arc<LedgerStore>,
    rewards: Arc<RewardService>,
}

impl ReferralService {
    pub fn new(ledger: Arc<LedgerStore>, rewards: Arc<RewardService>) -> Self {
        Self { ledger, rewards }
    }

    /// Record a referral and grant the referrer 1.0 of a random stock.
    ///
    /// As with registration, the insert and the reward are two independent
    /// committed steps with no rollback of the first if the second fails.
    pub async fn refer(&self, referrer_id: i64, friend_name: &str) -> Result<(Referral, Reward)> {
        if friend_name.trim().is_empty() {
            return Err(AppError::Validation("friend_name is required".to_string()));
        }

        let referral = self
            .ledger
            .insert_referral(referrer_id, friend_name, Utc::now())?;

        let reward = self
            .rewards
            .create_reward(RewardRequest {
                user_id: referrer_id,
                symbol: None,
                quantity: 1.0,
            })
            .await?;

        info!(
            "Referral {} recorded for user {} (friend: {})",
            referral.id, referrer_id, friend_name
        );
        Ok((referral, reward))
    }
}
