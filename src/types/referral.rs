use super::Reward;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A recorded referral. Each referral grants the referrer one reward.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Referral {
    pub id: i64,
    pub referrer_id: i64,
    pub friend_name: String,
    pub created_at: DateTime<Utc>,
}

/// Request body for POST /refer.
#[derive(Debug, Clone, Deserialize)]
pub struct ReferRequest {
    pub user_id: i64,
    pub friend_name: String,
}

/// Response for POST /refer.
#[derive(Debug, Serialize)]
pub struct ReferResponse {
    pub message: String,
    pub referral: Referral,
    pub reward: Reward,
}
