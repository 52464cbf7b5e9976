use super::Reward;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Request body for POST /register.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
}

/// Response for POST /register: the new user plus their onboarding reward.
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub user: User,
    pub reward: Reward,
}
