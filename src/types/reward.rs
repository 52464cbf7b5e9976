use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A unit grant of a stock symbol's quantity to a user. Persisted once,
/// immutable thereafter; the id is assigned by the ledger store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reward {
    pub id: i64,
    pub user_id: i64,
    pub stock_symbol: String,
    pub quantity: f64,
    pub rewarded_at: DateTime<Utc>,
}

/// Request body for reward creation.
#[derive(Debug, Clone, Deserialize)]
pub struct RewardRequest {
    pub user_id: i64,
    /// Empty or absent means "pick a random rewardable symbol".
    #[serde(default)]
    pub symbol: Option<String>,
    pub quantity: f64,
}

/// Response for GET /today-stocks/:user_id.
#[derive(Debug, Serialize)]
pub struct TodayRewardsResponse {
    pub user_id: i64,
    pub rewards_today: Vec<Reward>,
}

/// Total INR value of one past calendar day's rewards, valued at current prices.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyValue {
    pub date: NaiveDate,
    pub total_inr: f64,
}

/// Response for GET /historical-inr/:user_id. Entries are sorted by date ascending.
#[derive(Debug, Serialize)]
pub struct HistoricalInrResponse {
    pub user_id: i64,
    pub historical_inr: Vec<DailyValue>,
}

/// Response for GET /stats/:user_id.
#[derive(Debug, Serialize)]
pub struct UserStatsResponse {
    pub user_id: i64,
    /// Per-symbol quantity totals for rewards received today (IST).
    pub today_summary: BTreeMap<String, f64>,
    /// All-time holdings valued at current prices, rounded per symbol.
    pub portfolio_value_inr: f64,
}

/// Response for GET /portfolio/:user_id. Quantities only, no valuation.
#[derive(Debug, Serialize)]
pub struct PortfolioResponse {
    pub user_id: i64,
    pub holdings: BTreeMap<String, f64>,
}
