//! Reward creation and the ledger read endpoints.
//!
//! POST /reward runs the two-phase idempotency pattern: check the key
//! before issuing (409 on a repeat), record the response after success so
//! later retries replay against the stored outcome.

use crate::error::{AppError, Result};
use crate::types::{
    HistoricalInrResponse, PortfolioResponse, Reward, RewardRequest, TodayRewardsResponse,
    UserStatsResponse,
};
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};

fn parse_user_id(raw: &str) -> Result<i64> {
    raw.parse()
        .map_err(|_| AppError::Validation("invalid user id".to_string()))
}

async fn create_reward(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<RewardRequest>,
) -> Result<(StatusCode, Json<Reward>)> {
    let idem_key = headers
        .get("Idempotency-Key")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    if idem_key.is_empty() {
        return Err(AppError::Validation(
            "Idempotency-Key header is required".to_string(),
        ));
    }

    if state.idempotency.check_or_set(idem_key, None).await {
        return Err(AppError::DuplicateRequest);
    }

    let reward = state.rewards.create_reward(req).await?;

    state.idempotency.check_or_set(idem_key, Some(&reward)).await;

    Ok((StatusCode::CREATED, Json(reward)))
}

async fn today_rewards(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<TodayRewardsResponse>> {
    let user_id = parse_user_id(&user_id)?;
    let rewards_today = state.rewards.today_rewards(user_id)?;
    Ok(Json(TodayRewardsResponse {
        user_id,
        rewards_today,
    }))
}

async fn historical_inr(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<HistoricalInrResponse>> {
    let user_id = parse_user_id(&user_id)?;
    let historical_inr = state.rewards.historical_inr(user_id).await?;
    Ok(Json(HistoricalInrResponse {
        user_id,
        historical_inr,
    }))
}

async fn user_stats(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<UserStatsResponse>> {
    let user_id = parse_user_id(&user_id)?;
    let (today_summary, portfolio_value_inr) = state.rewards.user_stats(user_id).await?;
    Ok(Json(UserStatsResponse {
        user_id,
        today_summary,
        portfolio_value_inr,
    }))
}

async fn portfolio(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<PortfolioResponse>> {
    let user_id = parse_user_id(&user_id)?;
    let holdings = state.rewards.portfolio(user_id)?;
    Ok(Json(PortfolioResponse { user_id, holdings }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/reward", post(create_reward))
        .route("/today-stocks/:user_id", get(today_rewards))
        .route("/historical-inr/:user_id", get(historical_inr))
        .route("/stats/:user_id", get(user_stats))
        .route("/portfolio/:user_id", get(portfolio))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_user_id() {
        assert_eq!(parse_user_id("42").unwrap(), 42);
        assert!(parse_user_id("abc").is_err());
        assert!(parse_user_id("").is_err());
    }
}
