//! POST /refer

use crate::error::Result;
use crate::types::{ReferRequest, ReferResponse};
use crate::AppState;
use axum::{extract::State, http::StatusCode, routing::post, Json, Router};

async fn refer(
    State(state): State<AppState>,
    Json(req): Json<ReferRequest>,
) -> Result<(StatusCode, Json<ReferResponse>)> {
    let (referral, reward) = state.referrals.refer(req.user_id, &req.friend_name).await?;
    Ok((
        StatusCode::CREATED,
        Json(ReferResponse {
            message: "Referral successful! Reward granted.".to_string(),
            referral,
            reward,
        }),
    ))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/refer", post(refer))
}
