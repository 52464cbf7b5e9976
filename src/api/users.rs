//! POST /register

use crate::error::Result;
use crate::types::{RegisterRequest, RegisterResponse};
use crate::AppState;
use axum::{extract::State, http::StatusCode, routing::post, Json, Router};

async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>)> {
    let (user, reward) = state.users.register(&req.name).await?;
    Ok((StatusCode::CREATED, Json(RegisterResponse { user, reward })))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/register", post(register))
}
