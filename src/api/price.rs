//! GET /price?symbol=RELIANCE

use crate::error::{AppError, Result};
use crate::types::PriceQuote;
use crate::AppState;
use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct PriceQuery {
    #[serde(default)]
    symbol: String,
}

async fn get_price(
    State(state): State<AppState>,
    Query(query): Query<PriceQuery>,
) -> Result<Json<PriceQuote>> {
    if query.symbol.is_empty() {
        return Err(AppError::Validation("symbol is required".to_string()));
    }

    let quote = state.prices.get_quote(&query.symbol).await?;
    Ok(Json(quote))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/price", get(get_price))
}
