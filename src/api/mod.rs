pub mod health;
pub mod price;
pub mod referrals;
pub mod rewards;
pub mod users;

use crate::AppState;
use axum::Router;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(price::router())
        .merge(rewards::router())
        .merge(users::router())
        .merge(referrals::router())
}
