// handlers/public/drinks.rs - GET /drinks

use axum::extract::State;

use crate::database::models::ShortDrink;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// GET /drinks - every drink in short form; ingredient names and quantities
/// stay hidden.
pub async fn drinks_get(State(state): State<AppState>) -> ApiResult<Vec<ShortDrink>> {
    let drinks = state.drinks.list_all().await?;
    Ok(ApiResponse::drinks(drinks.iter().map(|d| d.short()).collect()))
}
