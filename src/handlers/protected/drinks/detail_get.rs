use axum::{extract::State, Extension};

use crate::auth::Claims;
use crate::database::models::LongDrink;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// GET /drinks-detail - every drink in long form (`get:drinks-detail`)
pub async fn drinks_detail_get(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> ApiResult<Vec<LongDrink>> {
    tracing::debug!("{} listing drink details", claims.sub);
    let drinks = state.drinks.list_all().await?;
    Ok(ApiResponse::drinks(drinks.iter().map(|d| d.long()).collect()))
}
