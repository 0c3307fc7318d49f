use axum::{extract::rejection::JsonRejection, extract::State, Extension, Json};
use serde_json::Value;

use super::utils::DrinkInput;
use crate::auth::Claims;
use crate::database::models::LongDrink;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// POST /drinks - create a drink (`post:drinks`)
///
/// Body: `{"title": "...", "recipe": [...]}`. Responds with the new drink in
/// long form under `drinks`.
pub async fn drinks_post(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<LongDrink> {
    let input = DrinkInput::from_body(body)?;
    let title = input
        .title()?
        .ok_or_else(|| ApiError::unprocessable_entity("title is required"))?;
    let recipe = input
        .recipe()?
        .ok_or_else(|| ApiError::unprocessable_entity("recipe is required"))?;

    let drink = state.drinks.create(&title, &recipe).await?;
    tracing::info!("{} created drink {} ({})", claims.sub, drink.id, drink.title);

    Ok(ApiResponse::drinks(drink.long()))
}
