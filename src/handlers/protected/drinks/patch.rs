use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Extension, Json,
};
use serde_json::Value;

use super::utils::{parse_id, DrinkInput};
use crate::auth::Claims;
use crate::database::models::LongDrink;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// PATCH /drinks/:id - overwrite title and/or recipe (`patch:drinks`)
///
/// Fields missing from the body keep their stored value. Responds with a
/// one-element list holding the updated drink in long form.
pub async fn drink_patch(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Vec<LongDrink>> {
    let id = parse_id(&id)?;
    let mut drink = state.drinks.find_404(id).await?;

    let input = DrinkInput::from_body(body)?;
    if let Some(title) = input.title()? {
        drink.title = title;
    }
    if let Some(recipe) = input.recipe()? {
        drink.recipe = recipe;
    }

    state.drinks.update(&drink).await?;
    tracing::info!("{} updated drink {}", claims.sub, drink.id);

    Ok(ApiResponse::drinks(vec![drink.long()]))
}
