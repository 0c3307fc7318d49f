use axum::{
    extract::{Path, State},
    Extension,
};

use super::utils::parse_id;
use crate::auth::Claims;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// DELETE /drinks/:id - remove a drink (`delete:drinks`), 404 when absent
pub async fn drink_delete(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> ApiResult<String> {
    let id = parse_id(&id)?;
    let drink = state.drinks.find_404(id).await?;
    state.drinks.delete(&drink).await?;
    tracing::info!("{} deleted drink {}", claims.sub, drink.id);

    // echoes the path id as a string
    Ok(ApiResponse::deleted(drink.id.to_string()))
}
