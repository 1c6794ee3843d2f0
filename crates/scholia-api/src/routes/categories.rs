use axum::{extract::rejection::JsonRejection, extract::State, Json};
use scholia_types::{CategoryRequest, CategoryResult};
use std::sync::Arc;

use crate::{error::ApiResult, state::AppState};

/// Classify content into categories from a caller-supplied list
///
/// With `conversational` set (or a `conversation_key`), requests sharing a
/// key reuse one model conversation and the system instruction is only sent
/// once.
#[utoipa::path(
    post,
    path = "/categories/identify",
    request_body = CategoryRequest,
    responses(
        (status = 200, description = "Categories identified", body = CategoryResult),
        (status = 400, description = "Invalid request"),
        (status = 502, description = "Model provider error"),
        (status = 504, description = "Model call timed out")
    ),
    tag = "categories"
)]
pub async fn identify_categories(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CategoryRequest>, JsonRejection>,
) -> ApiResult<Json<CategoryResult>> {
    let Json(request) = payload?;
    let result = state.engine.identify_categories(request).await?;
    Ok(Json(result))
}
