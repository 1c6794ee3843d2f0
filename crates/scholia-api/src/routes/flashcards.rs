use axum::{extract::rejection::JsonRejection, extract::State, Json};
use scholia_engine::DomainPolicy;
use scholia_types::{FlashcardRequest, FlashcardSet};
use std::sync::Arc;

use crate::{error::ApiResult, state::AppState};

/// Generate flashcards for any subject
#[utoipa::path(
    post,
    path = "/flashcards",
    request_body = FlashcardRequest,
    responses(
        (status = 200, description = "Flashcards generated", body = FlashcardSet),
        (status = 400, description = "Invalid request"),
        (status = 502, description = "Model provider error"),
        (status = 504, description = "Model call timed out")
    ),
    tag = "flashcards"
)]
pub async fn generate_flashcards(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<FlashcardRequest>, JsonRejection>,
) -> ApiResult<Json<FlashcardSet>> {
    generate(&state, &DomainPolicy::generic(), payload).await
}

/// Generate flashcards on a political philosopher's work
///
/// Requires `thinker` and `work`. Moving to another work by the same thinker
/// drops the previous conversation.
#[utoipa::path(
    post,
    path = "/flashcards/political-philosophy",
    request_body = FlashcardRequest,
    responses(
        (status = 200, description = "Flashcards generated", body = FlashcardSet),
        (status = 400, description = "Invalid request"),
        (status = 502, description = "Model provider error"),
        (status = 504, description = "Model call timed out")
    ),
    tag = "flashcards"
)]
pub async fn political_philosophy_flashcards(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<FlashcardRequest>, JsonRejection>,
) -> ApiResult<Json<FlashcardSet>> {
    generate(&state, &DomainPolicy::political_philosophy(), payload).await
}

/// Generate flashcards on one of Kant's works (requires `work`)
#[utoipa::path(
    post,
    path = "/flashcards/kant",
    request_body = FlashcardRequest,
    responses(
        (status = 200, description = "Flashcards generated", body = FlashcardSet),
        (status = 400, description = "Invalid request"),
        (status = 502, description = "Model provider error"),
        (status = 504, description = "Model call timed out")
    ),
    tag = "flashcards"
)]
pub async fn kant_flashcards(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<FlashcardRequest>, JsonRejection>,
) -> ApiResult<Json<FlashcardSet>> {
    generate(&state, &DomainPolicy::kant(), payload).await
}

async fn generate(
    state: &AppState,
    policy: &DomainPolicy,
    payload: Result<Json<FlashcardRequest>, JsonRejection>,
) -> ApiResult<Json<FlashcardSet>> {
    let Json(request) = payload?;
    let set = state.engine.generate_flashcards(policy, request).await?;
    Ok(Json(set))
}
