use axum::{extract::rejection::JsonRejection, extract::State, Json};
use scholia_types::{DescriptionRequest, DescriptionResult, VideoRequest};
use std::sync::Arc;

use crate::{error::ApiResult, state::AppState};

/// Describe and categorize a block of text
#[utoipa::path(
    post,
    path = "/analysis/static-data",
    request_body = DescriptionRequest,
    responses(
        (status = 200, description = "Content analyzed", body = DescriptionResult),
        (status = 400, description = "Invalid request"),
        (status = 502, description = "Model provider error"),
        (status = 504, description = "Model call timed out")
    ),
    tag = "analysis"
)]
pub async fn analyze_static_data(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<DescriptionRequest>, JsonRejection>,
) -> ApiResult<Json<DescriptionResult>> {
    let Json(request) = payload?;
    let result = state.engine.analyze_static_data(request).await?;
    Ok(Json(result))
}

/// Describe and categorize a video by URL
#[utoipa::path(
    post,
    path = "/analysis/youtube",
    request_body = VideoRequest,
    responses(
        (status = 200, description = "Video analyzed", body = DescriptionResult),
        (status = 400, description = "Invalid request"),
        (status = 502, description = "Model provider error"),
        (status = 504, description = "Model call timed out")
    ),
    tag = "analysis"
)]
pub async fn analyze_video(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<VideoRequest>, JsonRejection>,
) -> ApiResult<Json<DescriptionResult>> {
    let Json(request) = payload?;
    let result = state.engine.analyze_video(request).await?;
    Ok(Json(result))
}
