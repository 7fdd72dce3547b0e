//! Video record creation and lookup.

use crate::auth::AuthUser;
use crate::error::{HttpAppError, ValidatedJson};
use crate::services::fetch_owned_video;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use tubely_core::models::CreateVideoRequest;
use tubely_core::{AppError, Video};
use uuid::Uuid;

pub async fn create_video(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<CreateVideoRequest>,
) -> Result<(StatusCode, Json<Video>), HttpAppError> {
    let title = request.title.trim();
    if title.is_empty() {
        return Err(AppError::InvalidInput("Title is required".to_string()).into());
    }

    let video = Video::draft(auth.user_id, title.to_string(), request.description);
    let created = state.videos.create_video(&video).await?;

    tracing::info!(video_id = %created.id, user_id = %auth.user_id, "Video created");

    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn get_video(
    State(state): State<Arc<AppState>>,
    Path(video_id): Path<String>,
    auth: AuthUser,
) -> Result<Json<Video>, HttpAppError> {
    let video_id = Uuid::parse_str(&video_id)?;
    let video = fetch_owned_video(&state.videos, video_id, auth.user_id).await?;
    Ok(Json(video))
}
