use crate::auth::AuthUser;
use crate::error::HttpAppError;
use crate::services::{fetch_owned_video, VideoUploadService};
use crate::state::AppState;
use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use std::sync::Arc;
use tubely_core::Video;
use uuid::Uuid;

pub async fn upload_video(
    State(state): State<Arc<AppState>>,
    Path(video_id): Path<String>,
    auth: AuthUser,
    multipart: Multipart,
) -> Result<Json<Video>, HttpAppError> {
    let video_id = Uuid::parse_str(&video_id)?;

    tracing::info!(video_id = %video_id, user_id = %auth.user_id, "Uploading video");

    let video = fetch_owned_video(&state.videos, video_id, auth.user_id).await?;

    let updated = VideoUploadService::new(&state)
        .upload(video, multipart)
        .await?;

    Ok(Json(updated))
}
