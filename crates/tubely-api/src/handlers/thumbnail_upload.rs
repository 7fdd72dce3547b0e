use crate::auth::AuthUser;
use crate::constants::THUMBNAIL_FIELD;
use crate::error::HttpAppError;
use crate::services::fetch_owned_video;
use crate::state::AppState;
use crate::utils::upload::extract_named_file;
use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use std::sync::Arc;
use tubely_core::Video;
use tubely_processing::MediaTypePolicy;
use uuid::Uuid;

pub async fn upload_thumbnail(
    State(state): State<Arc<AppState>>,
    Path(video_id): Path<String>,
    auth: AuthUser,
    mut multipart: Multipart,
) -> Result<Json<Video>, HttpAppError> {
    let video_id = Uuid::parse_str(&video_id)?;

    tracing::info!(video_id = %video_id, user_id = %auth.user_id, "Uploading thumbnail");

    let file = extract_named_file(
        &mut multipart,
        THUMBNAIL_FIELD,
        state.config.max_thumbnail_size_bytes(),
    )
    .await?;

    let policy = MediaTypePolicy::new(state.config.thumbnail_allowed_content_types().to_vec());
    let media_type = policy.check(file.content_type.as_deref())?;

    fetch_owned_video(&state.videos, video_id, auth.user_id).await?;

    let stored = state
        .thumbnails
        .store(
            video_id,
            state.config.thumbnail_naming(),
            &media_type,
            file.data.to_vec(),
        )
        .await?;

    let updated = state
        .thumbnails
        .record(&state.videos, video_id, &stored)
        .await?;

    tracing::info!(
        video_id = %video_id,
        file_name = ?file.file_name,
        media_type = %media_type.essence,
        size_bytes = file.data.len(),
        strategy = ?state.thumbnails.strategy(),
        "Thumbnail stored"
    );

    Ok(Json(updated))
}
