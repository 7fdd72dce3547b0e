use crate::error::HttpAppError;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tubely_core::AppError;
use uuid::Uuid;

/// Serve a thumbnail held by the in-memory store.
pub async fn get_thumbnail(
    State(state): State<Arc<AppState>>,
    Path(video_id): Path<String>,
) -> Result<Response, HttpAppError> {
    let video_id = Uuid::parse_str(&video_id)?;

    let storage = state
        .thumbnails
        .memory_storage()
        .ok_or_else(|| AppError::NotFound("Thumbnail not found".to_string()))?;

    let object = storage.download(&video_id.to_string()).await?;
    let content_type = object
        .content_type
        .unwrap_or_else(|| "application/octet-stream".to_string());

    Ok(([(header::CONTENT_TYPE, content_type)], object.data).into_response())
}
