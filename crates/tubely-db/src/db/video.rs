use chrono::Utc;
use sqlx::{Sqlite, SqlitePool};
use tubely_core::{models::Video, AppError};
use uuid::Uuid;

const VIDEO_COLUMNS: &str =
    "id, created_at, updated_at, title, description, user_id, thumbnail_url, video_url";

/// Repository for video metadata records
#[derive(Clone)]
pub struct VideoRepository {
    pool: SqlitePool,
}

impl VideoRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    #[tracing::instrument(skip(self, video), fields(db.table = "videos", db.operation = "insert", db.record_id = %video.id))]
    pub async fn create_video(&self, video: &Video) -> Result<Video, AppError> {
        sqlx::query(
            r#"
            INSERT INTO videos (id, created_at, updated_at, title, description, user_id, thumbnail_url, video_url)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(video.id)
        .bind(video.created_at)
        .bind(video.updated_at)
        .bind(&video.title)
        .bind(&video.description)
        .bind(video.user_id)
        .bind(&video.thumbnail_url)
        .bind(&video.video_url)
        .execute(&self.pool)
        .await?;

        Ok(video.clone())
    }

    #[tracing::instrument(skip(self), fields(db.table = "videos", db.operation = "select", db.record_id = %id))]
    pub async fn get_video(&self, id: Uuid) -> Result<Option<Video>, AppError> {
        let video = sqlx::query_as::<Sqlite, Video>(&format!(
            "SELECT {} FROM videos WHERE id = ?",
            VIDEO_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(video)
    }

    /// Point the record at a new thumbnail, leaving every other column alone.
    #[tracing::instrument(skip(self, url), fields(db.table = "videos", db.operation = "update", db.record_id = %id))]
    pub async fn set_thumbnail_url(&self, id: Uuid, url: &str) -> Result<Video, AppError> {
        self.set_url_column("thumbnail_url", id, url).await
    }

    /// Point the record at a new video object, leaving every other column alone.
    #[tracing::instrument(skip(self, url), fields(db.table = "videos", db.operation = "update", db.record_id = %id))]
    pub async fn set_video_url(&self, id: Uuid, url: &str) -> Result<Video, AppError> {
        self.set_url_column("video_url", id, url).await
    }

    // `column` is always one of the literals above.
    async fn set_url_column(&self, column: &str, id: Uuid, url: &str) -> Result<Video, AppError> {
        let result = sqlx::query(&format!(
            "UPDATE videos SET {} = ?, updated_at = ? WHERE id = ?",
            column
        ))
        .bind(url)
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Couldn't find video".to_string()));
        }

        self.get_video(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Couldn't find video".to_string()))
    }
}
