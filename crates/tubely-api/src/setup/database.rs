//! Database setup and initialization

use anyhow::Result;
use tubely_core::Config;
use tubely_db::VideoRepository;

/// Open the SQLite pool, apply migrations and build the repositories.
pub async fn setup_database(config: &Config) -> Result<VideoRepository> {
    let pool = tubely_db::connect(config.database_url(), config.db_max_connections()).await?;
    Ok(VideoRepository::new(pool))
}
