//! Database repositories for data access layer

pub mod pool;
pub mod video;

pub use pool::{connect, MIGRATOR};
pub use video::VideoRepository;
