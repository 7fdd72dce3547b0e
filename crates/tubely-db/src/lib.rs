//! Tubely Database Layer
//!
//! SQLite pool setup, embedded migrations and the video metadata repository.

pub mod db;

pub use db::{connect, VideoRepository, MIGRATOR};
