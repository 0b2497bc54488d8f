//! Persistence boundary for the aggregator.
//!
//! Events and channels are create-or-get, videos are insert-only (a second insert
//! for the same id fails with [`AppError::Conflict`]) and thumbnails are upserted.

pub mod models;
pub mod postgres;

use async_trait::async_trait;

use crate::errors::AppError;
pub use models::{Channel, Event, NewThumbnail, NewVideo, Thumbnail, ThumbnailVariant, Video};
pub use postgres::PgStore;

#[async_trait]
pub trait Store: Send + Sync {
    /// Returns the event with this name, creating it first if absent.
    async fn get_or_create_event(&self, name: &str) -> Result<Event, AppError>;

    /// Returns the channel with this id, creating it first if absent. The stored
    /// name is refreshed to `name`.
    async fn get_or_create_channel(&self, channel_id: &str, name: &str)
        -> Result<Channel, AppError>;

    /// Inserts a video. Fails with [`AppError::Conflict`] if the id is already stored.
    async fn create_video(&self, video: NewVideo) -> Result<Video, AppError>;

    async fn upsert_thumbnail(&self, thumbnail: NewThumbnail) -> Result<Thumbnail, AppError>;

    async fn list_events(&self) -> Result<Vec<Event>, AppError>;

    async fn get_videos_by_event(&self, event_id: &str) -> Result<Vec<Video>, AppError>;
}
