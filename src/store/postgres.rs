use async_trait::async_trait;
use sqlx::{FromRow, PgPool};

use super::models::{Channel, Event, NewThumbnail, NewVideo, Thumbnail, ThumbnailVariant, Video};
use super::Store;
use crate::errors::AppError;

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn find_event(&self, name: &str) -> Result<Option<Event>, AppError> {
        sqlx::query_as::<_, Event>(r#"SELECT id, created_at FROM events WHERE id = $1"#)
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::from)
    }
}

#[derive(FromRow)]
struct ThumbnailRow {
    youtube_video_id: String,
    #[sqlx(rename = "type")]
    variant: String,
    url: String,
    width: i32,
    height: i32,
}

impl TryFrom<ThumbnailRow> for Thumbnail {
    type Error = AppError;

    fn try_from(row: ThumbnailRow) -> Result<Self, Self::Error> {
        let variant = row
            .variant
            .parse::<ThumbnailVariant>()
            .map_err(|e| AppError::Database(anyhow::anyhow!(e)))?;

        Ok(Thumbnail {
            youtube_video_id: row.youtube_video_id,
            variant,
            url: row.url,
            width: row.width,
            height: row.height,
        })
    }
}

const VIDEO_COLUMNS: &str = "youtube_video_id, youtube_channel_id, event_id, title, \
     actual_start_time, actual_end_time, duration_second, view_count, like_count";

#[async_trait]
impl Store for PgStore {
    #[tracing::instrument(name = "Get or create event", skip(self))]
    async fn get_or_create_event(&self, name: &str) -> Result<Event, AppError> {
        if let Some(event) = self.find_event(name).await? {
            tracing::debug!("Event {} already exists", name);
            return Ok(event);
        }

        sqlx::query(r#"INSERT INTO events (id) VALUES ($1) ON CONFLICT (id) DO NOTHING"#)
            .bind(name)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Database error while creating event {}: {:?}", name, e);
                AppError::from(e)
            })?;

        tracing::info!("Created event {}", name);

        self.find_event(name).await?.ok_or_else(|| {
            AppError::Database(anyhow::anyhow!("Event {} vanished after insert", name))
        })
    }

    #[tracing::instrument(name = "Get or create channel", skip(self))]
    async fn get_or_create_channel(
        &self,
        channel_id: &str,
        name: &str,
    ) -> Result<Channel, AppError> {
        sqlx::query_as::<_, Channel>(
            r#"INSERT INTO channels (youtube_channel_id, name) VALUES ($1, $2)
               ON CONFLICT (youtube_channel_id) DO UPDATE SET name = EXCLUDED.name
               RETURNING youtube_channel_id, name"#,
        )
        .bind(channel_id)
        .bind(name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Database error while saving channel {}: {:?}", channel_id, e);
            AppError::from(e)
        })
    }

    #[tracing::instrument(name = "Create video", skip(self, video), fields(video_id = %video.youtube_video_id))]
    async fn create_video(&self, video: NewVideo) -> Result<Video, AppError> {
        let query = format!(
            "INSERT INTO videos ({cols}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING {cols}",
            cols = VIDEO_COLUMNS
        );

        sqlx::query_as::<_, Video>(&query)
            .bind(&video.youtube_video_id)
            .bind(&video.youtube_channel_id)
            .bind(&video.event_id)
            .bind(&video.title)
            .bind(video.actual_start_time)
            .bind(video.actual_end_time)
            .bind(video.duration_second)
            .bind(video.view_count)
            .bind(video.like_count)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::from)
    }

    #[tracing::instrument(name = "Upsert thumbnail", skip(self, thumbnail), fields(video_id = %thumbnail.youtube_video_id, variant = %thumbnail.variant))]
    async fn upsert_thumbnail(&self, thumbnail: NewThumbnail) -> Result<Thumbnail, AppError> {
        let row = sqlx::query_as::<_, ThumbnailRow>(
            r#"INSERT INTO thumbnails (youtube_video_id, type, url, width, height)
               VALUES ($1, $2, $3, $4, $5)
               ON CONFLICT (youtube_video_id, type)
               DO UPDATE SET url = EXCLUDED.url, width = EXCLUDED.width, height = EXCLUDED.height
               RETURNING youtube_video_id, type, url, width, height"#,
        )
        .bind(&thumbnail.youtube_video_id)
        .bind(thumbnail.variant.as_str())
        .bind(&thumbnail.url)
        .bind(thumbnail.width)
        .bind(thumbnail.height)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Database error while saving thumbnail: {:?}", e);
            AppError::from(e)
        })?;

        Thumbnail::try_from(row)
    }

    #[tracing::instrument(name = "List events", skip(self))]
    async fn list_events(&self) -> Result<Vec<Event>, AppError> {
        let events =
            sqlx::query_as::<_, Event>(r#"SELECT id, created_at FROM events ORDER BY id"#)
                .fetch_all(&self.pool)
                .await?;

        tracing::debug!("Fetched {} events", events.len());
        Ok(events)
    }

    #[tracing::instrument(name = "Get videos by event", skip(self))]
    async fn get_videos_by_event(&self, event_id: &str) -> Result<Vec<Video>, AppError> {
        let query = format!(
            "SELECT {} FROM videos WHERE event_id = $1 ORDER BY actual_start_time, youtube_video_id",
            VIDEO_COLUMNS
        );

        let videos = sqlx::query_as::<_, Video>(&query)
            .bind(event_id)
            .fetch_all(&self.pool)
            .await?;

        tracing::debug!("Fetched {} videos for event {}", videos.len(), event_id);
        Ok(videos)
    }
}
