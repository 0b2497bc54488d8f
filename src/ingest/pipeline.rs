//! End-to-end ingestion of one playlist into one event.

use chrono::{DateTime, FixedOffset, Utc};

use super::batch::fetch_video_details;
use super::duration::parse_iso8601_duration;
use super::paging::collect_playlist_video_ids;
use super::window::TimeWindow;
use crate::errors::AppError;
use crate::store::{Event, NewThumbnail, NewVideo, Store, ThumbnailVariant};
use crate::youtube::types::{ThumbnailDetails, Thumbnails, VideoItem, VideoSnippet};
use crate::youtube::VideoApi;

/// Counters reported at the end of a run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct IngestSummary {
    pub playlist_items: usize,
    pub outside_window: usize,
    pub created: usize,
    pub already_stored: usize,
    pub thumbnails: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VideoOutcome {
    Created,
    AlreadyStored,
}

pub struct IngestionPipeline<'a, A: ?Sized, S: ?Sized> {
    api: &'a A,
    store: &'a S,
}

impl<'a, A, S> IngestionPipeline<'a, A, S>
where
    A: VideoApi + ?Sized,
    S: Store + ?Sized,
{
    pub fn new(api: &'a A, store: &'a S) -> Self {
        Self { api, store }
    }

    #[tracing::instrument(name = "Retrieve playlist into event", skip(self, window))]
    pub async fn run(
        &self,
        event_name: &str,
        playlist_id: &str,
        window: &TimeWindow,
    ) -> Result<IngestSummary, AppError> {
        for event in self.store.list_events().await? {
            tracing::info!("Event: {} (created {})", event.id, event.created_at);
        }
        let event = self.store.get_or_create_event(event_name).await?;

        let video_ids = collect_playlist_video_ids(self.api, playlist_id).await?;
        let items = fetch_video_details(self.api, &video_ids).await?;

        let mut summary = IngestSummary {
            playlist_items: video_ids.len(),
            ..Default::default()
        };

        for item in &items {
            let start = actual_start_time(item)?;
            if !window.contains(&start) {
                tracing::debug!("Skipping {}: started at {} outside the window", item.id, start);
                summary.outside_window += 1;
                continue;
            }

            let snippet = item
                .snippet
                .as_ref()
                .ok_or_else(|| missing(&item.id, "snippet"))?;

            match self.persist_video(item, snippet, start, &event).await? {
                VideoOutcome::Created => summary.created += 1,
                VideoOutcome::AlreadyStored => summary.already_stored += 1,
            }
            summary.thumbnails += self
                .persist_thumbnails(&item.id, &snippet.thumbnails)
                .await?;
        }

        tracing::info!(
            playlist_items = summary.playlist_items,
            outside_window = summary.outside_window,
            created = summary.created,
            already_stored = summary.already_stored,
            thumbnails = summary.thumbnails,
            "Finished retrieving playlist {} into event {}",
            playlist_id,
            event.id
        );
        Ok(summary)
    }

    async fn persist_video(
        &self,
        item: &VideoItem,
        snippet: &VideoSnippet,
        start: DateTime<FixedOffset>,
        event: &Event,
    ) -> Result<VideoOutcome, AppError> {
        let channel = self
            .store
            .get_or_create_channel(&snippet.channel_id, &snippet.channel_title)
            .await?;
        tracing::info!("Channel: {} ({})", channel.name, channel.youtube_channel_id);

        let end = parse_timestamp(
            &item.id,
            "actualEndTime",
            item.live_streaming_details
                .as_ref()
                .and_then(|d| d.actual_end_time.as_deref()),
        )?;

        let raw_duration = item
            .content_details
            .as_ref()
            .map(|c| c.duration.as_str())
            .ok_or_else(|| missing(&item.id, "contentDetails.duration"))?;
        let duration = parse_iso8601_duration(raw_duration)?;
        let duration_second = i32::try_from(duration.as_secs()).map_err(|_| {
            AppError::Parse(format!("duration of {} does not fit: {}", item.id, raw_duration))
        })?;

        let statistics = item.statistics.clone().unwrap_or_default();

        let new_video = NewVideo {
            youtube_video_id: item.id.clone(),
            youtube_channel_id: channel.youtube_channel_id,
            event_id: event.id.clone(),
            title: snippet.title.clone(),
            actual_start_time: start.with_timezone(&Utc),
            actual_end_time: end.with_timezone(&Utc),
            duration_second,
            view_count: parse_count(&item.id, "viewCount", statistics.view_count.as_deref())?,
            like_count: parse_count(&item.id, "likeCount", statistics.like_count.as_deref())?,
        };

        match self.store.create_video(new_video).await {
            Ok(video) => {
                tracing::info!(
                    "Video: {} \"{}\" ({}s, {} views)",
                    video.youtube_video_id,
                    video.title,
                    video.duration_second,
                    video.view_count
                );
                Ok(VideoOutcome::Created)
            }
            Err(e) if e.is_conflict() => {
                tracing::info!("Video {} is already stored, skipping insert: {}", item.id, e);
                Ok(VideoOutcome::AlreadyStored)
            }
            Err(e) => Err(e),
        }
    }

    async fn persist_thumbnails(
        &self,
        video_id: &str,
        thumbnails: &Thumbnails,
    ) -> Result<usize, AppError> {
        let thumbnails = thumbnail_variants(video_id, thumbnails);
        let count = thumbnails.len();
        for thumbnail in thumbnails {
            self.store.upsert_thumbnail(thumbnail).await?;
        }

        tracing::debug!("Saved {} thumbnails for {}", count, video_id);
        Ok(count)
    }
}

fn missing(video_id: &str, field: &str) -> AppError {
    AppError::Parse(format!("video {} has no {}", video_id, field))
}

fn actual_start_time(item: &VideoItem) -> Result<DateTime<FixedOffset>, AppError> {
    parse_timestamp(
        &item.id,
        "actualStartTime",
        item.live_streaming_details
            .as_ref()
            .and_then(|d| d.actual_start_time.as_deref()),
    )
}

fn parse_timestamp(
    video_id: &str,
    field: &str,
    raw: Option<&str>,
) -> Result<DateTime<FixedOffset>, AppError> {
    let raw = raw.ok_or_else(|| missing(video_id, field))?;
    DateTime::parse_from_rfc3339(raw).map_err(|e| {
        AppError::Parse(format!("{} of {} is not RFC 3339 ({}): {}", field, video_id, raw, e))
    })
}

/// Absent counts are stored as zero.
fn parse_count(video_id: &str, field: &str, raw: Option<&str>) -> Result<i64, AppError> {
    match raw {
        None => Ok(0),
        Some(raw) => raw.parse::<i64>().map_err(|e| {
            AppError::Parse(format!("{} of {} is not a count ({}): {}", field, video_id, raw, e))
        }),
    }
}

fn thumbnail_variants(video_id: &str, thumbnails: &Thumbnails) -> Vec<NewThumbnail> {
    let slots: [(ThumbnailVariant, &Option<ThumbnailDetails>); 5] = [
        (ThumbnailVariant::Default, &thumbnails.default),
        (ThumbnailVariant::Medium, &thumbnails.medium),
        (ThumbnailVariant::High, &thumbnails.high),
        (ThumbnailVariant::Standard, &thumbnails.standard),
        (ThumbnailVariant::Maxres, &thumbnails.maxres),
    ];

    slots
        .into_iter()
        .filter_map(|(variant, details)| {
            details.as_ref().map(|d| NewThumbnail {
                youtube_video_id: video_id.to_string(),
                variant,
                url: d.url.clone(),
                width: d.width.unwrap_or(0),
                height: d.height.unwrap_or(0),
            })
        })
        .collect()
}
