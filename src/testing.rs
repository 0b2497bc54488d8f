//! In-memory stand-ins for the video API and the store, used by unit tests.

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use crate::errors::AppError;
use crate::store::{Channel, Event, NewThumbnail, NewVideo, Store, Thumbnail, ThumbnailVariant, Video};
use crate::youtube::types::{
    ContentDetails, LiveStreamingDetails, PageInfo, PlaylistItem, PlaylistItemListResponse,
    PlaylistItemSnippet, ResourceId, Statistics, ThumbnailDetails, Thumbnails, VideoItem,
    VideoListResponse, VideoSnippet,
};
use crate::youtube::VideoApi;

/// Serves a fixed playlist page by page, keyed by offset tokens.
#[derive(Default)]
pub struct FakeVideoApi {
    pub playlist: Vec<String>,
    /// Overrides the reported total when set.
    pub reported_total: Option<i64>,
    pub videos: BTreeMap<String, VideoItem>,
    pub fail_playlist_at_call: Option<usize>,
    pub fail_videos_at_call: Option<usize>,
    pub playlist_calls: Mutex<Vec<(usize, Option<String>)>>,
    pub video_calls: Mutex<Vec<Vec<String>>>,
}

impl FakeVideoApi {
    pub fn with_playlist(ids: &[&str]) -> Self {
        Self {
            playlist: ids.iter().map(|id| id.to_string()).collect(),
            ..Default::default()
        }
    }

    pub fn with_videos(videos: Vec<VideoItem>) -> Self {
        let mut api = Self::with_playlist(
            &videos.iter().map(|v| v.id.as_str()).collect::<Vec<_>>(),
        );
        api.videos = videos.into_iter().map(|v| (v.id.clone(), v)).collect();
        api
    }

    pub fn playlist_call_count(&self) -> usize {
        self.playlist_calls.lock().unwrap().len()
    }

    pub fn video_batches(&self) -> Vec<Vec<String>> {
        self.video_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl VideoApi for FakeVideoApi {
    async fn list_playlist_items(
        &self,
        _playlist_id: &str,
        page_size: usize,
        page_token: Option<&str>,
    ) -> Result<PlaylistItemListResponse, AppError> {
        let call_index = {
            let mut calls = self.playlist_calls.lock().unwrap();
            calls.push((page_size, page_token.map(str::to_string)));
            calls.len() - 1
        };
        if self.fail_playlist_at_call == Some(call_index) {
            return Err(AppError::ExternalService(anyhow::anyhow!("playlist unavailable")));
        }

        let offset: usize = page_token
            .map(|t| t.trim_start_matches("offset-").parse().unwrap())
            .unwrap_or(0);
        let end = (offset + page_size).min(self.playlist.len());
        let items = self.playlist[offset..end]
            .iter()
            .map(|id| PlaylistItem {
                id: format!("item-{}", id),
                snippet: PlaylistItemSnippet {
                    title: format!("title {}", id),
                    resource_id: ResourceId {
                        kind: "youtube#video".to_string(),
                        video_id: id.clone(),
                    },
                },
            })
            .collect();

        Ok(PlaylistItemListResponse {
            next_page_token: (end < self.playlist.len()).then(|| format!("offset-{}", end)),
            page_info: PageInfo {
                total_results: self.reported_total.unwrap_or(self.playlist.len() as i64),
                results_per_page: page_size as i64,
            },
            items,
        })
    }

    async fn list_videos(&self, video_ids: &[String]) -> Result<VideoListResponse, AppError> {
        let call_index = {
            let mut calls = self.video_calls.lock().unwrap();
            calls.push(video_ids.to_vec());
            calls.len() - 1
        };
        if self.fail_videos_at_call == Some(call_index) {
            return Err(AppError::ExternalService(anyhow::anyhow!("videos unavailable")));
        }

        let items = video_ids
            .iter()
            .map(|id| {
                self.videos
                    .get(id)
                    .cloned()
                    .unwrap_or_else(|| live_video(id, "2024-05-01T10:00:00Z"))
            })
            .collect();

        Ok(VideoListResponse { items })
    }
}

fn thumb(id: &str, name: &str, width: i32, height: i32) -> ThumbnailDetails {
    ThumbnailDetails {
        url: format!("https://i.ytimg.com/vi/{}/{}.jpg", id, name),
        width: Some(width),
        height: Some(height),
    }
}

/// A finished live stream lasting one hour with default, medium and high thumbnails.
pub fn live_video(id: &str, start: &str) -> VideoItem {
    VideoItem {
        id: id.to_string(),
        snippet: Some(VideoSnippet {
            channel_id: "UC-relive".to_string(),
            channel_title: "Relive Channel".to_string(),
            title: format!("Stream {}", id),
            thumbnails: Thumbnails {
                default: Some(thumb(id, "default", 120, 90)),
                medium: Some(thumb(id, "mqdefault", 320, 180)),
                high: Some(thumb(id, "hqdefault", 480, 360)),
                standard: None,
                maxres: None,
            },
        }),
        content_details: Some(ContentDetails {
            duration: "PT1H".to_string(),
        }),
        live_streaming_details: Some(LiveStreamingDetails {
            actual_start_time: Some(start.to_string()),
            actual_end_time: Some("2024-05-01T23:00:00Z".to_string()),
        }),
        statistics: Some(Statistics {
            view_count: Some("1500".to_string()),
            like_count: Some("42".to_string()),
        }),
        recording_details: None,
    }
}

#[derive(Default)]
struct MemoryState {
    events: BTreeMap<String, Event>,
    channels: BTreeMap<String, Channel>,
    videos: Vec<Video>,
    thumbnails: BTreeMap<(String, ThumbnailVariant), Thumbnail>,
}

#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
    fail_video_inserts: bool,
}

impl MemoryStore {
    pub fn failing_video_inserts() -> Self {
        Self {
            fail_video_inserts: true,
            ..Default::default()
        }
    }

    pub fn videos(&self) -> Vec<Video> {
        self.state.lock().unwrap().videos.clone()
    }

    pub fn events(&self) -> Vec<Event> {
        self.state.lock().unwrap().events.values().cloned().collect()
    }

    pub fn channels(&self) -> Vec<Channel> {
        self.state.lock().unwrap().channels.values().cloned().collect()
    }

    pub fn thumbnails(&self) -> Vec<Thumbnail> {
        self.state.lock().unwrap().thumbnails.values().cloned().collect()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn get_or_create_event(&self, name: &str) -> Result<Event, AppError> {
        let mut state = self.state.lock().unwrap();
        let event = state
            .events
            .entry(name.to_string())
            .or_insert_with(|| Event {
                id: name.to_string(),
                created_at: Utc::now(),
            });
        Ok(event.clone())
    }

    async fn get_or_create_channel(
        &self,
        channel_id: &str,
        name: &str,
    ) -> Result<Channel, AppError> {
        let channel = Channel {
            youtube_channel_id: channel_id.to_string(),
            name: name.to_string(),
        };
        self.state
            .lock()
            .unwrap()
            .channels
            .insert(channel_id.to_string(), channel.clone());
        Ok(channel)
    }

    async fn create_video(&self, video: NewVideo) -> Result<Video, AppError> {
        if self.fail_video_inserts {
            return Err(AppError::Database(anyhow::anyhow!("connection reset")));
        }

        let mut state = self.state.lock().unwrap();
        if !state.events.contains_key(&video.event_id)
            || !state.channels.contains_key(&video.youtube_channel_id)
        {
            return Err(AppError::Database(anyhow::anyhow!("foreign key violation")));
        }
        if state
            .videos
            .iter()
            .any(|v| v.youtube_video_id == video.youtube_video_id)
        {
            return Err(AppError::Conflict(format!(
                "duplicate key value violates unique constraint \"videos_pkey\" ({})",
                video.youtube_video_id
            )));
        }

        let video = Video::from(video);
        state.videos.push(video.clone());
        Ok(video)
    }

    async fn upsert_thumbnail(&self, thumbnail: NewThumbnail) -> Result<Thumbnail, AppError> {
        let stored = Thumbnail {
            youtube_video_id: thumbnail.youtube_video_id,
            variant: thumbnail.variant,
            url: thumbnail.url,
            width: thumbnail.width,
            height: thumbnail.height,
        };
        self.state.lock().unwrap().thumbnails.insert(
            (stored.youtube_video_id.clone(), stored.variant),
            stored.clone(),
        );
        Ok(stored)
    }

    async fn list_events(&self) -> Result<Vec<Event>, AppError> {
        Ok(self.events())
    }

    async fn get_videos_by_event(&self, event_id: &str) -> Result<Vec<Video>, AppError> {
        let mut videos: Vec<Video> = self
            .videos()
            .into_iter()
            .filter(|v| v.event_id == event_id)
            .collect();
        videos.sort_by(|a, b| {
            a.actual_start_time
                .cmp(&b.actual_start_time)
                .then_with(|| a.youtube_video_id.cmp(&b.youtube_video_id))
        });
        Ok(videos)
    }
}
