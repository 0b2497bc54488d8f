use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;

use super::types::{PlaylistItemListResponse, VideoListResponse};
use crate::config::YoutubeSettings;
use crate::errors::AppError;

const PLAYLIST_ITEM_PARTS: &str = "id,snippet,contentDetails";
const VIDEO_PARTS: &str =
    "id,snippet,contentDetails,liveStreamingDetails,statistics,recordingDetails";

/// The two list operations of the video platform the aggregator consumes.
#[async_trait]
pub trait VideoApi: Send + Sync {
    async fn list_playlist_items(
        &self,
        playlist_id: &str,
        page_size: usize,
        page_token: Option<&str>,
    ) -> Result<PlaylistItemListResponse, AppError>;

    async fn list_videos(&self, video_ids: &[String]) -> Result<VideoListResponse, AppError>;
}

pub struct YoutubeClient {
    http_client: Client,
    settings: YoutubeSettings,
}

impl YoutubeClient {
    pub fn new(settings: YoutubeSettings) -> Self {
        Self {
            http_client: Client::new(),
            settings,
        }
    }

    fn endpoint(&self, resource: &str) -> String {
        format!(
            "{}/{}",
            self.settings.base_url.as_str().trim_end_matches('/'),
            resource
        )
    }

    async fn get<T: DeserializeOwned>(
        &self,
        resource: &str,
        query: &[(&str, &str)],
    ) -> Result<T, AppError> {
        let url = self.endpoint(resource);
        tracing::debug!("Sending request to YouTube API: {}", url);

        let response = self
            .http_client
            .get(&url)
            .query(query)
            .query(&[("key", self.settings.api_key.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!("YouTube API error on {}: {} {}", resource, status, error_text);
            return Err(AppError::ExternalService(anyhow::anyhow!(
                "YouTube API error on {} ({}): {}",
                resource,
                status,
                error_text
            )));
        }

        response.json::<T>().await.map_err(|e| {
            tracing::error!("Failed to parse {} response: {:?}", resource, e);
            AppError::from(e)
        })
    }
}

#[async_trait]
impl VideoApi for YoutubeClient {
    #[tracing::instrument(name = "List playlist items", skip(self))]
    async fn list_playlist_items(
        &self,
        playlist_id: &str,
        page_size: usize,
        page_token: Option<&str>,
    ) -> Result<PlaylistItemListResponse, AppError> {
        let max_results = page_size.to_string();
        let mut query = vec![
            ("part", PLAYLIST_ITEM_PARTS),
            ("playlistId", playlist_id),
            ("maxResults", max_results.as_str()),
        ];
        if let Some(token) = page_token {
            query.push(("pageToken", token));
        }

        self.get("playlistItems", &query).await
    }

    #[tracing::instrument(name = "List videos", skip(self, video_ids), fields(count = video_ids.len()))]
    async fn list_videos(&self, video_ids: &[String]) -> Result<VideoListResponse, AppError> {
        let ids_param = video_ids.join(",");
        let query = [("part", VIDEO_PARTS), ("id", ids_param.as_str())];

        self.get("videos", &query).await
    }
}
