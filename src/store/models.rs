use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A named grouping of videos. The name is the primary key.
#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Channel {
    pub youtube_channel_id: String,
    pub name: String,
}

#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    pub youtube_video_id: String,
    pub youtube_channel_id: String,
    pub event_id: String,
    pub title: String,
    pub actual_start_time: DateTime<Utc>,
    pub actual_end_time: DateTime<Utc>,
    pub duration_second: i32,
    pub view_count: i64,
    pub like_count: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewVideo {
    pub youtube_video_id: String,
    pub youtube_channel_id: String,
    pub event_id: String,
    pub title: String,
    pub actual_start_time: DateTime<Utc>,
    pub actual_end_time: DateTime<Utc>,
    pub duration_second: i32,
    pub view_count: i64,
    pub like_count: i64,
}

impl From<NewVideo> for Video {
    fn from(v: NewVideo) -> Self {
        Video {
            youtube_video_id: v.youtube_video_id,
            youtube_channel_id: v.youtube_channel_id,
            event_id: v.event_id,
            title: v.title,
            actual_start_time: v.actual_start_time,
            actual_end_time: v.actual_end_time,
            duration_second: v.duration_second,
            view_count: v.view_count,
            like_count: v.like_count,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum ThumbnailVariant {
    Default,
    Medium,
    High,
    Standard,
    Maxres,
}

impl ThumbnailVariant {
    pub const ALL: [ThumbnailVariant; 5] = [
        ThumbnailVariant::Default,
        ThumbnailVariant::Medium,
        ThumbnailVariant::High,
        ThumbnailVariant::Standard,
        ThumbnailVariant::Maxres,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ThumbnailVariant::Default => "default",
            ThumbnailVariant::Medium => "medium",
            ThumbnailVariant::High => "high",
            ThumbnailVariant::Standard => "standard",
            ThumbnailVariant::Maxres => "maxres",
        }
    }
}

impl std::fmt::Display for ThumbnailVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ThumbnailVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ThumbnailVariant::ALL
            .into_iter()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| format!("unknown thumbnail variant: {}", s))
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Thumbnail {
    pub youtube_video_id: String,
    #[serde(rename = "type")]
    pub variant: ThumbnailVariant,
    pub url: String,
    pub width: i32,
    pub height: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewThumbnail {
    pub youtube_video_id: String,
    pub variant: ThumbnailVariant,
    pub url: String,
    pub width: i32,
    pub height: i32,
}
