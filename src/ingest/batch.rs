use crate::errors::AppError;
use crate::youtube::types::VideoItem;
use crate::youtube::VideoApi;

/// Most ids a single videos.list call accepts.
pub const VIDEO_BATCH_SIZE: usize = 50;

/// Fetches full detail records for `video_ids`, one request per chunk of
/// [`VIDEO_BATCH_SIZE`] ids. Chunks go out one after another; the first
/// failure aborts the fetch.
#[tracing::instrument(name = "Fetch video details", skip(api, video_ids), fields(count = video_ids.len()))]
pub async fn fetch_video_details<A>(api: &A, video_ids: &[String]) -> Result<Vec<VideoItem>, AppError>
where
    A: VideoApi + ?Sized,
{
    let mut videos = Vec::with_capacity(video_ids.len());

    for (index, chunk) in video_ids.chunks(VIDEO_BATCH_SIZE).enumerate() {
        tracing::debug!("Fetching batch {} with {} ids", index + 1, chunk.len());

        let response = api.list_videos(chunk).await?;
        videos.extend(response.items);
    }

    tracing::info!("Fetched details for {} videos", videos.len());
    Ok(videos)
}
