use crate::errors::AppError;
use crate::youtube::VideoApi;

/// Largest page the playlistItems endpoint serves.
pub const PLAYLIST_PAGE_SIZE: usize = 50;

/// Collects the video ids of every playlist member, in playlist order.
///
/// Pages are requested until the number of ids collected reaches the total the
/// API reports. Any failed request aborts the collection.
#[tracing::instrument(name = "Collect playlist video ids", skip(api))]
pub async fn collect_playlist_video_ids<A>(api: &A, playlist_id: &str) -> Result<Vec<String>, AppError>
where
    A: VideoApi + ?Sized,
{
    let mut video_ids: Vec<String> = Vec::new();
    let mut page_token: Option<String> = None;
    let mut page_count = 0;

    loop {
        page_count += 1;
        tracing::debug!("Requesting playlist page {}", page_count);

        let page = api
            .list_playlist_items(playlist_id, PLAYLIST_PAGE_SIZE, page_token.as_deref())
            .await?;

        for item in page.items {
            tracing::info!(
                "Item: {} ; {}",
                item.snippet.resource_id.video_id,
                item.snippet.title
            );
            video_ids.push(item.snippet.resource_id.video_id);
        }
        tracing::info!("Retrieved {} video IDs", video_ids.len());

        let total_results = usize::try_from(page.page_info.total_results).unwrap_or(0);
        if video_ids.len() >= total_results {
            break;
        }

        match page.next_page_token {
            Some(token) => page_token = Some(token),
            None => {
                tracing::warn!(
                    "Playlist {} reports {} results but has no further pages after {}",
                    playlist_id,
                    total_results,
                    video_ids.len()
                );
                break;
            }
        }
    }

    tracing::info!("Total {} video IDs in {} pages", video_ids.len(), page_count);
    Ok(video_ids)
}
