//! Export of stored events and their videos as JSON files.
//!
//! Layout under the target directory:
//! - `events.json`: every event
//! - `events/<event id>.json`: the videos of that event

use std::path::{Path, PathBuf};

use crate::errors::AppError;
use crate::store::Store;

/// Files written by a dump.
#[derive(Debug, Default)]
pub struct DumpReport {
    pub events: usize,
    pub files: Vec<PathBuf>,
}

#[tracing::instrument(name = "Dump events", skip(store))]
pub async fn dump<S>(store: &S, target_dir: &Path) -> Result<DumpReport, AppError>
where
    S: Store + ?Sized,
{
    let events = store.list_events().await?;

    tokio::fs::create_dir_all(target_dir).await?;
    let mut report = DumpReport {
        events: events.len(),
        ..Default::default()
    };

    let events_path = target_dir.join("events.json");
    tokio::fs::write(&events_path, serde_json::to_vec_pretty(&events)?).await?;
    tracing::info!("Wrote {} events to {}", events.len(), events_path.display());
    report.files.push(events_path);

    let event_dir = target_dir.join("events");
    tokio::fs::create_dir_all(&event_dir).await?;

    for event in &events {
        let videos = store.get_videos_by_event(&event.id).await?;
        for video in &videos {
            tracing::debug!("Video: {} {}", video.youtube_video_id, video.title);
        }

        let videos_path = event_dir.join(event_file_name(&event.id));
        tokio::fs::write(&videos_path, serde_json::to_vec(&videos)?).await?;
        tracing::info!(
            "Wrote {} videos of event {} to {}",
            videos.len(),
            event.id,
            videos_path.display()
        );
        report.files.push(videos_path);
    }

    Ok(report)
}

/// Event names are caller-supplied; percent-encoding keeps separators out of the file name.
fn event_file_name(event_id: &str) -> String {
    let encoded: String = url::form_urlencoded::byte_serialize(event_id.as_bytes()).collect();
    format!("{}.json", encoded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::{IngestionPipeline, TimeWindow};
    use crate::store::{Event, Video};
    use crate::testing::{live_video, FakeVideoApi, MemoryStore};

    #[tokio::test]
    async fn writes_events_and_one_file_per_event() {
        let store = MemoryStore::default();
        let api = FakeVideoApi::with_videos(vec![
            live_video("b", "2024-05-02T10:00:00Z"),
            live_video("a", "2024-05-01T10:00:00Z"),
        ]);
        IngestionPipeline::new(&api, &store)
            .run("relive2024", "PL", &TimeWindow::default())
            .await
            .unwrap();
        store.get_or_create_event("empty").await.unwrap();

        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out");
        let report = dump(&store, &target).await.unwrap();

        assert_eq!(report.events, 2);
        assert_eq!(report.files.len(), 3);

        let events: Vec<Event> =
            serde_json::from_slice(&std::fs::read(target.join("events.json")).unwrap()).unwrap();
        let ids: Vec<_> = events.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["empty", "relive2024"]);

        let videos: Vec<Video> = serde_json::from_slice(
            &std::fs::read(target.join("events").join("relive2024.json")).unwrap(),
        )
        .unwrap();
        let video_ids: Vec<_> = videos.iter().map(|v| v.youtube_video_id.as_str()).collect();
        assert_eq!(video_ids, vec!["a", "b"]);

        let empty = std::fs::read_to_string(target.join("events").join("empty.json")).unwrap();
        assert_eq!(empty, "[]");
    }

    #[test]
    fn event_file_names_cannot_leave_the_events_dir() {
        assert_eq!(event_file_name("relive2024"), "relive2024.json");
        assert_eq!(event_file_name("a/b"), "a%2Fb.json");
        assert_eq!(event_file_name("../x"), "..%2Fx.json");
        assert_eq!(event_file_name("..\\x"), "..%5Cx.json");
    }

    #[tokio::test]
    async fn names_with_separators_are_written_inside_events_dir() {
        let store = MemoryStore::default();
        store.get_or_create_event("../escape").await.unwrap();
        store.get_or_create_event("fes/day1").await.unwrap();

        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out");
        let report = dump(&store, &target).await.unwrap();

        assert_eq!(report.files.len(), 3);
        let events_dir = target.join("events");
        assert!(report.files[1..].iter().all(|f| f.parent() == Some(events_dir.as_path())));
        assert!(events_dir.join("..%2Fescape.json").is_file());
        assert!(events_dir.join("fes%2Fday1.json").is_file());
        assert!(!target.join("escape.json").exists());
    }

    #[tokio::test]
    async fn empty_store_still_writes_the_layout() {
        let store = MemoryStore::default();
        let dir = tempfile::tempdir().unwrap();

        let report = dump(&store, dir.path()).await.unwrap();

        assert_eq!(report.events, 0);
        assert_eq!(
            std::fs::read_to_string(dir.path().join("events.json")).unwrap(),
            "[]"
        );
        assert!(dir.path().join("events").is_dir());
    }
}
