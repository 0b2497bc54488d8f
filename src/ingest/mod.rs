//! Playlist ingestion: paging, batched detail lookup, filtering and persistence.

pub mod batch;
pub mod duration;
pub mod paging;
pub mod pipeline;
pub mod window;

pub use pipeline::IngestionPipeline;
pub use window::TimeWindow;
