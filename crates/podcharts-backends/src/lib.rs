//! Chart backend contract + per-directory implementations.

use async_trait::async_trait;
use podcharts_core::{ChartBackendError, ChartIdReturnValue, ChartPositionData, PodcastData};

pub mod apple;
mod html;

pub use apple::{AppleBackend, AppleBackendConfig};

pub const CRATE_NAME: &str = "podcharts-backends";

/// Capabilities every podcast directory backend provides.
///
/// Implementations hold no mutable state, so one instance can serve any number
/// of concurrent calls. Each call performs its own network I/O and returns
/// normalized values or a [`ChartBackendError`].
#[async_trait]
pub trait ChartBackend: Send + Sync {
    /// Identifier the orchestration layer uses to pick this backend.
    fn source_id(&self) -> &'static str;

    /// Base URL of the directory's webview.
    fn base_url(&self) -> &str;

    /// Resolve a title search into exactly one podcast.
    ///
    /// `podcast_rss` and `podcast_id` are only consulted when the search
    /// returns more than one candidate.
    async fn get_remote_podcast_data(
        &self,
        podcast_title: &str,
        podcast_rss: Option<&str>,
        podcast_id: Option<&str>,
    ) -> Result<PodcastData, ChartBackendError>;

    /// Resolve a directory category id into a chart handle for [`ChartBackend::fetch`].
    async fn get_chart_id_for_category(
        &self,
        category_id: &str,
        country: Option<&str>,
    ) -> Result<ChartIdReturnValue, ChartBackendError>;

    /// Fetch a ranked chart snapshot, ordered by position.
    ///
    /// An empty or absent `filter_to_podcast_ids` keeps every entry.
    async fn fetch(
        &self,
        remote_chart_id: &str,
        country: &str,
        filter_to_podcast_ids: Option<&[String]>,
        remote_chart_id_is_category_id: bool,
    ) -> Result<Vec<ChartPositionData>, ChartBackendError>;
}

pub fn apple_backend() -> impl ChartBackend {
    AppleBackend::new()
}

pub fn backend_for_source(source_id: &str) -> Option<Box<dyn ChartBackend>> {
    match source_id {
        apple::SOURCE_ID => Some(Box::new(AppleBackend::new())),
        _ => None,
    }
}
