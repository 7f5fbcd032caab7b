//! Directory-agnostic value types and error taxonomy for podcast chart backends.

use serde::{Deserialize, Serialize};

mod error;

pub use error::{
    ChartBackendError, ChartErrorKind, ChartFetchCause, ChartParseError, RetryDisposition,
    TransportError,
};

pub const CRATE_NAME: &str = "podcharts-core";

/// A directory category attached to a podcast.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PodcastCategory {
    pub label: String,
    /// Directory-specific id. Not every directory uses numeric ids.
    pub remote_id: String,
    /// `None` when the source does not expose the category hierarchy.
    pub is_parent: Option<bool>,
}

impl PodcastCategory {
    pub fn new(label: impl Into<String>, remote_id: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            remote_id: remote_id.into(),
            is_parent: None,
        }
    }
}

/// A podcast identity resolved against a directory at a point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PodcastData {
    pub podcast_title: String,
    pub podcast_id: String,
    /// In the order the directory reported them; never includes the generic marker genre.
    pub categories: Vec<PodcastCategory>,
    pub backend_url: Option<String>,
}

/// Handle returned when resolving a category into something `fetch` accepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartIdReturnValue {
    pub chart_id: String,
    /// Whether the id has to be resolved again for every country.
    pub unique_for_country: bool,
    pub webview_url: Option<String>,
}

/// One ranked entry from a fetched chart snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartPositionData {
    pub podcast_id: String,
    /// 1-based; entries that failed to parse leave a gap instead of renumbering.
    pub position: u32,
    pub podcast_title: Option<String>,
    pub podcast_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_constructor_leaves_hierarchy_unknown() {
        let category = PodcastCategory::new("Games", "1507");
        assert_eq!(category.label, "Games");
        assert_eq!(category.remote_id, "1507");
        assert_eq!(category.is_parent, None);
    }

    #[test]
    fn podcast_data_serializes_with_null_backend_url() {
        let data = PodcastData {
            podcast_title: "Explorers Wanted".to_string(),
            podcast_id: "1496564284".to_string(),
            categories: vec![PodcastCategory::new("Games", "1507")],
            backend_url: None,
        };
        let value = serde_json::to_value(&data).expect("serialize");
        assert_eq!(value["podcast_id"], "1496564284");
        assert!(value["backend_url"].is_null());
        assert!(value["categories"][0]["is_parent"].is_null());
    }
}
