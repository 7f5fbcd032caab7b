//! iTunes Search API payloads and the rules for narrowing them to one podcast.

use podcharts_core::{ChartBackendError, PodcastCategory, PodcastData};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Genre every podcast carries on Apple; it says nothing about the show.
pub const PODCASTS_MARKER_GENRE: &str = "Podcasts";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub result_count: usize,
    #[serde(default)]
    pub results: Vec<SearchResult>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub track_name: String,
    pub track_id: u64,
    #[serde(default)]
    pub track_view_url: Option<String>,
    #[serde(default)]
    pub feed_url: Option<String>,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub genre_ids: Vec<String>,
}

pub(crate) fn search_query(podcast_title: &str) -> [(&str, &str); 4] {
    [
        ("term", podcast_title),
        ("media", "podcast"),
        ("entity", "podcast"),
        ("attribute", "titleTerm"),
    ]
}

/// Build [`PodcastData`] from one search result.
///
/// `genres[i]` pairs with `genreIds[i]`. The marker genre is dropped but still
/// consumes its index, so later names keep their own ids.
pub fn podcast_data_from_search_result(result: &SearchResult) -> PodcastData {
    let mut categories = Vec::with_capacity(result.genres.len());
    for (index, label) in result.genres.iter().enumerate() {
        if label == PODCASTS_MARKER_GENRE {
            continue;
        }
        match result.genre_ids.get(index) {
            Some(remote_id) => categories.push(PodcastCategory::new(label.clone(), remote_id.clone())),
            None => warn!(
                podcast_id = result.track_id,
                genre = %label,
                index,
                "genre has no matching genre id; dropping category"
            ),
        }
    }

    PodcastData {
        podcast_title: result.track_name.clone(),
        podcast_id: result.track_id.to_string(),
        categories,
        backend_url: result.track_view_url.clone(),
    }
}

fn matches_disambiguator(
    result: &SearchResult,
    podcast_rss: Option<&str>,
    podcast_id: Option<&str>,
) -> bool {
    let id_matches = podcast_id.is_some_and(|id| result.track_id.to_string() == id);
    let rss_matches = podcast_rss.is_some_and(|rss| result.feed_url.as_deref() == Some(rss));
    id_matches || rss_matches
}

/// Narrow a search response to exactly one podcast.
pub fn resolve_search_response(
    response: &SearchResponse,
    podcast_rss: Option<&str>,
    podcast_id: Option<&str>,
) -> Result<PodcastData, ChartBackendError> {
    match response.result_count {
        0 => Err(ChartBackendError::not_found("received 0 results for podcast")),
        1 => response
            .results
            .first()
            .map(podcast_data_from_search_result)
            .ok_or_else(|| ChartBackendError::not_found("search reported one result but returned none")),
        result_count if podcast_rss.is_none() && podcast_id.is_none() => {
            Err(ChartBackendError::MultiplePodcastsFound { result_count })
        }
        _ => response
            .results
            .iter()
            .find(|result| matches_disambiguator(result, podcast_rss, podcast_id))
            .map(podcast_data_from_search_result)
            .ok_or_else(|| ChartBackendError::not_found("podcast was not found in results")),
    }
}
