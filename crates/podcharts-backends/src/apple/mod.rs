//! Apple Podcasts backend: iTunes Search API for identity, webview scraping for charts.

use std::collections::HashSet;

use async_trait::async_trait;
use podcharts_core::{ChartBackendError, ChartIdReturnValue, ChartPositionData, PodcastData};
use podcharts_http::{HttpClientConfig, HttpFetcher};
use scraper::Html;
use tracing::{debug, info_span, Instrument};

use crate::ChartBackend;

mod category;
mod chart;
mod search;

pub use category::extract_chart_id;
pub use chart::{extract_chart_positions, podcast_id_from_href};
pub use search::{
    podcast_data_from_search_result, resolve_search_response, SearchResponse, SearchResult,
    PODCASTS_MARKER_GENRE,
};

pub const SOURCE_ID: &str = "apple";
pub const APPLE_PODCASTS_BASE_URL: &str = "https://podcasts.apple.com";
pub const ITUNES_SEARCH_URL: &str = "https://itunes.apple.com/search";

/// Country value that asks for a worldwide chart, which Apple does not publish.
pub const WORLDWIDE_COUNTRY: &str = "all";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppleBackendConfig {
    pub search_url: String,
    pub webview_base_url: String,
    /// Storefront used for genre pages. Chart ids are the same in every storefront.
    pub category_locale: String,
    pub user_agent: Option<String>,
}

impl Default for AppleBackendConfig {
    fn default() -> Self {
        Self {
            search_url: ITUNES_SEARCH_URL.to_string(),
            webview_base_url: APPLE_PODCASTS_BASE_URL.to_string(),
            category_locale: "us".to_string(),
            user_agent: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppleBackend {
    config: AppleBackendConfig,
    http: HttpFetcher,
}

impl Default for AppleBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl AppleBackend {
    pub fn new() -> Self {
        Self::with_config(AppleBackendConfig::default())
    }

    pub fn with_config(config: AppleBackendConfig) -> Self {
        let http = HttpFetcher::new(HttpClientConfig {
            user_agent: config.user_agent.clone(),
        });
        Self { config, http }
    }

    pub fn config(&self) -> &AppleBackendConfig {
        &self.config
    }

    fn webview_url(&self, path: &str) -> String {
        format!("{}/{}", self.config.webview_base_url.trim_end_matches('/'), path)
    }

    async fn fetch_webview(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<String, ChartBackendError> {
        self.http
            .get_html(url, query)
            .await
            .map_err(|err| ChartBackendError::chart_fetch(SOURCE_ID, err))
    }
}

#[async_trait]
impl ChartBackend for AppleBackend {
    fn source_id(&self) -> &'static str {
        SOURCE_ID
    }

    fn base_url(&self) -> &str {
        &self.config.webview_base_url
    }

    async fn get_remote_podcast_data(
        &self,
        podcast_title: &str,
        podcast_rss: Option<&str>,
        podcast_id: Option<&str>,
    ) -> Result<PodcastData, ChartBackendError> {
        let span = info_span!("apple_search", podcast_title);
        async {
            let response: SearchResponse = self
                .http
                .get_json(&self.config.search_url, &search::search_query(podcast_title))
                .await
                .map_err(|source| ChartBackendError::PodcastSearchFailed { source })?;
            debug!(result_count = response.result_count, "search results received");
            resolve_search_response(&response, podcast_rss, podcast_id)
        }
        .instrument(span)
        .await
    }

    /// Apple chart ids are valid in every storefront, so `country` has no effect
    /// and the result is never `unique_for_country`.
    async fn get_chart_id_for_category(
        &self,
        category_id: &str,
        _country: Option<&str>,
    ) -> Result<ChartIdReturnValue, ChartBackendError> {
        let url = self.webview_url(&format!(
            "{}/genre/{category_id}",
            self.config.category_locale
        ));
        let span = info_span!("apple_category", category_id);
        async {
            let body = self.fetch_webview(&url, &[]).await?;
            extract_chart_id(&Html::parse_document(&body))
                .map_err(|err| ChartBackendError::chart_fetch(SOURCE_ID, err))
        }
        .instrument(span)
        .await
    }

    async fn fetch(
        &self,
        remote_chart_id: &str,
        country: &str,
        filter_to_podcast_ids: Option<&[String]>,
        remote_chart_id_is_category_id: bool,
    ) -> Result<Vec<ChartPositionData>, ChartBackendError> {
        if country == WORLDWIDE_COUNTRY {
            return Err(ChartBackendError::not_implemented(
                "getting worldwide charts via Apple Podcasts is not supported",
            ));
        }

        let filter: HashSet<&str> = filter_to_podcast_ids
            .unwrap_or_default()
            .iter()
            .map(String::as_str)
            .collect();
        let (url, query) = if remote_chart_id_is_category_id {
            (
                self.webview_url(&format!("{country}/charts")),
                vec![("genre", remote_chart_id)],
            )
        } else {
            (
                self.webview_url(&format!("{country}/room/{remote_chart_id}")),
                Vec::new(),
            )
        };

        let span = info_span!("apple_chart", remote_chart_id, country);
        async {
            let body = self.fetch_webview(&url, &query).await?;
            let positions = extract_chart_positions(&Html::parse_document(&body), &filter)
                .map_err(|err| ChartBackendError::chart_fetch(SOURCE_ID, err))?;
            debug!(entries = positions.len(), "chart parsed");
            Ok::<_, ChartBackendError>(positions)
        }
        .instrument(span)
        .await
    }
}
