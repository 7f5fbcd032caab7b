//! Per-call scoped HTTP fetch utilities for chart backends.

use podcharts_core::TransportError;
use reqwest::header::{HeaderValue, ACCEPT};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::{debug, info_span, Instrument};

pub const CRATE_NAME: &str = "podcharts-http";

pub const ACCEPT_JSON: &str = "application/json";
pub const ACCEPT_HTML: &str = "text/html,application/xhtml+xml";

#[derive(Debug, Clone, Default)]
pub struct HttpClientConfig {
    pub user_agent: Option<String>,
}

#[derive(Debug, Clone)]
pub struct FetchedResponse {
    pub status: StatusCode,
    pub final_url: String,
    pub body: String,
}

/// Issues GET requests with a client that lives only as long as the request.
///
/// Nothing is pooled between calls, so a cancelled call releases its
/// connection as soon as its future is dropped. Timeouts and retries are left
/// to whoever awaits the call.
#[derive(Debug, Clone, Default)]
pub struct HttpFetcher {
    config: HttpClientConfig,
}

impl HttpFetcher {
    pub fn new(config: HttpClientConfig) -> Self {
        Self { config }
    }

    fn build_client(&self, url: &str) -> Result<reqwest::Client, TransportError> {
        let mut builder = reqwest::Client::builder().gzip(true).brotli(true);
        if let Some(user_agent) = &self.config.user_agent {
            builder = builder.user_agent(user_agent.clone());
        }
        builder.build().map_err(|err| request_error(url, &err))
    }

    /// GET `url` with `query` appended, failing on any non-2xx status.
    pub async fn get_text(
        &self,
        url: &str,
        query: &[(&str, &str)],
        accept: &'static str,
    ) -> Result<FetchedResponse, TransportError> {
        let span = info_span!("http_fetch", url);
        async {
            let client = self.build_client(url)?;
            let response = client
                .get(url)
                .query(query)
                .header(ACCEPT, HeaderValue::from_static(accept))
                .send()
                .await
                .map_err(|err| request_error(url, &err))?;

            let status = response.status();
            let final_url = response.url().to_string();
            debug!(status = status.as_u16(), %final_url, "response received");

            if !status.is_success() {
                return Err(TransportError::HttpStatus {
                    status: status.as_u16(),
                    url: final_url,
                });
            }

            let body = response.text().await.map_err(|err| TransportError::Body {
                url: final_url.clone(),
                message: err.to_string(),
            })?;
            Ok(FetchedResponse {
                status,
                final_url,
                body,
            })
        }
        .instrument(span)
        .await
    }

    pub async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T, TransportError> {
        let response = self.get_text(url, query, ACCEPT_JSON).await?;
        serde_json::from_str(&response.body).map_err(|err| TransportError::Body {
            url: response.final_url,
            message: err.to_string(),
        })
    }

    pub async fn get_html(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<String, TransportError> {
        Ok(self.get_text(url, query, ACCEPT_HTML).await?.body)
    }
}

fn request_error(url: &str, err: &reqwest::Error) -> TransportError {
    TransportError::Request {
        url: url.to_string(),
        message: err.to_string(),
    }
}
