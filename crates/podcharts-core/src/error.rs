use thiserror::Error;

/// Failure talking to a directory over HTTP, before any domain meaning is attached.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("http status {status} for {url}")]
    HttpStatus { status: u16, url: String },
    #[error("request to {url} failed: {message}")]
    Request { url: String, message: String },
    #[error("unreadable response body from {url}: {message}")]
    Body { url: String, message: String },
}

impl TransportError {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Webview markup did not have the shape the scraper expects.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChartParseError {
    #[error("could not find header element for search")]
    NoHeadings,
    #[error("could not find any chart category links in results")]
    HeaderNotFound,
    #[error("could not find link element to category chart")]
    MissingHeaderLink,
    #[error("link element does not contain an href attribute")]
    MissingHref,
    #[error("chart link {href:?} has no trailing chart id")]
    MalformedChartLink { href: String },
    #[error("could not find list element for chart in html")]
    MissingChartList,
    #[error("invalid selector {selector:?}: {message}")]
    InvalidSelector { selector: String, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChartFetchCause {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error(transparent)]
    Parse(#[from] ChartParseError),
}

/// Closed set of failures a chart backend may report.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChartBackendError {
    #[error("podcast not found: {message}")]
    PodcastNotFound { message: String },
    #[error("received {result_count} records but no rss feed or id is available to narrow results")]
    MultiplePodcastsFound { result_count: usize },
    #[error("podcast search failed: {source}")]
    PodcastSearchFailed {
        #[source]
        source: TransportError,
    },
    #[error("chart parse failed: {0}")]
    ChartParseFailed(#[from] ChartParseError),
    #[error("{backend} chart fetch failed: {source}")]
    ChartFetchFailed {
        backend: &'static str,
        #[source]
        source: ChartFetchCause,
    },
    #[error("not implemented: {message}")]
    NotImplemented { message: String },
}

/// Fieldless mirror of [`ChartBackendError`] for matching and log labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartErrorKind {
    PodcastNotFound,
    MultiplePodcastsFound,
    PodcastSearchFailed,
    ChartParseFailed,
    ChartFetchFailed,
    NotImplemented,
}

impl ChartErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PodcastNotFound => "podcast_not_found",
            Self::MultiplePodcastsFound => "multiple_podcasts_found",
            Self::PodcastSearchFailed => "podcast_search_failed",
            Self::ChartParseFailed => "chart_parse_failed",
            Self::ChartFetchFailed => "chart_fetch_failed",
            Self::NotImplemented => "not_implemented",
        }
    }
}

/// How an orchestration layer should treat a failed call. The backends never retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDisposition {
    Retryable,
    RetryWithDisambiguator,
    NonRetryable,
}

impl ChartBackendError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::PodcastNotFound {
            message: message.into(),
        }
    }

    pub fn not_implemented(message: impl Into<String>) -> Self {
        Self::NotImplemented {
            message: message.into(),
        }
    }

    pub fn chart_fetch(backend: &'static str, cause: impl Into<ChartFetchCause>) -> Self {
        Self::ChartFetchFailed {
            backend,
            source: cause.into(),
        }
    }

    pub fn kind(&self) -> ChartErrorKind {
        match self {
            Self::PodcastNotFound { .. } => ChartErrorKind::PodcastNotFound,
            Self::MultiplePodcastsFound { .. } => ChartErrorKind::MultiplePodcastsFound,
            Self::PodcastSearchFailed { .. } => ChartErrorKind::PodcastSearchFailed,
            Self::ChartParseFailed(_) => ChartErrorKind::ChartParseFailed,
            Self::ChartFetchFailed { .. } => ChartErrorKind::ChartFetchFailed,
            Self::NotImplemented { .. } => ChartErrorKind::NotImplemented,
        }
    }

    pub fn disposition(&self) -> RetryDisposition {
        match self.kind() {
            ChartErrorKind::MultiplePodcastsFound => RetryDisposition::RetryWithDisambiguator,
            ChartErrorKind::PodcastNotFound | ChartErrorKind::NotImplemented => {
                RetryDisposition::NonRetryable
            }
            ChartErrorKind::PodcastSearchFailed
            | ChartErrorKind::ChartParseFailed
            | ChartErrorKind::ChartFetchFailed => RetryDisposition::Retryable,
        }
    }

    /// The underlying parse failure, whether raised directly or wrapped in a fetch error.
    pub fn parse_error(&self) -> Option<&ChartParseError> {
        match self {
            Self::ChartParseFailed(err)
            | Self::ChartFetchFailed {
                source: ChartFetchCause::Parse(err),
                ..
            } => Some(err),
            _ => None,
        }
    }

    pub fn transport_error(&self) -> Option<&TransportError> {
        match self {
            Self::PodcastSearchFailed { source }
            | Self::ChartFetchFailed {
                source: ChartFetchCause::Transport(source),
                ..
            } => Some(source),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_kind_maps_to_the_documented_disposition() {
        let status = TransportError::HttpStatus {
            status: 503,
            url: "https://example.test".to_string(),
        };
        let cases = [
            (ChartBackendError::not_found("none"), RetryDisposition::NonRetryable),
            (
                ChartBackendError::MultiplePodcastsFound { result_count: 3 },
                RetryDisposition::RetryWithDisambiguator,
            ),
            (
                ChartBackendError::PodcastSearchFailed {
                    source: status.clone(),
                },
                RetryDisposition::Retryable,
            ),
            (
                ChartBackendError::from(ChartParseError::NoHeadings),
                RetryDisposition::Retryable,
            ),
            (
                ChartBackendError::chart_fetch("apple", status),
                RetryDisposition::Retryable,
            ),
            (
                ChartBackendError::not_implemented("worldwide"),
                RetryDisposition::NonRetryable,
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(err.disposition(), expected, "{}", err.kind().as_str());
        }
    }

    #[test]
    fn wrapped_parse_failure_is_still_reachable() {
        let err = ChartBackendError::chart_fetch("apple", ChartParseError::MissingChartList);
        assert_eq!(err.kind(), ChartErrorKind::ChartFetchFailed);
        assert_eq!(err.parse_error(), Some(&ChartParseError::MissingChartList));
        assert_eq!(err.transport_error(), None);
    }

    #[test]
    fn search_failure_exposes_status() {
        let err = ChartBackendError::PodcastSearchFailed {
            source: TransportError::HttpStatus {
                status: 401,
                url: "https://itunes.apple.com/search".to_string(),
            },
        };
        assert_eq!(err.transport_error().and_then(TransportError::status), Some(401));
        assert!(err.to_string().contains("401"));
    }
}
