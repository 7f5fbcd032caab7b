//! Genre page scraping: find the chart ("room") a category links to.

use podcharts_core::{ChartIdReturnValue, ChartParseError};
use scraper::Html;

use crate::html::selector;

const HEADER_TEST_ID: &str = "header-title";

/// Read the chart id out of the "current category" header of a genre page.
///
/// Only the first `h2[data-testid="header-title"]` is considered. The chart id
/// is the last path segment of that header's first link.
pub fn extract_chart_id(document: &Html) -> Result<ChartIdReturnValue, ChartParseError> {
    let h2 = selector("h2")?;
    let anchor = selector("a")?;

    let mut headings = document.select(&h2).peekable();
    if headings.peek().is_none() {
        return Err(ChartParseError::NoHeadings);
    }
    let header = headings
        .find(|h| h.value().attr("data-testid") == Some(HEADER_TEST_ID))
        .ok_or(ChartParseError::HeaderNotFound)?;

    let link = header
        .select(&anchor)
        .next()
        .ok_or(ChartParseError::MissingHeaderLink)?;
    let href = link.value().attr("href").ok_or(ChartParseError::MissingHref)?;

    let chart_id = match href.rsplit_once('/') {
        Some((_, id)) if !id.is_empty() => id,
        _ => {
            return Err(ChartParseError::MalformedChartLink {
                href: href.to_string(),
            })
        }
    };

    Ok(ChartIdReturnValue {
        chart_id: chart_id.to_string(),
        unique_for_country: false,
        webview_url: Some(href.to_string()),
    })
}
