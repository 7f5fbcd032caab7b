//! Chart page scraping: ranked podcast entries from a chart or genre webview.

use std::collections::HashSet;

use podcharts_core::{ChartParseError, ChartPositionData};
use scraper::{ElementRef, Html, Selector};
use tracing::error;

use crate::html::{first_text, selector};

const CHART_CONTAINER: &str = ".shelf-content";
const PRODUCT_LINK: &str = "a.product-lockup__link";
const PRODUCT_TITLE: &str = ".product-lockup__title";
const PODCAST_ID_MARKER: &str = "/id";

struct EntrySelectors {
    link: Selector,
    title: Selector,
}

/// Extract chart positions in document order.
///
/// Every `li` in the chart list consumes a position, so an entry that cannot
/// be parsed is logged and leaves a gap. A non-empty `filter` keeps only the
/// listed podcast ids, at their original positions.
pub fn extract_chart_positions(
    document: &Html,
    filter: &HashSet<&str>,
) -> Result<Vec<ChartPositionData>, ChartParseError> {
    let container = selector(CHART_CONTAINER)?;
    let list = selector("ul")?;
    let item = selector("li")?;
    let entry_selectors = EntrySelectors {
        link: selector(PRODUCT_LINK)?,
        title: selector(PRODUCT_TITLE)?,
    };

    let ul = document
        .select(&container)
        .next()
        .and_then(|shelf| shelf.select(&list).next())
        .ok_or(ChartParseError::MissingChartList)?;

    let mut results = Vec::new();
    for (position, element) in (1u32..).zip(ul.select(&item)) {
        let entry = match parse_entry(element, position, &entry_selectors) {
            Ok(entry) => entry,
            Err(reason) => {
                error!(position, reason, "could not parse podcast at chart position");
                continue;
            }
        };
        if filter.is_empty() || filter.contains(entry.podcast_id.as_str()) {
            results.push(entry);
        }
    }
    Ok(results)
}

fn parse_entry(
    element: ElementRef<'_>,
    position: u32,
    selectors: &EntrySelectors,
) -> Result<ChartPositionData, &'static str> {
    let link = element
        .select(&selectors.link)
        .next()
        .ok_or("missing product link")?;
    let href = link.value().attr("href").ok_or("product link has no href")?;
    let podcast_id = podcast_id_from_href(href).ok_or("product link has no podcast id")?;

    Ok(ChartPositionData {
        podcast_id: podcast_id.to_string(),
        position,
        podcast_title: first_text(element, &selectors.title),
        podcast_url: Some(href.to_string()),
    })
}

/// The text after the last `/id` in a podcast link.
pub fn podcast_id_from_href(href: &str) -> Option<&str> {
    href.rsplit_once(PODCAST_ID_MARKER)
        .map(|(_, id)| id)
        .filter(|id| !id.is_empty())
}
