use podcharts_core::ChartParseError;
use scraper::{ElementRef, Selector};

pub(crate) fn selector(css: &str) -> Result<Selector, ChartParseError> {
    Selector::parse(css).map_err(|e| ChartParseError::InvalidSelector {
        selector: css.to_string(),
        message: e.to_string(),
    })
}

pub(crate) fn text_or_none(value: String) -> Option<String> {
    let trimmed = value.trim().to_string();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

pub(crate) fn first_text(element: ElementRef<'_>, sel: &Selector) -> Option<String> {
    element
        .select(sel)
        .next()
        .and_then(|n| text_or_none(n.text().collect::<String>()))
}
