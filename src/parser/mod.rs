pub mod detail;
pub mod listing;

use reqwest::Url;
use scraper::ElementRef;

/// Trimmed text content of an element.
pub(crate) fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// `href` of an anchor, resolved against `base` when relative. Absolute
/// links are returned exactly as written; an empty target is no link.
pub(crate) fn href_of(element: ElementRef<'_>, base: Option<&Url>) -> Option<String> {
    let href = element.value().attr("href")?.trim();
    if href.is_empty() {
        return None;
    }
    if Url::parse(href).is_ok() {
        return Some(href.to_string());
    }
    match base.and_then(|b| b.join(href).ok()) {
        Some(resolved) => Some(resolved.to_string()),
        None => Some(href.to_string()),
    }
}
