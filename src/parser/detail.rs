use once_cell::sync::Lazy;
use reqwest::Url;
use scraper::{Html, Selector};
use tracing::debug;

use super::{href_of, text_of};
use crate::normalize::{clean_phone_number, parse_address};
use crate::types::DetailInfo;

static ADDRESS: Lazy<Selector> = Lazy::new(|| Selector::parse(".address a").unwrap());
static PHONE: Lazy<Selector> = Lazy::new(|| Selector::parse(".tel a").unwrap());
static WEBSITE: Lazy<Selector> = Lazy::new(|| Selector::parse(".listing-links a").unwrap());
static SOCIAL: Lazy<Selector> = Lazy::new(|| Selector::parse(".list-social-item a").unwrap());
static SECTION_HEADER_LINK: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".section-header a").unwrap());

/// Address, phone, website and social links of a brewery page.
pub fn parse_detail(html: &str) -> DetailInfo {
    let document = Html::parse_document(html);
    let mut info = DetailInfo::default();

    if let Some(element) = document.select(&ADDRESS).next() {
        let parts = parse_address(&text_of(element));
        info.address = parts.address;
        info.postal_code = parts.postal_code;
    } else {
        debug!("No '.address a' element on detail page");
    }

    if let Some(element) = document.select(&PHONE).next() {
        info.phone = Some(clean_phone_number(&text_of(element)));
    }

    // Only the first outbound link counts, even when it lacks an href
    info.website_url = document
        .select(&WEBSITE)
        .next()
        .and_then(|a| a.value().attr("href"))
        .map(str::to_string);

    info.social_media = document
        .select(&SOCIAL)
        .filter_map(|a| a.value().attr("href"))
        .map(str::to_string)
        .collect();

    info
}

/// Link target of the first section-header anchor whose text contains
/// `marker`, resolved against `page_url`.
pub fn parse_menu_url(html: &str, page_url: &str, marker: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let base = Url::parse(page_url).ok();

    let anchor = document
        .select(&SECTION_HEADER_LINK)
        .find(|a| text_of(*a).contains(marker))?;
    href_of(anchor, base.as_ref())
}
