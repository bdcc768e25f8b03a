use once_cell::sync::Lazy;
use reqwest::Url;
use scraper::{Html, Selector};
use tracing::{debug, info};

use super::{href_of, text_of};
use crate::constants::NOT_AVAILABLE;
use crate::normalize::{split_features, FeatureFilter};
use crate::types::ListingEntry;

static CARD: Lazy<Selector> = Lazy::new(|| Selector::parse(".listing-item").unwrap());
static TITLE: Lazy<Selector> = Lazy::new(|| Selector::parse(".listing-title").unwrap());
static LOCATION: Lazy<Selector> = Lazy::new(|| Selector::parse(".location").unwrap());
static FEATURES: Lazy<Selector> = Lazy::new(|| Selector::parse(".features").unwrap());
static LINK: Lazy<Selector> = Lazy::new(|| Selector::parse("a").unwrap());

/// Extracts the brewery cards of the directory page.
pub struct ListingParser<'a> {
    features: &'a FeatureFilter,
    base_url: Option<Url>,
}

impl<'a> ListingParser<'a> {
    /// `page_url` is used to resolve relative card links.
    pub fn new(features: &'a FeatureFilter, page_url: &str) -> Self {
        Self {
            features,
            base_url: Url::parse(page_url).ok(),
        }
    }

    /// One entry per card in document order. A `limit` of `None` or zero keeps every card.
    pub fn parse(&self, html: &str, limit: Option<usize>) -> Vec<ListingEntry> {
        let document = Html::parse_document(html);
        let cards: Vec<_> = document.select(&CARD).collect();
        debug!("Found {} elements with selector '.listing-item'", cards.len());

        let take = match limit {
            Some(n) if n > 0 && n < cards.len() => {
                info!("Limiting scrape to {} breweries", n);
                n
            }
            _ => cards.len(),
        };

        cards
            .into_iter()
            .take(take)
            .map(|card| {
                let name = card
                    .select(&TITLE)
                    .next()
                    .map(text_of)
                    .unwrap_or_else(|| NOT_AVAILABLE.to_string());

                let city = card.select(&LOCATION).next().map(text_of);

                let brewery_type = card
                    .select(&FEATURES)
                    .next()
                    .map(|el| self.features.filter(&split_features(&text_of(el))))
                    .unwrap_or_default();

                let url = card
                    .select(&LINK)
                    .next()
                    .and_then(|a| href_of(a, self.base_url.as_ref()));

                ListingEntry {
                    name,
                    city,
                    brewery_type,
                    url,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html><body>
          <div class="listing-item">
            <a href="https://bcaletrail.ca/breweries/example-brewery/">
              <h3 class="listing-title"> Example Brewery </h3>
            </a>
            <span class="location">Vancouver</span>
            <div class="features">Brewery | Taproom | Bad Tag</div>
          </div>
          <div class="listing-item">
            <h3 class="listing-title">Relative Ales</h3>
            <a href="/breweries/relative-ales/">More</a>
          </div>
          <div class="listing-item">
            <span class="location">Nelson</span>
          </div>
        </body></html>
    "#;

    fn filter() -> FeatureFilter {
        FeatureFilter::new(["Brewery", "Taproom"])
    }

    #[test]
    fn extracts_card_fields() {
        let filter = filter();
        let entries = ListingParser::new(&filter, "https://bcaletrail.ca/breweries/").parse(PAGE, None);
        assert_eq!(entries.len(), 3);

        let first = &entries[0];
        assert_eq!(first.name, "Example Brewery");
        assert_eq!(first.city.as_deref(), Some("Vancouver"));
        assert_eq!(first.brewery_type, vec!["Brewery".to_string(), "Taproom".to_string()]);
        assert_eq!(
            first.url.as_deref(),
            Some("https://bcaletrail.ca/breweries/example-brewery/")
        );
    }

    #[test]
    fn missing_elements_default() {
        let filter = filter();
        let entries = ListingParser::new(&filter, "https://bcaletrail.ca/breweries/").parse(PAGE, None);

        let second = &entries[1];
        assert_eq!(second.city, None);
        assert!(second.brewery_type.is_empty());
        assert_eq!(
            second.url.as_deref(),
            Some("https://bcaletrail.ca/breweries/relative-ales/")
        );

        let third = &entries[2];
        assert_eq!(third.name, "N/A");
        assert_eq!(third.url, None);
    }

    #[test]
    fn limit_truncates_in_document_order() {
        let filter = filter();
        let parser = ListingParser::new(&filter, "https://bcaletrail.ca/breweries/");

        let limited = parser.parse(PAGE, Some(1));
        assert_eq!(limited.len(), 1);
        assert_eq!(limited[0].name, "Example Brewery");

        assert_eq!(parser.parse(PAGE, Some(0)).len(), 3);
        assert_eq!(parser.parse(PAGE, Some(10)).len(), 3);
    }

    #[test]
    fn empty_href_is_no_link() {
        let filter = filter();
        let html = r#"
            <div class="listing-item">
              <a href=""><h3 class="listing-title">Blank Link</h3></a>
            </div>
            <div class="listing-item">
              <a href="   "><h3 class="listing-title">Spaces Link</h3></a>
            </div>
        "#;
        let entries = ListingParser::new(&filter, "https://bcaletrail.ca/breweries/").parse(html, None);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].url, None);
        assert_eq!(entries[1].url, None);
    }

    #[test]
    fn page_without_cards_is_empty() {
        let filter = filter();
        let entries = ListingParser::new(&filter, "not a url").parse("<html><body><p>Moved</p></body></html>", None);
        assert!(entries.is_empty());
    }
}
