use tracing::{info, instrument, warn};

use crate::app::ports::{PageFetcher, Pacer};
use crate::config::ScraperConfig;
use crate::error::{Result, ScraperError};
use crate::normalize::FeatureFilter;
use crate::parser::detail::parse_detail;
use crate::parser::listing::ListingParser;
use crate::types::{BreweryRecord, DetailInfo};

/// Outcome of the main pass.
#[derive(Debug)]
pub struct ScrapeResult {
    pub records: Vec<BreweryRecord>,
    pub detail_fetches: usize,
    pub detail_failures: usize,
}

/// Main pass: read the directory page, then visit each brewery's detail page
/// one at a time.
pub struct ScrapeUseCase {
    fetcher: Box<dyn PageFetcher>,
    pacer: Box<dyn Pacer>,
    features: FeatureFilter,
    settings: ScraperConfig,
}

impl ScrapeUseCase {
    pub fn new(
        fetcher: Box<dyn PageFetcher>,
        pacer: Box<dyn Pacer>,
        features: FeatureFilter,
        settings: ScraperConfig,
    ) -> Self {
        Self {
            fetcher,
            pacer,
            features,
            settings,
        }
    }

    /// Fails only when the listing page cannot be fetched or holds no cards.
    #[instrument(skip(self), fields(listing_url = %self.settings.listing_url))]
    pub fn run(&mut self) -> Result<ScrapeResult> {
        let listing_url = self.settings.listing_url.clone();
        info!("Fetching breweries list from {}", listing_url);
        let html = self.fetcher.fetch(&listing_url)?;

        let entries = ListingParser::new(&self.features, &listing_url).parse(&html, self.settings.limit);
        if entries.is_empty() {
            return Err(ScraperError::EmptyListing(listing_url));
        }
        let total = entries.len();
        info!("Found {} breweries to scrape", total);

        let mut records = Vec::with_capacity(total);
        let mut detail_fetches = 0;
        let mut detail_failures = 0;

        for (i, entry) in entries.into_iter().enumerate() {
            info!("Processing brewery {}/{}: {}", i + 1, total, entry.name);

            let detail = match entry.url.as_deref() {
                Some(url) => {
                    info!("Fetching detailed information from {}", url);
                    detail_fetches += 1;
                    let detail = match self.fetcher.fetch(url) {
                        Ok(page) => parse_detail(&page),
                        Err(e) => {
                            warn!("Failed to retrieve detail page for {}: {}", entry.name, e);
                            detail_failures += 1;
                            DetailInfo::default()
                        }
                    };
                    if i + 1 < total {
                        self.pacer
                            .pause(self.settings.delay_min_secs, self.settings.delay_max_secs);
                    }
                    detail
                }
                None => {
                    warn!("No detail link for {}; contact fields left empty", entry.name);
                    DetailInfo::default()
                }
            };

            records.push(BreweryRecord::from_parts(entry, detail));
        }

        info!("Successfully scraped {} breweries", records.len());
        Ok(ScrapeResult {
            records,
            detail_fetches,
            detail_failures,
        })
    }
}
