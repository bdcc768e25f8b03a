use std::collections::HashMap;
use tracing::{info, instrument, warn};

use crate::app::ports::{PageFetcher, Pacer};
use crate::config::EnrichConfig;
use crate::parser::detail::parse_menu_url;
use crate::types::{BreweryRecord, MenuUrl};

/// Outcome of the menu pass. `records` has the same length and order as the
/// input snapshot.
#[derive(Debug)]
pub struct EnrichResult {
    pub records: Vec<BreweryRecord>,
    pub menu_fetches: usize,
    pub updated: usize,
}

/// Menu pass: attach a `menu_url` to every record of a previous run that
/// does not have one yet.
pub struct EnrichUseCase {
    fetcher: Box<dyn PageFetcher>,
    pacer: Box<dyn Pacer>,
    settings: EnrichConfig,
}

impl EnrichUseCase {
    pub fn new(fetcher: Box<dyn PageFetcher>, pacer: Box<dyn Pacer>, settings: EnrichConfig) -> Self {
        Self {
            fetcher,
            pacer,
            settings,
        }
    }

    /// Look up menus for `snapshot` and return a new record set. The snapshot
    /// itself is never modified.
    #[instrument(skip_all, fields(records = snapshot.len()))]
    pub fn run(&mut self, snapshot: &[BreweryRecord]) -> EnrichResult {
        let pending: Vec<&BreweryRecord> = snapshot.iter().filter(|r| !r.has_menu_url()).collect();
        info!("Need to update {} breweries with menu URLs", pending.len());

        let mut menus: HashMap<String, MenuUrl> = HashMap::new();
        let mut menu_fetches = 0;

        for (i, record) in pending.iter().enumerate() {
            if record.name.is_empty() {
                warn!("Brewery at index {} has no name, skipping", i);
                continue;
            }
            if menus.contains_key(&record.name) {
                warn!("Duplicate brewery name '{}'; reusing the first lookup", record.name);
                continue;
            }

            let menu = match record.url.as_deref() {
                Some(url) => {
                    info!("Processing brewery {}/{}: {}", i + 1, pending.len(), record.name);
                    menu_fetches += 1;
                    let menu = self.fetch_menu(url);
                    if i + 1 < pending.len() {
                        self.pacer
                            .pause(self.settings.delay_min_secs, self.settings.delay_max_secs);
                    }
                    menu
                }
                None => MenuUrl::NotFound,
            };
            menus.insert(record.name.clone(), menu);
        }

        let records = apply_menu_urls(snapshot, &menus);
        let updated = menu_fetches;
        info!("Updated {} breweries with menu URLs", updated);

        EnrichResult {
            records,
            menu_fetches,
            updated,
        }
    }

    fn fetch_menu(&self, url: &str) -> MenuUrl {
        info!("Fetching menu URL from {}", url);
        match self.fetcher.fetch(url) {
            Ok(page) => match parse_menu_url(&page, url, &self.settings.menu_marker) {
                Some(menu) => {
                    info!("Found menu URL: {}", menu);
                    MenuUrl::Found(menu)
                }
                None => {
                    info!("No menu URL found");
                    MenuUrl::NotFound
                }
            },
            Err(e) => {
                warn!("Error extracting menu URL from {}: {}", url, e);
                MenuUrl::NotFound
            }
        }
    }
}

/// Build the next record set: records that already have a menu field are
/// copied as-is, the rest take the menu found for their name, if any.
/// Unnamed records are never looked up and get `MenuUrl::NotFound`.
pub fn apply_menu_urls(
    snapshot: &[BreweryRecord],
    menus: &HashMap<String, MenuUrl>,
) -> Vec<BreweryRecord> {
    snapshot
        .iter()
        .map(|record| {
            if record.has_menu_url() {
                return record.clone();
            }
            match menus.get(&record.name) {
                Some(menu) => record.with_menu_url(menu.clone()),
                None if record.name.is_empty() => record.with_menu_url(MenuUrl::NotFound),
                None => record.clone(),
            }
        })
        .collect()
}
