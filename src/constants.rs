/// Site and output constants shared across the scraper.
/// Every value here can be overridden through `config.toml` unless noted.

// Source site
pub const LISTING_URL: &str = "https://bcaletrail.ca/breweries/";
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";
pub const MENU_MARKER: &str = "View All Beers";

/// Placeholder written in place of an absent field value.
pub const NOT_AVAILABLE: &str = "N/A";

// Every listing on the trail is in British Columbia; these are not parsed.
pub const STATE_PROVINCE: &str = "BC";
pub const COUNTRY: &str = "Canada";

// Output files
pub const OUTPUT_BASENAME: &str = "bc_breweries_complete";
pub const MENU_SUFFIX: &str = "_with_menus";
pub const ALLOW_LIST_PATH: &str = "features_to_keep.json";

// Pacing ranges in seconds
pub const SCRAPE_DELAY_SECS: (f64, f64) = (1.0, 3.0);
pub const ENRICH_DELAY_SECS: (f64, f64) = (1.0, 2.0);

/// Column order of the flat CSV export.
pub const CSV_COLUMNS: [&str; 11] = [
    "name",
    "city",
    "brewery_type",
    "url",
    "address",
    "postal_code",
    "state_province",
    "country",
    "phone",
    "website_url",
    "social_media",
];
pub const MENU_COLUMN: &str = "menu_url";
