pub mod enrich_use_case;
pub mod ports;
pub mod scrape_use_case;
