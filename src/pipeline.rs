use std::path::PathBuf;
use tracing::{info, instrument};

use crate::app::enrich_use_case::EnrichUseCase;
use crate::app::ports::{PageFetcher, Pacer};
use crate::app::scrape_use_case::ScrapeUseCase;
use crate::config::Config;
use crate::constants::{CSV_COLUMNS, MENU_COLUMN};
use crate::error::Result;
use crate::normalize::FeatureFilter;
use crate::storage;
use crate::types::BreweryRecord;

/// Result of a complete pass, as reported on the console.
#[derive(Debug)]
pub struct PipelineResult {
    pub total_records: usize,
    pub fetches: usize,
    pub failures: usize,
    pub updated: usize,
    pub json_file: PathBuf,
    pub csv_file: PathBuf,
    pub xlsx_file: Option<PathBuf>,
}

pub struct Pipeline;

impl Pipeline {
    /// Main pass: scrape the directory and write `<basename>.json` / `.csv`.
    #[instrument(skip_all)]
    pub fn scrape(
        config: &Config,
        fetcher: Box<dyn PageFetcher>,
        pacer: Box<dyn Pacer>,
    ) -> Result<PipelineResult> {
        let features = FeatureFilter::load_or_empty(&config.features.allow_list_path);
        info!("Loaded {} allowed features", features.len());

        let mut use_case = ScrapeUseCase::new(fetcher, pacer, features, config.scraper.clone());
        let scraped = use_case.run()?;

        println!("\nScraping summary:");
        println!("Total breweries scraped: {}", scraped.records.len());
        println!("Columns in dataset: {}", CSV_COLUMNS.join(", "));

        let json_file = config.output.scrape_path("json");
        let csv_file = config.output.scrape_path("csv");
        storage::save_json(&json_file, &scraped.records)?;
        storage::save_csv(&csv_file, &scraped.records)?;
        let xlsx_file = write_xlsx(config, config.output.scrape_path("xlsx"), &scraped.records)?;

        Ok(PipelineResult {
            total_records: scraped.records.len(),
            fetches: scraped.detail_fetches,
            failures: scraped.detail_failures,
            updated: 0,
            json_file,
            csv_file,
            xlsx_file,
        })
    }

    /// Menu pass: read the main-pass JSON and write the enriched set under
    /// `<basename><menu_suffix>`. The input file is left untouched.
    #[instrument(skip_all)]
    pub fn enrich_menus(
        config: &Config,
        fetcher: Box<dyn PageFetcher>,
        pacer: Box<dyn Pacer>,
    ) -> Result<PipelineResult> {
        let input = config.output.scrape_path("json");
        let snapshot = storage::load_records(&input)?;

        let mut use_case = EnrichUseCase::new(fetcher, pacer, config.enrich.clone());
        let enriched = use_case.run(&snapshot);

        println!("\nUpdated {} breweries with menu URLs", enriched.updated);
        println!("Columns in dataset: {}, {}", CSV_COLUMNS.join(", "), MENU_COLUMN);

        let json_file = config.output.enriched_path("json");
        let csv_file = config.output.enriched_path("csv");
        storage::save_json(&json_file, &enriched.records)?;
        storage::save_csv(&csv_file, &enriched.records)?;
        let xlsx_file = write_xlsx(config, config.output.enriched_path("xlsx"), &enriched.records)?;

        Ok(PipelineResult {
            total_records: enriched.records.len(),
            fetches: enriched.menu_fetches,
            failures: 0,
            updated: enriched.updated,
            json_file,
            csv_file,
            xlsx_file,
        })
    }
}

fn write_xlsx(config: &Config, path: PathBuf, records: &[BreweryRecord]) -> Result<Option<PathBuf>> {
    if !config.output.xlsx {
        return Ok(None);
    }
    storage::save_xlsx(&path, records)?;
    Ok(Some(path))
}
