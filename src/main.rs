use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{error, info};

use bc_brewery_scraper::config::Config;
use bc_brewery_scraper::infra::http_client::ReqwestHttp;
use bc_brewery_scraper::infra::pacer::RandomDelay;
use bc_brewery_scraper::pipeline::{Pipeline, PipelineResult};
use bc_brewery_scraper::{logging, metrics};

#[derive(Parser)]
#[command(name = "bc_brewery_scraper")]
#[command(about = "BC Ale Trail brewery directory scraper")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to the TOML config (default: $BREWERY_SCRAPER_CONFIG or config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Also write an .xlsx workbook next to the JSON and CSV output
    #[arg(long, global = true)]
    xlsx: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape the listing and every detail page, writing JSON and CSV
    Scrape {
        /// Only scrape the first N breweries
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
    /// Add menu links to a previous scrape, writing a new JSON and CSV
    EnrichMenus,
    /// Run scrape then enrich-menus
    Run {
        /// Only scrape the first N breweries
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
}

fn report(label: &str, result: &PipelineResult) {
    println!("\n📊 {} results:", label);
    println!("   Records: {}", result.total_records);
    println!("   Page fetches: {}", result.fetches);
    if result.failures > 0 {
        println!("   Failed fetches: {}", result.failures);
    }
    if result.updated > 0 {
        println!("   Menu lookups: {}", result.updated);
    }
    println!("   JSON: {}", result.json_file.display());
    println!("   CSV: {}", result.csv_file.display());
    if let Some(xlsx) = &result.xlsx_file {
        println!("   XLSX: {}", xlsx.display());
    }
}

fn run_scrape(config: &Config) -> anyhow::Result<()> {
    println!("🍺 Starting BC Ale Trail brewery scraper...");
    let fetcher = Box::new(ReqwestHttp::new(config.scraper.user_agent.clone()));
    let result = Pipeline::scrape(config, fetcher, Box::new(RandomDelay))
        .inspect_err(|e| error!("Scrape failed: {}", e))?;
    report("Scrape", &result);
    Ok(())
}

fn run_enrich(config: &Config) -> anyhow::Result<()> {
    println!("🔗 Starting menu URL update for BC breweries...");
    let fetcher = Box::new(ReqwestHttp::new(config.scraper.user_agent.clone()));
    let result = Pipeline::enrich_menus(config, fetcher, Box::new(RandomDelay))
        .inspect_err(|e| error!("Menu update failed: {}", e))?;
    report("Menu update", &result);
    Ok(())
}

fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    logging::init_logging();
    metrics::init_metrics();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
    .context("failed to load configuration")?;
    if cli.xlsx {
        config.output.xlsx = true;
    }

    match cli.command {
        Commands::Scrape { limit } => {
            if limit.is_some() {
                config.scraper.limit = limit;
            }
            run_scrape(&config)?;
        }
        Commands::EnrichMenus => {
            run_enrich(&config)?;
        }
        Commands::Run { limit } => {
            if limit.is_some() {
                config.scraper.limit = limit;
            }
            println!("\n📥 Step 1: Scraping directory...");
            run_scrape(&config)?;
            println!("\n🔗 Step 2: Adding menu links...");
            run_enrich(&config)?;
        }
    }

    info!("Scraping completed");
    println!("✅ Done");
    Ok(())
}
