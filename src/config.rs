use reqwest::Url;
use serde::Deserialize;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::constants;
use crate::error::{Result, ScraperError};

pub const CONFIG_ENV_VAR: &str = "BREWERY_SCRAPER_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub scraper: ScraperConfig,
    pub enrich: EnrichConfig,
    pub output: OutputConfig,
    pub features: FeaturesConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    pub listing_url: String,
    pub user_agent: String,
    pub limit: Option<usize>,
    pub delay_min_secs: f64,
    pub delay_max_secs: f64,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            listing_url: constants::LISTING_URL.to_string(),
            user_agent: constants::USER_AGENT.to_string(),
            limit: None,
            delay_min_secs: constants::SCRAPE_DELAY_SECS.0,
            delay_max_secs: constants::SCRAPE_DELAY_SECS.1,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EnrichConfig {
    pub delay_min_secs: f64,
    pub delay_max_secs: f64,
    pub menu_marker: String,
}

impl Default for EnrichConfig {
    fn default() -> Self {
        Self {
            delay_min_secs: constants::ENRICH_DELAY_SECS.0,
            delay_max_secs: constants::ENRICH_DELAY_SECS.1,
            menu_marker: constants::MENU_MARKER.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub dir: PathBuf,
    pub basename: String,
    pub menu_suffix: String,
    /// Also write an `.xlsx` workbook next to the JSON and CSV files.
    pub xlsx: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            basename: constants::OUTPUT_BASENAME.to_string(),
            menu_suffix: constants::MENU_SUFFIX.to_string(),
            xlsx: false,
        }
    }
}

impl OutputConfig {
    /// Path of the main-pass output with the given extension.
    pub fn scrape_path(&self, ext: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", self.basename, ext))
    }

    /// Path of the menu-enriched output with the given extension.
    pub fn enriched_path(&self, ext: &str) -> PathBuf {
        self.dir
            .join(format!("{}{}.{}", self.basename, self.menu_suffix, ext))
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FeaturesConfig {
    pub allow_list_path: PathBuf,
}

impl Default for FeaturesConfig {
    fn default() -> Self {
        Self {
            allow_list_path: PathBuf::from(constants::ALLOW_LIST_PATH),
        }
    }
}

impl Config {
    /// Load from `$BREWERY_SCRAPER_CONFIG`, falling back to `config.toml`.
    pub fn load() -> Result<Self> {
        let path = std::env::var(CONFIG_ENV_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load_from(path)
    }

    /// A missing file yields the defaults; an unreadable or malformed one is an error.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("No config file at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(ScraperError::Config(format!(
                    "Failed to read config file '{}': {}",
                    path.display(),
                    e
                )))
            }
        };

        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        Url::parse(&self.scraper.listing_url)
            .map_err(|e| ScraperError::InvalidUrl(format!("{}: {}", self.scraper.listing_url, e)))?;
        check_range("scraper", self.scraper.delay_min_secs, self.scraper.delay_max_secs)?;
        check_range("enrich", self.enrich.delay_min_secs, self.enrich.delay_max_secs)?;
        if self.enrich.menu_marker.trim().is_empty() {
            return Err(ScraperError::Config("enrich.menu_marker must not be empty".into()));
        }
        Ok(())
    }
}

fn check_range(section: &str, min: f64, max: f64) -> Result<()> {
    if !(min >= 0.0 && max >= min) {
        return Err(ScraperError::Config(format!(
            "{section}: delay range {min}..{max} is invalid"
        )));
    }
    Ok(())
}
