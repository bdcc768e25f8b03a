use crate::app::ports::PageFetcher;
use crate::error::{Result, ScraperError};
use crate::metrics;
use reqwest::blocking::Client;
use reqwest::header::USER_AGENT;
use reqwest::StatusCode;
use std::time::Instant;
use tracing::debug;

/// Blocking reqwest client sending a fixed browser user agent. No retries and
/// no cookies; the client default timeout applies.
pub struct ReqwestHttp {
    client: Client,
    user_agent: String,
}

impl ReqwestHttp {
    pub fn new(user_agent: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            user_agent: user_agent.into(),
        }
    }
}

impl PageFetcher for ReqwestHttp {
    fn fetch(&self, url: &str) -> Result<String> {
        let started = Instant::now();
        let resp = self
            .client
            .get(url)
            .header(USER_AGENT, &self.user_agent)
            .send()
            .map_err(|e| {
                metrics::fetch_failed("transport");
                ScraperError::Http(e)
            })?;

        let status = resp.status();
        if status != StatusCode::OK {
            metrics::fetch_failed("status");
            return Err(ScraperError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = resp.text()?;
        metrics::page_fetched(started.elapsed().as_secs_f64());
        debug!("Fetched {} ({} bytes)", url, body.len());
        Ok(body)
    }
}
