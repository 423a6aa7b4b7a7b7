// src/fetch/source.rs

use crate::config::SourceConfig;
use anyhow::{Context, Result};
use reqwest::blocking::Client;
use tracing::debug;
use url::Url;

/// Something that can produce the body of one statement page.
pub trait PageSource {
    fn fetch_page(&self, ticker: &str, start: u32) -> Result<Vec<u8>>;
}

/// Quarterly-report pages over HTTP.
pub struct HttpSource {
    client: Client,
    base: Url,
}

impl HttpSource {
    pub fn new(config: &SourceConfig) -> Result<Self> {
        let base = Url::parse(&config.base_url)
            .with_context(|| format!("parsing source URL {}", config.base_url))?;
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout)
            .build()
            .context("building HTTP client")?;
        Ok(Self { client, base })
    }

    pub fn page_url(&self, ticker: &str, start: u32) -> Url {
        let mut url = self.base.clone();
        url.query_pairs_mut()
            .append_pair("pid", "financials")
            .append_pair("mode", "quarterly_reports")
            .append_pair("symbol", ticker)
            .append_pair("istart_date", &start.to_string());
        url
    }
}

impl PageSource for HttpSource {
    fn fetch_page(&self, ticker: &str, start: u32) -> Result<Vec<u8>> {
        let url = self.page_url(ticker, start);
        debug!(%url, "GET");
        let bytes = self
            .client
            .get(url.clone())
            .send()
            .with_context(|| format!("GET {} failed", url))?
            .error_for_status()
            .with_context(|| format!("Non-success status {}", url))?
            .bytes()
            .with_context(|| format!("Reading body from {}", url))?;
        Ok(bytes.to_vec())
    }
}
