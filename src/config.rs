// src/config.rs

use anyhow::{anyhow, Result};
use chrono_tz::Tz;
use std::time::Duration;

pub const DEFAULT_TIMEZONE: &str = "US/Pacific";
pub const DEFAULT_SOURCE_URL: &str = "http://ih.advfn.com/p.php";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Startup configuration shared by every stage.
///
/// Built once from the command line and passed down explicitly; nothing in
/// the pipeline reads process-global settings.
#[derive(Clone, Debug)]
pub struct Settings {
    /// Zone log timestamps are rendered in.
    pub timezone: Tz,
    /// Replace outputs that already exist.
    pub overwrite: bool,
    pub verbose: bool,
}

impl Settings {
    pub fn new(timezone: &str, overwrite: bool, verbose: bool) -> Result<Self> {
        let timezone = timezone
            .parse::<Tz>()
            .map_err(|e| anyhow!("unknown timezone {:?}: {}", timezone, e))?;
        Ok(Self {
            timezone,
            overwrite,
            verbose,
        })
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            timezone: chrono_tz::US::Pacific,
            overwrite: false,
            verbose: false,
        }
    }
}

/// Where and how the fetcher requests pages.
#[derive(Clone, Debug)]
pub struct SourceConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_SOURCE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: format!("finscraper/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}
