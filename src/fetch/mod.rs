// src/fetch/mod.rs

pub mod page;
pub mod source;

use crate::{
    config::Settings,
    output::{remove_if_exists, write_atomic},
    tickers,
};
use anyhow::{bail, Context, Result};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info, instrument, warn};

pub use page::{inspect, PageInfo};
pub use source::{HttpSource, PageSource};

/// Periods per page; consecutive page starts differ by this much.
pub const START_STEP: u32 = 5;

pub fn page_path(dir: &Path, ticker: &str, start: u32) -> PathBuf {
    dir.join(format!("{}-{}.html", ticker, start))
}

/// Fetch one page of `ticker` into `dir`.
///
/// An existing page is kept unless `overwrite`. On a failed fetch any stale
/// page is removed and `None` is returned.
pub fn download<S: PageSource + ?Sized>(
    source: &S,
    ticker: &str,
    start: u32,
    dir: &Path,
    overwrite: bool,
) -> Result<Option<PathBuf>> {
    let path = page_path(dir, ticker, start);
    if path.is_file() && !overwrite {
        warn!(path = %path.display(), "file exists and not overwritable");
        return Ok(Some(path));
    }

    match source.fetch_page(ticker, start) {
        Ok(body) => {
            write_atomic(&path, &body)?;
            debug!(path = %path.display(), bytes = body.len(), "saved page");
            Ok(Some(path))
        }
        Err(e) => {
            warn!(ticker, start, error = %e, "download failed");
            remove_if_exists(&path)?;
            Ok(None)
        }
    }
}

/// Read a downloaded first page and return the ticker's period count.
///
/// Pages without data (or without the period selector) are removed and
/// count as zero.
pub fn page_count(path: &Path) -> Result<u32> {
    let bytes = fs::read(path).with_context(|| format!("reading {:?}", path))?;
    let html = String::from_utf8_lossy(&bytes);
    let info = inspect(&html).with_context(|| format!("inspecting {:?}", path))?;
    match info {
        PageInfo::Periods(n) => Ok(n),
        PageInfo::NoData => {
            warn!(path = %path.display(), "file contains {:?}", page::NO_DATA);
            remove_if_exists(path)?;
            Ok(0)
        }
        PageInfo::NoSelector => {
            warn!(path = %path.display(), "file has no period selector");
            remove_if_exists(path)?;
            Ok(0)
        }
    }
}

/// Download every page of one ticker into `<output_dir>/<ticker>/`.
/// Returns the number of pages on disk afterwards.
#[instrument(level = "debug", skip(source, output_dir, settings))]
pub fn fetch_ticker<S: PageSource + ?Sized>(
    source: &S,
    ticker: &str,
    output_dir: &Path,
    settings: &Settings,
) -> Result<usize> {
    let dir = output_dir.join(ticker);
    if dir.is_dir() {
        warn!(dir = %dir.display(), "output dir exists");
    } else {
        fs::create_dir_all(&dir).with_context(|| format!("creating {:?}", dir))?;
    }

    let first = match download(source, ticker, 0, &dir, settings.overwrite)? {
        Some(p) => p,
        None => bail!("first page of {} could not be downloaded", ticker),
    };
    let count = page_count(&first)?;
    info!("{}: {} periods of financial data", ticker, count);
    if count == 0 {
        return Ok(0);
    }

    let mut pages = 1;
    for start in (START_STEP..count).step_by(START_STEP as usize) {
        info!("downloading {}:{}", ticker, start);
        if download(source, ticker, start, &dir, settings.overwrite)?.is_none() {
            bail!("page {} of {} could not be downloaded", start, ticker);
        }
        pages += 1;
    }
    Ok(pages)
}

/// The `download` stage over a ticker list.
pub fn run<S: PageSource + ?Sized>(
    source: &S,
    ticker_list: &[String],
    output_dir: &Path,
    settings: &Settings,
) -> Result<()> {
    fs::create_dir_all(output_dir).with_context(|| format!("creating {:?}", output_dir))?;
    tickers::each(ticker_list, |ticker| {
        fetch_ticker(source, ticker, output_dir, settings).map(|_| ())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::FormatError, logging::init_test_logging};
    use anyhow::anyhow;
    use std::{cell::RefCell, collections::HashMap};
    use tempfile::tempdir;

    /// Serves canned pages and remembers what was asked for.
    #[derive(Default)]
    struct FakeSource {
        pages: HashMap<(String, u32), String>,
        requests: RefCell<Vec<(String, u32)>>,
    }

    impl FakeSource {
        fn with(mut self, ticker: &str, start: u32, body: &str) -> Self {
            self.pages.insert((ticker.into(), start), body.into());
            self
        }
    }

    impl PageSource for FakeSource {
        fn fetch_page(&self, ticker: &str, start: u32) -> Result<Vec<u8>> {
            self.requests.borrow_mut().push((ticker.into(), start));
            self.pages
                .get(&(ticker.to_string(), start))
                .map(|b| b.clone().into_bytes())
                .ok_or_else(|| anyhow!("404"))
        }
    }

    fn first_page(periods: u32) -> String {
        let options: String = (0..periods)
            .map(|i| format!("<option value='{}'>20{:02}/12</option>", i, i))
            .collect();
        format!(
            "<html><body><select id='istart_dateid' name='istart_date'>{}</select></body></html>",
            options
        )
    }

    #[test]
    fn test_fetches_all_page_starts() -> Result<()> {
        init_test_logging();
        let tmp = tempdir()?;
        let source = FakeSource::default()
            .with("ACME", 0, &first_page(12))
            .with("ACME", 5, "page5")
            .with("ACME", 10, "page10");

        let pages = fetch_ticker(&source, "ACME", tmp.path(), &Settings::default())?;
        assert_eq!(pages, 3);
        let dir = tmp.path().join("ACME");
        assert_eq!(fs::read_to_string(dir.join("ACME-10.html"))?, "page10");
        let starts: Vec<u32> = source.requests.borrow().iter().map(|r| r.1).collect();
        assert_eq!(starts, vec![0, 5, 10]);
        Ok(())
    }

    #[test]
    fn test_rerun_without_overwrite_fetches_nothing() -> Result<()> {
        let tmp = tempdir()?;
        let source = FakeSource::default()
            .with("ACME", 0, &first_page(7))
            .with("ACME", 5, "page5");
        fetch_ticker(&source, "ACME", tmp.path(), &Settings::default())?;
        let before = fs::read(tmp.path().join("ACME/ACME-5.html"))?;

        let again = FakeSource::default();
        fetch_ticker(&again, "ACME", tmp.path(), &Settings::default())?;
        assert!(again.requests.borrow().is_empty());
        assert_eq!(fs::read(tmp.path().join("ACME/ACME-5.html"))?, before);
        Ok(())
    }

    #[test]
    fn test_failed_overwrite_removes_stale_page() -> Result<()> {
        let tmp = tempdir()?;
        let stale = page_path(tmp.path(), "ACME", 0);
        fs::write(&stale, "old")?;
        let got = download(&FakeSource::default(), "ACME", 0, tmp.path(), true)?;
        assert_eq!(got, None);
        assert!(!stale.exists());
        Ok(())
    }

    #[test]
    fn test_no_data_ticker_is_skipped() -> Result<()> {
        let tmp = tempdir()?;
        let body = format!("<html><body>{}</body></html>", page::NO_DATA);
        let source = FakeSource::default().with("NONE", 0, &body);
        let pages = fetch_ticker(&source, "NONE", tmp.path(), &Settings::default())?;
        assert_eq!(pages, 0);
        assert!(!page_path(&tmp.path().join("NONE"), "NONE", 0).exists());
        Ok(())
    }

    #[test]
    fn test_missing_later_page_aborts() -> Result<()> {
        let tmp = tempdir()?;
        let source = FakeSource::default().with("ACME", 0, &first_page(6));
        assert!(fetch_ticker(&source, "ACME", tmp.path(), &Settings::default()).is_err());
        Ok(())
    }

    #[test]
    fn test_bad_selector_numbering_is_a_format_error() -> Result<()> {
        let tmp = tempdir()?;
        let body = "<html><body><select name='istart_date'>\
                    <option value='1'>2001/12</option></select></body></html>";
        let source = FakeSource::default().with("ACME", 0, body);
        let err = fetch_ticker(&source, "ACME", tmp.path(), &Settings::default()).unwrap_err();
        assert_eq!(
            err.downcast_ref::<FormatError>(),
            Some(&FormatError::NonContiguousOptions(vec![1]))
        );
        Ok(())
    }

    #[test]
    fn test_page_count_tolerates_non_utf8_bytes() -> Result<()> {
        let tmp = tempdir()?;
        let path = page_path(tmp.path(), "ACME", 0);
        let mut body = b"<html><body><select name='istart_date'>\
                         <option value='0'>2001/12</option></select>"
            .to_vec();
        body.extend_from_slice(b"<p>\xa9 2002</p></body></html>");
        fs::write(&path, body)?;

        assert_eq!(page_count(&path)?, 1);
        assert!(path.is_file());
        Ok(())
    }
}
