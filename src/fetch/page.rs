// src/fetch/page.rs
//
// Reading the first page of a ticker: is there data, and how many periods
// does the source hold for it.

use crate::error::FormatError;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};

pub const NO_DATA: &str = "No financial data available from this page.";

static SELECT: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"select[name="istart_date"]"#).expect("select selector"));
static OPTION: Lazy<Selector> = Lazy::new(|| Selector::parse("option").expect("option selector"));
static PERIOD_TEXT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*\d{4}/\d{2}\s*$").unwrap());

/// What the first page says about a ticker.
#[derive(Debug, PartialEq, Eq)]
pub enum PageInfo {
    /// The source explicitly has nothing for this ticker.
    NoData,
    /// No period selector on the page (unexpected markup).
    NoSelector,
    /// Number of periods on offer; page starts run `0, 5, ..` below it.
    Periods(u32),
}

/// Inspect a first page. Selector options must be numbered `0..N-1`; any
/// other numbering means the page layout changed and is fatal.
pub fn inspect(html: &str) -> Result<PageInfo, FormatError> {
    if html.contains(NO_DATA) {
        return Ok(PageInfo::NoData);
    }

    let doc = Html::parse_document(html);
    let select = match doc.select(&SELECT).next() {
        Some(s) => s,
        None => return Ok(PageInfo::NoSelector),
    };

    let mut values: Vec<u32> = select
        .select(&OPTION)
        .filter(|opt| PERIOD_TEXT.is_match(&opt.text().collect::<String>()))
        .filter_map(|opt| opt.value().attr("value"))
        .filter_map(|v| v.trim().parse().ok())
        .collect();
    values.sort_unstable();

    if values.is_empty() {
        return Err(FormatError::NoOptions);
    }
    if values.iter().enumerate().any(|(i, &v)| v as usize != i) {
        return Err(FormatError::NonContiguousOptions(values));
    }
    Ok(PageInfo::Periods(values.len() as u32))
}
