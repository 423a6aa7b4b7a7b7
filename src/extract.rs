// src/extract.rs
//
// Raw statement pages → pipe-delimited parts.

use crate::{
    config::Settings,
    fetch::{page_path, START_STEP},
    output::writable,
    table::{write_records, DATE_HEADER},
    tickers,
};
use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info, warn};

static TABLE: Lazy<Selector> = Lazy::new(|| Selector::parse("table").expect("table selector"));
static ROW: Lazy<Selector> = Lazy::new(|| Selector::parse("tr").expect("tr selector"));
static CELL: Lazy<Selector> = Lazy::new(|| Selector::parse("td, th").expect("cell selector"));

pub fn part_path(dir: &Path, ticker: &str, start: u32) -> PathBuf {
    dir.join(format!("{}-{}.csv", ticker, start))
}

/// Collapse runs of whitespace (including `&nbsp;`) to one space, trim, and
/// keep the delimiter out of the field.
pub fn clean_cell(raw: &str) -> String {
    raw.split(|c: char| c.is_whitespace() || c == '\u{a0}' || c == '|')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn cells(row: ElementRef<'_>) -> Vec<String> {
    row.select(&CELL)
        .map(|c| clean_cell(&c.text().collect::<String>()))
        .collect()
}

fn is_date_header(label: &str) -> bool {
    label.eq_ignore_ascii_case(DATE_HEADER)
}

/// Pull the statement table out of a page. The last table in document order
/// holding a `quarter end date` row (the innermost, when layout tables wrap
/// it) is the statement; rows as wide as that header become records, others
/// are layout noise.
///
/// Returns `None` when the page has no statement table.
pub fn extract_page(html: &str) -> Option<Vec<Vec<String>>> {
    let doc = Html::parse_document(html);

    let table = doc
        .select(&TABLE)
        .filter(|t| {
            t.select(&ROW)
                .any(|r| cells(r).first().map_or(false, |l| is_date_header(l)))
        })
        .last()?;

    let mut records: Vec<Vec<String>> = Vec::new();
    let mut width = None;
    for row in table.select(&ROW) {
        let mut fields = cells(row);
        let label = match fields.first() {
            Some(l) if !l.is_empty() => l.clone(),
            _ => continue,
        };
        if is_date_header(&label) {
            if width.is_some() {
                continue;
            }
            fields[0] = DATE_HEADER.to_string();
            width = Some(fields.len());
            records.push(fields);
        } else if width == Some(fields.len()) {
            records.push(fields);
        }
    }
    Some(records)
}

/// Convert every downloaded page of one ticker. Returns the number of parts
/// written.
pub fn extract_ticker(
    input_dir: &Path,
    output_dir: &Path,
    ticker: &str,
    settings: &Settings,
) -> Result<usize> {
    let mut written = 0;
    let mut start = 0;
    loop {
        let page = page_path(input_dir, ticker, start);
        if !page.is_file() {
            break;
        }
        let out = part_path(output_dir, ticker, start);
        start += START_STEP;
        if !writable(&out, settings.overwrite) {
            continue;
        }

        let bytes = fs::read(&page).with_context(|| format!("reading {:?}", page))?;
        let html = String::from_utf8_lossy(&bytes);
        match extract_page(&html) {
            Some(records) => {
                debug!(page = %page.display(), rows = records.len(), "extracted");
                write_records(&out, records)?;
                written += 1;
            }
            None => warn!(page = %page.display(), "no statement table, skipping"),
        }
    }
    Ok(written)
}

/// The `extract` stage over a ticker list.
pub fn run(
    ticker_list: &[String],
    input_dir: &Path,
    output_dir: &Path,
    settings: &Settings,
) -> Result<()> {
    tickers::each(ticker_list, |ticker| {
        let in_dir = input_dir.join(ticker);
        if !in_dir.is_dir() {
            warn!("{} does not exist, skipping", in_dir.display());
            return Ok(());
        }
        let n = extract_ticker(&in_dir, &output_dir.join(ticker), ticker, settings)?;
        info!("{}: {} parts written", ticker, n);
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::read_records_from_path;
    use tempfile::tempdir;

    const PAGE: &str = r#"<html><body>
<table><tr><td>
  <table>
    <tr><td colspan=3>Quarterly Report</td></tr>
    <tr><td>quarter end date</td><td>2001/12</td><td>2002/03</td></tr>
    <tr><td>Total&nbsp;Revenue</td><td> 1,234 </td><td>1,300</td></tr>
    <tr><td></td><td></td><td></td></tr>
    <tr><td>Quarter End Date</td><td>2001/12</td><td>2002/03</td></tr>
    <tr><td>Total  Assets</td><td>10</td><td></td></tr>
  </table>
</td></tr></table>
</body></html>"#;

    #[test]
    fn test_clean_cell() {
        assert_eq!(clean_cell("  Total\u{a0}\n Revenue "), "Total Revenue");
        assert_eq!(clean_cell("a|b"), "a b");
        assert_eq!(clean_cell("   "), "");
    }

    #[test]
    fn test_extract_statement_rows() {
        let records = extract_page(PAGE).unwrap();
        assert_eq!(
            records,
            vec![
                vec!["quarter end date", "2001/12", "2002/03"],
                vec!["Total Revenue", "1,234", "1,300"],
                vec!["Total Assets", "10", ""],
            ]
        );
    }

    #[test]
    fn test_later_sibling_statement_table_wins() {
        let html = "<html><body>\
            <table><tr><td>quarter end date</td><td>2001/12</td></tr>\
            <tr><td>Summary</td><td>1</td></tr></table>\
            <table><tr><td>quarter end date</td><td>2002/03</td></tr>\
            <tr><td>Total Revenue</td><td>2</td></tr></table>\
            </body></html>";
        assert_eq!(
            extract_page(html).unwrap(),
            vec![
                vec!["quarter end date", "2002/03"],
                vec!["Total Revenue", "2"],
            ]
        );
    }

    #[test]
    fn test_page_without_statement() {
        let html = "<html><body><table><tr><td>x</td></tr></table></body></html>";
        assert_eq!(extract_page(html), None);
    }

    #[test]
    fn test_extract_ticker_writes_parts() -> Result<()> {
        let tmp = tempdir()?;
        let pages = tmp.path().join("pages");
        let parts = tmp.path().join("parts");
        fs::create_dir_all(&pages)?;
        fs::write(pages.join("ACME-0.html"), PAGE)?;
        fs::write(pages.join("ACME-5.html"), "<html></html>")?;

        let n = extract_ticker(&pages, &parts, "ACME", &Settings::default())?;
        assert_eq!(n, 1);
        let records = read_records_from_path(&part_path(&parts, "ACME", 0))?;
        assert_eq!(records[2], vec!["Total Assets", "10", ""]);
        assert!(!part_path(&parts, "ACME", 5).exists());
        Ok(())
    }
}
