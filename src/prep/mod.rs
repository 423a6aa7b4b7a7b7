// src/prep/mod.rs
//
// Merged files → dense monthly series of clean numbers.

pub mod calendar;

use crate::{
    config::Settings,
    error::FormatError,
    output::writable,
    table::{Row, Table},
    tickers,
};
use anyhow::{Context, Result};
use std::{collections::BTreeSet, path::Path};
use tracing::{debug, info, instrument, trace, warn};

pub use calendar::Calendar;

/// Line items a ticker must keep after cleaning to count as complete.
pub const REQUIRED_HEADERS: [&str; 14] = [
    "book value per share",
    "cash flow",
    "cash flow per share",
    "intangibles",
    "preferred dividends",
    "price/cash flow ratio",
    "return on stock equity (roe)",
    "total assets",
    "total debt/equity ratio",
    "total equity",
    "total common shares out",
    "total liabilities",
    "total net income",
    "total revenue",
];

/// Strip thousands separators and parse. Blank, textual and non-finite
/// values are rejected.
pub fn sanitize(value: &str) -> Option<f64> {
    let v = value.replace(',', "");
    v.trim().parse::<f64>().ok().filter(|f| f.is_finite())
}

/// Render a sanitized value; always keeps a decimal point or exponent.
pub fn format_value(v: f64) -> String {
    format!("{:?}", v)
}

#[derive(Debug)]
pub struct Prepared {
    pub table: Table,
    pub dropped: usize,
    /// Required line items absent from `table`.
    pub missing: Vec<&'static str>,
}

impl Prepared {
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Align a merged table onto a dense calendar and keep only fully numeric
/// rows, with lower-cased labels.
pub fn prepare(merged: &Table) -> Result<Prepared, FormatError> {
    merged.require_date_header()?;
    let calendar = Calendar::dense(&merged.periods)?;

    let mut rows = Vec::with_capacity(merged.rows.len());
    let mut seen = BTreeSet::new();
    let mut dropped = 0;
    for row in &merged.rows {
        let values: Option<Vec<String>> = calendar
            .columns()
            .iter()
            .map(|&c| sanitize(&row.values[c]).map(format_value))
            .collect();
        let values = match values {
            Some(v) => v,
            None => {
                trace!(label = %row.label, "dropping row with invalid value");
                dropped += 1;
                continue;
            }
        };
        let label = row.label.to_lowercase();
        seen.insert(label.clone());
        rows.push(Row { label, values });
    }

    let missing = REQUIRED_HEADERS
        .iter()
        .copied()
        .filter(|h| !seen.contains(*h))
        .collect();

    Ok(Prepared {
        table: Table {
            label: merged.label.clone(),
            periods: calendar.dates().clone(),
            rows,
        },
        dropped,
        missing,
    })
}

/// Prepare one merged file. Returns whether every required line item
/// survived; the output is written either way.
#[instrument(level = "debug", skip_all, fields(input = %input_path.display()))]
pub fn prep(input_path: &Path, output_path: &Path) -> Result<bool> {
    let merged = Table::read(input_path)?;
    let prepared = prepare(&merged).with_context(|| format!("preparing {:?}", input_path))?;
    debug!(
        kept = prepared.table.rows.len(),
        dropped = prepared.dropped,
        months = prepared.table.periods.len(),
        "prepared"
    );
    if !prepared.is_complete() {
        debug!(missing = ?prepared.missing, "required line items missing");
    }
    prepared.table.write(output_path)?;
    Ok(prepared.is_complete())
}

/// The `prep` stage over a ticker list. Returns the tickers found lacking
/// required line items; they are also added to `bad_ticker_file` if given,
/// keeping the tickers already listed there.
pub fn run(
    ticker_list: &[String],
    input_dir: &Path,
    output_dir: &Path,
    bad_ticker_file: Option<&Path>,
    settings: &Settings,
) -> Result<BTreeSet<String>> {
    let mut bad = BTreeSet::new();
    tickers::each(ticker_list, |ticker| {
        let input = input_dir.join(format!("{}.csv", ticker));
        if !input.is_file() {
            warn!("{} does not exist, skipping", input.display());
            return Ok(());
        }
        let output = output_dir.join(format!("{}.csv", ticker));
        if !writable(&output, settings.overwrite) {
            return Ok(());
        }
        if !prep(&input, &output)? {
            warn!("bad ticker: {}", ticker);
            bad.insert(ticker.to_string());
        }
        Ok(())
    })?;

    info!("{} bad tickers: {:?}", bad.len(), bad);
    if let Some(path) = bad_ticker_file {
        let known = tickers::load_set(Some(path))?;
        if !bad.is_subset(&known) || !path.exists() {
            let all: BTreeSet<String> = known.union(&bad).cloned().collect();
            tickers::write(path, &all)?;
        }
    }
    Ok(bad)
}
