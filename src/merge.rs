// src/merge.rs
//
// Per-page parts of one ticker → one wide file, columns in page order.

use crate::{
    config::Settings,
    error::FormatError,
    extract::part_path,
    fetch::START_STEP,
    output::writable,
    table::{read_records_from_path, Table, DATE_HEADER},
    tickers,
};
use anyhow::{Context, Result};
use std::path::Path;
use tracing::{debug, info, instrument, warn};

#[derive(Debug, PartialEq, Eq)]
pub enum MergeOutcome {
    Written { parts: usize, periods: usize },
    NoInput,
}

/// Number of trailing empty header fields, i.e. the length of the header's
/// trailing delimiter run. Non-zero marks the terminal part.
fn suffix_len(header: &[String]) -> usize {
    header.iter().rev().take_while(|f| f.is_empty()).count()
}

/// Drop the terminal suffix from every row; each row must carry it.
fn strip_suffix(records: &mut [Vec<String>], k: usize) -> Result<(), FormatError> {
    for (i, row) in records.iter_mut().enumerate() {
        let n = row.len();
        if n <= k || row[n - k..].iter().any(|f| !f.is_empty()) {
            return Err(FormatError::MissingSuffix {
                row: i,
                suffix: "|".repeat(k),
            });
        }
        row.truncate(n - k);
    }
    Ok(())
}

fn check_header(records: &[Vec<String>]) -> Result<(), FormatError> {
    let header = records.first().ok_or(FormatError::Empty)?;
    if header.len() < 2 || header[0] != DATE_HEADER {
        return Err(FormatError::MissingDateHeader {
            expected: DATE_HEADER,
            found: header.join("|"),
        });
    }
    Ok(())
}

/// Append the value columns of `part` to `acc`, row by row.
fn append_part(acc: &mut [Vec<String>], part: Vec<Vec<String>>) -> Result<(), FormatError> {
    if part.len() != acc.len() {
        return Err(FormatError::RowCountMismatch {
            expected: acc.len(),
            found: part.len(),
        });
    }
    for (i, (out, row)) in acc.iter_mut().zip(part).enumerate() {
        if row.len() < 2 {
            return Err(FormatError::MissingDelimiter { row: i });
        }
        let mut fields = row.into_iter();
        let label = fields.next().unwrap_or_default();
        if !out[0].starts_with(&label) {
            return Err(FormatError::LabelMismatch {
                row: i,
                label,
                accumulated: out[0].clone(),
            });
        }
        out.extend(fields);
    }
    Ok(())
}

/// Merge `<ticker>-0.csv`, `<ticker>-5.csv`, ... from `ticker_dir` into
/// `output_path`, stopping at the first missing part.
#[instrument(level = "debug", skip(ticker_dir, output_path), fields(dir = %ticker_dir.display()))]
pub fn merge(ticker_dir: &Path, ticker: &str, output_path: &Path) -> Result<MergeOutcome> {
    let mut acc: Option<Vec<Vec<String>>> = None;
    let mut terminal = false;
    let mut parts = 0;
    let mut start = 0;

    loop {
        let path = part_path(ticker_dir, ticker, start);
        if !path.is_file() {
            break;
        }
        if terminal {
            return Err(FormatError::PartAfterTerminal(path.display().to_string()).into());
        }

        let mut records = read_records_from_path(&path)?;
        check_header(&records).with_context(|| format!("part {:?}", path))?;
        let k = suffix_len(&records[0]);
        if k > 0 {
            debug!(part = %path.display(), suffix = k, "terminal part");
            terminal = true;
            strip_suffix(&mut records, k).with_context(|| format!("part {:?}", path))?;
        }

        match acc.as_mut() {
            None => acc = Some(records),
            Some(acc) => {
                append_part(acc, records).with_context(|| format!("part {:?}", path))?
            }
        }
        parts += 1;
        start += START_STEP;
    }

    let records = match acc {
        Some(r) => r,
        None => {
            warn!("no input file in {}", ticker_dir.display());
            return Ok(MergeOutcome::NoInput);
        }
    };

    let table = Table::from_records(records)
        .with_context(|| format!("merged parts of {}", ticker))?;
    table.write(output_path)?;
    Ok(MergeOutcome::Written {
        parts,
        periods: table.periods.len(),
    })
}

/// The `merge` stage over a ticker list.
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
        let out = output_dir.join(format!("{}.csv", ticker));
        if !writable(&out, settings.overwrite) {
            return Ok(());
        }
        if let MergeOutcome::Written { parts, periods } = merge(&in_dir, ticker, &out)? {
            info!("{}: merged {} parts, {} periods", ticker, parts, periods);
        }
        Ok(())
    })
}
