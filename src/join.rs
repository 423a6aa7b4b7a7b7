// src/join.rs
//
// Prepared statements × monthly prices, on the dates both cover.
//
// A statement period `YYYY/MM` is the *end* of that month, while a price
// period is the *start* of its month; statement month `m` therefore lines up
// with price month `m + 1`.

use crate::{
    config::Settings,
    output::writable,
    period::{Period, PeriodSeq},
    table::{Row, Table},
    tickers,
};
use anyhow::{Context, Result};
use std::{collections::BTreeSet, collections::HashMap, path::Path};
use tracing::{info, warn};

pub const PRICE_PREFIX: &str = "price:";

/// Join `statements` with `prices`. Columns are the statement periods whose
/// following month has a price; price rows follow statement rows, labels
/// prefixed with [`PRICE_PREFIX`]. `None` when nothing overlaps.
pub fn join_tables(statements: &Table, prices: &Table) -> Result<Option<Table>> {
    statements.require_date_header()?;

    let price_col: HashMap<Period, usize> = prices
        .periods
        .iter()
        .enumerate()
        .map(|(i, p)| (*p, i))
        .collect();

    let mut periods = Vec::new();
    let mut pairs = Vec::new();
    for (i, p) in statements.periods.iter().enumerate() {
        if let Some(&j) = price_col.get(&p.next()) {
            periods.push(*p);
            pairs.push((i, j));
        }
    }
    if periods.is_empty() {
        return Ok(None);
    }

    let mut rows = Vec::with_capacity(statements.rows.len() + prices.rows.len());
    for row in &statements.rows {
        rows.push(Row {
            label: row.label.clone(),
            values: pairs.iter().map(|&(i, _)| row.values[i].clone()).collect(),
        });
    }
    for row in &prices.rows {
        rows.push(Row {
            label: format!("{}{}", PRICE_PREFIX, row.label),
            values: pairs.iter().map(|&(_, j)| row.values[j].clone()).collect(),
        });
    }

    Ok(Some(Table {
        label: statements.label.clone(),
        periods: PeriodSeq::new(periods)?,
        rows,
    }))
}

/// Join one ticker's files. Returns the number of joined periods; zero means
/// no overlap and no output.
pub fn join(prepared_path: &Path, price_path: &Path, output_path: &Path) -> Result<usize> {
    let statements = Table::read(prepared_path)?;
    let prices = Table::read(price_path)?;
    let joined = join_tables(&statements, &prices)
        .with_context(|| format!("joining {:?} with {:?}", prepared_path, price_path))?;
    match joined {
        Some(table) => {
            table.write(output_path)?;
            Ok(table.periods.len())
        }
        None => Ok(0),
    }
}

/// The `join` stage: tickers in the list, minus the bad ones, that have both
/// a prepared file and a price file.
pub fn run(
    ticker_list: &[String],
    input_dir: &Path,
    price_dir: &Path,
    output_dir: &Path,
    bad_ticker_file: Option<&Path>,
    settings: &Settings,
) -> Result<()> {
    let bad: BTreeSet<String> = tickers::load_set(bad_ticker_file)?;
    info!("excluding {} bad tickers", bad.len());

    tickers::each(ticker_list, |ticker| {
        if bad.contains(ticker) {
            info!("{} is a bad ticker, skipping", ticker);
            return Ok(());
        }
        let prepared = input_dir.join(format!("{}.csv", ticker));
        let price = price_dir.join(format!("{}.csv", ticker));
        for p in [&prepared, &price] {
            if !p.is_file() {
                warn!("{} does not exist, skipping", p.display());
                return Ok(());
            }
        }
        let output = output_dir.join(format!("{}.csv", ticker));
        if !writable(&output, settings.overwrite) {
            return Ok(());
        }
        match join(&prepared, &price, &output)? {
            0 => warn!("{}: no overlapping dates, skipping", ticker),
            n => info!("{}: joined {} periods", ticker, n),
        }
        Ok(())
    })
}
