// src/tickers.rs

use crate::output::write_atomic;
use anyhow::{Context, Result};
use std::{collections::BTreeSet, fs, path::Path};
use tracing::info;

/// Tickers are listed one per line; blank lines are ignored.
pub fn parse(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn load(path: &Path) -> Result<Vec<String>> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("reading ticker file {:?}", path))?;
    Ok(parse(&contents))
}

/// Load a ticker set; an absent file is an empty set.
pub fn load_set(path: Option<&Path>) -> Result<BTreeSet<String>> {
    match path {
        Some(p) if p.is_file() => Ok(load(p)?.into_iter().collect()),
        _ => Ok(BTreeSet::new()),
    }
}

/// Write a sorted ticker list, one per line.
pub fn write(path: &Path, tickers: &BTreeSet<String>) -> Result<()> {
    let mut contents = String::new();
    for t in tickers {
        contents.push_str(t);
        contents.push('\n');
    }
    write_atomic(path, contents.as_bytes())
}

/// Run `f` over every ticker in order, logging `i/n: TICKER` progress.
/// The first error aborts the remaining tickers.
pub fn each<F>(tickers: &[String], mut f: F) -> Result<()>
where
    F: FnMut(&str) -> Result<()>,
{
    info!("processing {} tickers", tickers.len());
    for (i, ticker) in tickers.iter().enumerate() {
        info!("{}/{}: {}", i + 1, tickers.len(), ticker);
        f(ticker).with_context(|| format!("ticker {}", ticker))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_parse_skips_blanks() {
        assert_eq!(parse("AAPL\n\n MSFT \r\nIBM"), vec!["AAPL", "MSFT", "IBM"]);
    }

    #[test]
    fn test_set_round_trip() -> Result<()> {
        let tmp = tempdir()?;
        let path = tmp.path().join("bad.txt");
        assert!(load_set(Some(&path))?.is_empty());
        let set: BTreeSet<String> = ["ZZ", "AA"].iter().map(|s| s.to_string()).collect();
        write(&path, &set)?;
        assert_eq!(fs::read_to_string(&path)?, "AA\nZZ\n");
        assert_eq!(load_set(Some(&path))?, set);
        Ok(())
    }

    #[test]
    fn test_each_stops_at_first_error() {
        let tickers = parse("A\nB\nC");
        let mut seen = Vec::new();
        let res = each(&tickers, |t| {
            seen.push(t.to_string());
            if t == "B" {
                anyhow::bail!("boom");
            }
            Ok(())
        });
        assert!(res.is_err());
        assert_eq!(seen, vec!["A", "B"]);
    }
}
