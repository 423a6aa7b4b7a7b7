// src/validate.rs

use anyhow::{bail, Context, Result};
use glob::glob;
use std::{fs, path::Path};
use tracing::{debug, info};

/// Boilerplate every statement page carries when amounts are in millions of
/// US dollars.
pub const MILLIONS_USD: &str =
    "All amounts in Millions of \t\tUS Dollars<font face='arial' size='2'> except per share items";

pub fn check_page(content: &str) -> bool {
    content.contains(MILLIONS_USD)
}

/// Check every page under every ticker directory of `input_dir`.
/// Returns the number of pages checked; the first bad page is an error.
pub fn validate_dir(input_dir: &Path) -> Result<usize> {
    let pattern = format!("{}/*/*", input_dir.display());
    let mut paths: Vec<_> = glob(&pattern)
        .with_context(|| format!("Failed to read glob pattern '{}'", pattern))?
        .filter_map(|entry| entry.ok())
        .filter(|p| p.is_file())
        .collect();
    paths.sort();

    let mut ticker = None;
    for path in &paths {
        let dir = path
            .parent()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned());
        if dir != ticker {
            info!("{}", dir.as_deref().unwrap_or(""));
            ticker = dir;
        }
        debug!("\t{}", path.display());

        let bytes = fs::read(path).with_context(|| format!("reading {:?}", path))?;
        if !check_page(&String::from_utf8_lossy(&bytes)) {
            bail!("{} lacks the millions-of-US-dollars marker", path.display());
        }
    }
    Ok(paths.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_validate_dir() -> Result<()> {
        let tmp = tempdir()?;
        for t in ["AAA", "BBB"] {
            fs::create_dir_all(tmp.path().join(t))?;
            fs::write(
                tmp.path().join(t).join(format!("{}-0.html", t)),
                format!("<p>{}</p>", MILLIONS_USD),
            )?;
        }
        assert_eq!(validate_dir(tmp.path())?, 2);

        fs::write(tmp.path().join("BBB/BBB-5.html"), "<p>thousands</p>")?;
        let err = validate_dir(tmp.path()).unwrap_err();
        assert!(err.to_string().contains("BBB-5.html"));
        Ok(())
    }
}
