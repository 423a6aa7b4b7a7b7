//! validate_pages.rs: one-off sanity check over downloaded statement pages.
//!
//! Every page under every ticker directory must state its amounts in
//! millions of US dollars; the first page that does not aborts the run.

use anyhow::Result;
use clap::Parser;
use finscraper::{
    config::{Settings, DEFAULT_TIMEZONE},
    logging, validate,
};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Root holding one directory of pages per ticker.
    #[arg(long = "input_dir")]
    input_dir: PathBuf,

    #[arg(long)]
    verbose: bool,

    #[arg(long, default_value = DEFAULT_TIMEZONE)]
    timezone: String,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let settings = Settings::new(&args.timezone, false, args.verbose)?;
    logging::init(&settings);

    let checked = validate::validate_dir(&args.input_dir)?;
    info!("{} pages checked under {}", checked, args.input_dir.display());
    Ok(())
}
