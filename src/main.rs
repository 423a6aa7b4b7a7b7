mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use finscraper::{
    config::{Settings, SourceConfig},
    extract,
    fetch::{self, HttpSource},
    join, logging, merge, prep, tickers,
};
use std::time::{Duration, Instant};
use tracing::info;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // ─── 1) settings & logging ───────────────────────────────────────
    let common = cli.command.common();
    let settings = Settings::new(&common.timezone, common.overwrite, common.verbose)?;
    logging::init(&settings);
    info!(?settings, "startup");

    let ticker_list = tickers::load(&common.ticker_file)?;
    let start = Instant::now();

    // ─── 2) run the stage ────────────────────────────────────────────
    match &cli.command {
        Commands::Download {
            output_dir,
            source_url,
            timeout_secs,
            ..
        } => {
            let source = HttpSource::new(&SourceConfig {
                base_url: source_url.clone(),
                timeout: Duration::from_secs(*timeout_secs),
                ..SourceConfig::default()
            })?;
            fetch::run(&source, &ticker_list, output_dir, &settings)?;
        }
        Commands::Extract { dirs, .. } => {
            extract::run(&ticker_list, &dirs.input_dir, &dirs.output_dir, &settings)?;
        }
        Commands::Merge { dirs, .. } => {
            merge::run(&ticker_list, &dirs.input_dir, &dirs.output_dir, &settings)?;
        }
        Commands::Prep {
            dirs,
            bad_ticker_file,
            ..
        } => {
            prep::run(
                &ticker_list,
                &dirs.input_dir,
                &dirs.output_dir,
                bad_ticker_file.as_deref(),
                &settings,
            )?;
        }
        Commands::Join {
            dirs,
            price_dir,
            bad_ticker_file,
            ..
        } => {
            join::run(
                &ticker_list,
                &dirs.input_dir,
                price_dir,
                &dirs.output_dir,
                bad_ticker_file.as_deref(),
                &settings,
            )?;
        }
    }

    info!(elapsed = ?start.elapsed(), "all done");
    Ok(())
}
