use clap::{Args, Parser, Subcommand};
use finscraper::config::{DEFAULT_SOURCE_URL, DEFAULT_TIMEOUT_SECS, DEFAULT_TIMEZONE};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Flags every stage takes.
#[derive(Args, Debug)]
pub struct CommonArgs {
    /// Newline-delimited list of ticker symbols.
    #[arg(long = "ticker_file")]
    pub ticker_file: PathBuf,

    /// Replace outputs that already exist.
    #[arg(long)]
    pub overwrite: bool,

    /// Log at debug level (RUST_LOG takes precedence).
    #[arg(long)]
    pub verbose: bool,

    /// Timezone for log timestamps.
    #[arg(long, default_value = DEFAULT_TIMEZONE)]
    pub timezone: String,
}

#[derive(Args, Debug)]
pub struct Dirs {
    #[arg(long = "input_dir")]
    pub input_dir: PathBuf,

    #[arg(long = "output_dir")]
    pub output_dir: PathBuf,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Download every statement page of each ticker.
    Download {
        #[command(flatten)]
        common: CommonArgs,

        #[arg(long = "output_dir")]
        output_dir: PathBuf,

        /// Page endpoint; ticker and page start are added as query parameters.
        #[arg(long = "source_url", default_value = DEFAULT_SOURCE_URL)]
        source_url: String,

        #[arg(long = "timeout_secs", default_value_t = DEFAULT_TIMEOUT_SECS)]
        timeout_secs: u64,
    },

    /// Convert downloaded pages into pipe-delimited parts.
    Extract {
        #[command(flatten)]
        common: CommonArgs,

        #[command(flatten)]
        dirs: Dirs,
    },

    /// Merge the parts of each ticker into one file.
    Merge {
        #[command(flatten)]
        common: CommonArgs,

        #[command(flatten)]
        dirs: Dirs,
    },

    /// Clean merged files onto a dense monthly calendar.
    Prep {
        #[command(flatten)]
        common: CommonArgs,

        #[command(flatten)]
        dirs: Dirs,

        /// Where to list tickers missing required line items.
        #[arg(long = "bad_ticker_file")]
        bad_ticker_file: Option<PathBuf>,
    },

    /// Join prepared files with monthly price files.
    Join {
        #[command(flatten)]
        common: CommonArgs,

        #[command(flatten)]
        dirs: Dirs,

        #[arg(long = "price_dir")]
        price_dir: PathBuf,

        /// Tickers to leave out, one per line.
        #[arg(long = "bad_ticker_file")]
        bad_ticker_file: Option<PathBuf>,
    },
}

impl Commands {
    pub fn common(&self) -> &CommonArgs {
        match self {
            Commands::Download { common, .. }
            | Commands::Extract { common, .. }
            | Commands::Merge { common, .. }
            | Commands::Prep { common, .. }
            | Commands::Join { common, .. } => common,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_snake_case_flags() {
        let cli = Cli::try_parse_from([
            "finscraper",
            "prep",
            "--ticker_file",
            "t.txt",
            "--input_dir",
            "merged",
            "--output_dir",
            "prepared",
            "--overwrite",
        ])
        .unwrap();
        let common = cli.command.common();
        assert!(common.overwrite);
        assert!(!common.verbose);
        assert_eq!(common.timezone, DEFAULT_TIMEZONE);
        match cli.command {
            Commands::Prep {
                dirs,
                bad_ticker_file,
                ..
            } => {
                assert_eq!(dirs.input_dir, PathBuf::from("merged"));
                assert!(bad_ticker_file.is_none());
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_ticker_file_is_required() {
        let args = ["finscraper", "merge", "--input_dir", "a", "--output_dir", "b"];
        assert!(Cli::try_parse_from(args).is_err());
    }
}
