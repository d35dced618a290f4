//! media-mapper CLI
//!
//! Enriches a company comparison file with the movies and TV shows each
//! company produced, keeping results in a resumable mapping CSV.

mod error;
mod progress_bar;

use std::io::IsTerminal;
use std::path::PathBuf;

use clap::Parser;
use owo_colors::OwoColorize;
use owo_colors::Stream::Stderr;

use media_mapper_enrich::{
    DEFAULT_CHECKPOINT_EVERY, DEFAULT_MIN_SCORE, EnrichOptions, EnrichProgress, LogProgress,
};
use media_mapper_tmdb::{ConfigOverrides, TmdbClient, TmdbConfig, config_path};

use crate::error::CliError;
use crate::progress_bar::BarProgress;

#[derive(Parser)]
#[command(name = "media-mapper")]
#[command(about = "Map TMDB production companies to their movies and TV shows", long_about = None)]
struct Cli {
    /// Comparison CSV with tmdbID, tmdbName and result1Score columns
    #[arg(required_unless_present = "print_config_path")]
    compare_csv: Option<PathBuf>,

    /// Mapping CSV to resume from and write results to
    #[arg(required_unless_present = "print_config_path")]
    mapping_csv: Option<PathBuf>,

    /// TMDB API key (overrides TMDB_API_KEY and the config file)
    #[arg(long)]
    api_key: Option<String>,

    /// TMDB API base URL
    #[arg(long)]
    base_url: Option<String>,

    /// Skip comparison rows scoring below this
    #[arg(long, default_value_t = DEFAULT_MIN_SCORE)]
    min_score: f64,

    /// Save the mapping after this many newly retrieved companies
    #[arg(long, default_value_t = DEFAULT_CHECKPOINT_EVERY)]
    checkpoint_every: usize,

    /// Maximum result pages to read per company and media kind
    #[arg(long)]
    max_pages: Option<u32>,

    /// Only log warnings and errors, and hide the progress bar
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Log debug output
    #[arg(short, long)]
    verbose: bool,

    /// Print the config file path and exit
    #[arg(long)]
    print_config_path: bool,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    if let Err(e) = run(cli) {
        log::error!("{} {}", "\u{2718}".if_supports_color(Stderr, |t| t.red()), e);
        std::process::exit(1);
    }
}

/// Set up `env_logger`; `RUST_LOG` takes precedence over the flags.
fn init_logging(verbose: bool, quiet: bool) {
    let default_level = if quiet {
        "warn"
    } else if verbose {
        "debug"
    } else {
        "info"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .format_target(false)
        .init();
}

fn run(cli: Cli) -> Result<(), CliError> {
    if cli.print_config_path {
        let path = config_path()
            .ok_or_else(|| CliError::config("Could not determine config directory"))?;
        println!("{}", path.display());
        return Ok(());
    }

    let (Some(compare_csv), Some(mapping_csv)) = (cli.compare_csv, cli.mapping_csv) else {
        return Err(CliError::config(
            "Both the comparison CSV and the mapping CSV paths are required",
        ));
    };

    let tmdb = TmdbConfig::load(ConfigOverrides {
        api_key: cli.api_key,
        base_url: cli.base_url,
        max_pages: cli.max_pages,
    })?;
    log::debug!("Using {tmdb:?}");
    let client = TmdbClient::new(tmdb)?;

    let options = EnrichOptions {
        min_score: cli.min_score,
        checkpoint_every: cli.checkpoint_every,
    };
    let progress: Box<dyn EnrichProgress> = if std::io::stderr().is_terminal() {
        Box::new(BarProgress::new(cli.quiet))
    } else {
        Box::new(LogProgress)
    };

    let summary =
        media_mapper_enrich::run(&compare_csv, &mapping_csv, &client, options, progress.as_ref())?;

    if summary.rows > 0 {
        log::info!(
            "{} {}",
            "\u{2714}".if_supports_color(Stderr, |t| t.green()),
            summary
        );
        if summary.checkpoints > 0 {
            log::info!("Mapping written to {}", mapping_csv.display());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["media-mapper", "compare.csv", "mapping.csv"]).unwrap();
        assert_eq!(cli.min_score, 0.75);
        assert_eq!(cli.checkpoint_every, 100);
        assert!(cli.max_pages.is_none());
        assert!(!cli.quiet);
    }

    #[test]
    fn test_paths_required() {
        assert!(Cli::try_parse_from(["media-mapper", "compare.csv"]).is_err());
    }

    #[test]
    fn test_print_config_path_needs_no_paths() {
        let cli = Cli::try_parse_from(["media-mapper", "--print-config-path"]).unwrap();
        assert!(cli.print_config_path);
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["media-mapper", "-q", "-v", "a.csv", "b.csv"]).is_err());
    }
}
