//! Command-line arguments.

use clap::{Parser, Subcommand};
use growforge_core::resolver::{MatchPolicy, ScanMode};
use std::path::PathBuf;

/// Summaries, charts and exports for the four-school EC growth experiment.
///
/// Looks for a `data` directory holding `<school>_환경데이터.csv` files and
/// `4개교_생육결과데이터.xlsx`.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// YAML configuration file. Defaults to `growforge.yaml` when present.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory to search for the `data` directory from
    #[arg(long, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// How logical file names are compared: substring or exact
    #[arg(long, value_name = "POLICY")]
    pub match_policy: Option<MatchPolicy>,

    /// Which files in the data directory are considered: recursive or flat
    #[arg(long, value_name = "MODE")]
    pub scan_mode: Option<ScanMode>,

    /// Where exports, charts and reports are written
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Only show this school in per-school tables ("전체" for all)
    #[arg(long, value_name = "NAME")]
    pub school: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Print the overview, environment and growth tables
    Summary {
        /// Print the summaries as JSON instead
        #[arg(long)]
        json: bool,
    },
    /// Write env_data.csv and growth_results.xlsx to the output directory
    Export,
    /// Render comparison charts to the output directory
    Plot,
    /// Everything above, into a new timestamped run directory
    Report,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_overrides_and_subcommand() {
        let cli = Cli::parse_from([
            "growforge",
            "--match-policy",
            "exact",
            "--scan-mode",
            "flat",
            "--school",
            "하늘고",
            "summary",
            "--json",
        ]);
        assert_eq!(cli.match_policy, Some(MatchPolicy::Exact));
        assert_eq!(cli.scan_mode, Some(ScanMode::Flat));
        assert_eq!(cli.school.as_deref(), Some("하늘고"));
        assert_eq!(cli.command, Some(Command::Summary { json: true }));
    }

    #[test]
    fn rejects_unknown_policy() {
        assert!(Cli::try_parse_from(["growforge", "--match-policy", "fuzzy"]).is_err());
    }
}
