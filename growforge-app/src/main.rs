use anyhow::{anyhow, Result};
use clap::Parser;
use growforge_schemas::school::School;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

mod cli;
mod config;
mod plotting;
mod workflow;

use cli::{Cli, Command};
use config::AppConfig;

/// Label the school selector uses for "no filter".
const ALL_SCHOOLS: &str = "전체";

fn parse_school_filter(raw: Option<&str>) -> Result<Option<School>> {
    match raw.map(str::trim) {
        None | Some("") | Some(ALL_SCHOOLS) => Ok(None),
        Some(name) => name.parse::<School>().map(Some).map_err(|e| anyhow!(e)),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut config = AppConfig::discover(cli.config.as_deref())?;
    config.merge_with_args(&cli);
    let school = parse_school_filter(cli.school.as_deref())?;

    let command = cli.command.clone().unwrap_or(Command::Report);
    workflow::run(&command, &config, school)
}
