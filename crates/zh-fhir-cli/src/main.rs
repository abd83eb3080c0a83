mod cli;
mod commands;
mod config;
mod observability;
mod output;

use anyhow::Result;
use clap::Parser;

use cli::{Cli, Commands};
use config::ConfigOverrides;
use output::print_error;

fn main() {
    if let Err(e) = run() {
        print_error(&format!("{e:#}"));
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let overrides = ConfigOverrides {
        ig_path: cli.ig.clone(),
        log_level: cli.log_level.clone(),
        compact: cli.compact,
    };
    let cfg = config::load_config(cli.config.as_deref(), &overrides)?;
    observability::init_tracing_with_level(&cfg.log_level);
    tracing::debug!(config = ?cfg, "configuration loaded");
    let format = cli.format.unwrap_or_default();

    match &cli.command {
        Commands::Check(args) => commands::check::run(args, format, cfg.pretty)?,
        Commands::Expand(args) => commands::expand::run(args, &cfg)?,
        Commands::Config => print!("{}", toml::to_string_pretty(&cfg)?),
    }

    Ok(())
}
