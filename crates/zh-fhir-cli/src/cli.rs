use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "zh-fhir")]
#[command(about = "Check FHIR temporal primitives and expand IG terminology")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file (defaults to ./zh-fhir.toml when present)
    #[arg(short, long, global = true, env = "ZH_FHIR_CONFIG")]
    pub config: Option<PathBuf>,

    /// Implementation guide root (overrides config)
    #[arg(long, global = true)]
    pub ig: Option<PathBuf>,

    /// Log level: trace, debug, info, warn, error or off (overrides config)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Print JSON on a single line
    #[arg(long, global = true)]
    pub compact: bool,

    /// Output format
    #[arg(short, long, global = true)]
    pub format: Option<OutputFormat>,
}

#[derive(Clone, Copy, ValueEnum, Default, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate a temporal value and show its precision and resolved form
    Check(CheckArgs),
    /// Expand a ValueSet or CodeSystem from the implementation guide
    Expand(ExpandArgs),
    /// Show the effective configuration
    Config,
}

#[derive(Clone, Copy, ValueEnum, Debug, PartialEq, Eq)]
pub enum PrimitiveArg {
    Date,
    Time,
    #[value(name = "datetime", alias = "dateTime")]
    DateTime,
    Instant,
}

#[derive(clap::Args)]
pub struct CheckArgs {
    /// FHIR primitive type
    pub kind: PrimitiveArg,
    /// Text to check, exactly as it would appear in JSON
    pub text: String,
}

#[derive(clap::Args)]
pub struct ExpandArgs {
    /// Canonical url of the ValueSet or CodeSystem
    #[arg(short, long)]
    pub url: String,
    /// Keep only codes whose code or display contains this text
    #[arg(long)]
    pub filter: Option<String>,
}
