use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

const DEFAULT_CONFIG_FILE: &str = "zh-fhir.toml";
const LOG_LEVELS: [&str; 6] = ["trace", "debug", "info", "warn", "error", "off"];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    /// Implementation guide root holding `input/fsh`
    #[serde(default = "default_ig_path")]
    pub ig_path: PathBuf,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Pretty-print JSON output
    #[serde(default = "default_pretty")]
    pub pretty: bool,
}

fn default_ig_path() -> PathBuf {
    PathBuf::from(".")
}

fn default_log_level() -> String {
    "warn".into()
}

fn default_pretty() -> bool {
    true
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            ig_path: default_ig_path(),
            log_level: default_log_level(),
            pretty: default_pretty(),
        }
    }
}

impl AppConfig {
    pub fn validate(&self) -> Result<()> {
        let level = self.log_level.trim();
        if level.is_empty() {
            bail!("log_level must not be empty");
        }
        if !LOG_LEVELS.contains(&level.to_ascii_lowercase().as_str()) {
            bail!(
                "log_level '{}' is not one of: {}",
                self.log_level,
                LOG_LEVELS.join(", ")
            );
        }
        Ok(())
    }
}

/// Command-line values that take precedence over every other source.
#[derive(Debug, Default, Clone)]
pub struct ConfigOverrides {
    pub ig_path: Option<PathBuf>,
    pub log_level: Option<String>,
    pub compact: bool,
}

/// Builds the configuration from defaults, a TOML file, `ZH_FHIR__*`
/// environment variables and finally command-line overrides.
///
/// An explicit `path` must exist; the default `zh-fhir.toml` is optional.
pub fn load_config(path: Option<&Path>, overrides: &ConfigOverrides) -> Result<AppConfig> {
    let mut builder = Config::builder();
    match path {
        Some(p) => {
            builder = builder.add_source(File::from(p.to_path_buf()).required(true));
        }
        None => {
            builder =
                builder.add_source(File::from(PathBuf::from(DEFAULT_CONFIG_FILE)).required(false));
        }
    }
    // Environment variable overrides, e.g., ZH_FHIR__LOG_LEVEL=debug
    builder = builder.add_source(
        Environment::with_prefix("ZH_FHIR")
            .try_parsing(true)
            .separator("__"),
    );

    if let Some(ig) = &overrides.ig_path {
        builder = builder.set_override("ig_path", ig.to_string_lossy().into_owned())?;
    }
    if let Some(level) = &overrides.log_level {
        builder = builder.set_override("log_level", level.as_str())?;
    }
    if overrides.compact {
        builder = builder.set_override("pretty", false)?;
    }

    let merged: AppConfig = builder
        .build()
        .context("config build error")?
        .try_deserialize()
        .context("config deserialize error")?;
    merged.validate()?;
    Ok(merged)
}
