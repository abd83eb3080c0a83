use anyhow::{Context, Result};
use zh_fhir_terminology::{TerminologyLoader, TerminologyService};

use crate::cli::ExpandArgs;
use crate::config::AppConfig;
use crate::output::print_json;

pub fn load_service(cfg: &AppConfig) -> Result<TerminologyService> {
    let mut loader = TerminologyLoader::new();
    loader
        .load_from_ig(&cfg.ig_path)
        .with_context(|| format!("failed to load IG at {}", cfg.ig_path.display()))?;
    if loader.is_empty() {
        tracing::warn!(ig = %cfg.ig_path.display(), "no terminology definitions found");
    }
    Ok(TerminologyService::new(loader))
}

pub fn run(args: &ExpandArgs, cfg: &AppConfig) -> Result<()> {
    let service = load_service(cfg)?;
    let expanded = service.expand(&args.url, args.filter.as_deref())?;
    print_json(&expanded, cfg.pretty)
}
