mod capture;
mod depfile;
mod plan;

pub use capture::cmd_capture;
pub use depfile::{DepfileArgs, cmd_depfile};
pub use plan::cmd_plan;

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::debug;

use cxxcap_lib::capture::{BuildInvocation, CaptureRule};
use cxxcap_lib::config::CaptureConfig;

/// A capture description file: shared settings plus one translation unit.
#[derive(Debug, Deserialize)]
struct CaptureDescription {
  #[serde(default)]
  config: CaptureConfig,
  invocation: BuildInvocation,
}

/// Load a description file into a ready-to-run rule.
///
/// Environment overrides win over the file. A relative project root is
/// taken relative to the description file's directory.
fn load_rule(path: &Path) -> Result<CaptureRule> {
  let content =
    std::fs::read_to_string(path).with_context(|| format!("Failed to read capture description: {}", path.display()))?;
  let description: CaptureDescription = serde_json::from_str(&content)
    .with_context(|| format!("Failed to parse capture description: {}", path.display()))?;

  let mut config = description
    .config
    .with_env_overrides()
    .context("Invalid environment configuration")?;

  let base = path.parent().unwrap_or_else(|| Path::new("."));
  let root = base.join(&config.project_root);
  config.project_root =
    dunce::canonicalize(&root).with_context(|| format!("Project root does not exist: {}", root.display()))?;
  debug!(
    description = %path.display(),
    project_root = %config.project_root.display(),
    mode = ?config.header_verification.mode,
    "loaded capture description"
  );

  Ok(CaptureRule::new(config, description.invocation))
}
