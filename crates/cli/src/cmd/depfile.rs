//! Implementation of the `cxxcap depfile` command.
//!
//! Runs only the post-build half of a capture: parse an existing dependency
//! file, normalize its entries and apply header verification.

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::debug;

use cxxcap_lib::depfile::read_dep_file;
use cxxcap_lib::headers::{DependencyClass, HeaderNormalizer, HeaderVerification, HeaderVerificationMode};
use cxxcap_lib::relevance::CacheRelevance;
use cxxcap_lib::target::BuildTarget;

use crate::output::{print_dependency, print_done, print_field, print_untracked};

pub struct DepfileArgs {
  pub path: PathBuf,
  pub project_root: PathBuf,
  pub input: PathBuf,
  pub mode: HeaderVerificationMode,
  pub whitelist: Vec<PathBuf>,
  pub search_paths: Vec<PathBuf>,
  pub target: String,
}

pub fn cmd_depfile(args: DepfileArgs) -> Result<()> {
  let target: BuildTarget = args
    .target
    .parse()
    .with_context(|| format!("Invalid build target: {}", args.target))?;
  let project_root = dunce::canonicalize(&args.project_root)
    .with_context(|| format!("Project root does not exist: {}", args.project_root.display()))?;

  let rt = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;
  let record = rt.block_on(read_dep_file(&args.path))?;
  debug!(path = %args.path.display(), entries = record.len(), "read dependency file");

  let verification = HeaderVerification::new(args.mode).with_whitelist(args.whitelist);
  let normalizer = HeaderNormalizer::new(&project_root, &args.search_paths, verification);
  let dependencies = normalizer.normalize_and_verify(&target, &args.input, &record)?;

  let forbidden = dependencies
    .iter()
    .filter(|d| d.class == DependencyClass::OutOfTreeForbidden)
    .count();

  for dep in &dependencies {
    print_dependency(dep);
  }

  let relevance = CacheRelevance::new(&project_root, &args.input, &dependencies);
  println!();
  print_field("Entries", &dependencies.len().to_string());
  print_field("Relevant", &relevance.len().to_string());

  if forbidden > 0 {
    print_untracked(forbidden);
  } else {
    print_done("All headers verified");
  }

  Ok(())
}
