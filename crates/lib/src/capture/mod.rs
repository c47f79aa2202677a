//! Analyzer capture of a single translation unit.
//!
//! A [`CaptureRule`] turns one [`BuildInvocation`] into an ordered list of
//! steps, runs them, and then reads back the compiler's dependency file to
//! decide which files belong in the capture's cache key.
//!
//! # Steps
//!
//! 1. create the analyzer results directory
//! 2. create the output's parent directory
//! 3. write the argfile next to the output
//! 4. run `<infer> -a capture --project_root <root> --out <results> -- <compiler> @<argfile>`
//!
//! The results directory is recorded as an artifact while planning, before
//! anything runs, so an interrupted capture still leaves a known location to
//! clean up. Its contents are only trustworthy once [`run_capture`] returns `Ok`.

mod types;

pub use types::*;

use std::future::Future;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info};

use crate::argfile::{ArgFile, argfile_path, compiler_args};
use crate::config::CaptureConfig;
use crate::consts::RESULTS_DIR_TEMPLATE;
use crate::depfile::{dep_file_path, read_dep_file};
use crate::flags::{SearchPath, SourceLanguage, ToolFlags, assemble_flags};
use crate::headers::paths::absolute_root;
use crate::headers::{HeaderNormalizer, HeaderVerification, NormalizedDependency};
use crate::relevance::CacheRelevance;
use crate::step::exec::ExecOpts;
use crate::step::{Step, StepResult, run_steps};
use crate::util::hash::{HashError, Hashable, ObjectHash};

/// Receives the paths a build step produces.
pub trait BuildableContext {
  fn record_artifact(&mut self, path: &Path);
}

impl BuildableContext for Vec<PathBuf> {
  fn record_artifact(&mut self, path: &Path) {
    self.push(path.to_path_buf());
  }
}

/// What the build engine needs from a rule that runs steps and keys its
/// cache on a dependency file.
pub trait BuildStep {
  /// Plan the steps of one build, recording produced artifacts in `ctx`.
  fn steps(&self, ctx: &mut dyn BuildableContext) -> Vec<Step>;

  /// The declared output, relative to the project root.
  fn output(&self) -> &Path;

  /// Whether the cache key is refined from a dependency file after building.
  fn uses_dep_file_keys(&self) -> bool;

  /// Whether the mere existence of `path` affects the cache key.
  fn existence_of_interest(&self, path: &Path) -> bool;

  /// The cache-relevance predicate, available once the steps succeeded.
  fn inputs_after_build(&self) -> impl Future<Output = Result<CacheRelevance, CaptureError>> + Send;
}

/// The analyzer capture rule for one translation unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureRule {
  config: CaptureConfig,
  invocation: BuildInvocation,
  results_dir: PathBuf,
}

#[derive(Serialize)]
struct RuleKeyFields<'a> {
  infer_bin: &'a str,
  compiler: &'a str,
  gen_dir: &'a Path,
  header_verification: &'a HeaderVerification,
  input: &'a Path,
  language: SourceLanguage,
  output: &'a Path,
  preprocessor_flags: &'a ToolFlags,
  compiler_flags: &'a ToolFlags,
  search_paths: &'a [SearchPath],
}

impl Hashable for RuleKeyFields<'_> {}

impl CaptureRule {
  /// Create the rule. A relative project root is made absolute.
  pub fn new(mut config: CaptureConfig, invocation: BuildInvocation) -> Self {
    config.project_root = absolute_root(&config.project_root);
    let results_dir = invocation.target.gen_path(&config.gen_dir, RESULTS_DIR_TEMPLATE);
    Self {
      config,
      invocation,
      results_dir,
    }
  }

  pub fn config(&self) -> &CaptureConfig {
    &self.config
  }

  pub fn invocation(&self) -> &BuildInvocation {
    &self.invocation
  }

  pub fn project_root(&self) -> &Path {
    &self.config.project_root
  }

  /// The output's absolute location.
  pub fn absolute_output(&self) -> PathBuf {
    self.project_root().join(&self.results_dir)
  }

  pub fn argfile_path(&self) -> PathBuf {
    argfile_path(&self.invocation.output)
  }

  pub fn dep_file_path(&self) -> PathBuf {
    dep_file_path(&self.invocation.output)
  }

  /// The argfile this capture writes. Fully determined by the invocation.
  pub fn argfile(&self) -> ArgFile {
    let inv = &self.invocation;
    let flags = assemble_flags(&inv.preprocessor_flags, &inv.search_paths, &inv.compiler_flags);
    let tokens = compiler_args(&flags, &self.dep_file_path(), inv.language, &inv.output, &inv.input);
    ArgFile::new(self.argfile_path(), &tokens)
  }

  /// The analyzer invocation.
  pub fn tool_command(&self) -> ExecOpts {
    let mut argfile_arg = String::from("@");
    argfile_arg.push_str(&self.argfile_path().to_string_lossy());

    ExecOpts::new(&self.config.infer_bin).with_args(vec![
      "-a".to_string(),
      "capture".to_string(),
      "--project_root".to_string(),
      self.project_root().to_string_lossy().to_string(),
      "--out".to_string(),
      self.results_dir.to_string_lossy().to_string(),
      "--".to_string(),
      self.config.compiler.clone(),
      argfile_arg,
    ])
  }

  /// Key identifying everything that influences this capture's output.
  ///
  /// The project root is left out so the key is stable across checkouts.
  pub fn rule_key(&self) -> Result<ObjectHash, HashError> {
    let inv = &self.invocation;
    RuleKeyFields {
      infer_bin: &self.config.infer_bin,
      compiler: &self.config.compiler,
      gen_dir: &self.config.gen_dir,
      header_verification: &self.config.header_verification,
      input: &inv.input,
      language: inv.language,
      output: &inv.output,
      preprocessor_flags: &inv.preprocessor_flags,
      compiler_flags: &inv.compiler_flags,
      search_paths: &inv.search_paths,
    }
    .compute_hash()
  }

  /// Read the dependency file, then normalize and verify every entry.
  pub async fn verified_dependencies(&self) -> Result<Vec<NormalizedDependency>, CaptureError> {
    let record = read_dep_file(&self.project_root().join(self.dep_file_path())).await?;
    debug!(count = record.len(), "parsed dependency file");

    let normalizer = HeaderNormalizer::new(
      self.project_root(),
      &self.invocation.search_dirs(),
      self.config.header_verification.clone(),
    );
    let deps = normalizer.normalize_and_verify(&self.invocation.target, &self.invocation.input, &record)?;
    Ok(deps)
  }
}

impl BuildStep for CaptureRule {
  fn steps(&self, ctx: &mut dyn BuildableContext) -> Vec<Step> {
    ctx.record_artifact(&self.results_dir);

    let output_dir = self
      .invocation
      .output
      .parent()
      .map(Path::to_path_buf)
      .unwrap_or_default();

    vec![
      Step::Mkdir {
        path: self.results_dir.clone(),
      },
      Step::Mkdir { path: output_dir },
      Step::WriteArgFile(self.argfile()),
      Step::Exec(self.tool_command()),
    ]
  }

  fn output(&self) -> &Path {
    &self.results_dir
  }

  fn uses_dep_file_keys(&self) -> bool {
    true
  }

  fn existence_of_interest(&self, _path: &Path) -> bool {
    false
  }

  async fn inputs_after_build(&self) -> Result<CacheRelevance, CaptureError> {
    let deps = self.verified_dependencies().await?;
    Ok(CacheRelevance::new(self.project_root(), &self.invocation.input, &deps))
  }
}

/// Run a full capture: plan, execute every step, then verify dependencies.
///
/// The first failing step aborts the capture. No cache-relevance predicate is
/// produced unless the dependency file was read and fully verified.
pub async fn run_capture(rule: &CaptureRule) -> Result<CaptureResult, CaptureError> {
  info!(target_name = %rule.invocation.target, input = %rule.invocation.input.display(), "capturing");

  let mut artifacts: Vec<PathBuf> = Vec::new();
  let steps = rule.steps(&mut artifacts);
  let results: Vec<StepResult> = run_steps(&steps, rule.project_root()).await?;
  let tool_output = results
    .into_iter()
    .rfind(|r| r.step == "exec")
    .map(|r| r.output)
    .unwrap_or_default();
  debug!(output = %tool_output, "analyzer finished");

  let dependencies = rule.verified_dependencies().await?;
  let relevance = CacheRelevance::new(rule.project_root(), &rule.invocation.input, &dependencies);

  info!(
    target_name = %rule.invocation.target,
    results_dir = %rule.results_dir.display(),
    relevant = relevance.len(),
    "capture complete"
  );

  Ok(CaptureResult {
    results_dir: rule.results_dir.clone(),
    argfile: rule.argfile_path(),
    dep_file: rule.dep_file_path(),
    tool_output,
    artifacts,
    dependencies,
    relevance,
  })
}
