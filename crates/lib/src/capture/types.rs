use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::depfile::DepFileError;
use crate::flags::{SearchPath, SourceLanguage, ToolFlags};
use crate::headers::{HeaderVerificationError, NormalizedDependency};
use crate::relevance::CacheRelevance;
use crate::step::StepError;
use crate::target::BuildTarget;

/// Everything needed to capture one translation unit.
///
/// Paths are relative to the project root. Built once by the description
/// layer and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BuildInvocation {
  pub target: BuildTarget,
  pub input: PathBuf,
  pub language: SourceLanguage,
  /// Compiled object path. The argfile and dependency file live next to it.
  pub output: PathBuf,
  #[serde(default)]
  pub preprocessor_flags: ToolFlags,
  #[serde(default)]
  pub compiler_flags: ToolFlags,
  #[serde(default)]
  pub search_paths: Vec<SearchPath>,
}

impl BuildInvocation {
  /// Search path directories in declaration order.
  pub fn search_dirs(&self) -> Vec<PathBuf> {
    self.search_paths.iter().map(|sp| sp.path().to_path_buf()).collect()
  }
}

/// The part of a capture that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapturePhase {
  DirectorySetup,
  ArgfileWrite,
  ToolRun,
  DependencyParse,
  HeaderVerification,
}

impl CapturePhase {
  pub fn as_str(self) -> &'static str {
    match self {
      CapturePhase::DirectorySetup => "directory setup",
      CapturePhase::ArgfileWrite => "argfile write",
      CapturePhase::ToolRun => "tool run",
      CapturePhase::DependencyParse => "dependency parse",
      CapturePhase::HeaderVerification => "header verification",
    }
  }
}

impl fmt::Display for CapturePhase {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

fn step_phase(err: &StepError) -> CapturePhase {
  match err {
    StepError::CreateDir { .. } => CapturePhase::DirectorySetup,
    StepError::WriteArgFile { .. } => CapturePhase::ArgfileWrite,
    StepError::Spawn { .. } | StepError::CmdFailed { .. } => CapturePhase::ToolRun,
  }
}

/// Errors that fail a capture.
///
/// The message always starts with the failed phase.
#[derive(Debug, Error)]
pub enum CaptureError {
  #[error("{} failed: {}", step_phase(.0), .0)]
  Step(#[from] StepError),

  #[error("{} failed: {}", CapturePhase::DependencyParse, .0)]
  DepFile(#[from] DepFileError),

  #[error("{} failed: {}", CapturePhase::HeaderVerification, .0)]
  HeaderVerification(#[from] HeaderVerificationError),
}

impl CaptureError {
  pub fn phase(&self) -> CapturePhase {
    match self {
      CaptureError::Step(err) => step_phase(err),
      CaptureError::DepFile(_) => CapturePhase::DependencyParse,
      CaptureError::HeaderVerification(_) => CapturePhase::HeaderVerification,
    }
  }
}

/// Outcome of a successful capture.
#[derive(Debug, Clone)]
pub struct CaptureResult {
  /// Analyzer output directory, relative to the project root.
  pub results_dir: PathBuf,
  pub argfile: PathBuf,
  pub dep_file: PathBuf,
  /// Trimmed stdout of the analyzer.
  pub tool_output: String,
  /// Paths recorded as build artifacts before the tool ran.
  pub artifacts: Vec<PathBuf>,
  /// Verified dependencies in emission order.
  pub dependencies: Vec<NormalizedDependency>,
  pub relevance: CacheRelevance,
}
