use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::argfile::ArgFile;
use crate::step::exec::ExecOpts;

/// A primitive build operation.
///
/// Relative paths are resolved against the project root at execution time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
  /// Create a directory and any missing parents.
  Mkdir { path: PathBuf },
  /// Atomically write an argfile.
  WriteArgFile(ArgFile),
  /// Run a program and wait for it to exit.
  Exec(ExecOpts),
}

impl Step {
  /// Short machine-friendly name, used in logs.
  pub fn short_name(&self) -> &'static str {
    match self {
      Step::Mkdir { .. } => "mkdir",
      Step::WriteArgFile(_) => "write-argfile",
      Step::Exec(_) => "exec",
    }
  }
}

impl fmt::Display for Step {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Step::Mkdir { path } => write!(f, "mkdir -p {}", path.display()),
      Step::WriteArgFile(argfile) => write!(f, "write argfile {}", argfile.path.display()),
      Step::Exec(opts) => write!(f, "{}", opts.command_line()),
    }
  }
}

/// Result of executing a single step.
#[derive(Debug, Clone)]
pub struct StepResult {
  pub step: &'static str,
  /// Trimmed stdout for `Exec` steps, empty otherwise.
  pub output: String,
}

/// Errors that can occur while executing a step.
#[derive(Debug, Error)]
pub enum StepError {
  /// A directory could not be created.
  #[error("failed to create directory {path}: {source}")]
  CreateDir {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  /// The argfile could not be written.
  #[error("failed to write argfile {path}: {source}")]
  WriteArgFile {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  /// The program could not be started.
  #[error("failed to launch {cmd}: {source}")]
  Spawn {
    cmd: String,
    #[source]
    source: std::io::Error,
  },

  /// The program ran but exited unsuccessfully.
  #[error("command failed with exit code {code:?}: {cmd}")]
  CmdFailed {
    cmd: String,
    code: Option<i32>,
    stdout: String,
    stderr: String,
  },
}
