//! Capture configuration.
//!
//! Settings shared by every capture in a build: which analyzer and compiler
//! to run, where the project and its generated outputs live, and the header
//! verification policy. Values come from the description layer (usually a
//! JSON file) and may be overridden through environment variables:
//!
//! - `CXXCAP_INFER_BIN`
//! - `CXXCAP_COMPILER`
//! - `CXXCAP_GEN_DIR`
//! - `CXXCAP_HEADER_VERIFICATION` (`ignore`, `warn` or `error`)

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::consts::{DEFAULT_COMPILER, DEFAULT_GEN_DIR, DEFAULT_INFER_BIN};
use crate::headers::{HeaderVerification, HeaderVerificationMode};

pub const ENV_INFER_BIN: &str = "CXXCAP_INFER_BIN";
pub const ENV_COMPILER: &str = "CXXCAP_COMPILER";
pub const ENV_GEN_DIR: &str = "CXXCAP_GEN_DIR";
pub const ENV_HEADER_VERIFICATION: &str = "CXXCAP_HEADER_VERIFICATION";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
  #[error("invalid value for {var}: {message}")]
  InvalidEnv { var: &'static str, message: String },
}

/// Configuration for capture execution.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
  /// Analyzer front-end binary.
  pub infer_bin: String,

  /// Compiler the analyzer drives.
  pub compiler: String,

  /// Absolute project root. Relative paths in an invocation are relative to it.
  pub project_root: PathBuf,

  /// Generated output directory, relative to the project root.
  pub gen_dir: PathBuf,

  pub header_verification: HeaderVerification,
}

impl Default for CaptureConfig {
  fn default() -> Self {
    Self {
      infer_bin: DEFAULT_INFER_BIN.to_string(),
      compiler: DEFAULT_COMPILER.to_string(),
      project_root: PathBuf::from("."),
      gen_dir: PathBuf::from(DEFAULT_GEN_DIR),
      header_verification: HeaderVerification::default(),
    }
  }
}

impl CaptureConfig {
  /// Default configuration with environment overrides applied.
  pub fn from_env() -> Result<Self, ConfigError> {
    Self::default().with_env_overrides()
  }

  /// Apply `CXXCAP_*` environment overrides on top of `self`.
  pub fn with_env_overrides(mut self) -> Result<Self, ConfigError> {
    if let Ok(bin) = std::env::var(ENV_INFER_BIN) {
      debug!(var = ENV_INFER_BIN, value = %bin, "config override");
      self.infer_bin = bin;
    }

    if let Ok(compiler) = std::env::var(ENV_COMPILER) {
      debug!(var = ENV_COMPILER, value = %compiler, "config override");
      self.compiler = compiler;
    }

    if let Ok(gen_dir) = std::env::var(ENV_GEN_DIR) {
      debug!(var = ENV_GEN_DIR, value = %gen_dir, "config override");
      self.gen_dir = PathBuf::from(gen_dir);
    }

    if let Ok(mode) = std::env::var(ENV_HEADER_VERIFICATION) {
      self.header_verification.mode = mode
        .parse::<HeaderVerificationMode>()
        .map_err(|message| ConfigError::InvalidEnv {
          var: ENV_HEADER_VERIFICATION,
          message,
        })?;
    }

    Ok(self)
  }

  pub fn with_project_root(mut self, root: impl Into<PathBuf>) -> Self {
    self.project_root = root.into();
    self
  }

  pub fn with_header_verification(mut self, verification: HeaderVerification) -> Self {
    self.header_verification = verification;
    self
  }
}
