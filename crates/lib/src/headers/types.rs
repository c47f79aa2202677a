use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::target::BuildTarget;

/// How to treat headers found outside the project and the whitelist.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeaderVerificationMode {
  /// Skip classification; every dependency is relevant.
  #[default]
  Ignore,
  /// Log untracked headers but keep building.
  Warn,
  /// Fail the capture on the first untracked header.
  Error,
}

impl HeaderVerificationMode {
  pub fn as_str(self) -> &'static str {
    match self {
      HeaderVerificationMode::Ignore => "ignore",
      HeaderVerificationMode::Warn => "warn",
      HeaderVerificationMode::Error => "error",
    }
  }
}

impl std::fmt::Display for HeaderVerificationMode {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for HeaderVerificationMode {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_ascii_lowercase().as_str() {
      "ignore" => Ok(HeaderVerificationMode::Ignore),
      "warn" => Ok(HeaderVerificationMode::Warn),
      "error" => Ok(HeaderVerificationMode::Error),
      other => Err(format!("unknown header verification mode '{}'", other)),
    }
  }
}

/// Header verification policy: a mode plus the external roots that are
/// allowed even though they live outside the project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct HeaderVerification {
  pub mode: HeaderVerificationMode,
  pub whitelist: Vec<PathBuf>,
}

impl HeaderVerification {
  pub fn new(mode: HeaderVerificationMode) -> Self {
    Self {
      mode,
      whitelist: Vec::new(),
    }
  }

  pub fn with_whitelist(mut self, roots: impl IntoIterator<Item = impl Into<PathBuf>>) -> Self {
    self.whitelist.extend(roots.into_iter().map(Into::into));
    self
  }

  /// Whether `path` lies under one of the whitelisted roots (lexically).
  pub fn is_whitelisted(&self, path: &Path) -> bool {
    self.whitelist.iter().any(|root| path.starts_with(root))
  }
}

/// Where a dependency lives relative to the project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DependencyClass {
  InTree,
  OutOfTreePermitted,
  OutOfTreeForbidden,
}

impl DependencyClass {
  /// Whether dependencies of this class belong in the cache key.
  pub fn is_relevant(self) -> bool {
    !matches!(self, DependencyClass::OutOfTreeForbidden)
  }
}

/// A dependency path resolved to its canonical form.
///
/// `path` is project-relative for in-tree entries and absolute otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NormalizedDependency {
  pub path: PathBuf,
  pub class: DependencyClass,
}

/// A header outside every permitted root was included while header
/// verification was in `error` mode.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{target}: {} included an untracked header \"{}\"", .input.display(), .header.display())]
pub struct HeaderVerificationError {
  pub target: BuildTarget,
  pub input: PathBuf,
  pub header: PathBuf,
}
