//! Build target identity.
//!
//! A capture is always owned by a build target such as `//lib/foo:bar`. The
//! target names the capture in error messages and determines where the
//! analyzer results directory lives under the gen directory.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced while parsing a build target string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TargetParseError {
  #[error("build target is missing ':' separator: {0}")]
  MissingColon(String),

  #[error("build target has an empty short name: {0}")]
  EmptyName(String),

  #[error("build target short name must not contain '/' or ':': {0}")]
  InvalidName(String),
}

/// A fully qualified build target, `//<base_path>:<short_name>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BuildTarget {
  base_path: String,
  short_name: String,
}

impl BuildTarget {
  pub fn new(base_path: impl Into<String>, short_name: impl Into<String>) -> Self {
    let base_path: String = base_path.into();
    Self {
      base_path: base_path.trim_matches('/').to_string(),
      short_name: short_name.into(),
    }
  }

  /// Directory of the target relative to the project root (may be empty).
  pub fn base_path(&self) -> &str {
    &self.base_path
  }

  pub fn short_name(&self) -> &str {
    &self.short_name
  }

  /// Resolve a gen-path template for this target.
  ///
  /// The `%s` in `template` is replaced with the short name and the result is
  /// placed under `<gen_dir>/<base_path>/`.
  ///
  /// ```
  /// use std::path::{Path, PathBuf};
  /// use cxxcap_lib::target::BuildTarget;
  ///
  /// let target: BuildTarget = "//lib/foo:bar".parse().unwrap();
  /// assert_eq!(
  ///   target.gen_path(Path::new("buck-out/gen"), "infer-out-%s"),
  ///   PathBuf::from("buck-out/gen/lib/foo/infer-out-bar"),
  /// );
  /// ```
  pub fn gen_path(&self, gen_dir: &Path, template: &str) -> PathBuf {
    let name = template.replace("%s", &self.short_name);
    let mut path = gen_dir.to_path_buf();
    if !self.base_path.is_empty() {
      path.push(&self.base_path);
    }
    path.join(name)
  }
}

impl fmt::Display for BuildTarget {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "//{}:{}", self.base_path, self.short_name)
  }
}

impl FromStr for BuildTarget {
  type Err = TargetParseError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let trimmed = s.strip_prefix("//").unwrap_or(s);
    let (base, name) = trimmed
      .rsplit_once(':')
      .ok_or_else(|| TargetParseError::MissingColon(s.to_string()))?;

    if name.is_empty() {
      return Err(TargetParseError::EmptyName(s.to_string()));
    }
    if name.contains('/') || base.contains(':') {
      return Err(TargetParseError::InvalidName(s.to_string()));
    }

    Ok(BuildTarget::new(base, name))
  }
}

impl TryFrom<String> for BuildTarget {
  type Error = TargetParseError;

  fn try_from(value: String) -> Result<Self, Self::Error> {
    value.parse()
  }
}

impl From<BuildTarget> for String {
  fn from(target: BuildTarget) -> Self {
    target.to_string()
  }
}
