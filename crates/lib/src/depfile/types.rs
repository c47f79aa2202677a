use std::path::PathBuf;

use thiserror::Error;

/// The parsed contents of a compiler dependency file.
///
/// `targets` holds the names before the first `:`; `prerequisites` holds
/// every path after it, in emission order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DependencyRecord {
  pub targets: Vec<String>,
  pub prerequisites: Vec<String>,
}

impl DependencyRecord {
  pub fn len(&self) -> usize {
    self.prerequisites.len()
  }

  pub fn is_empty(&self) -> bool {
    self.prerequisites.is_empty()
  }

  pub fn iter(&self) -> impl Iterator<Item = &str> {
    self.prerequisites.iter().map(String::as_str)
  }
}

/// What went wrong at a given position in a dependency file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
  #[error("backslash continuation at end of file")]
  UnbalancedContinuation,

  #[error("unrecognized escape sequence '\\{0}'")]
  UnknownEscape(char),

  #[error("unescaped '$' (expected '$$')")]
  UnescapedDollar,

  #[error("rule has no ':' separator")]
  MissingColon,

  #[error("rule has no target before ':'")]
  MissingTarget,

  #[error("unexpected second ':' in rule")]
  UnexpectedColon,

  #[error("additional rule for '{0}' lists prerequisites")]
  ExtraRule(String),

  #[error("contents are not valid UTF-8")]
  InvalidUtf8,
}

/// A syntax error in a dependency file, with a 1-based position.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}, column {column}: {kind}")]
pub struct ParseError {
  pub line: usize,
  pub column: usize,
  pub kind: ParseErrorKind,
}

/// Errors reading the dependency file the compiler was asked to emit.
///
/// All of these mean the tool reported success without honoring its
/// dependency-emission contract.
#[derive(Debug, Error)]
pub enum DepFileError {
  #[error("dependency file not found: {path}")]
  Missing { path: PathBuf },

  #[error("failed to read dependency file {path}: {source}")]
  Read {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("dependency file is empty: {path}")]
  Empty { path: PathBuf },

  #[error("malformed dependency file {path}: {source}")]
  Malformed {
    path: PathBuf,
    #[source]
    source: ParseError,
  },
}
