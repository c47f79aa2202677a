//! Compiler dependency files.
//!
//! The compiler is run with `-MD -MF <output>.dep` and writes a make rule
//! naming every file it opened. After a successful tool run that file must
//! exist and contain at least one rule; anything else is a breach of the
//! tool's contract and fails the capture.

pub mod parser;
mod types;

pub use types::*;

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::debug;

use crate::consts::DEP_FILE_SUFFIX;

/// Location of the dependency file for a compiler output: `<output>.dep`.
pub fn dep_file_path(output: &Path) -> PathBuf {
  let mut path = output.as_os_str().to_owned();
  path.push(DEP_FILE_SUFFIX);
  PathBuf::from(path)
}

/// Parse dependency-file contents that were read from `path`.
pub fn parse_dep_file(path: &Path, contents: &[u8]) -> Result<DependencyRecord, DepFileError> {
  let text = std::str::from_utf8(contents).map_err(|e| DepFileError::Malformed {
    path: path.to_path_buf(),
    source: ParseError {
      line: 1 + contents[..e.valid_up_to()].iter().filter(|&&b| b == b'\n').count(),
      column: 0,
      kind: ParseErrorKind::InvalidUtf8,
    },
  })?;

  match parser::parse(text) {
    Ok(Some(record)) => Ok(record),
    Ok(None) => Err(DepFileError::Empty {
      path: path.to_path_buf(),
    }),
    Err(source) => Err(DepFileError::Malformed {
      path: path.to_path_buf(),
      source,
    }),
  }
}

/// Read and parse the dependency file at `path`.
pub async fn read_dep_file(path: &Path) -> Result<DependencyRecord, DepFileError> {
  let contents = match fs::read(path).await {
    Ok(contents) => contents,
    Err(e) if e.kind() == ErrorKind::NotFound => {
      return Err(DepFileError::Missing {
        path: path.to_path_buf(),
      });
    }
    Err(source) => {
      return Err(DepFileError::Read {
        path: path.to_path_buf(),
        source,
      });
    }
  };

  let record = parse_dep_file(path, &contents)?;
  debug!(path = %path.display(), entries = record.len(), "parsed dependency file");
  Ok(record)
}
