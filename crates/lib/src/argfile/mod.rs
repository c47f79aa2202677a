//! Compiler argument files.
//!
//! The compiler is invoked as `<compiler> @<argfile>` so the command line
//! never hits OS argument-length limits. The argfile holds one token per
//! line, quoted for the GNU response-file syntax that clang and gcc accept:
//!
//! - whitespace separates tokens
//! - `'...'` and `"..."` group characters, a backslash inside escapes the next character
//! - outside quotes a backslash escapes the next character
//!
//! [`escape`] and [`split`] are inverses: `split(escape(t))` yields `[t]` for
//! every token `t`.

mod escape;

pub use escape::{escape, split};

use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::debug;

use crate::consts::ARGFILE_NAME;
use crate::flags::SourceLanguage;

/// Location of the argfile for a given compiler output.
///
/// `<output-parent>/infer-capture.argsfile`
pub fn argfile_path(output: &Path) -> PathBuf {
  output.parent().unwrap_or_else(|| Path::new("")).join(ARGFILE_NAME)
}

/// Build the full compiler argument list for one translation unit.
///
/// The order is fixed: dependency emission first, then the assembled flags,
/// then language, output, compile-only and finally the input.
pub fn compiler_args(
  flags: &[String],
  dep_file: &Path,
  language: SourceLanguage,
  output: &Path,
  input: &Path,
) -> Vec<String> {
  let mut args = Vec::with_capacity(flags.len() + 9);
  args.push("-MD".to_string());
  args.push("-MF".to_string());
  args.push(dep_file.to_string_lossy().to_string());
  args.extend(flags.iter().cloned());
  args.push("-x".to_string());
  args.push(language.as_flag().to_string());
  args.push("-o".to_string());
  args.push(output.to_string_lossy().to_string());
  args.push("-c".to_string());
  args.push(input.to_string_lossy().to_string());
  args
}

/// An argfile and its exact contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgFile {
  pub path: PathBuf,
  pub contents: String,
}

impl ArgFile {
  /// Render `tokens` into argfile contents, one escaped token per line.
  pub fn new(path: impl Into<PathBuf>, tokens: &[String]) -> Self {
    let mut contents = String::new();
    for token in tokens {
      contents.push_str(&escape(token));
      contents.push('\n');
    }
    Self {
      path: path.into(),
      contents,
    }
  }

  /// The tokens the compiler will read back from this argfile.
  pub fn tokens(&self) -> Vec<String> {
    split(&self.contents)
  }

  /// Write the argfile, replacing any previous one.
  ///
  /// The contents go to a sibling temp file first and are renamed into
  /// place, so readers see either the old file or the complete new one.
  pub async fn write(&self) -> std::io::Result<()> {
    let mut temp_name = self.path.as_os_str().to_owned();
    temp_name.push(".tmp");
    let temp_path = PathBuf::from(temp_name);

    debug!(path = %self.path.display(), bytes = self.contents.len(), "writing argfile");

    if let Err(e) = fs::write(&temp_path, self.contents.as_bytes()).await {
      let _ = fs::remove_file(&temp_path).await;
      return Err(e);
    }
    fs::rename(&temp_path, &self.path).await
  }
}
