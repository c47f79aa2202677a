//! Shared helpers for capture integration tests.

use std::path::{Path, PathBuf};

use cxxcap_lib::capture::BuildInvocation;
use cxxcap_lib::config::CaptureConfig;
use cxxcap_lib::flags::{SourceLanguage, ToolFlags};
use cxxcap_lib::headers::{HeaderVerification, HeaderVerificationMode};
use tempfile::TempDir;

/// Stand-in for the analyzer front-end.
///
/// Records its argv in `argv.txt`, then plays the compiler's part: reads the
/// dependency file path from line 3 of the argfile (`-MD`, `-MF`, `<path>`)
/// and copies `deps.txt` there if the test provided one. Exits with the code
/// in `exit_code` when present, otherwise prints a one-line summary.
const FAKE_INFER: &str = r#"#!/bin/sh
printf '%s\n' "$@" > argv.txt
for arg in "$@"; do last="$arg"; done
argfile="${last#@}"
mkdir -p "$6"
if [ -f exit_code ]; then
  echo "capture failed for $argfile" >&2
  exit "$(cat exit_code)"
fi
dep="$(sed -n 3p "$argfile")"
if [ -f deps.txt ]; then
  cp deps.txt "$dep"
fi
echo "captured $argfile"
"#;

/// A temporary project with a fake analyzer installed outside its tree.
pub struct Project {
  pub temp: TempDir,
  pub root: PathBuf,
  pub infer_bin: PathBuf,
}

impl Project {
  pub fn new() -> Self {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("proj");
    std::fs::create_dir_all(&root).unwrap();
    let root = dunce::canonicalize(&root).unwrap();

    let tools = temp.path().join("tools");
    std::fs::create_dir_all(&tools).unwrap();
    let infer_bin = tools.join("infer");
    std::fs::write(&infer_bin, FAKE_INFER).unwrap();
    #[cfg(unix)]
    {
      use std::os::unix::fs::PermissionsExt;
      std::fs::set_permissions(&infer_bin, std::fs::Permissions::from_mode(0o755)).unwrap();
    }

    let project = Self { temp, root, infer_bin };
    project.write_file("src/a.c", "#include \"foo.h\"\n");
    project.write_file("include/foo.h", "");
    project.write_file("include/unused.h", "");
    project
  }

  /// Write a file relative to the project root.
  pub fn write_file(&self, relative_path: &str, content: &str) {
    let path = self.root.join(relative_path);
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, content).unwrap();
  }

  /// The dependency file the fake analyzer will hand back.
  pub fn set_deps(&self, content: &str) {
    self.write_file("deps.txt", content);
  }

  pub fn set_exit_code(&self, code: i32) {
    self.write_file("exit_code", &code.to_string());
  }

  pub fn read(&self, relative_path: impl AsRef<Path>) -> String {
    std::fs::read_to_string(self.root.join(relative_path)).unwrap()
  }

  pub fn config(&self, mode: HeaderVerificationMode) -> CaptureConfig {
    CaptureConfig {
      infer_bin: self.infer_bin.to_string_lossy().to_string(),
      ..CaptureConfig::default()
    }
    .with_project_root(&self.root)
    .with_header_verification(HeaderVerification::new(mode))
  }
}

pub fn invocation() -> BuildInvocation {
  BuildInvocation {
    target: "//:a".parse().unwrap(),
    input: PathBuf::from("src/a.c"),
    language: SourceLanguage::C,
    output: PathBuf::from("buck-out/gen/a.o"),
    preprocessor_flags: ToolFlags::from(vec!["-DFOO".to_string()]),
    compiler_flags: ToolFlags::from(vec!["-std=c11".to_string()]),
    search_paths: Vec::new(),
  }
}
