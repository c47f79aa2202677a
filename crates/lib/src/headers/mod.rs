//! Header path normalization and verification.
//!
//! The compiler reports dependencies exactly as it opened them: relative to
//! its working directory, relative to a search path, or absolute. This module
//! maps every reported path to one canonical form and decides whether the
//! build was allowed to read it.
//!
//! # Classification
//!
//! - under the project root: in-tree, keyed project-relative
//! - under a whitelisted root: out-of-tree permitted, keyed absolute
//! - anything else: out-of-tree forbidden
//!
//! The translation unit's own input is in-tree by construction.
//!
//! # Modes
//!
//! In `ignore` mode nothing is forbidden. In `warn` mode forbidden headers
//! are logged and dropped from the relevant set. In `error` mode the first
//! forbidden header fails the capture with [`HeaderVerificationError`].

pub mod paths;
mod types;

pub use types::*;

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::{debug, error, warn};

use crate::depfile::DependencyRecord;
use crate::target::BuildTarget;
use paths::{absolute_root, normalize_lexically, project_key};

/// Resolves and classifies dependency paths for one translation unit.
#[derive(Debug, Clone)]
pub struct HeaderNormalizer {
  project_root: PathBuf,
  search_paths: Vec<PathBuf>,
  verification: HeaderVerification,
}

impl HeaderNormalizer {
  /// Create a normalizer.
  ///
  /// A relative `project_root` is made absolute first. Relative search paths
  /// are taken relative to `project_root`.
  pub fn new(project_root: &Path, search_paths: &[PathBuf], verification: HeaderVerification) -> Self {
    let project_root = absolute_root(project_root);
    let search_paths = search_paths
      .iter()
      .map(|p| normalize_lexically(&project_root.join(p)))
      .collect();
    Self {
      project_root,
      search_paths,
      verification,
    }
  }

  pub fn project_root(&self) -> &Path {
    &self.project_root
  }

  pub fn mode(&self) -> HeaderVerificationMode {
    self.verification.mode
  }

  /// Resolve a raw dependency path to a normalized absolute path.
  ///
  /// Relative paths are looked up under the project root first. If nothing
  /// exists there, each search path is tried in order; the first hit wins.
  pub fn resolve(&self, raw: &str) -> PathBuf {
    let raw_path = Path::new(raw);
    let candidate = normalize_lexically(&self.project_root.join(raw_path));
    if raw_path.is_absolute() || candidate.exists() {
      return candidate;
    }

    self
      .search_paths
      .iter()
      .map(|dir| normalize_lexically(&dir.join(raw_path)))
      .find(|path| path.exists())
      .unwrap_or(candidate)
  }

  /// Classify a resolved absolute path and produce its canonical key.
  pub fn classify(&self, resolved: &Path) -> NormalizedDependency {
    if let Ok(relative) = resolved.strip_prefix(&self.project_root) {
      return NormalizedDependency {
        path: relative.to_path_buf(),
        class: DependencyClass::InTree,
      };
    }

    let permitted = |path: PathBuf| NormalizedDependency {
      path,
      class: DependencyClass::OutOfTreePermitted,
    };

    // The lexical form may go through a symlink into the project or a permitted root.
    let real = dunce::canonicalize(resolved).ok();
    if let Some(relative) = real.as_deref().and_then(|r| self.real_project_relative(r)) {
      return NormalizedDependency {
        path: relative,
        class: DependencyClass::InTree,
      };
    }

    if self.verification.mode == HeaderVerificationMode::Ignore
      || self.verification.is_whitelisted(resolved)
      || real.as_deref().is_some_and(|r| self.is_really_whitelisted(r))
    {
      return permitted(resolved.to_path_buf());
    }

    NormalizedDependency {
      path: resolved.to_path_buf(),
      class: DependencyClass::OutOfTreeForbidden,
    }
  }

  fn real_project_relative(&self, real: &Path) -> Option<PathBuf> {
    let root = dunce::canonicalize(&self.project_root).ok()?;
    real.strip_prefix(root).ok().map(Path::to_path_buf)
  }

  fn is_really_whitelisted(&self, real: &Path) -> bool {
    self.verification.whitelist.iter().any(|root| {
      let root = dunce::canonicalize(root).unwrap_or_else(|_| root.clone());
      real.starts_with(root)
    })
  }

  /// Normalize every dependency in `record` and enforce header verification.
  ///
  /// Entries are returned in emission order with duplicates removed. Any
  /// entry naming `input` is in-tree regardless of where it points.
  pub fn normalize_and_verify(
    &self,
    target: &BuildTarget,
    input: &Path,
    record: &DependencyRecord,
  ) -> Result<Vec<NormalizedDependency>, HeaderVerificationError> {
    let input_key = project_key(&self.project_root, input);
    let mut seen = HashSet::new();
    let mut result = Vec::with_capacity(record.len());

    for raw in record.iter() {
      let resolved = self.resolve(raw);

      let dependency = if project_key(&self.project_root, &resolved) == input_key {
        NormalizedDependency {
          path: input_key.clone(),
          class: DependencyClass::InTree,
        }
      } else {
        self.classify(&resolved)
      };

      if dependency.class == DependencyClass::OutOfTreeForbidden {
        match self.verification.mode {
          HeaderVerificationMode::Error => {
            error!(build_target = %target, input = %input.display(), header = %dependency.path.display(), "included an untracked header");
            return Err(HeaderVerificationError {
              target: target.clone(),
              input: input.to_path_buf(),
              header: dependency.path,
            });
          }
          HeaderVerificationMode::Warn => {
            warn!(build_target = %target, input = %input.display(), header = %dependency.path.display(), "included an untracked header");
          }
          HeaderVerificationMode::Ignore => {}
        }
      }

      if seen.insert(dependency.path.clone()) {
        debug!(raw = %raw, path = %dependency.path.display(), class = ?dependency.class, "normalized dependency");
        result.push(dependency);
      }
    }

    Ok(result)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::TempDir;
  use tracing_test::traced_test;

  fn target() -> BuildTarget {
    "//src:a".parse().unwrap()
  }

  fn record(paths: &[&str]) -> DependencyRecord {
    DependencyRecord {
      targets: vec!["buck-out/gen/a.o".to_string()],
      prerequisites: paths.iter().map(|s| s.to_string()).collect(),
    }
  }

  fn normalizer(mode: HeaderVerificationMode) -> HeaderNormalizer {
    HeaderNormalizer::new(
      Path::new("/proj"),
      &[PathBuf::from("/proj/include")],
      HeaderVerification::new(mode),
    )
  }

  #[test]
  fn classify_in_tree_and_forbidden() {
    let n = normalizer(HeaderVerificationMode::Error);

    let inside = n.classify(Path::new("/proj/include/foo.h"));
    assert_eq!(inside.class, DependencyClass::InTree);
    assert_eq!(inside.path, PathBuf::from("include/foo.h"));

    let outside = n.classify(Path::new("/usr/include/bar.h"));
    assert_eq!(outside.class, DependencyClass::OutOfTreeForbidden);
    assert_eq!(outside.path, PathBuf::from("/usr/include/bar.h"));
  }

  #[test]
  fn whitelisted_root_is_permitted() {
    let n = HeaderNormalizer::new(
      Path::new("/proj"),
      &[],
      HeaderVerification::new(HeaderVerificationMode::Error).with_whitelist(["/usr/include"]),
    );

    let dep = n.classify(Path::new("/usr/include/bar.h"));
    assert_eq!(dep.class, DependencyClass::OutOfTreePermitted);
    assert_eq!(dep.path, PathBuf::from("/usr/include/bar.h"));
  }

  #[test]
  fn error_mode_rejects_untracked_header() {
    let n = normalizer(HeaderVerificationMode::Error);
    let err = n
      .normalize_and_verify(
        &target(),
        Path::new("src/a.c"),
        &record(&["src/a.c", "/proj/include/foo.h", "/usr/include/bar.h"]),
      )
      .unwrap_err();

    assert_eq!(err.header, PathBuf::from("/usr/include/bar.h"));
    assert_eq!(err.target, target());
    assert_eq!(
      err.to_string(),
      "//src:a: src/a.c included an untracked header \"/usr/include/bar.h\""
    );
  }

  #[test]
  #[traced_test]
  fn warn_mode_logs_untracked_header() {
    let n = normalizer(HeaderVerificationMode::Warn);
    let deps = n
      .normalize_and_verify(
        &target(),
        Path::new("src/a.c"),
        &record(&["src/a.c", "/proj/include/foo.h", "/usr/include/bar.h"]),
      )
      .unwrap();

    assert_eq!(deps.len(), 3);
    assert_eq!(deps[2].class, DependencyClass::OutOfTreeForbidden);
    assert!(logs_contain("included an untracked header"));
    assert!(logs_contain("/usr/include/bar.h"));
  }

  #[test]
  fn ignore_mode_treats_everything_as_relevant() {
    let n = normalizer(HeaderVerificationMode::Ignore);
    let deps = n
      .normalize_and_verify(&target(), Path::new("src/a.c"), &record(&["/usr/include/bar.h"]))
      .unwrap();

    assert_eq!(deps[0].class, DependencyClass::OutOfTreePermitted);
    assert!(deps.iter().all(|d| d.class.is_relevant()));
  }

  #[test]
  fn input_is_in_tree_by_construction() {
    let n = normalizer(HeaderVerificationMode::Error);
    let deps = n
      .normalize_and_verify(
        &target(),
        Path::new("/elsewhere/gen/a.c"),
        &record(&["/elsewhere/gen/a.c"]),
      )
      .unwrap();

    assert_eq!(deps.len(), 1);
    assert_eq!(deps[0].class, DependencyClass::InTree);
    assert_eq!(deps[0].path, PathBuf::from("/elsewhere/gen/a.c"));
  }

  #[test]
  fn relative_paths_and_duplicates() {
    let n = normalizer(HeaderVerificationMode::Error);
    let deps = n
      .normalize_and_verify(
        &target(),
        Path::new("src/a.c"),
        &record(&["./src/a.c", "include/../include/foo.h", "/proj/include/foo.h"]),
      )
      .unwrap();

    let paths: Vec<_> = deps.iter().map(|d| d.path.clone()).collect();
    assert_eq!(paths, vec![PathBuf::from("src/a.c"), PathBuf::from("include/foo.h")]);
  }

  #[test]
  fn relative_path_resolved_through_search_path() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("proj");
    let sdk = temp.path().join("sdk").join("include");
    std::fs::create_dir_all(&root).unwrap();
    std::fs::create_dir_all(&sdk).unwrap();
    std::fs::write(sdk.join("sdk.h"), "").unwrap();

    let n = HeaderNormalizer::new(
      &root,
      &[sdk.clone()],
      HeaderVerification::new(HeaderVerificationMode::Error).with_whitelist([temp.path().join("sdk")]),
    );

    let resolved = n.resolve("sdk.h");
    assert_eq!(resolved, sdk.join("sdk.h"));
    assert_eq!(n.classify(&resolved).class, DependencyClass::OutOfTreePermitted);
  }

  #[cfg(unix)]
  #[test]
  fn symlink_into_whitelisted_root_is_permitted() {
    let temp = TempDir::new().unwrap();
    let real_root = temp.path().join("toolchain");
    std::fs::create_dir_all(real_root.join("include")).unwrap();
    std::fs::write(real_root.join("include").join("t.h"), "").unwrap();
    let link = temp.path().join("link");
    std::os::unix::fs::symlink(&real_root, &link).unwrap();

    let n = HeaderNormalizer::new(
      Path::new("/proj"),
      &[],
      HeaderVerification::new(HeaderVerificationMode::Error).with_whitelist([real_root.clone()]),
    );

    let dep = n.classify(&link.join("include").join("t.h"));
    assert_eq!(dep.class, DependencyClass::OutOfTreePermitted);
  }

  #[test]
  fn relative_root_still_rejects_system_headers() {
    let n = HeaderNormalizer::new(
      Path::new("."),
      &[],
      HeaderVerification::new(HeaderVerificationMode::Error),
    );
    assert!(n.project_root().is_absolute());

    let dep = n.classify(Path::new("/usr/include/bar.h"));
    assert_eq!(dep.class, DependencyClass::OutOfTreeForbidden);

    let err = n
      .normalize_and_verify(
        &target(),
        Path::new("src/a.c"),
        &record(&["src/a.c", "/usr/include/bar.h"]),
      )
      .unwrap_err();
    assert_eq!(err.header, PathBuf::from("/usr/include/bar.h"));
  }

  #[cfg(unix)]
  #[test]
  fn ignore_mode_keeps_in_tree_key_through_symlinked_root() {
    let temp = TempDir::new().unwrap();
    let real_root = temp.path().join("real");
    std::fs::create_dir_all(real_root.join("include")).unwrap();
    std::fs::write(real_root.join("include").join("foo.h"), "").unwrap();
    let link = temp.path().join("proj");
    std::os::unix::fs::symlink(&real_root, &link).unwrap();

    let n = HeaderNormalizer::new(&link, &[], HeaderVerification::new(HeaderVerificationMode::Ignore));
    let dep = n.classify(&real_root.join("include").join("foo.h"));

    assert_eq!(dep.class, DependencyClass::InTree);
    assert_eq!(dep.path, PathBuf::from("include/foo.h"));
  }
}
