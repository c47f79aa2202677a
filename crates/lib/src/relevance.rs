//! Cache-relevance predicate.
//!
//! After a capture succeeds, the caching layer asks which files should be
//! part of the step's cache key. Only files the compiler actually read
//! qualify: the verified dependency set plus the translation unit's input.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::headers::NormalizedDependency;
use crate::headers::paths::{absolute_root, project_key};

/// Answers "does a change to this path invalidate the cached capture?".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheRelevance {
  project_root: PathBuf,
  input: PathBuf,
  relevant: BTreeSet<PathBuf>,
}

impl CacheRelevance {
  /// Build the predicate from normalized dependencies.
  ///
  /// Forbidden entries are excluded. `input` is always relevant.
  pub fn new(project_root: &Path, input: &Path, dependencies: &[NormalizedDependency]) -> Self {
    let project_root = absolute_root(project_root);
    let input = project_key(&project_root, input);

    let mut relevant: BTreeSet<PathBuf> = dependencies
      .iter()
      .filter(|dep| dep.class.is_relevant())
      .map(|dep| dep.path.clone())
      .collect();
    relevant.insert(input.clone());

    Self {
      project_root,
      input,
      relevant,
    }
  }

  /// Whether `candidate` belongs in the cache key.
  ///
  /// `candidate` may be absolute or project-relative.
  pub fn is_relevant(&self, candidate: &Path) -> bool {
    self.relevant.contains(&project_key(&self.project_root, candidate))
  }

  /// The input path, in canonical form.
  pub fn input(&self) -> &Path {
    &self.input
  }

  /// Every relevant path in canonical form, sorted.
  pub fn paths(&self) -> impl Iterator<Item = &Path> {
    self.relevant.iter().map(PathBuf::as_path)
  }

  pub fn len(&self) -> usize {
    self.relevant.len()
  }

  pub fn is_empty(&self) -> bool {
    self.relevant.is_empty()
  }
}
