//! Lexical path helpers shared by the normalizer and the relevance predicate.

use std::path::{Component, Path, PathBuf};

/// Remove `.` components and fold `..` into its parent without touching the
/// filesystem. A `..` at the root is dropped; leading `..` of a relative path
/// is kept.
pub fn normalize_lexically(path: &Path) -> PathBuf {
  let mut out = PathBuf::new();
  for component in path.components() {
    match component {
      Component::Prefix(_) | Component::RootDir => out.push(component.as_os_str()),
      Component::CurDir => {}
      Component::ParentDir => match out.components().next_back() {
        Some(Component::Normal(_)) => {
          out.pop();
        }
        Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
        _ => out.push(".."),
      },
      Component::Normal(name) => out.push(name),
    }
  }
  out
}

/// Make a project root absolute and normalized.
///
/// A relative root is resolved against the working directory, through
/// symlinks when it exists. An empty or relative root would otherwise make
/// every absolute path look like it is inside the project.
pub fn absolute_root(root: &Path) -> PathBuf {
  if root.is_absolute() {
    return normalize_lexically(root);
  }
  let root = if root.as_os_str().is_empty() { Path::new(".") } else { root };
  let resolved = dunce::canonicalize(root)
    .or_else(|_| std::path::absolute(root))
    .unwrap_or_else(|_| root.to_path_buf());
  normalize_lexically(&resolved)
}

/// The canonical key of `path` within a project.
///
/// Relative paths are taken relative to `root`. Paths under `root` become
/// project-relative, anything else stays absolute. `root` must already be
/// normalized.
pub fn project_key(root: &Path, path: &Path) -> PathBuf {
  let normalized = normalize_lexically(&root.join(path));
  match normalized.strip_prefix(root) {
    Ok(relative) => relative.to_path_buf(),
    Err(_) => normalized,
  }
}
