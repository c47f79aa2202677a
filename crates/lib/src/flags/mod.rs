//! Compiler flag assembly.
//!
//! A translation unit is compiled with three independent flag sets:
//! preprocessor flags, header search paths, and compiler flags. This module
//! merges them into the single ordered sequence handed to the compiler.
//!
//! # Ordering
//!
//! Later flags may override earlier ones, so order is part of the contract:
//!
//! 1. platform tier: preprocessor, search paths, compiler
//! 2. rule tier: preprocessor, search paths, compiler
//!
//! Search paths only ever live in the rule tier. For flags built with
//! `ToolFlags::from(Vec<String>)` (rule tier only) the result is simply
//! preprocessor, then search paths, then compiler.

mod types;

pub use types::*;

/// Render search paths as compiler flags, in declaration order.
///
/// No precompiled-header context is involved: every declared root is emitted.
pub fn search_path_flags(search_paths: &[SearchPath]) -> ToolFlags {
  let rule = search_paths.iter().flat_map(SearchPath::to_args).collect();
  ToolFlags {
    platform: Vec::new(),
    rule,
  }
}

/// Merge the three flag sets of a translation unit into one ordered sequence.
pub fn assemble_flags(preprocessor: &ToolFlags, search_paths: &[SearchPath], compiler: &ToolFlags) -> Vec<String> {
  let search = search_path_flags(search_paths);
  ToolFlags::concat([preprocessor, &search, compiler]).all_flags()
}
