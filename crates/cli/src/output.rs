//! Terminal and JSON output for capture results.
//!
//! Dependencies are listed one per line behind a marker for their class, so
//! a reader can tell project headers, permitted system headers and untracked
//! headers apart without colour.

use anyhow::Context;
use clap::ValueEnum;
use owo_colors::{OwoColorize, Stream};

use cxxcap_lib::headers::{DependencyClass, NormalizedDependency};

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
  #[default]
  Text,
  Json,
}

impl OutputFormat {
  pub fn is_json(self) -> bool {
    matches!(self, OutputFormat::Json)
  }
}

pub mod markers {
  pub const DONE: &str = "✓";
  pub const FAILED: &str = "✗";
  pub const UNTRACKED: &str = "⚠";
  pub const IN_TREE: &str = "●";
  pub const PERMITTED: &str = "○";
  pub const FORBIDDEN: &str = "✗";
  pub const ARGFILE_TOKEN: &str = "│";
}

/// Digits of the rule key shown in text output.
const RULE_KEY_DIGITS: usize = 12;

pub fn short_rule_key(key: &str) -> &str {
  key.get(..RULE_KEY_DIGITS).unwrap_or(key)
}

pub fn class_marker(class: DependencyClass) -> &'static str {
  match class {
    DependencyClass::InTree => markers::IN_TREE,
    DependencyClass::OutOfTreePermitted => markers::PERMITTED,
    DependencyClass::OutOfTreeForbidden => markers::FORBIDDEN,
  }
}

pub fn print_dependency(dep: &NormalizedDependency) {
  let marker = class_marker(dep.class);
  let marker = match dep.class {
    DependencyClass::InTree => marker.if_supports_color(Stream::Stdout, |s| s.green()).to_string(),
    DependencyClass::OutOfTreePermitted => marker.if_supports_color(Stream::Stdout, |s| s.blue()).to_string(),
    DependencyClass::OutOfTreeForbidden => marker.if_supports_color(Stream::Stdout, |s| s.red()).to_string(),
  };
  println!("  {} {}", marker, dep.path.display());
}

pub fn print_argfile_token(token: &str) {
  println!(
    "  {} {}",
    markers::ARGFILE_TOKEN.if_supports_color(Stream::Stdout, |s| s.dimmed()),
    token
  );
}

pub fn print_done(message: &str) {
  println!(
    "{} {}",
    markers::DONE.if_supports_color(Stream::Stdout, |s| s.green()),
    message
  );
}

pub fn print_failure(message: &str) {
  eprintln!(
    "{} {}",
    markers::FAILED.if_supports_color(Stream::Stderr, |s| s.red()),
    message.if_supports_color(Stream::Stderr, |s| s.red())
  );
}

pub fn print_untracked(count: usize) {
  eprintln!(
    "{} {}",
    markers::UNTRACKED.if_supports_color(Stream::Stderr, |s| s.yellow()),
    format!("{} untracked header(s) excluded", count).if_supports_color(Stream::Stderr, |s| s.yellow())
  );
}

pub fn print_field(label: &str, value: &str) {
  println!(
    "  {}: {}",
    label.if_supports_color(Stream::Stdout, |s| s.dimmed()),
    value
  );
}

pub fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
  let json = serde_json::to_string_pretty(value).context("Failed to serialize to JSON")?;
  println!("{}", json);
  Ok(())
}
