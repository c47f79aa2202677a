//! Implementation of the `cxxcap plan` command.
//!
//! Prints the steps a capture would run and the argfile tokens it would
//! write. Nothing is executed and nothing is written.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use cxxcap_lib::capture::BuildStep;
use cxxcap_lib::step::Step;

use crate::output::{print_argfile_token, print_field, short_rule_key};

pub fn cmd_plan(description: &Path) -> Result<()> {
  let rule = super::load_rule(description)?;
  let rule_key = rule.rule_key().context("Failed to compute rule key")?;

  let mut artifacts: Vec<PathBuf> = Vec::new();
  let steps = rule.steps(&mut artifacts);

  println!("Plan: {}", rule.invocation().target);
  print_field("Rule key", short_rule_key(&rule_key.0));
  print_field("Output", &rule.output().display().to_string());
  for artifact in &artifacts {
    print_field("Artifact", &artifact.display().to_string());
  }

  println!();
  println!("Steps:");
  for (index, step) in steps.iter().enumerate() {
    println!("  {}. {}", index + 1, step);
  }

  if let Some(Step::WriteArgFile(argfile)) = steps.iter().find(|s| matches!(s, Step::WriteArgFile(_))) {
    println!();
    println!("Argfile {}:", argfile.path.display());
    for line in argfile.contents.lines() {
      print_argfile_token(line);
    }
  }

  println!();
  println!("{} step(s), nothing executed", steps.len());
  Ok(())
}
