//! Implementation of the `cxxcap capture` command.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use cxxcap_lib::capture::{CaptureError, run_capture};
use cxxcap_lib::headers::DependencyClass;
use cxxcap_lib::step::StepError;

use crate::output::{OutputFormat, print_dependency, print_done, print_field, print_json, short_rule_key};

#[derive(Serialize)]
struct CaptureOutput {
  target: String,
  rule_key: String,
  results_dir: String,
  tool_output: String,
  relevant_inputs: Vec<String>,
  dependencies: Vec<DependencyOutput>,
}

#[derive(Serialize)]
struct DependencyOutput {
  path: String,
  class: DependencyClass,
}

pub fn cmd_capture(description: &Path, format: OutputFormat) -> Result<()> {
  let rule = super::load_rule(description)?;
  let rule_key = rule.rule_key().context("Failed to compute rule key")?;

  let rt = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;
  let result = match rt.block_on(run_capture(&rule)) {
    Ok(result) => result,
    Err(e) => {
      if let CaptureError::Step(StepError::CmdFailed { stderr, .. }) = &e {
        if !stderr.trim().is_empty() {
          eprintln!("{}", stderr.trim_end());
        }
      }
      return Err(e).with_context(|| format!("Capture of {} failed", rule.invocation().target));
    }
  };

  if format.is_json() {
    print_json(&CaptureOutput {
      target: rule.invocation().target.to_string(),
      rule_key: rule_key.0,
      results_dir: result.results_dir.display().to_string(),
      tool_output: result.tool_output.clone(),
      relevant_inputs: result.relevance.paths().map(|p| p.display().to_string()).collect(),
      dependencies: result
        .dependencies
        .iter()
        .map(|d| DependencyOutput {
          path: d.path.display().to_string(),
          class: d.class,
        })
        .collect(),
    })?;
  } else {
    print_done(&format!("Captured {}", rule.invocation().target));
    print_field("Results", &result.results_dir.display().to_string());
    print_field("Rule key", short_rule_key(&rule_key.0));
    print_field("Relevant inputs", &result.relevance.len().to_string());
    if !result.tool_output.is_empty() {
      print_field("Analyzer", &result.tool_output);
    }
    for dep in &result.dependencies {
      print_dependency(dep);
    }
  }

  Ok(())
}
