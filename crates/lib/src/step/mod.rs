//! Step execution.
//!
//! A build rule plans an ordered list of [`Step`]s; this module runs them.
//! Steps run strictly one after another and the first failure stops the
//! sequence, returning that step's error unchanged.
//!
//! # Step Types
//!
//! - [`Step::Mkdir`] - ensure a directory exists
//! - [`Step::WriteArgFile`] - write a compiler argfile atomically
//! - [`Step::Exec`] - run a program and require a zero exit status

pub mod exec;
mod types;

pub use types::*;

use std::path::Path;

use tokio::fs;
use tracing::{debug, info};

use exec::execute_exec;

/// Execute a single step.
pub async fn execute_step(step: &Step, project_root: &Path) -> Result<StepResult, StepError> {
  debug!(step = step.short_name(), description = %step, "running step");

  let output = match step {
    Step::Mkdir { path } => {
      let full = project_root.join(path);
      fs::create_dir_all(&full).await.map_err(|source| StepError::CreateDir {
        path: path.clone(),
        source,
      })?;
      String::new()
    }

    Step::WriteArgFile(argfile) => {
      let mut resolved = argfile.clone();
      resolved.path = project_root.join(&argfile.path);
      resolved.write().await.map_err(|source| StepError::WriteArgFile {
        path: argfile.path.clone(),
        source,
      })?;
      String::new()
    }

    Step::Exec(opts) => execute_exec(opts, project_root).await?,
  };

  Ok(StepResult {
    step: step.short_name(),
    output,
  })
}

/// Execute `steps` in order, stopping at the first failure.
pub async fn run_steps(steps: &[Step], project_root: &Path) -> Result<Vec<StepResult>, StepError> {
  let mut results = Vec::with_capacity(steps.len());

  for (index, step) in steps.iter().enumerate() {
    let result = execute_step(step, project_root).await?;
    debug!(index, step = result.step, "step complete");
    results.push(result);
  }

  info!(count = results.len(), "all steps complete");
  Ok(results)
}
