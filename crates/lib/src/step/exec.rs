//! Exec step implementation.
//!
//! Runs a program directly from its argv (no shell) and captures both output
//! streams so a failure can be reported with the tool's own diagnostics.

use std::path::Path;
use std::process::Stdio;

use tokio::process::Command;
use tracing::{debug, info};

use super::types::StepError;

/// Options for running a program.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExecOpts {
  pub bin: String,
  pub args: Vec<String>,
}

impl ExecOpts {
  pub fn new(bin: &str) -> Self {
    Self {
      bin: bin.to_string(),
      ..Default::default()
    }
  }

  pub fn with_args(mut self, args: Vec<String>) -> Self {
    self.args = args;
    self
  }

  /// The argv joined with spaces, for logs and error messages.
  pub fn command_line(&self) -> String {
    std::iter::once(self.bin.as_str())
      .chain(self.args.iter().map(String::as_str))
      .collect::<Vec<_>>()
      .join(" ")
  }
}

/// Run `opts` to completion in `project_root`.
///
/// The environment is inherited unchanged. The child is killed if the
/// returned future is dropped before it exits, so cancelling a capture
/// never leaves the tool running.
///
/// # Returns
///
/// The trimmed stdout of the program on a zero exit status.
pub async fn execute_exec(opts: &ExecOpts, project_root: &Path) -> Result<String, StepError> {
  let cmd = opts.command_line();
  info!(cmd = %cmd, "executing command");

  let mut command = Command::new(&opts.bin);
  command
    .args(&opts.args)
    .current_dir(project_root)
    .stdin(Stdio::null())
    .kill_on_drop(true);

  debug!(bin = %opts.bin, working_dir = ?project_root, "spawning process");

  let output = command.output().await.map_err(|source| StepError::Spawn {
    cmd: cmd.clone(),
    source,
  })?;

  let stdout = String::from_utf8_lossy(&output.stdout).to_string();
  let stderr = String::from_utf8_lossy(&output.stderr).to_string();

  if !output.status.success() {
    if !stderr.is_empty() {
      debug!(stderr = %stderr, "command stderr");
    }
    if !stdout.is_empty() {
      debug!(stdout = %stdout, "command stdout");
    }

    return Err(StepError::CmdFailed {
      cmd,
      code: output.status.code(),
      stdout,
      stderr,
    });
  }

  let stdout = stdout.trim().to_string();
  if !stdout.is_empty() {
    debug!(stdout = %stdout, "command output");
  }

  Ok(stdout)
}
