//! Test helpers that build [`ExecOpts`] for small host programs.
//!
//! Unix uses `/bin/sh` and coreutils; Windows goes through `cmd.exe` and
//! PowerShell.

use crate::step::exec::ExecOpts;

/// Run `script` through the platform shell.
pub fn shell(script: &str) -> ExecOpts {
  #[cfg(unix)]
  let (bin, flag) = ("/bin/sh", "-c");
  #[cfg(windows)]
  let (bin, flag) = ("cmd.exe", "/C");
  ExecOpts::new(bin).with_args(vec![flag.to_string(), script.to_string()])
}

/// Create an empty file, relative to the working directory.
pub fn touch(filename: &str) -> ExecOpts {
  #[cfg(unix)]
  return ExecOpts::new("/usr/bin/touch").with_args(vec![filename.to_string()]);
  #[cfg(windows)]
  return ExecOpts::new("powershell.exe").with_args(vec![
    "-NoProfile".to_string(),
    "-Command".to_string(),
    format!("New-Item -ItemType File -Path '{}' -Force | Out-Null", filename),
  ]);
}

/// Print `msg` without any shell word splitting on Unix.
pub fn echo(msg: &str) -> ExecOpts {
  #[cfg(unix)]
  return ExecOpts::new("/bin/echo").with_args(vec![msg.to_string()]);
  #[cfg(windows)]
  return shell(&format!("echo {}", msg));
}
