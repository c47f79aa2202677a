mod cmd;
mod output;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use cxxcap_lib::headers::HeaderVerificationMode;

use crate::cmd::{cmd_capture, cmd_depfile, cmd_plan};
use crate::output::{OutputFormat, print_failure};

/// Run the static analyzer's capture front-end over C-family compilations
#[derive(Parser)]
#[command(name = "cxxcap")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable verbose output
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Capture one translation unit described by a JSON file
  Capture {
    /// Path to the capture description
    description: PathBuf,

    /// Output format
    #[arg(short = 'o', long, value_enum, default_value = "text")]
    format: OutputFormat,
  },

  /// Show the steps and argfile a capture would run, without running them
  Plan {
    /// Path to the capture description
    description: PathBuf,
  },

  /// Normalize and verify an existing dependency file
  Depfile {
    /// Path to the dependency file
    path: PathBuf,

    /// Project root the dependency paths are classified against
    #[arg(long)]
    project_root: PathBuf,

    /// Translation unit input, relative to the project root
    #[arg(long)]
    input: PathBuf,

    /// Header verification mode
    #[arg(long, default_value = "error")]
    mode: HeaderVerificationMode,

    /// Root outside the project headers may come from (repeatable)
    #[arg(long = "whitelist")]
    whitelist: Vec<PathBuf>,

    /// Header search path used to resolve relative entries (repeatable)
    #[arg(long = "search-path")]
    search_paths: Vec<PathBuf>,

    /// Owning build target, used in verification messages
    #[arg(long, default_value = "//:depfile")]
    target: String,
  },
}

fn main() {
  let cli = Cli::parse();

  let filter = if cli.verbose {
    EnvFilter::new("debug")
  } else {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
  };
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  let result = match cli.command {
    Commands::Capture { description, format } => cmd_capture(&description, format),
    Commands::Plan { description } => cmd_plan(&description),
    Commands::Depfile {
      path,
      project_root,
      input,
      mode,
      whitelist,
      search_paths,
      target,
    } => cmd_depfile(cmd::DepfileArgs {
      path,
      project_root,
      input,
      mode,
      whitelist,
      search_paths,
      target,
    }),
  };

  if let Err(e) = result {
    print_failure(&format!("{:#}", e));
    std::process::exit(1);
  }
}
