//! `costline`: explain what each server of a solved deployment plan costs.
//!
//! Reads a solved job document (JSON), rebuilds every server's active days
//! and deployment episodes, and prints the reconstructed cost.

mod cli;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};

use costline::exit_codes;
use costline::io::config::ConfigOverrides;

#[derive(Parser)]
#[command(
    name = "costline",
    version,
    about = "Reconstruct per-server deployment costs of a solved job"
)]
struct Cli {
    /// Config file (defaults to `costline.toml` in the working directory).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Offset used to cut instants into calendar days, e.g. `+02:00`.
    #[arg(long, global = true)]
    utc_offset: Option<String>,

    /// Largest gap in days that still joins two deployments into one episode.
    #[arg(long, global = true)]
    merge_gap_days: Option<u32>,

    /// Reject deployments with missing, unreadable, or reversed dates.
    #[arg(long, global = true)]
    strict: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// Print the cost breakdown of every server, or of one with `--server`.
    Explain {
        /// Job document path, or `-` for stdin.
        job: PathBuf,
        #[arg(long)]
        server: Option<i64>,
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
    /// List the merged episodes and active day ranges of one server.
    Episodes {
        /// Job document path, or `-` for stdin.
        job: PathBuf,
        #[arg(long)]
        server: i64,
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
    /// Write a default `costline.toml`.
    Init {
        /// Overwrite an existing file.
        #[arg(short, long)]
        force: bool,
    },
}

fn main() {
    costline::logging::init();
    match run() {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("{:#}", err);
            std::process::exit(exit_codes::INVALID);
        }
    }
}

fn run() -> Result<i32> {
    let cli = Cli::parse();
    let overrides = ConfigOverrides {
        utc_offset: cli.utc_offset,
        merge_gap_days: cli.merge_gap_days,
        strict: cli.strict,
    };
    let config_path = cli.config.as_deref();
    match cli.command {
        Command::Explain {
            job,
            server,
            format,
        } => cli::explain(config_path, &overrides, &job, server, format),
        Command::Episodes {
            job,
            server,
            format,
        } => cli::episodes(config_path, &overrides, &job, server, format),
        Command::Init { force } => cli::init(config_path, force),
    }
}
