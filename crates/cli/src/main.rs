//! Memory subsystem simulator CLI.
//!
//! Reads one command per line from stdin (or a script file) and prints each
//! result on stdout. Diagnostics and logs go to stderr; set `RUST_LOG` to see
//! allocator, cache, and paging decisions.

mod session;

use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use memsim_core::{Config, Simulator};
use tracing_subscriber::EnvFilter;

use crate::session::SessionOptions;

#[derive(Parser, Debug)]
#[command(
    name = "memsim",
    author,
    version,
    about = "Memory subsystem simulator: allocators, caches, and virtual memory",
    long_about = "Issue one command per line and observe placement, hit/miss, and paging behaviour.\n\nCommands:\n  init memory <size> | init buddy <size> | init_vm <phys> <page>\n  set allocator first_fit|best_fit|worst_fit | set vm_policy fifo|lru\n  malloc <size> | free <id> | dump | stats\n  access <paddr> | vm_access <vaddr> | vm_stats | dump_vm | cache_stats\n  exit"
)]
struct Cli {
    /// JSON configuration file (cache geometry, latencies, default policies).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Read commands from this file instead of stdin.
    #[arg(short, long)]
    script: Option<PathBuf>,

    /// Print statistics as JSON.
    #[arg(long)]
    json_stats: bool,

    /// Do not print the banner or the prompt.
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match cli.config.as_deref().map(Config::from_file).transpose() {
        Ok(config) => config.unwrap_or_default(),
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let mut sim = match Simulator::new(&config) {
        Ok(sim) => sim,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let interactive = cli.script.is_none() && !cli.quiet;
    let opts = SessionOptions {
        prompt: interactive,
        json_stats: cli.json_stats,
    };
    if interactive {
        println!("Memory Simulator");
    }

    let stdout = io::stdout();
    let stderr = io::stderr();
    let result = match &cli.script {
        Some(path) => match File::open(path) {
            Ok(file) => session::run(
                &mut sim,
                BufReader::new(file),
                &mut stdout.lock(),
                &mut stderr.lock(),
                opts,
            ),
            Err(e) => {
                eprintln!("error: {}: {e}", path.display());
                return ExitCode::FAILURE;
            }
        },
        None => session::run(
            &mut sim,
            io::stdin().lock(),
            &mut stdout.lock(),
            &mut stderr.lock(),
            opts,
        ),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
