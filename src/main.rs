//! procops - process list REPL
//!
//! Entry point that parses CLI arguments, sets up logging and runs the
//! process list REPL over a simulated debugger session.

use clap::Parser;
use procops::app::DebuggerSettings;
use procops::debug::sim::SimManager;
use procops::ui::cli::{run_cli, CliSession};

/// Drive the debugger's process list commands from a terminal
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Number of simulated processes to start with
    #[arg(short, long, default_value_t = 3)]
    processes: usize,

    /// Show process ids in hexadecimal
    #[arg(long, default_value_t = false)]
    hex: bool,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    // 1. Parse command line arguments
    let args = Args::parse();

    // 2. Initialize logger with verbosity level
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(
        match args.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        },
    ))
    .init();

    log::info!("Process list initialized");
    log::debug!("Args: {:?}", args);

    let settings = DebuggerSettings {
        use_hexadecimal: args.hex,
    };
    let session = CliSession::new(SimManager::with_processes(args.processes), settings);

    println!("[*] procops v{}", env!("CARGO_PKG_VERSION"));
    run_cli(session)?;

    Ok(())
}
