use anyhow::Result;

use scrim_tracker::cli::Command;
use scrim_tracker::{
    handle_community, handle_completions, handle_report, handle_scan, handle_serve, handle_stats,
    handle_watch, interpret,
};

fn main() {
    setup_logging();
    parse_and_execute().unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        std::process::exit(1);
    });
}

fn setup_logging() {
    sensible_env_logger::init!();
}

fn parse_and_execute() -> Result<()> {
    let command = interpret();
    execute_command(&command)
}

fn execute_command(command: &Command) -> Result<()> {
    match command {
        Command::Watch { dry_run } => handle_watch(*dry_run),
        Command::Scan { dry_run } => handle_scan(*dry_run),
        Command::Report { dry_run } => handle_report(*dry_run),
        Command::Serve { port } => handle_serve(*port),
        Command::Stats {
            community,
            mode,
            compact,
        } => handle_stats(community, mode, *compact),
        Command::Community { action } => handle_community(action),
        Command::Completions { shell } => handle_completions(*shell),
    }
}
