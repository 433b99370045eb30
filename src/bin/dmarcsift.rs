// src/bin/dmarcsift.rs
use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use dmarcsift_core::cli::{self, Cli, Commands};
use dmarcsift_core::exit::DmarcExit;

fn main() -> DmarcExit {
    let cli = Cli::parse();
    match dispatch(&cli) {
        Ok(()) => DmarcExit::Success,
        Err(e) => {
            eprintln!("{} {e:#}", "error:".red().bold());
            DmarcExit::for_error(&e)
        }
    }
}

fn dispatch(cli: &Cli) -> Result<()> {
    if cli.init {
        init_logging(cli.verbose);
        return cli::handle_init();
    }
    match &cli.command {
        Some(Commands::Chart { csv, mode, top }) => {
            init_logging(cli.verbose);
            cli::handle_chart(csv, *mode, *top)
        }
        None => {
            // Settings may turn on verbose logging, so they load first.
            let run_config = cli::resolve_run_config(cli)?;
            init_logging(run_config.verbose);
            cli::handle_run(cli, &run_config)
        }
    }
}

fn init_logging(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)),
        )
        .init();
}
