// src/cli/mod.rs
//! CLI command handlers.

pub mod args;
pub mod handlers;

pub use args::{Cli, Commands, RunArgs};
pub use handlers::{handle_chart, handle_init, handle_run, resolve_run_config};
