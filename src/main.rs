mod build;
mod cli;
mod commands;
mod disposables;
mod error;
mod help;
mod renderer;
mod theme;
mod utils;

use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> Result<ExitCode> {
    init_logging();
    let cli = cli::Cli::parse();
    commands::run(cli)
}

/// 诊断日志写到 stderr，默认只输出 warn 及以上，可用 TAILWIND_THEME_LOG 调整
fn init_logging() {
    let filter =
        EnvFilter::try_from_env("TAILWIND_THEME_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
