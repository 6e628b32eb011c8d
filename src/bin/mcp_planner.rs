//! MCP planner server binary.
//!
//! Speaks line-delimited JSON-RPC on stdin and stdout; logs go to stderr.

use clap::Parser;
use mcp_planner::app;
use mcp_planner::config::PlannerConfig;
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let config = PlannerConfig::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(config.log_filter()))
        .with_writer(std::io::stderr)
        .init();

    match app::run(&config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "mcp planner stopped");
            ExitCode::FAILURE
        }
    }
}
