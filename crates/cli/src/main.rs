// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! `wb` — thin command-line front-end over `waivern-engine`. Kept
//! intentionally minimal: it wires a runbook path to a registry, two
//! filesystem stores, and the executor, and prints the result.

mod commands;
mod env;
mod exit_error;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use waivern_core::RunId;

#[derive(Parser)]
#[command(name = "wb", about = "Run and inspect compliance-analysis runbooks")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Parse, plan, and execute a runbook.
    Run {
        runbook: PathBuf,
        /// Use a specific run id instead of generating one.
        #[arg(long)]
        run_id: Option<RunId>,
    },
    /// Re-run a runbook against an existing run id, skipping artifacts it
    /// already recorded as succeeded.
    Resume { run_id: RunId, runbook: PathBuf },
    /// Print recorded run history.
    ListRuns,
}

fn install_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_env("WAIVERN_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();
}

#[tokio::main]
async fn main() {
    install_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Run { runbook, run_id } => commands::handle_run(&runbook, run_id).await,
        Command::Resume { run_id, runbook } => commands::handle_resume(run_id, &runbook).await,
        Command::ListRuns => commands::handle_list_runs().await,
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(err.code);
    }
}
