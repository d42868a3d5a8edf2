// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! s3io: run a command and publish its output to an object store

mod args;
mod cancel;
mod env;
mod execute;
mod exit_error;

use clap::error::ErrorKind;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::args::{Cli, EnvDefaults, Settings};
use crate::exit_error::{ExitError, USAGE};

#[tokio::main]
async fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
                _ => USAGE,
            };
            let _ = e.print();
            std::process::exit(code);
        }
    };

    init_tracing(&env::log_filter());

    let result = match Settings::resolve(cli, EnvDefaults::from_env()) {
        Ok(settings) => execute::run(settings).await,
        Err(e) => Err(e.into()),
    };
    if let Err(e) = result {
        match e.downcast_ref::<ExitError>() {
            Some(exit) => {
                if !exit.message.is_empty() {
                    eprintln!("s3io: {}", exit.message);
                }
                std::process::exit(exit.code);
            }
            None => {
                eprintln!("s3io: {e:#}");
                std::process::exit(1);
            }
        }
    }
}

/// Log to stderr, filtered by `S3IO_LOG` (falls back to `info` if unparsable).
fn init_tracing(directives: &str) {
    let filter = EnvFilter::try_new(directives).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
