// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wiring settings into a [`Run`].

use anyhow::{Context, Result};
use s3io_capture::{CommandRunner, Run, RunOptions, RunReport, StdinSource};
use s3io_store::{ObjectStore, StoreRouter};
use tokio_util::sync::CancellationToken;

use crate::args::Settings;
use crate::cancel;
use crate::exit_error::ExitError;

/// Run the command against the configured store and report the outcome.
///
/// Prints the metadata document's URI on success.
pub async fn run(settings: Settings) -> Result<()> {
    let store = StoreRouter::open(&settings.endpoint, &settings.out_bucket)
        .map_err(|e| ExitError::usage(e.to_string()))?;

    let cancel = CancellationToken::new();
    cancel::on_signals(cancel.clone()).context("installing signal handlers")?;
    if let Some(timeout) = settings.timeout {
        cancel::after(cancel.clone(), timeout);
    }

    let report = execute(store, settings, cancel).await?;
    if report.metadata_published {
        println!("{}", report.metadata.self_uri);
    }
    report.child.map_err(|e| ExitError::from_child(&e).into())
}

/// Fetch remote stdin if asked for, then run to completion.
pub async fn execute<S: ObjectStore>(
    store: S,
    settings: Settings,
    cancel: CancellationToken,
) -> Result<RunReport> {
    let stdin = match &settings.input {
        Some(input) => {
            let source = store.with_bucket(&input.bucket);
            let reader = source.get_stream(&input.path).await.with_context(|| {
                format!("fetching stdin from {}", source.uri(&input.path))
            })?;
            StdinSource::Reader(reader)
        }
        None => StdinSource::Inherit,
    };

    let mut options = RunOptions::default().kill_grace(settings.kill_grace);
    if let Some(dir) = settings.staging_dir {
        options = options.staging_dir(dir);
    }

    let command = CommandRunner::new(settings.program, settings.args).stdin(stdin);
    let report = Run::new(store, settings.run_dir, command).options(options).execute_until(cancel).await?;
    Ok(report)
}

#[cfg(test)]
#[path = "execute_tests.rs"]
mod tests;
