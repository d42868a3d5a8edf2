// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Triggers that cancel a run from outside.

use std::time::Duration;

use tokio_util::sync::CancellationToken;

/// Cancel on SIGINT or SIGTERM.
#[cfg(unix)]
pub fn on_signals(cancel: CancellationToken) -> std::io::Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut interrupt = signal(SignalKind::interrupt())?;
    let mut terminate = signal(SignalKind::terminate())?;
    tokio::spawn(async move {
        let name = tokio::select! {
            _ = interrupt.recv() => "SIGINT",
            _ = terminate.recv() => "SIGTERM",
            _ = cancel.cancelled() => return,
        };
        tracing::warn!(signal = name, "cancelling run");
        cancel.cancel();
    });
    Ok(())
}

#[cfg(not(unix))]
pub fn on_signals(cancel: CancellationToken) -> std::io::Result<()> {
    tokio::spawn(async move {
        tokio::select! {
            result = tokio::signal::ctrl_c() => {
                if result.is_ok() {
                    tracing::warn!("cancelling run");
                    cancel.cancel();
                }
            }
            _ = cancel.cancelled() => {}
        }
    });
    Ok(())
}

/// Cancel once `timeout` has elapsed.
pub fn after(cancel: CancellationToken, timeout: Duration) {
    tokio::spawn(async move {
        tokio::select! {
            _ = tokio::time::sleep(timeout) => {
                tracing::warn!(?timeout, "run timed out, cancelling");
                cancel.cancel();
            }
            _ = cancel.cancelled() => {}
        }
    });
}

#[cfg(test)]
#[path = "cancel_tests.rs"]
mod tests;
