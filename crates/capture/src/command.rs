// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Spawning and supervising the child process.

use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use tokio::io::AsyncRead;
use tokio::process::{Child, ChildStderr, ChildStdout};
use tokio::task::JoinHandle;

use crate::ChildError;

/// Where the child's standard input comes from.
#[derive(Default)]
pub enum StdinSource {
    /// The parent's own standard input.
    #[default]
    Inherit,
    Null,
    /// Fed from a reader by a background task; closed at end of input.
    Reader(Box<dyn AsyncRead + Send + Unpin>),
}

impl std::fmt::Debug for StdinSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StdinSource::Inherit => f.write_str("Inherit"),
            StdinSource::Null => f.write_str("Null"),
            StdinSource::Reader(_) => f.write_str("Reader(..)"),
        }
    }
}

/// A program and its arguments, ready to start.
#[derive(Debug)]
pub struct CommandRunner {
    program: String,
    args: Vec<String>,
    stdin: StdinSource,
}

impl CommandRunner {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self { program: program.into(), args, stdin: StdinSource::default() }
    }

    s3io_core::setters! {
        set { stdin: StdinSource }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Spawn the child with stdout and stderr piped.
    ///
    /// The child is killed if the returned handle is dropped before it exits.
    pub fn start(self) -> Result<RunningCommand, ChildError> {
        let mut cmd = tokio::process::Command::new(&self.program);
        cmd.args(&self.args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        let mut reader = None;
        match self.stdin {
            StdinSource::Inherit => {
                cmd.stdin(Stdio::inherit());
            }
            StdinSource::Null => {
                cmd.stdin(Stdio::null());
            }
            StdinSource::Reader(r) => {
                cmd.stdin(Stdio::piped());
                reader = Some(r);
            }
        }

        let mut child = cmd
            .spawn()
            .map_err(|source| ChildError::Spawn { program: self.program.clone(), source })?;

        let feeder = match (reader, child.stdin.take()) {
            (Some(mut reader), Some(mut stdin)) => {
                let program = self.program.clone();
                Some(tokio::spawn(async move {
                    // A child that stops reading early closes the pipe; that is its business.
                    if let Err(e) = tokio::io::copy(&mut reader, &mut stdin).await {
                        tracing::debug!(%program, error = %e, "stdin feed ended early");
                    }
                }))
            }
            _ => None,
        };

        Ok(RunningCommand { program: self.program, child, feeder })
    }
}

/// A started child process.
#[derive(Debug)]
pub struct RunningCommand {
    program: String,
    child: Child,
    feeder: Option<JoinHandle<()>>,
}

impl RunningCommand {
    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn id(&self) -> Option<u32> {
        self.child.id()
    }

    pub fn take_stdout(&mut self) -> Option<ChildStdout> {
        self.child.stdout.take()
    }

    pub fn take_stderr(&mut self) -> Option<ChildStderr> {
        self.child.stderr.take()
    }

    /// Wait for the child to exit.
    pub async fn wait(&mut self) -> Result<ExitInfo, ChildError> {
        let status = self
            .child
            .wait()
            .await
            .map_err(|source| ChildError::Wait { program: self.program.clone(), source })?;
        self.stop_feeder();
        Ok(ExitInfo::from_status(status))
    }

    /// Ask the child to stop, then kill it if it has not exited within `grace`.
    pub async fn terminate(&mut self, grace: Duration) -> Result<ExitInfo, ChildError> {
        if let Ok(Some(status)) = self.child.try_wait() {
            self.stop_feeder();
            return Ok(ExitInfo::from_status(status));
        }

        self.send_term();
        match tokio::time::timeout(grace, self.child.wait()).await {
            Ok(Ok(status)) => {
                self.stop_feeder();
                Ok(ExitInfo::from_status(status))
            }
            Ok(Err(source)) => Err(ChildError::Wait { program: self.program.clone(), source }),
            Err(_) => {
                tracing::warn!(program = %self.program, ?grace, "child ignored SIGTERM, killing");
                if let Err(e) = self.child.start_kill() {
                    tracing::warn!(program = %self.program, error = %e, "failed to kill child");
                }
                self.wait().await
            }
        }
    }

    #[cfg(unix)]
    fn send_term(&self) {
        use nix::sys::signal::{kill, Signal};
        use nix::unistd::Pid;

        let Some(pid) = self.child.id() else { return };
        let Ok(pid) = i32::try_from(pid) else { return };
        if let Err(e) = kill(Pid::from_raw(pid), Signal::SIGTERM) {
            tracing::debug!(program = %self.program, error = %e, "SIGTERM failed");
        }
    }

    #[cfg(not(unix))]
    fn send_term(&mut self) {
        let _ = self.child.start_kill();
    }

    fn stop_feeder(&mut self) {
        if let Some(feeder) = self.feeder.take() {
            feeder.abort();
        }
    }
}

/// How the child ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitInfo {
    /// Exit code, absent when killed by a signal.
    pub code: Option<i32>,
    /// Terminating signal on unix.
    pub signal: Option<i32>,
}

impl ExitInfo {
    pub fn from_status(status: ExitStatus) -> Self {
        #[cfg(unix)]
        let signal = std::os::unix::process::ExitStatusExt::signal(&status);
        #[cfg(not(unix))]
        let signal = None;
        Self { code: status.code(), signal }
    }

    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// `Ok` for a zero exit, otherwise the matching [`ChildError`].
    pub fn check(&self, program: &str) -> Result<(), ChildError> {
        match (self.code, self.signal) {
            (Some(0), _) => Ok(()),
            (Some(code), _) => Err(ChildError::Exited { program: program.to_string(), code }),
            (None, Some(signal)) => {
                Err(ChildError::Signaled { program: program.to_string(), signal })
            }
            (None, None) => Err(ChildError::Exited { program: program.to_string(), code: -1 }),
        }
    }
}

#[cfg(test)]
#[path = "command_tests.rs"]
mod tests;
