// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Command-line arguments and the settings resolved from them.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use s3io_core::ObjectPath;

use crate::env;
use crate::exit_error::ExitError;

/// Run a command and publish its output to an object store.
///
/// stdout is stored as-is, stderr with a UTC timestamp on every line, and a
/// JSON metadata document describing the run is published at the output
/// directory itself.
#[derive(Parser, Debug)]
#[command(name = "s3io", version)]
pub struct Cli {
    /// Object store endpoint: http://host[:port][/prefix] or file:///path
    /// (default: $S3IO_ENDPOINT)
    #[arg(long, value_name = "URL")]
    pub endpoint: Option<String>,

    /// Bucket for the published output
    #[arg(long = "out-bucket", short = 'b', value_name = "BUCKET")]
    pub out_bucket: String,

    /// Directory within the output bucket for this run
    #[arg(long = "out-dir", short = 'd', value_name = "PATH")]
    pub out_dir: String,

    /// Bucket holding an object to feed to the command's stdin
    #[arg(long = "in-bucket", value_name = "BUCKET", requires = "in_path")]
    pub in_bucket: Option<String>,

    /// Object to feed to the command's stdin
    #[arg(long = "in-path", value_name = "PATH", requires = "in_bucket")]
    pub in_path: Option<String>,

    /// Directory for staging captured output (default: $S3IO_STAGING_DIR or
    /// the system temp dir)
    #[arg(long, value_name = "DIR")]
    pub staging_dir: Option<PathBuf>,

    /// Cancel the run after this many seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Milliseconds a cancelled command gets between SIGTERM and SIGKILL
    /// (default: $S3IO_KILL_GRACE_MS or 5000)
    #[arg(long, value_name = "MS")]
    pub kill_grace_ms: Option<u64>,

    /// Command to run, followed by its arguments
    #[arg(required = true, num_args = 1.., trailing_var_arg = true, allow_hyphen_values = true)]
    pub command: Vec<String>,
}

/// Defaults taken from the environment.
#[derive(Debug, Clone, Default)]
pub struct EnvDefaults {
    pub endpoint: Option<String>,
    pub staging_dir: Option<PathBuf>,
    pub kill_grace: Duration,
}

impl EnvDefaults {
    pub fn from_env() -> Self {
        Self {
            endpoint: env::endpoint(),
            staging_dir: env::staging_dir(),
            kill_grace: env::kill_grace(),
        }
    }
}

/// Remote object to use as the command's stdin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputObject {
    pub bucket: String,
    pub path: ObjectPath,
}

/// Everything a run needs, validated.
#[derive(Debug, Clone)]
pub struct Settings {
    pub endpoint: String,
    pub out_bucket: String,
    pub run_dir: ObjectPath,
    pub input: Option<InputObject>,
    pub staging_dir: Option<PathBuf>,
    pub timeout: Option<Duration>,
    pub kill_grace: Duration,
    pub program: String,
    pub args: Vec<String>,
}

impl Settings {
    /// Flags win over the environment.
    pub fn resolve(cli: Cli, defaults: EnvDefaults) -> Result<Self, ExitError> {
        let endpoint = cli.endpoint.or(defaults.endpoint).ok_or_else(|| {
            ExitError::usage("no object store endpoint: pass --endpoint or set S3IO_ENDPOINT")
        })?;
        if cli.out_bucket.is_empty() {
            return Err(ExitError::usage("--out-bucket must not be empty"));
        }
        let run_dir = ObjectPath::new(&cli.out_dir)
            .map_err(|e| ExitError::usage(format!("invalid --out-dir: {e}")))?;

        let input = match (cli.in_bucket, cli.in_path) {
            (Some(bucket), Some(path)) if !bucket.is_empty() => {
                let path = ObjectPath::new(&path)
                    .map_err(|e| ExitError::usage(format!("invalid --in-path: {e}")))?;
                Some(InputObject { bucket, path })
            }
            (None, None) => None,
            _ => return Err(ExitError::usage("--in-bucket and --in-path go together")),
        };

        let mut command = cli.command.into_iter();
        let program = command
            .next()
            .filter(|p| !p.is_empty())
            .ok_or_else(|| ExitError::usage("no command given"))?;

        Ok(Self {
            endpoint,
            out_bucket: cli.out_bucket,
            run_dir,
            input,
            staging_dir: cli.staging_dir.or(defaults.staging_dir),
            timeout: cli.timeout.map(Duration::from_secs),
            kill_grace: cli.kill_grace_ms.map(Duration::from_millis).unwrap_or(defaults.kill_grace),
            program,
            args: command.collect(),
        })
    }
}

#[cfg(test)]
#[path = "args_tests.rs"]
mod tests;
