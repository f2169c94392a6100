// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Reload trigger for the authoritative server.
//!
//! After a new zone file is in place the configured command (for example
//! `rndc reload example.com`) is run once. The command line is split on
//! whitespace into a program and its arguments; there is no shell, quoting or
//! escaping, so arguments cannot contain spaces.

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, error, info};

use crate::sync_errors::SyncError;

/// Result of a successful reload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReloadOutput {
    /// Exit status, `None` if the process was terminated by a signal
    pub status_code: Option<i32>,
    /// Combined stdout and stderr
    pub output: String,
}

/// Tells the DNS server to pick up the new zone file.
#[async_trait]
pub trait Reloader: Send + Sync {
    /// Trigger one reload.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::ReloadFailure`] if the reload could not be started
    /// or did not succeed.
    async fn reload(&self) -> Result<ReloadOutput, SyncError>;
}

/// Runs an external command to reload the server.
#[derive(Debug, Clone)]
pub struct CommandReloader {
    command_line: String,
    program: String,
    args: Vec<String>,
}

impl CommandReloader {
    /// Parse `command_line` into a program and arguments.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::ConfigInvalid`] if the command line is empty.
    pub fn new(command_line: &str) -> Result<Self, SyncError> {
        let mut argv = split_command_line(command_line);
        if argv.is_empty() {
            return Err(SyncError::config("reload command must not be empty"));
        }
        let program = argv.remove(0);
        Ok(Self {
            command_line: command_line.trim().to_string(),
            program,
            args: argv,
        })
    }

    /// Program that will be executed.
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Arguments passed to the program.
    #[must_use]
    pub fn args(&self) -> &[String] {
        &self.args
    }

    fn failure(&self, reason: impl Into<String>) -> SyncError {
        SyncError::ReloadFailure {
            command: self.command_line.clone(),
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl Reloader for CommandReloader {
    async fn reload(&self) -> Result<ReloadOutput, SyncError> {
        debug!(command = %self.command_line, "Running reload command");

        let result = Command::new(&self.program)
            .args(&self.args)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| self.failure(format!("failed to start: {e}")))?;

        let mut output = String::from_utf8_lossy(&result.stdout).into_owned();
        output.push_str(&String::from_utf8_lossy(&result.stderr));
        let status_code = result.status.code();

        info!(
            command = %self.command_line,
            status = ?status_code,
            output = %output.trim_end(),
            "Reload command finished"
        );

        if !result.status.success() {
            error!(
                command = %self.command_line,
                status = %result.status,
                "Reload command failed"
            );
            return Err(self.failure(format!("{}: {}", result.status, output.trim_end())));
        }

        Ok(ReloadOutput {
            status_code,
            output,
        })
    }
}

/// Split a command line on whitespace. Runs of whitespace never produce
/// empty arguments.
#[must_use]
pub fn split_command_line(command_line: &str) -> Vec<String> {
    command_line
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Run `command_line` once. See [`CommandReloader`].
///
/// # Errors
///
/// Returns [`SyncError::ConfigInvalid`] for an empty command line and
/// [`SyncError::ReloadFailure`] if the command cannot be spawned or exits
/// non-zero.
pub async fn reload(command_line: &str) -> Result<ReloadOutput, SyncError> {
    CommandReloader::new(command_line)?.reload().await
}

#[cfg(test)]
#[path = "reload_tests.rs"]
mod reload_tests;
