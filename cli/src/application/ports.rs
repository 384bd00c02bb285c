//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain`, never from `crate::infra`,
//! `crate::cli`, or `crate::output`.

use std::path::Path;
use std::process::Output;
use std::time::Duration;

use anyhow::Result;

use crate::domain::{AccessKey, GroupPath, InstallError, ServiceStatus, Severity};

// ── Command Runner Port ───────────────────────────────────────────────────────

/// Abstracts process execution so infrastructure can be swapped or mocked.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run a program to completion and capture its output.
    ///
    /// `timeout` of `None` waits indefinitely.
    ///
    /// # Errors
    ///
    /// Returns a [`crate::domain::CommandError`] (boxed in `anyhow`) if the
    /// process cannot be spawned or exceeds `timeout`. On timeout the child
    /// is killed, not left orphaned.
    async fn run(&self, program: &str, args: &[&str], timeout: Option<Duration>)
    -> Result<Output>;

    /// Start a program and return without waiting for it.
    ///
    /// The child outlives this handle: it is never awaited and never killed.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned.
    fn spawn_detached(&self, program: &str, args: &[&str]) -> Result<()>;
}

// ── Service Manager Port ──────────────────────────────────────────────────────

/// OS service manager: query and start a service by name.
#[allow(async_fn_in_trait)]
pub trait ServiceControl {
    /// Report the status of `name`. Fails if the service does not exist or
    /// the manager cannot be reached.
    async fn query(&self, name: &str) -> Result<ServiceStatus>;
    /// Ask the manager to start `name`.
    async fn start(&self, name: &str) -> Result<()>;
}

// ── Installer Ports ───────────────────────────────────────────────────────────

/// Fetches the installer package to a local path.
#[allow(async_fn_in_trait)]
pub trait InstallerSource {
    /// Download `url` to `dest`, replacing any existing file.
    async fn download(&self, url: &str, dest: &Path) -> Result<()>;
}

/// Abstracts file hashing operations.
pub trait FileHasher {
    /// Compute the lowercase hex SHA-256 of a file.
    fn sha256_file(&self, path: &Path) -> Result<String>;
}

/// Runs the installer package unattended.
#[allow(async_fn_in_trait)]
pub trait InstallerRunner {
    /// Install silently without restarting, passing `key` to the package.
    ///
    /// Returns the installer's exit code. An `Err` means no exit code was
    /// produced at all.
    async fn install(&self, installer: &Path, key: &AccessKey) -> Result<i32, InstallError>;
}

// ── Agent Port ────────────────────────────────────────────────────────────────

/// Commands understood by the installed agent binary.
#[allow(async_fn_in_trait)]
pub trait AgentControl {
    /// Move the device into `path`, waiting for the agent to exit.
    /// Returns the agent's exit code.
    async fn set_group(&self, path: &GroupPath) -> Result<i32>;
    /// Dispatch a deregister request without waiting for it.
    fn deregister(&self) -> Result<()>;
}

// ── Run Log Port ──────────────────────────────────────────────────────────────

/// Append-only run log, optionally echoed to the console.
pub trait RunLog {
    /// Append a timestamped `message`. When `to_console` is set the line is
    /// also written to stdout (`Normal`, `Success`) or stderr (`Error`).
    ///
    /// # Errors
    ///
    /// Returns an error if the log file cannot be written.
    fn log(&self, message: &str, severity: Severity, to_console: bool) -> Result<()>;

    /// Shorthand for a console-visible normal line.
    ///
    /// # Errors
    ///
    /// Returns an error if the log file cannot be written.
    fn info(&self, message: &str) -> Result<()> {
        self.log(message, Severity::Normal, true)
    }

    /// Shorthand for a console-visible completed-step line.
    ///
    /// # Errors
    ///
    /// Returns an error if the log file cannot be written.
    fn success(&self, message: &str) -> Result<()> {
        self.log(message, Severity::Success, true)
    }

    /// Shorthand for a console-visible error line.
    ///
    /// # Errors
    ///
    /// Returns an error if the log file cannot be written.
    fn error(&self, message: &str) -> Result<()> {
        self.log(message, Severity::Error, true)
    }
}
