//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::application`,
//! `tokio`, `std::fs`, or `std::net`. All error types implement
//! `thiserror::Error` and convert to `anyhow::Error` via the `?` operator.

use thiserror::Error;

// ── Run errors ────────────────────────────────────────────────────────────────

/// Fatal failures on the provisioning path. Every variant ends the run with
/// exit code 1.
#[derive(Debug, Error)]
pub enum ProvisionError {
    #[error(
        "Agent service '{service}' is installed but could not be started: {reason}\n\nStart it manually (for example `sc start {service}`) and check the system event log."
    )]
    ServiceStart { service: String, reason: String },

    #[error("Failed to download the agent installer from {url}: {reason}")]
    Download { url: String, reason: String },

    #[error("Installer checksum mismatch: expected {expected}, got {actual}")]
    Checksum { expected: String, actual: String },

    #[error("Could not launch the installer with {program}: {reason}")]
    InstallLaunch { program: String, reason: String },

    #[error("Installer did not finish within {secs}s and was stopped")]
    InstallTimedOut { secs: u64 },

    #[error("Installer was terminated before reporting an exit code")]
    InstallTerminated,

    #[error("Agent installation failed with exit code {code}")]
    InstallerFailed { code: i32 },
}

// ── Process errors ────────────────────────────────────────────────────────────

/// Failures of a child process that never produced an exit code.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} timed out after {secs}s")]
    TimedOut { program: String, secs: u64 },

    #[error("{program} was terminated by a signal")]
    Terminated { program: String },
}

/// Installer invocation failures that are not an installer exit code.
#[derive(Debug, Error)]
pub enum InstallError {
    #[error("{0}")]
    Launch(String),

    #[error("timed out after {0}s")]
    TimedOut(u64),

    #[error("terminated before exit")]
    Terminated,
}

// ── Group assignment errors ───────────────────────────────────────────────────

/// Post-install group assignment failures. Logged, never fatal.
#[derive(Debug, Error)]
pub enum GroupAssignError {
    #[error("setting group '{path}' failed: {reason}")]
    SetGroup { path: String, reason: String },

    #[error("setting group '{path}' exited with code {code}")]
    SetGroupExit { path: String, code: i32 },

    #[error("deregister dispatch failed: {reason}")]
    Deregister { reason: String },
}

// ── Input errors ──────────────────────────────────────────────────────────────

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AccessKeyError {
    #[error(
        "access key must be GUID-shaped, e.g. aaaaaaaa-bbbb-cccc-dddd-eeeeeeeeeeee (braces and dashes optional)"
    )]
    Malformed,
}

/// Errors related to configuration values.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value}\n\n{hint}")]
    InvalidValue {
        key: &'static str,
        value: String,
        hint: &'static str,
    },
}
