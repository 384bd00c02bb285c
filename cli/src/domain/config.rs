//! Domain types and validators for provisioning configuration.
//!
//! Every location the run touches (installer URL, temp paths, agent binary)
//! lives here instead of in constants, so collaborators can be substituted.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::domain::error::ConfigError;
use crate::domain::group::DEFAULT_ROOT_GROUP;

// ── Defaults ─────────────────────────────────────────────────────────────────

pub const DEFAULT_SERVICE_NAME: &str = "EndpointAgent";
pub const DEFAULT_INSTALLER_URL: &str =
    "https://downloads.endpoint-agent.example/agent/latest/agent-installer.msi";
pub const DEFAULT_INSTALLER_FILE: &str = "agent-installer.msi";
pub const DEFAULT_LOG_FILE: &str = "agent-provision.log";
pub const DEFAULT_INSTALLER_PROGRAM: &str = "msiexec";
pub const DEFAULT_SERVICE_TIMEOUT_SECS: u64 = 30;

#[cfg(windows)]
pub const DEFAULT_AGENT_BINARY: &str = r"C:\Program Files\Endpoint Agent\agent.exe";
#[cfg(not(windows))]
pub const DEFAULT_AGENT_BINARY: &str = "/opt/endpoint-agent/bin/agent";

// ── Config schema ────────────────────────────────────────────────────────────

/// Which OS service manager answers service queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceManagerKind {
    /// Windows Service Control Manager via `sc.exe`.
    Sc,
    /// systemd via `systemctl`.
    Systemd,
}

impl Default for ServiceManagerKind {
    fn default() -> Self {
        if cfg!(windows) { Self::Sc } else { Self::Systemd }
    }
}

/// Per-call timeouts in seconds. `None` waits indefinitely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timeouts {
    pub service_secs: Option<u64>,
    pub download_secs: Option<u64>,
    pub install_secs: Option<u64>,
    pub set_group_secs: Option<u64>,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            service_secs: Some(DEFAULT_SERVICE_TIMEOUT_SECS),
            download_secs: None,
            install_secs: None,
            set_group_secs: None,
        }
    }
}

impl Timeouts {
    #[must_use]
    pub fn service(&self) -> Option<Duration> {
        self.service_secs.map(Duration::from_secs)
    }

    #[must_use]
    pub fn download(&self) -> Option<Duration> {
        self.download_secs.map(Duration::from_secs)
    }

    #[must_use]
    pub fn install(&self) -> Option<Duration> {
        self.install_secs.map(Duration::from_secs)
    }

    #[must_use]
    pub fn set_group(&self) -> Option<Duration> {
        self.set_group_secs.map(Duration::from_secs)
    }
}

/// Top-level provisioning configuration, read from `config.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvisionConfig {
    /// Name of the agent's OS service.
    pub service_name: String,
    /// Where the latest installer package is served.
    pub installer_url: String,
    /// Local path the installer is downloaded to.
    pub installer_path: PathBuf,
    /// Expected SHA-256 of the installer, lowercase or uppercase hex.
    pub installer_sha256: Option<String>,
    /// Program that runs the package (`msiexec`).
    pub installer_program: String,
    /// Installed agent executable used for group assignment.
    pub agent_binary: PathBuf,
    /// Root every group path hangs off.
    pub root_group: String,
    /// Run log, truncated at the start of every run.
    pub log_path: PathBuf,
    pub service_manager: ServiceManagerKind,
    pub timeouts: Timeouts,
}

impl Default for ProvisionConfig {
    fn default() -> Self {
        let temp = std::env::temp_dir();
        Self {
            service_name: DEFAULT_SERVICE_NAME.to_string(),
            installer_url: DEFAULT_INSTALLER_URL.to_string(),
            installer_path: temp.join(DEFAULT_INSTALLER_FILE),
            installer_sha256: None,
            installer_program: DEFAULT_INSTALLER_PROGRAM.to_string(),
            agent_binary: PathBuf::from(DEFAULT_AGENT_BINARY),
            root_group: DEFAULT_ROOT_GROUP.to_string(),
            log_path: temp.join(DEFAULT_LOG_FILE),
            service_manager: ServiceManagerKind::default(),
            timeouts: Timeouts::default(),
        }
    }
}

// ── Validators ───────────────────────────────────────────────────────────────

impl ProvisionConfig {
    /// Check the values a run cannot proceed without.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] naming the first invalid field.
    pub fn validate(&self) -> Result<()> {
        if self.service_name.trim().is_empty() {
            return Err(invalid("service_name", &self.service_name, "Must not be empty."));
        }
        if self.root_group.trim().is_empty() {
            return Err(invalid("root_group", &self.root_group, "Must not be empty."));
        }
        if !(self.installer_url.starts_with("https://") || self.installer_url.starts_with("http://"))
        {
            return Err(invalid(
                "installer_url",
                &self.installer_url,
                "Must be an http:// or https:// URL.",
            ));
        }
        if let Some(sum) = &self.installer_sha256 {
            if sum.len() != 64 || !sum.chars().all(|c| c.is_ascii_hexdigit()) {
                return Err(invalid(
                    "installer_sha256",
                    sum,
                    "Must be 64 hexadecimal characters.",
                ));
            }
        }
        Ok(())
    }
}

fn invalid(key: &'static str, value: &str, hint: &'static str) -> anyhow::Error {
    ConfigError::InvalidValue {
        key,
        value: value.to_string(),
        hint,
    }
    .into()
}

// ── Unit tests ───────────────────────────────────────────────────────────────
