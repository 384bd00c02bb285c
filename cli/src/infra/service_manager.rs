//! Service manager infrastructure: implements `ServiceControl` on top of
//! `sc.exe` (Windows SCM) and `systemctl` (systemd).

use std::time::Duration;

use anyhow::{Context, Result};

use crate::application::ports::{CommandRunner, ServiceControl};
use crate::domain::{ServiceManagerKind, ServiceStatus};

/// sc.exe code for "the service is already running".
const SC_ERROR_SERVICE_ALREADY_RUNNING: i32 = 1056;
/// SCM numeric state for `RUNNING`.
const SC_STATE_RUNNING: u32 = 4;

// ── sc.exe ───────────────────────────────────────────────────────────────────

/// Windows Service Control Manager via `sc.exe`.
pub struct ScServiceManager<R: CommandRunner> {
    runner: R,
    timeout: Option<Duration>,
}

impl<R: CommandRunner> ScServiceManager<R> {
    pub fn new(runner: R, timeout: Option<Duration>) -> Self {
        Self { runner, timeout }
    }
}

impl<R: CommandRunner> ServiceControl for ScServiceManager<R> {
    async fn query(&self, name: &str) -> Result<ServiceStatus> {
        let output = self
            .runner
            .run("sc.exe", &["query", name], self.timeout)
            .await?;
        let stdout = String::from_utf8_lossy(&output.stdout);
        anyhow::ensure!(
            output.status.success(),
            "sc query {name} failed ({}): {}",
            output.status,
            stdout.trim()
        );
        parse_sc_query(&stdout)
    }

    async fn start(&self, name: &str) -> Result<()> {
        let output = self
            .runner
            .run("sc.exe", &["start", name], self.timeout)
            .await?;
        let stdout = String::from_utf8_lossy(&output.stdout);
        if output.status.success() || is_already_running(output.status.code(), &stdout) {
            return Ok(());
        }
        anyhow::bail!("sc start {name} failed ({}): {}", output.status, stdout.trim())
    }
}

/// `sc start` on a running service fails with 1056, reported both as the
/// exit code and in the `FAILED 1056:` text.
fn is_already_running(code: Option<i32>, stdout: &str) -> bool {
    code == Some(SC_ERROR_SERVICE_ALREADY_RUNNING)
        || stdout.contains(&format!("FAILED {SC_ERROR_SERVICE_ALREADY_RUNNING}:"))
}

/// Extract the status from `sc query` output.
///
/// Looks for the `STATE : <n>  <NAME>` line; `4 RUNNING` is running,
/// anything else (stopped, paused, pending) is not.
///
/// # Errors
///
/// Returns an error if no parseable `STATE` line exists.
pub fn parse_sc_query(stdout: &str) -> Result<ServiceStatus> {
    let state = stdout
        .lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(key, _)| key.trim() == "STATE")
        .map(|(_, value)| value.trim())
        .context("no STATE line in sc query output")?;
    let code: u32 = state
        .split_whitespace()
        .next()
        .and_then(|n| n.parse().ok())
        .with_context(|| format!("unrecognised service state '{state}'"))?;
    Ok(if code == SC_STATE_RUNNING {
        ServiceStatus::Running
    } else {
        ServiceStatus::NotRunning
    })
}

// ── systemctl ────────────────────────────────────────────────────────────────

/// systemd via `systemctl`.
pub struct SystemdServiceManager<R: CommandRunner> {
    runner: R,
    timeout: Option<Duration>,
}

impl<R: CommandRunner> SystemdServiceManager<R> {
    pub fn new(runner: R, timeout: Option<Duration>) -> Self {
        Self { runner, timeout }
    }
}

impl<R: CommandRunner> ServiceControl for SystemdServiceManager<R> {
    async fn query(&self, name: &str) -> Result<ServiceStatus> {
        let output = self
            .runner
            .run(
                "systemctl",
                &["show", "--property=LoadState,ActiveState", name],
                self.timeout,
            )
            .await?;
        anyhow::ensure!(
            output.status.success(),
            "systemctl show {name} failed ({})",
            output.status
        );
        parse_systemctl_show(&String::from_utf8_lossy(&output.stdout))
            .with_context(|| format!("unit {name}"))
    }

    async fn start(&self, name: &str) -> Result<()> {
        let output = self
            .runner
            .run("systemctl", &["start", name], self.timeout)
            .await?;
        anyhow::ensure!(
            output.status.success(),
            "systemctl start {name} failed ({}): {}",
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        );
        Ok(())
    }
}

/// Interpret `systemctl show --property=LoadState,ActiveState` output.
///
/// # Errors
///
/// Returns an error if the unit is not loaded (`not-found`, `masked`, …).
pub fn parse_systemctl_show(stdout: &str) -> Result<ServiceStatus> {
    let mut load_state = None;
    let mut active_state = None;
    for line in stdout.lines() {
        match line.trim().split_once('=') {
            Some(("LoadState", v)) => load_state = Some(v.trim()),
            Some(("ActiveState", v)) => active_state = Some(v.trim()),
            _ => {}
        }
    }
    match load_state {
        Some("loaded") => {}
        Some(other) => anyhow::bail!("unit is {other}"),
        None => anyhow::bail!("no LoadState in systemctl output"),
    }
    Ok(match active_state {
        Some("active" | "reloading") => ServiceStatus::Running,
        _ => ServiceStatus::NotRunning,
    })
}

// ── Selection ────────────────────────────────────────────────────────────────

/// The service manager chosen by configuration.
pub enum PlatformServiceManager<R: CommandRunner> {
    Sc(ScServiceManager<R>),
    Systemd(SystemdServiceManager<R>),
}

impl<R: CommandRunner> PlatformServiceManager<R> {
    pub fn new(kind: ServiceManagerKind, runner: R, timeout: Option<Duration>) -> Self {
        match kind {
            ServiceManagerKind::Sc => Self::Sc(ScServiceManager::new(runner, timeout)),
            ServiceManagerKind::Systemd => {
                Self::Systemd(SystemdServiceManager::new(runner, timeout))
            }
        }
    }
}

impl<R: CommandRunner> ServiceControl for PlatformServiceManager<R> {
    async fn query(&self, name: &str) -> Result<ServiceStatus> {
        match self {
            Self::Sc(m) => m.query(name).await,
            Self::Systemd(m) => m.query(name).await,
        }
    }

    async fn start(&self, name: &str) -> Result<()> {
        match self {
            Self::Sc(m) => m.start(name).await,
            Self::Systemd(m) => m.start(name).await,
        }
    }
}
