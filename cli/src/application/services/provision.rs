//! Application service: the provisioning run.
//!
//! Sequence: inspect service → (download → verify → install → group).
//! Imports only from `crate::domain` and `crate::application`.
//! All I/O is routed through injected port traits.

use anyhow::Result;

use crate::application::ports::{
    AgentControl, FileHasher, InstallerRunner, InstallerSource, RunLog, ServiceControl,
};
use crate::application::services::agent_state::{AgentState, ensure_running};
use crate::application::services::group_assign::{GroupAssignment, assign_group};
use crate::domain::group::non_blank;
use crate::domain::{
    AccessKey, GroupPath, InstallError, InstallOutcome, ProvisionConfig, ProvisionError, Severity,
};

/// The collaborators a run talks to.
pub struct Collaborators<'a, S, D, H, I, A, L> {
    pub services: &'a S,
    pub source: &'a D,
    pub hasher: &'a H,
    pub installer: &'a I,
    pub agent: &'a A,
    pub log: &'a L,
}

/// Caller-supplied inputs for one run.
pub struct ProvisionRequest<'a> {
    pub access_key: &'a AccessKey,
    pub group_name: Option<&'a str>,
    pub parent_group_name: Option<&'a str>,
}

/// How a successful run ended. Every variant maps to exit code 0.
#[derive(Debug)]
pub enum RunOutcome {
    AlreadyRunning,
    Started,
    Installed {
        outcome: InstallOutcome,
        /// `None` when no group name was given.
        group: Option<GroupAssignment>,
    },
}

/// Provision the agent.
///
/// # Errors
///
/// Returns a [`ProvisionError`] for every fatal failure (service start,
/// download, checksum, install). Those are logged before returning. Any
/// other error is a run-log write failure.
pub async fn provision<S, D, H, I, A, L>(
    ports: &Collaborators<'_, S, D, H, I, A, L>,
    config: &ProvisionConfig,
    request: &ProvisionRequest<'_>,
) -> Result<RunOutcome>
where
    S: ServiceControl,
    D: InstallerSource,
    H: FileHasher,
    I: InstallerRunner,
    A: AgentControl,
    L: RunLog,
{
    let log = ports.log;
    log.log(
        &format!(
            "Provisioning agent service '{}' with access key {}",
            config.service_name, request.access_key
        ),
        Severity::Normal,
        false,
    )?;

    match ensure_running(ports.services, log, &config.service_name).await? {
        AgentState::AlreadyRunning => return Ok(RunOutcome::AlreadyRunning),
        AgentState::Started => return Ok(RunOutcome::Started),
        AgentState::NotInstalled => {}
    }

    // Step 1: Download the installer.
    log.info(&format!(
        "Downloading installer from {} to {}...",
        config.installer_url,
        config.installer_path.display()
    ))?;
    if let Err(e) = ports
        .source
        .download(&config.installer_url, &config.installer_path)
        .await
    {
        return fail(
            log,
            ProvisionError::Download {
                url: config.installer_url.clone(),
                reason: format!("{e:#}"),
            },
        );
    }
    log.info("Installer downloaded.")?;

    // Step 2: Verify the package.
    verify_installer(ports.hasher, log, config)?;

    // Step 3: Install.
    log.info("Installing agent silently...")?;
    let code = match ports
        .installer
        .install(&config.installer_path, request.access_key)
        .await
    {
        Ok(code) => code,
        Err(e) => return fail(log, install_error(config, e)),
    };
    let outcome = InstallOutcome::from_exit_code(code);
    if !outcome.is_success() {
        return fail(log, ProvisionError::InstallerFailed { code });
    }
    log.success(&format!("Agent installed: {outcome}."))?;
    if outcome.reboot_pending() {
        log.info("A reboot is pending to complete the installation.")?;
    }

    // Step 4: Group assignment (optional, non-fatal).
    let path = GroupPath::compose(
        &config.root_group,
        request.group_name,
        request.parent_group_name,
    );
    let group = match path {
        Some(path) => Some(assign_group(ports.agent, log, &path).await?),
        None => {
            if non_blank(request.parent_group_name).is_some() {
                log.info("Parent group given without a group name; skipping group assignment.")?;
            }
            None
        }
    };

    Ok(RunOutcome::Installed { outcome, group })
}

/// Hash the downloaded package, log it, and compare against the configured
/// checksum if one is set.
fn verify_installer(
    hasher: &impl FileHasher,
    log: &impl RunLog,
    config: &ProvisionConfig,
) -> Result<()> {
    let actual = match hasher.sha256_file(&config.installer_path) {
        Ok(sum) => sum,
        Err(e) if config.installer_sha256.is_some() => {
            return fail(
                log,
                ProvisionError::Download {
                    url: config.installer_url.clone(),
                    reason: format!("cannot read downloaded installer: {e:#}"),
                },
            );
        }
        Err(e) => {
            log.log(
                &format!("Could not hash installer: {e:#}"),
                Severity::Error,
                false,
            )?;
            return Ok(());
        }
    };
    log.log(
        &format!("Installer SHA-256: {actual}"),
        Severity::Normal,
        false,
    )?;

    if let Some(expected) = &config.installer_sha256 {
        if !expected.eq_ignore_ascii_case(&actual) {
            return fail(
                log,
                ProvisionError::Checksum {
                    expected: expected.to_ascii_lowercase(),
                    actual,
                },
            );
        }
    }
    Ok(())
}

fn install_error(config: &ProvisionConfig, err: InstallError) -> ProvisionError {
    match err {
        InstallError::Launch(reason) => ProvisionError::InstallLaunch {
            program: config.installer_program.clone(),
            reason,
        },
        InstallError::TimedOut(secs) => ProvisionError::InstallTimedOut { secs },
        InstallError::Terminated => ProvisionError::InstallTerminated,
    }
}

/// Log `err` to the console and the run log, then return it.
fn fail<T>(log: &impl RunLog, err: ProvisionError) -> Result<T> {
    log.error(&err.to_string())?;
    Err(err.into())
}
