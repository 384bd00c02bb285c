//! Application service: agent service state inspection.
//!
//! Decides between "proceed to install" and the early exits: already
//! running, started now, or unstartable.

use anyhow::Result;

use crate::application::ports::{RunLog, ServiceControl};
use crate::domain::{ProvisionError, ServiceState};

/// Outcome of inspecting (and possibly starting) the agent service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentState {
    /// No agent service; installation should proceed.
    NotInstalled,
    /// Service was already running. Terminal.
    AlreadyRunning,
    /// Service was stopped and has been started. Terminal.
    Started,
}

/// Query the service manager once. Any query failure means `Absent`.
pub async fn inspect_service(services: &impl ServiceControl, name: &str) -> ServiceState {
    ServiceState::from_query(services.query(name).await)
}

/// Inspect the agent service and start it if it is installed but stopped.
///
/// # Errors
///
/// Returns [`ProvisionError::ServiceStart`] (already logged) if a stopped
/// service cannot be started, or any log-write error.
pub async fn ensure_running(
    services: &impl ServiceControl,
    log: &impl RunLog,
    name: &str,
) -> Result<AgentState> {
    match inspect_service(services, name).await {
        ServiceState::Absent => {
            log.info(&format!("Agent service '{name}' is not installed."))?;
            Ok(AgentState::NotInstalled)
        }
        ServiceState::Running => {
            log.info(&format!(
                "Agent service '{name}' is already installed and running. Nothing to do."
            ))?;
            Ok(AgentState::AlreadyRunning)
        }
        ServiceState::NotRunning => {
            log.info(&format!(
                "Agent service '{name}' is installed but not running. Starting it..."
            ))?;
            match services.start(name).await {
                Ok(()) => {
                    log.success(&format!("Agent service '{name}' started."))?;
                    Ok(AgentState::Started)
                }
                Err(e) => {
                    let err = ProvisionError::ServiceStart {
                        service: name.to_string(),
                        reason: format!("{e:#}"),
                    };
                    log.error(&err.to_string())?;
                    Err(err.into())
                }
            }
        }
    }
}
