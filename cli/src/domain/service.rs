//! Agent service state as reported by the OS service manager.

use std::fmt;

/// Raw status reported by a successful service query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceStatus {
    Running,
    /// Any status other than running: stopped, paused, start/stop pending.
    NotRunning,
}

/// State of the agent service, derived once per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceState {
    /// The query failed: no such service, or the manager is unreachable.
    Absent,
    Running,
    NotRunning,
}

impl ServiceState {
    /// A failed query means the agent is not installed.
    #[must_use]
    pub fn from_query<E>(query: Result<ServiceStatus, E>) -> Self {
        match query {
            Ok(ServiceStatus::Running) => Self::Running,
            Ok(ServiceStatus::NotRunning) => Self::NotRunning,
            Err(_) => Self::Absent,
        }
    }
}

impl fmt::Display for ServiceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Absent => "not installed",
            Self::Running => "running",
            Self::NotRunning => "installed, not running",
        })
    }
}
