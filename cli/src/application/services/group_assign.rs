//! Application service: post-install group assignment.
//!
//! Best-effort: every failure is logged and reported back, none is fatal.

use anyhow::Result;

use crate::application::ports::{AgentControl, RunLog};
use crate::domain::{GroupAssignError, GroupPath};

/// What happened during group assignment.
#[derive(Debug)]
pub struct GroupAssignment {
    pub path: GroupPath,
    /// Failures of the set-group and deregister calls, in call order.
    pub errors: Vec<GroupAssignError>,
}

impl GroupAssignment {
    #[must_use]
    pub fn succeeded(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Move the device into `path`, then dispatch a deregister so the agent
/// re-registers under the new group.
///
/// The deregister is sent regardless of the set-group result and is not
/// awaited.
///
/// # Errors
///
/// Returns an error only if the run log cannot be written.
pub async fn assign_group(
    agent: &impl AgentControl,
    log: &impl RunLog,
    path: &GroupPath,
) -> Result<GroupAssignment> {
    let mut errors = Vec::new();

    log.info(&format!("Assigning device to group '{path}'..."))?;
    match agent.set_group(path).await {
        Ok(0) => log.success(&format!("Device assigned to group '{path}'."))?,
        Ok(code) => errors.push(GroupAssignError::SetGroupExit {
            path: path.to_string(),
            code,
        }),
        Err(e) => errors.push(GroupAssignError::SetGroup {
            path: path.to_string(),
            reason: format!("{e:#}"),
        }),
    }
    if let Some(err) = errors.last() {
        log.error(&format!("Group assignment: {err}"))?;
    }

    // Not awaited: the agent re-registers on its next backend contact.
    match agent.deregister() {
        Ok(()) => log.log(
            "Deregister dispatched; the agent will re-register under the new group.",
            crate::domain::Severity::Normal,
            false,
        )?,
        Err(e) => {
            let err = GroupAssignError::Deregister {
                reason: format!("{e:#}"),
            };
            log.error(&format!("Group assignment: {err}"))?;
            errors.push(err);
        }
    }

    Ok(GroupAssignment {
        path: path.clone(),
        errors,
    })
}
