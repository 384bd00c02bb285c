//! Installer exit-code classification.

use std::fmt;

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_SUCCESS_REBOOT_INITIATED: i32 = 1641;
pub const EXIT_SUCCESS_REBOOT_REQUIRED: i32 = 3010;

/// Classified installer exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallOutcome {
    Success,
    SuccessRebootInitiated,
    SuccessRebootRequired,
    Failed(i32),
}

impl InstallOutcome {
    #[must_use]
    pub fn from_exit_code(code: i32) -> Self {
        match code {
            EXIT_SUCCESS => Self::Success,
            EXIT_SUCCESS_REBOOT_INITIATED => Self::SuccessRebootInitiated,
            EXIT_SUCCESS_REBOOT_REQUIRED => Self::SuccessRebootRequired,
            other => Self::Failed(other),
        }
    }

    /// `true` for 0, 1641 and 3010.
    #[must_use]
    pub fn is_success(self) -> bool {
        !matches!(self, Self::Failed(_))
    }

    #[must_use]
    pub fn reboot_pending(self) -> bool {
        matches!(self, Self::SuccessRebootInitiated | Self::SuccessRebootRequired)
    }

    #[must_use]
    pub fn exit_code(self) -> i32 {
        match self {
            Self::Success => EXIT_SUCCESS,
            Self::SuccessRebootInitiated => EXIT_SUCCESS_REBOOT_INITIATED,
            Self::SuccessRebootRequired => EXIT_SUCCESS_REBOOT_REQUIRED,
            Self::Failed(code) => code,
        }
    }
}

impl fmt::Display for InstallOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => write!(f, "success (exit code {EXIT_SUCCESS})"),
            Self::SuccessRebootInitiated => write!(
                f,
                "success, reboot initiated (exit code {EXIT_SUCCESS_REBOOT_INITIATED})"
            ),
            Self::SuccessRebootRequired => write!(
                f,
                "success, reboot required (exit code {EXIT_SUCCESS_REBOOT_REQUIRED})"
            ),
            Self::Failed(code) => write!(f, "failure (exit code {code})"),
        }
    }
}
