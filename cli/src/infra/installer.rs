//! Installer infrastructure: implements `InstallerRunner` with the
//! platform package installer (`msiexec`).

use std::path::Path;
use std::time::Duration;

use crate::application::ports::{CommandRunner, InstallerRunner};
use crate::domain::{AccessKey, CommandError, InstallError};

/// Runs `<program> /i <package> /qn /norestart ACCESSKEY=<key>`.
pub struct MsiInstaller<R: CommandRunner> {
    runner: R,
    program: String,
    timeout: Option<Duration>,
}

impl<R: CommandRunner> MsiInstaller<R> {
    pub fn new(runner: R, program: impl Into<String>, timeout: Option<Duration>) -> Self {
        Self {
            runner,
            program: program.into(),
            timeout,
        }
    }
}

/// Arguments for a silent, no-restart install of `package`.
#[must_use]
pub fn install_args(package: &Path, key: &AccessKey) -> Vec<String> {
    vec![
        "/i".to_string(),
        package.display().to_string(),
        "/qn".to_string(),
        "/norestart".to_string(),
        format!("ACCESSKEY={}", key.expose()),
    ]
}

impl<R: CommandRunner> InstallerRunner for MsiInstaller<R> {
    async fn install(&self, installer: &Path, key: &AccessKey) -> Result<i32, InstallError> {
        let args = install_args(installer, key);
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        let output = self
            .runner
            .run(&self.program, &args, self.timeout)
            .await
            .map_err(|e| match e.downcast_ref::<CommandError>() {
                Some(CommandError::TimedOut { secs, .. }) => InstallError::TimedOut(*secs),
                Some(CommandError::Terminated { .. }) => InstallError::Terminated,
                _ => InstallError::Launch(format!("{e:#}")),
            })?;
        output.status.code().ok_or(InstallError::Terminated)
    }
}
