//! Application context: the production collaborators for one run.
//!
//! Built once from `ProvisionConfig` in `Cli::run()`; tests build
//! `Collaborators` from fakes instead.

use anyhow::Result;

use crate::application::services::provision::{Collaborators, RunOutcome};
use crate::domain::ProvisionConfig;
use crate::infra::agent_cli::AgentBinary;
use crate::infra::command_runner::TokioCommandRunner;
use crate::infra::download::UreqDownloader;
use crate::infra::fs::LocalFs;
use crate::infra::installer::MsiInstaller;
use crate::infra::log_file::FileRunLog;
use crate::infra::service_manager::PlatformServiceManager;
use crate::output::OutputContext;

/// Process exit code for every successful ending.
pub const EXIT_OK: u8 = 0;
/// Process exit code for every fatal failure.
pub const EXIT_FAILED: u8 = 1;

/// Production wiring of every port.
pub struct AppContext {
    pub config: ProvisionConfig,
    pub services: PlatformServiceManager<TokioCommandRunner>,
    pub source: UreqDownloader,
    pub hasher: LocalFs,
    pub installer: MsiInstaller<TokioCommandRunner>,
    pub agent: AgentBinary<TokioCommandRunner>,
    pub log: FileRunLog,
}

impl AppContext {
    /// Wire collaborators and truncate the run log.
    ///
    /// # Errors
    ///
    /// Returns an error if the run log cannot be created.
    pub fn new(config: ProvisionConfig, output: OutputContext) -> Result<Self> {
        let runner = TokioCommandRunner::new();
        let show_progress = output.show_progress();
        let log = FileRunLog::create(&config.log_path, true, Some(output))?;
        Ok(Self {
            services: PlatformServiceManager::new(
                config.service_manager,
                runner,
                config.timeouts.service(),
            ),
            source: UreqDownloader::new(config.timeouts.download(), show_progress),
            hasher: LocalFs,
            installer: MsiInstaller::new(
                runner,
                config.installer_program.clone(),
                config.timeouts.install(),
            ),
            agent: AgentBinary::new(
                runner,
                config.agent_binary.clone(),
                config.timeouts.set_group(),
            ),
            log,
            config,
        })
    }

    #[must_use]
    pub fn collaborators(
        &self,
    ) -> Collaborators<
        '_,
        PlatformServiceManager<TokioCommandRunner>,
        UreqDownloader,
        LocalFs,
        MsiInstaller<TokioCommandRunner>,
        AgentBinary<TokioCommandRunner>,
        FileRunLog,
    > {
        Collaborators {
            services: &self.services,
            source: &self.source,
            hasher: &self.hasher,
            installer: &self.installer,
            agent: &self.agent,
            log: &self.log,
        }
    }
}

/// Map a finished run onto the process exit code.
#[must_use]
pub fn exit_code(result: &Result<RunOutcome>) -> u8 {
    match result {
        Ok(_) => EXIT_OK,
        Err(_) => EXIT_FAILED,
    }
}
