//! CLI argument parsing with clap derive

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use crate::app::AppContext;
use crate::application::services::provision::{ProvisionRequest, RunOutcome, provision};
use crate::domain::AccessKey;
use crate::infra::config::YamlConfigStore;
use crate::output::OutputContext;

/// Install the endpoint agent, make sure it runs, and place the device in its group
#[derive(Parser)]
#[command(name = "agent-provision", version)]
pub struct Cli {
    /// Organization access key (GUID, braces and dashes optional)
    #[arg(short = 'k', long, env = "AGENT_ACCESS_KEY", hide_env_values = true)]
    pub access_key: AccessKey,

    /// Group to move the device into after install
    #[arg(short = 'g', long)]
    pub group_name: Option<String>,

    /// Parent of the group (only used together with --group-name)
    #[arg(short = 'p', long)]
    pub parent_group_name: Option<String>,

    /// Configuration file (default: $AGENT_PROVISION_CONFIG or the user config dir)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Write the run log here instead of the configured path
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Suppress non-error console output
    #[arg(short, long)]
    pub quiet: bool,

    /// Disable colored output (also honored via the NO_COLOR environment variable)
    #[arg(long)]
    pub no_color: bool,
}

impl Cli {
    /// Execute the provisioning run.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded, the run log cannot
    /// be written, or any fatal provisioning step fails.
    pub async fn run(self) -> Result<RunOutcome> {
        let Cli {
            access_key,
            group_name,
            parent_group_name,
            config,
            log_file,
            quiet,
            no_color,
        } = self;

        let mut config = YamlConfigStore::new(config).load()?;
        if let Some(path) = log_file {
            config.log_path = path;
        }

        let app = AppContext::new(config, OutputContext::new(no_color, quiet))?;
        let request = ProvisionRequest {
            access_key: &access_key,
            group_name: group_name.as_deref(),
            parent_group_name: parent_group_name.as_deref(),
        };
        provision(&app.collaborators(), &app.config, &request).await
    }
}
