//! agent-provision - install and enroll the endpoint agent

#![cfg_attr(test, allow(clippy::expect_used))]

use std::process::ExitCode;

use agent_provision::app::exit_code;
use agent_provision::cli::Cli;
use agent_provision::domain::ProvisionError;
use clap::Parser;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let result = cli.run().await;
    if let Err(e) = &result {
        // Provisioning failures were already written to the run log and stderr.
        if e.downcast_ref::<ProvisionError>().is_none() {
            eprintln!("Error: {e:#}");
        }
    }
    ExitCode::from(exit_code(&result))
}
