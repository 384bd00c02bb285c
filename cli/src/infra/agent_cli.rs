//! Agent binary infrastructure: implements `AgentControl` by invoking the
//! installed agent executable.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;

use crate::application::ports::{AgentControl, CommandRunner};
use crate::domain::{CommandError, GroupPath};

pub const SET_GROUP_FLAG: &str = "--setgrp";
pub const DEREGISTER_FLAG: &str = "--deregister";

/// Production `AgentControl` backed by the agent's command line.
pub struct AgentBinary<R: CommandRunner> {
    runner: R,
    binary: PathBuf,
    set_group_timeout: Option<Duration>,
}

impl<R: CommandRunner> AgentBinary<R> {
    pub fn new(runner: R, binary: PathBuf, set_group_timeout: Option<Duration>) -> Self {
        Self {
            runner,
            binary,
            set_group_timeout,
        }
    }

    fn program(&self) -> String {
        self.binary.to_string_lossy().into_owned()
    }
}

impl<R: CommandRunner> AgentControl for AgentBinary<R> {
    async fn set_group(&self, path: &GroupPath) -> Result<i32> {
        let program = self.program();
        let output = self
            .runner
            .run(
                &program,
                &[SET_GROUP_FLAG, path.as_str()],
                self.set_group_timeout,
            )
            .await?;
        output
            .status
            .code()
            .ok_or_else(|| CommandError::Terminated { program }.into())
    }

    fn deregister(&self) -> Result<()> {
        self.runner
            .spawn_detached(&self.program(), &[DEREGISTER_FLAG])
    }
}
