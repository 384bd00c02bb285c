//! Run-log infrastructure: implements `RunLog` with a plain text file and
//! an optional console echo.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;

use crate::application::ports::RunLog;
use crate::domain::Severity;
use crate::domain::log::{TIMESTAMP_FORMAT, format_line};
use crate::output::OutputContext;

/// File-backed run log. Each line is `[YYYY-MM-DD HH:MM:SS] message`.
pub struct FileRunLog {
    path: PathBuf,
    console: Option<OutputContext>,
}

impl FileRunLog {
    /// Open the run log at `path`.
    ///
    /// With `overwrite` the file is truncated (or created) now; otherwise
    /// lines are appended to whatever is there. Called once per run.
    ///
    /// # Errors
    ///
    /// Returns an error if the file or its parent directory cannot be created.
    pub fn create(path: &Path, overwrite: bool, console: Option<OutputContext>) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("cannot create {}", parent.display()))?;
        }
        OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(overwrite)
            .append(!overwrite)
            .open(path)
            .with_context(|| format!("cannot open log file {}", path.display()))?;
        Ok(Self {
            path: path.to_path_buf(),
            console,
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RunLog for FileRunLog {
    fn log(&self, message: &str, severity: Severity, to_console: bool) -> Result<()> {
        let now = Local::now();
        let mut file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)
            .with_context(|| format!("cannot open log file {}", self.path.display()))?;
        writeln!(file, "{}", format_line(&now, message))
            .with_context(|| format!("cannot write log file {}", self.path.display()))?;

        if to_console {
            if let Some(console) = &self.console {
                let stamp = now.format(TIMESTAMP_FORMAT).to_string();
                console.echo(&stamp, message, severity);
            }
        }
        Ok(())
    }
}
