//! Installer download: implements `InstallerSource` with blocking `ureq`
//! on the blocking thread pool.

use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};

use crate::application::ports::InstallerSource;
use crate::output::progress;

/// Production downloader: streams the body to `<dest>.partial` and renames
/// it into place once complete.
pub struct UreqDownloader {
    timeout: Option<Duration>,
    show_progress: bool,
}

impl UreqDownloader {
    #[must_use]
    pub fn new(timeout: Option<Duration>, show_progress: bool) -> Self {
        Self {
            timeout,
            show_progress,
        }
    }
}

impl InstallerSource for UreqDownloader {
    async fn download(&self, url: &str, dest: &Path) -> Result<()> {
        let url = url.to_string();
        let dest = dest.to_path_buf();
        let timeout = self.timeout;
        let show_progress = self.show_progress;
        tokio::task::spawn_blocking(move || download_blocking(&url, &dest, timeout, show_progress))
            .await
            .map_err(|e| anyhow::anyhow!("spawn_blocking panicked: {e}"))?
    }
}

fn partial_path(dest: &Path) -> PathBuf {
    let mut s = dest.as_os_str().to_owned();
    s.push(".partial");
    PathBuf::from(s)
}

fn download_blocking(
    url: &str,
    dest: &Path,
    timeout: Option<Duration>,
    show_progress: bool,
) -> Result<()> {
    let mut builder = ureq::AgentBuilder::new();
    if let Some(t) = timeout {
        builder = builder.timeout(t);
    }
    let agent = builder.build();

    let response = match agent.get(url).call() {
        Ok(r) => r,
        Err(ureq::Error::Status(code, _)) => anyhow::bail!("HTTP {code}"),
        Err(ureq::Error::Transport(t)) => anyhow::bail!("{t}"),
    };

    if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    let partial = partial_path(dest);

    let total = response
        .header("Content-Length")
        .and_then(|v| v.parse::<u64>().ok());
    let pb = if show_progress {
        match total {
            Some(len) => progress::bar(len, "downloading installer"),
            None => progress::spinner("downloading installer"),
        }
    } else {
        indicatif::ProgressBar::hidden()
    };

    let result = write_partial(&mut response.into_reader(), &partial, total, &pb);
    pb.finish_and_clear();
    if let Err(e) = result {
        std::fs::remove_file(&partial).ok();
        return Err(e);
    }

    std::fs::rename(&partial, dest)
        .with_context(|| format!("moving installer into {}", dest.display()))?;
    Ok(())
}

/// Copy `reader` into `partial`, checking the byte count against `total`.
/// The caller removes `partial` on error.
fn write_partial(
    reader: &mut impl Read,
    partial: &Path,
    total: Option<u64>,
    pb: &indicatif::ProgressBar,
) -> Result<()> {
    let mut file = open_truncated(partial)?;
    let mut buf = vec![0u8; 64 * 1024];
    let mut written = 0u64;
    loop {
        let n = reader.read(&mut buf).context("download interrupted")?;
        if n == 0 {
            break;
        }
        file.write_all(&buf[..n])
            .with_context(|| format!("writing {}", partial.display()))?;
        written += n as u64;
        pb.inc(n as u64);
    }
    file.flush().context("flushing installer")?;

    if let Some(expected) = total {
        anyhow::ensure!(
            written == expected,
            "download truncated: got {written} of {expected} bytes"
        );
    }
    Ok(())
}

fn open_truncated(path: &Path) -> Result<File> {
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
        .with_context(|| format!("opening {}", path.display()))
}
