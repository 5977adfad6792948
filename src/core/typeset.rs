//! Time-limited invocation of the external typesetting program.
//!
//! [`Typesetter`] runs `<program> -interaction=nonstopmode <file>` in the
//! source file's directory. Stdout is drained while the pass runs and only
//! surfaced through debug logging, since a nonstop LaTeX run is very chatty.

use crate::core::error::{Result, StewardError};
use std::ffi::OsStr;
use std::io::ErrorKind;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::AsyncReadExt;
use tokio::process::Command;

const LOGGED_TAIL_LINES: usize = 5;

#[derive(Debug, Clone)]
pub struct Typesetter {
    program: String,
    timeout: Duration,
}

impl Typesetter {
    pub fn new(program: impl Into<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            timeout,
        }
    }

    /// Run one typesetting pass over `source`.
    ///
    /// Fails with [`StewardError::ToolNotFound`] when the program cannot be
    /// spawned, [`StewardError::ToolTimeout`] when the pass outlives the
    /// timeout (the child is killed), and [`StewardError::ToolFailed`] on a
    /// non-zero exit.
    pub fn run_pass(&self, source: &Path) -> Result<()> {
        let file_name = source
            .file_name()
            .ok_or_else(|| StewardError::output_missing(source))?;
        let workdir = source
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        runtime.block_on(self.run_pass_async(file_name, workdir))
    }

    async fn run_pass_async(&self, file_name: &OsStr, workdir: &Path) -> Result<()> {
        let mut child = Command::new(&self.program)
            .arg("-interaction=nonstopmode")
            .arg(file_name)
            .current_dir(workdir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound | ErrorKind::PermissionDenied => {
                    StewardError::tool_not_found(&self.program)
                }
                _ => StewardError::Io(e),
            })?;

        // A full pipe would stall the child, so read concurrently with the wait
        let reader = child.stdout.take().map(|mut stdout| {
            tokio::spawn(async move {
                let mut buffer = Vec::new();
                if let Err(e) = stdout.read_to_end(&mut buffer).await {
                    log::debug!("Could not read typesetter output: {e}");
                }
                buffer
            })
        });

        let status = match tokio::time::timeout(self.timeout, child.wait()).await {
            Ok(status) => status?,
            Err(_) => {
                log::warn!(
                    "{} exceeded {}s, killing pid {:?}",
                    self.program,
                    self.timeout.as_secs(),
                    child.id()
                );
                if let Err(e) = child.kill().await {
                    log::debug!("Kill after timeout failed: {e}");
                }
                // Grandchildren may still hold the pipe open
                if let Some(reader) = reader {
                    reader.abort();
                }
                return Err(StewardError::tool_timeout(&self.program, self.timeout));
            }
        };

        if let Some(reader) = reader {
            if let Ok(buffer) = reader.await {
                log_output_tail(&buffer);
            }
        }

        if status.success() {
            Ok(())
        } else {
            Err(StewardError::tool_failed(&self.program, status.code()))
        }
    }
}

fn log_output_tail(buffer: &[u8]) {
    let text = String::from_utf8_lossy(buffer);
    let tail: Vec<&str> = text.lines().rev().take(LOGGED_TAIL_LINES).collect();
    for line in tail.into_iter().rev() {
        log::debug!("typesetter: {line}");
    }
}
