//! Log destinations for the CLI
//!
//! When serving MCP over stdio, stdout carries the protocol, so logs go to
//! `~/.fogbugz-mcp/<FOGBUGZ_MCP_LOG_FILE or mcp.log>` through a
//! [`FileWriterGuard`] that syncs every write.

use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

/// Directory under the home directory holding the MCP log
pub const LOG_DIR_NAME: &str = ".fogbugz-mcp";

/// Environment variable overriding the log file name
pub const LOG_FILE_ENV: &str = "FOGBUGZ_MCP_LOG_FILE";

const DEFAULT_LOG_FILE: &str = "mcp.log";

/// Directory MCP logs are written to
pub fn log_directory() -> PathBuf {
    match dirs::home_dir() {
        Some(home) => home.join(LOG_DIR_NAME),
        None => PathBuf::from(LOG_DIR_NAME),
    }
}

/// Full path of the MCP log file
pub fn log_file_path() -> PathBuf {
    let file_name = std::env::var(LOG_FILE_ENV)
        .ok()
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_LOG_FILE.to_string());
    log_directory().join(file_name)
}

/// Create the log directory and open the log file for appending
pub fn open_log_file() -> std::io::Result<File> {
    let path = log_file_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::OpenOptions::new().create(true).append(true).open(path)
}

/// A thread-safe writer that flushes and syncs the log file after every write.
///
/// MCP clients usually kill the server process without warning, so buffered
/// log lines would otherwise be lost.
///
/// ```no_run
/// use std::io::Write;
/// use std::sync::{Arc, Mutex};
/// use fogbugz_mcp_cli::logging::FileWriterGuard;
///
/// let file = std::fs::File::create("mcp.log").unwrap();
/// let mut guard = FileWriterGuard::new(Arc::new(Mutex::new(file)));
/// guard.write_all(b"Log message\n").unwrap();
/// ```
#[derive(Clone)]
pub struct FileWriterGuard {
    file: Arc<Mutex<File>>,
}

impl FileWriterGuard {
    /// Wrap a shared file handle
    pub fn new(file: Arc<Mutex<File>>) -> Self {
        Self { file }
    }

    fn lock(&self) -> std::io::Result<std::sync::MutexGuard<'_, File>> {
        self.file
            .lock()
            .map_err(|_| std::io::Error::other("log file mutex poisoned"))
    }
}

impl Write for FileWriterGuard {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let mut file = self.lock()?;
        let written = file.write(buf)?;
        file.flush()?;
        file.sync_all()?;
        Ok(written)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        let mut file = self.lock()?;
        file.flush()?;
        file.sync_all()
    }
}
