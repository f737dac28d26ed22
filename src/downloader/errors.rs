// Error types for the extraction pipeline
//
// Every variant collapses into the same `{"error": "..."}` payload at the HTTP
// boundary, so `Display` is the text the caller sees.

use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractionError {
    /// Temporary workspace could not be created
    #[error("Failed to create temporary directory: {0}")]
    Workspace(#[source] io::Error),

    /// yt-dlp (or the python interpreter) could not be started
    #[error("Failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    /// yt-dlp ran and reported a failure; message is its stderr
    #[error("{message}")]
    Failed {
        status: Option<i32>,
        message: String,
    },

    /// Metadata printed by yt-dlp could not be understood
    #[error("Parse error: {0}")]
    Parse(String),

    /// yt-dlp succeeded but the output file is not where it should be
    #[error("Downloaded file not found: {}", .0.display())]
    MissingOutput(PathBuf),

    /// Reading the downloaded file or the process pipes failed
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl ExtractionError {
    /// Build a `Failed` error from a finished process.
    ///
    /// Falls back to the exit status when stderr is empty so the caller
    /// never receives a blank message.
    pub fn from_exit(status: ExitStatus, stderr: &[u8]) -> Self {
        let text = String::from_utf8_lossy(stderr);
        let message = text.trim();
        let message = if message.is_empty() {
            match status.code() {
                Some(code) => format!("yt-dlp exited with status {}", code),
                None => "yt-dlp was terminated by a signal".to_string(),
            }
        } else {
            message.to_string()
        };

        Self::Failed {
            status: status.code(),
            message,
        }
    }
}
