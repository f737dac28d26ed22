// Helper functions shared by the extractor and the HTTP layer

use std::path::Path;
use std::process::Stdio;

use regex::Regex;
use tokio::io::AsyncReadExt;
use tokio::process::Command as TokioCommand;

use super::errors::ExtractionError;

/// Longest filename stem handed to clients
pub const MAX_FILENAME_LEN: usize = 100;

/// Stem used when a title sanitizes down to nothing
pub const DEFAULT_FILENAME: &str = "video";

lazy_static::lazy_static! {
    static ref NON_ASCII_RE: Regex = Regex::new(r"[^\x00-\x7F]+").unwrap();
    static ref UNSAFE_CHARS_RE: Regex = Regex::new(r#"[<>:"/\\|?*\x00-\x1F]"#).unwrap();
}

/// Turn an arbitrary video title into a safe filename stem.
///
/// Drops non-ASCII (emoji included), replaces reserved and control
/// characters with `_`, trims spaces/dots, caps the length and falls back
/// to `"video"` when nothing is left.
pub fn sanitize_filename(name: &str) -> String {
    if name.is_empty() {
        return DEFAULT_FILENAME.to_string();
    }

    let ascii = NON_ASCII_RE.replace_all(name, "");
    let replaced = UNSAFE_CHARS_RE.replace_all(&ascii, "_");
    let mut cleaned = replaced
        .trim_matches(|c: char| c == ' ' || c == '.')
        .replace('"', "'");

    // ASCII only at this point, so byte and char boundaries agree
    cleaned.truncate(MAX_FILENAME_LEN);

    if cleaned.is_empty() {
        DEFAULT_FILENAME.to_string()
    } else {
        cleaned
    }
}

/// Run a command to completion, collecting stdout and stderr.
///
/// Both pipes are drained concurrently so a chatty child can't block on a
/// full pipe. The child is killed if the returned future is dropped.
pub async fn run_output(
    program: &str,
    args: &[String],
) -> Result<std::process::Output, ExtractionError> {
    let mut child = TokioCommand::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|source| ExtractionError::Spawn {
            program: program.to_string(),
            source,
        })?;

    let mut stdout_pipe = child.stdout.take().ok_or_else(|| {
        ExtractionError::Io(std::io::Error::other(format!(
            "Failed to capture stdout from {}",
            program
        )))
    })?;
    let mut stderr_pipe = child.stderr.take().ok_or_else(|| {
        ExtractionError::Io(std::io::Error::other(format!(
            "Failed to capture stderr from {}",
            program
        )))
    })?;

    let stdout_task = async move {
        let mut buf = Vec::new();
        stdout_pipe.read_to_end(&mut buf).await?;
        Ok::<Vec<u8>, std::io::Error>(buf)
    };
    let stderr_task = async move {
        let mut buf = Vec::new();
        stderr_pipe.read_to_end(&mut buf).await?;
        Ok::<Vec<u8>, std::io::Error>(buf)
    };

    let (status, stdout, stderr) = tokio::join!(child.wait(), stdout_task, stderr_task);

    Ok(std::process::Output {
        status: status?,
        stdout: stdout?,
        stderr: stderr?,
    })
}

/// Find the yt-dlp executable: explicit path, common install locations,
/// then whatever `PATH` resolves.
pub fn find_ytdlp(configured: Option<&str>) -> String {
    if let Some(path) = configured {
        return path.to_string();
    }

    let mut candidates = vec![
        "/opt/homebrew/bin/yt-dlp".to_string(), // Homebrew on Apple Silicon
        "/usr/local/bin/yt-dlp".to_string(),    // Homebrew on Intel Mac
        "/usr/bin/yt-dlp".to_string(),          // System package
    ];
    if let Some(home) = dirs::home_dir() {
        candidates.push(home.join(".local/bin/yt-dlp").to_string_lossy().to_string());
    }

    candidates
        .into_iter()
        .find(|path| Path::new(path).exists())
        .unwrap_or_else(|| "yt-dlp".to_string())
}
