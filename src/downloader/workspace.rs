// Per-request temporary workspace
//
// The directory lives exactly as long as the `Workspace` value. Handing the
// workspace to `stream_file` moves ownership into the response body stream,
// so deletion happens when hyper drops the body: after the last chunk, on a
// read error, or when the client goes away mid-transfer.

use std::io;
use std::path::{Path, PathBuf};

use bytes::Bytes;
use futures::{Stream, StreamExt};
use tempfile::TempDir;
use tokio::fs::File;
use tokio_util::io::ReaderStream;

use super::errors::ExtractionError;
use super::models::OUTPUT_TEMPLATE;

const WORKSPACE_PREFIX: &str = "video-gateway-";

#[derive(Debug)]
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    /// Create a fresh directory under the system temp dir
    pub fn create() -> Result<Self, ExtractionError> {
        let dir = tempfile::Builder::new()
            .prefix(WORKSPACE_PREFIX)
            .tempdir()
            .map_err(ExtractionError::Workspace)?;
        tracing::debug!(path = %dir.path().display(), "Workspace created");
        Ok(Self { dir })
    }

    /// Create the directory inside `parent` instead of the system temp dir
    pub fn create_in(parent: &Path) -> Result<Self, ExtractionError> {
        let dir = tempfile::Builder::new()
            .prefix(WORKSPACE_PREFIX)
            .tempdir_in(parent)
            .map_err(ExtractionError::Workspace)?;
        tracing::debug!(path = %dir.path().display(), "Workspace created");
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// yt-dlp output template rooted in this workspace
    pub fn output_template(&self) -> PathBuf {
        self.dir.path().join(OUTPUT_TEMPLATE)
    }

    /// Open `file` and return its bytes as a stream that owns the workspace.
    ///
    /// `file` must live inside the workspace. On open failure the workspace
    /// is dropped (and deleted) before the error is returned.
    pub async fn stream_file(
        self,
        file: PathBuf,
    ) -> Result<impl Stream<Item = io::Result<Bytes>> + Send + 'static, ExtractionError> {
        let handle = match File::open(&file).await {
            Ok(handle) => handle,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(ExtractionError::MissingOutput(file));
            }
            Err(e) => return Err(ExtractionError::Io(e)),
        };

        let workspace = self;
        Ok(ReaderStream::new(handle).map(move |chunk| {
            // Keeps the directory alive until the stream itself is dropped
            let _keep = &workspace;
            chunk
        }))
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        tracing::debug!(path = %self.dir.path().display(), "Releasing workspace");
    }
}
