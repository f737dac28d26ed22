// Media extractor trait definition

use async_trait::async_trait;

use super::errors::ExtractionError;
use super::models::{ExtractedMedia, ExtractorOptions};

/// External collaborator that resolves a URL, downloads the selected
/// streams and muxes them into the file named by `options.outtmpl`.
#[async_trait]
pub trait MediaExtractor: Send + Sync {
    /// Name of the extractor (for logging)
    fn name(&self) -> &'static str;

    /// Extract metadata and download in one step
    async fn extract_and_download(
        &self,
        url: &str,
        options: &ExtractorOptions,
    ) -> Result<ExtractedMedia, ExtractionError>;
}
