// Downloader module - presets, extractor seam and per-request workspace

pub mod errors;
pub mod extractors;
pub mod models;
pub mod presets;
pub mod traits;
pub mod utils;
pub mod workspace;

pub use errors::ExtractionError;
pub use extractors::{ExtractorMode, YtDlpExtractor};
pub use models::{DownloadRequest, ExtractedMedia, ExtractorOptions};
pub use presets::{PresetTable, QualityPreset, Role};
pub use traits::MediaExtractor;
pub use utils::sanitize_filename;
pub use workspace::Workspace;
