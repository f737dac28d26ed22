// Extractor implementations
//
// - CLI mode: native `yt-dlp` binary (default)
// - Python mode: `python3 -m yt_dlp`, for hosts that only have the module

mod ytdlp;

pub use ytdlp::{ExtractorMode, YtDlpExtractor};
