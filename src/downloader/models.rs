// Common data models for the extraction pipeline

use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::presets::QualityPreset;

/// yt-dlp output template placed inside the request workspace
pub const OUTPUT_TEMPLATE: &str = "%(id)s.%(ext)s";

/// Container every download is muxed into
pub const MERGE_OUTPUT_FORMAT: &str = "mp4";

/// Options handed to the extractor for a single download
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractorOptions {
    /// Ordered fallback chain of format selectors
    pub format: Vec<String>,
    /// Container for merged audio+video output
    pub merge_output_format: String,
    /// Download only the video, never the playlist around it
    pub noplaylist: bool,
    /// Full output path template
    pub outtmpl: PathBuf,
    pub quiet: bool,
    /// Sort keys applied among formats the selector ranks equally
    pub format_sort: Vec<String>,
}

impl ExtractorOptions {
    /// Options for a preset, writing to the `outtmpl` path template.
    ///
    /// Among equally ranked candidates, smaller size then lower bitrate wins.
    pub fn for_preset(preset: &QualityPreset, outtmpl: PathBuf) -> Self {
        Self {
            format: preset.format_selector.clone(),
            merge_output_format: MERGE_OUTPUT_FORMAT.to_string(),
            noplaylist: true,
            outtmpl,
            quiet: true,
            format_sort: vec!["+size".to_string(), "+br".to_string()],
        }
    }

    /// Render as yt-dlp command line flags (URL not included)
    pub fn to_args(&self) -> Vec<String> {
        let mut args = vec![
            "-f".to_string(),
            self.format.join("/"),
            "--merge-output-format".to_string(),
            self.merge_output_format.clone(),
        ];

        if self.noplaylist {
            args.push("--no-playlist".to_string());
        }

        args.push("-o".to_string());
        args.push(self.outtmpl.to_string_lossy().to_string());

        if self.quiet {
            args.extend([
                "--quiet".to_string(),
                "--no-progress".to_string(),
                "--no-warnings".to_string(),
            ]);
        }

        if !self.format_sort.is_empty() {
            args.push("-S".to_string());
            args.push(self.format_sort.join(","));
        }

        args
    }
}

/// Metadata reported by the extractor after a finished download
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ExtractedMedia {
    pub id: String,
    pub ext: String,
    #[serde(default)]
    pub title: Option<String>,
    /// Final path after post-processing, when the extractor reports it
    #[serde(default)]
    pub filepath: Option<PathBuf>,
}

impl ExtractedMedia {
    /// Where the downloaded file ended up.
    ///
    /// Uses the reported path when available, otherwise fills the
    /// `%(id)s` / `%(ext)s` fields of the output template.
    pub fn output_path(&self, outtmpl: &Path) -> PathBuf {
        if let Some(path) = &self.filepath {
            return path.clone();
        }

        let template = outtmpl.to_string_lossy();
        PathBuf::from(
            template
                .replace("%(id)s", &self.id)
                .replace("%(ext)s", &self.ext),
        )
    }

    /// Title for display, `"video"` when absent
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or("video")
    }
}

/// Query parameters of `GET /download`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DownloadRequest {
    pub url: Option<String>,
    /// Role name; case-insensitive, defaults to `user`
    pub quality: Option<String>,
}

impl DownloadRequest {
    /// Parse a raw query string. A repeated key keeps its last value and
    /// unknown keys are ignored, so parsing never fails.
    pub fn from_query(query: Option<&str>) -> Self {
        let mut request = Self::default();
        let Some(query) = query else {
            return request;
        };

        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                "url" => request.url = Some(value.into_owned()),
                "quality" => request.quality = Some(value.into_owned()),
                _ => {}
            }
        }
        request
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::downloader::presets::{PresetTable, Role};

    #[test]
    fn test_options_for_preset() {
        let table = PresetTable::standard();
        let preset = table.get(Role::ProUser).unwrap();
        let outtmpl = Path::new("/tmp/ws").join(OUTPUT_TEMPLATE);
        let opts = ExtractorOptions::for_preset(preset, outtmpl);

        assert_eq!(opts.format, preset.format_selector);
        assert_eq!(opts.merge_output_format, "mp4");
        assert!(opts.noplaylist);
        assert!(opts.quiet);
        assert_eq!(opts.outtmpl, PathBuf::from("/tmp/ws/%(id)s.%(ext)s"));
        assert_eq!(opts.format_sort, vec!["+size", "+br"]);
    }

    #[test]
    fn test_options_render_ytdlp_flags() {
        let preset = QualityPreset::new(["best[height<=240]", "worst"], "240p");
        let outtmpl = PathBuf::from("/w/%(id)s.%(ext)s");
        let args = ExtractorOptions::for_preset(&preset, outtmpl).to_args();

        assert_eq!(
            args,
            vec![
                "-f",
                "best[height<=240]/worst",
                "--merge-output-format",
                "mp4",
                "--no-playlist",
                "-o",
                "/w/%(id)s.%(ext)s",
                "--quiet",
                "--no-progress",
                "--no-warnings",
                "-S",
                "+size,+br",
            ]
        );
    }

    #[test]
    fn test_output_path_prefers_reported_filepath() {
        let media = ExtractedMedia {
            id: "abc".into(),
            ext: "webm".into(),
            title: None,
            filepath: Some(PathBuf::from("/w/abc.mp4")),
        };
        assert_eq!(
            media.output_path(Path::new("/w/%(id)s.%(ext)s")),
            PathBuf::from("/w/abc.mp4")
        );
    }

    #[test]
    fn test_output_path_renders_template() {
        let media = ExtractedMedia {
            id: "dQw4w9WgXcQ".into(),
            ext: "mp4".into(),
            title: Some("Song".into()),
            filepath: None,
        };
        assert_eq!(
            media.output_path(Path::new("/w/%(id)s.%(ext)s")),
            PathBuf::from("/w/dQw4w9WgXcQ.mp4")
        );
        assert_eq!(media.display_title(), "Song");
    }

    #[test]
    fn test_query_last_value_wins() {
        let request =
            DownloadRequest::from_query(Some("url=https://e/v&quality=admin&quality=guest"));
        assert_eq!(request.url.as_deref(), Some("https://e/v"));
        assert_eq!(request.quality.as_deref(), Some("guest"));

        let request = DownloadRequest::from_query(Some("url=a&url=b"));
        assert_eq!(request.url.as_deref(), Some("b"));
    }

    #[test]
    fn test_query_decodes_and_ignores_unknown_keys() {
        let request = DownloadRequest::from_query(Some(
            "url=https%3A%2F%2Fe%2Fwatch%3Fv%3D1&foo=bar&quality=Pro_User",
        ));
        assert_eq!(request.url.as_deref(), Some("https://e/watch?v=1"));
        assert_eq!(request.quality.as_deref(), Some("Pro_User"));
    }

    #[test]
    fn test_query_missing_or_empty() {
        assert_eq!(DownloadRequest::from_query(None), DownloadRequest::default());
        assert_eq!(DownloadRequest::from_query(Some("")), DownloadRequest::default());
        assert_eq!(
            DownloadRequest::from_query(Some("quality=")).quality.as_deref(),
            Some("")
        );
    }
}
