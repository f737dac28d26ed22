// yt-dlp extractor - runs the native binary or `python -m yt_dlp`
//
// yt-dlp does the whole job (extraction, download, merge). We only pass
// options through and read back one JSON line printed after the final file
// has been moved into place.

use async_trait::async_trait;
use std::fmt;

use crate::downloader::errors::ExtractionError;
use crate::downloader::models::{ExtractedMedia, ExtractorOptions};
use crate::downloader::traits::MediaExtractor;
use crate::downloader::utils::{find_ytdlp, run_output};

/// Printed once per downloaded video, after post-processing
const METADATA_PRINT: &str = "after_move:%(.{id,ext,title,filepath})j";

/// How yt-dlp is launched
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractorMode {
    /// Native `yt-dlp` executable
    Cli { ytdlp_path: String },
    /// `python -m yt_dlp` with the given interpreter
    Python { interpreter: String },
}

impl fmt::Display for ExtractorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cli { ytdlp_path } => write!(f, "cli ({})", ytdlp_path),
            Self::Python { interpreter } => write!(f, "python ({} -m yt_dlp)", interpreter),
        }
    }
}

/// Production extractor backed by yt-dlp
pub struct YtDlpExtractor {
    mode: ExtractorMode,
}

impl YtDlpExtractor {
    pub fn new(mode: ExtractorMode) -> Self {
        Self { mode }
    }

    /// Native binary, discovered when `ytdlp_path` is `None`
    pub fn cli(ytdlp_path: Option<&str>) -> Self {
        Self::new(ExtractorMode::Cli {
            ytdlp_path: find_ytdlp(ytdlp_path),
        })
    }

    pub fn python(interpreter: impl Into<String>) -> Self {
        Self::new(ExtractorMode::Python {
            interpreter: interpreter.into(),
        })
    }

    pub fn mode(&self) -> &ExtractorMode {
        &self.mode
    }

    /// Program plus full argument list for one download
    fn build_command(&self, url: &str, options: &ExtractorOptions) -> (String, Vec<String>) {
        let (program, mut args) = match &self.mode {
            ExtractorMode::Cli { ytdlp_path } => (ytdlp_path.clone(), Vec::new()),
            ExtractorMode::Python { interpreter } => (
                interpreter.clone(),
                vec!["-m".to_string(), "yt_dlp".to_string()],
            ),
        };

        args.extend(options.to_args());
        // --print alone would switch yt-dlp to simulate mode
        args.push("--no-simulate".to_string());
        args.push("--print".to_string());
        args.push(METADATA_PRINT.to_string());
        // Keep a URL starting with '-' from being read as a flag
        args.push("--".to_string());
        args.push(url.to_string());

        (program, args)
    }

    /// Parse the metadata line. yt-dlp may print other lines first, so the
    /// last non-empty line wins.
    fn parse_metadata(stdout: &[u8]) -> Result<ExtractedMedia, ExtractionError> {
        let text = String::from_utf8_lossy(stdout);
        let line = text
            .lines()
            .rev()
            .map(str::trim)
            .find(|l| !l.is_empty())
            .ok_or_else(|| ExtractionError::Parse("yt-dlp printed no metadata".to_string()))?;

        serde_json::from_str(line)
            .map_err(|e| ExtractionError::Parse(format!("Invalid JSON: {}", e)))
    }
}

#[async_trait]
impl MediaExtractor for YtDlpExtractor {
    fn name(&self) -> &'static str {
        match self.mode {
            ExtractorMode::Cli { .. } => "cli-yt-dlp",
            ExtractorMode::Python { .. } => "python-yt-dlp",
        }
    }

    async fn extract_and_download(
        &self,
        url: &str,
        options: &ExtractorOptions,
    ) -> Result<ExtractedMedia, ExtractionError> {
        let (program, args) = self.build_command(url, options);
        tracing::debug!(extractor = self.name(), "{} {}", program, args.join(" "));

        let output = run_output(&program, &args).await?;
        if !output.status.success() {
            return Err(ExtractionError::from_exit(output.status, &output.stderr));
        }

        Self::parse_metadata(&output.stdout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::downloader::presets::{PresetTable, Role};
    use std::path::PathBuf;

    fn options() -> ExtractorOptions {
        let table = PresetTable::standard();
        let preset = table.get(Role::User).unwrap();
        ExtractorOptions::for_preset(preset, PathBuf::from("/w/%(id)s.%(ext)s"))
    }

    #[test]
    fn test_cli_command_line() {
        let extractor = YtDlpExtractor::cli(Some("/bin/yt-dlp"));
        let (program, args) = extractor.build_command("https://youtu.be/x", &options());

        assert_eq!(program, "/bin/yt-dlp");
        assert_eq!(args[0], "-f");
        assert!(args.contains(&"--no-playlist".to_string()));
        assert!(args.windows(2).any(|w| w[0] == "--print" && w[1] == METADATA_PRINT));
        assert_eq!(&args[args.len() - 2..], ["--", "https://youtu.be/x"]);
    }

    #[test]
    fn test_python_command_line() {
        let extractor = YtDlpExtractor::python("python3");
        let (program, args) = extractor.build_command("https://youtu.be/x", &options());

        assert_eq!(program, "python3");
        assert_eq!(&args[..2], ["-m", "yt_dlp"]);
        assert_eq!(extractor.name(), "python-yt-dlp");
    }

    #[test]
    fn test_parse_metadata_takes_last_line() {
        let stdout = concat!(
            "[info] something\n",
            r#"{"id":"abc","ext":"mp4","title":"Clip","filepath":"/w/abc.mp4"}"#,
            "\n\n",
        );
        let media = YtDlpExtractor::parse_metadata(stdout.as_bytes()).unwrap();

        assert_eq!(media.id, "abc");
        assert_eq!(media.ext, "mp4");
        assert_eq!(media.title.as_deref(), Some("Clip"));
        assert_eq!(media.filepath, Some(PathBuf::from("/w/abc.mp4")));
    }

    #[test]
    fn test_parse_metadata_tolerates_missing_title() {
        let stdout = br#"{"id":"abc","ext":"mp4","title":null}"#;
        let media = YtDlpExtractor::parse_metadata(stdout).unwrap();
        assert_eq!(media.title, None);
        assert_eq!(media.filepath, None);
    }

    #[test]
    fn test_parse_metadata_errors() {
        assert!(matches!(
            YtDlpExtractor::parse_metadata(b"\n  \n"),
            Err(ExtractionError::Parse(_))
        ));
        assert!(matches!(
            YtDlpExtractor::parse_metadata(b"not json"),
            Err(ExtractionError::Parse(_))
        ));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_failed_run_surfaces_stderr() {
        let extractor = YtDlpExtractor::new(ExtractorMode::Python {
            interpreter: "sh".to_string(),
        });
        let err = extractor
            .extract_and_download("https://example.invalid/v", &options())
            .await
            .unwrap_err();

        // `sh -m yt_dlp` can't find a script named yt_dlp
        assert!(matches!(err, ExtractionError::Failed { .. }));
        assert!(!err.to_string().is_empty());
    }
}
