//! Command-line / environment configuration

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;

use crate::downloader::YtDlpExtractor;

#[derive(Parser, Debug, Clone)]
#[command(name = "video-gateway")]
#[command(about = "HTTP gateway that downloads videos through yt-dlp with role-based quality")]
#[command(version)]
pub struct Config {
    /// Address to bind
    #[arg(long, default_value = "0.0.0.0", env = "VIDEO_GATEWAY_HOST")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, default_value = "8000", env = "VIDEO_GATEWAY_PORT")]
    pub port: u16,

    /// Path to the yt-dlp executable (auto-detected when omitted)
    #[arg(long, env = "YTDLP_PATH")]
    pub ytdlp_path: Option<String>,

    /// Run `<python> -m yt_dlp` instead of the native binary
    #[arg(long, env = "YTDLP_PYTHON")]
    pub python: Option<String>,

    /// Directory that holds per-request workspaces (system temp dir by default)
    #[arg(long, env = "VIDEO_GATEWAY_WORKSPACE_DIR")]
    pub workspace_dir: Option<PathBuf>,
}

impl Config {
    /// Bind the listener. `host` may be an IP literal or a hostname such
    /// as `localhost`; names are resolved before binding.
    pub async fn bind(&self) -> anyhow::Result<TcpListener> {
        TcpListener::bind((self.host.as_str(), self.port))
            .await
            .with_context(|| format!("Failed to bind {}:{}", self.host, self.port))
    }

    /// Python mode wins when an interpreter is configured
    pub fn build_extractor(&self) -> YtDlpExtractor {
        match &self.python {
            Some(interpreter) => YtDlpExtractor::python(interpreter.clone()),
            None => YtDlpExtractor::cli(self.ytdlp_path.as_deref()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::downloader::ExtractorMode;

    #[test]
    fn test_defaults() {
        let config = Config::try_parse_from(["video-gateway"]).unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8000);
    }

    #[test]
    fn test_python_mode_selected() {
        let config =
            Config::try_parse_from(["video-gateway", "--python", "/venv/bin/python"]).unwrap();
        assert_eq!(
            config.build_extractor().mode(),
            &ExtractorMode::Python {
                interpreter: "/venv/bin/python".to_string()
            }
        );
    }

    #[test]
    fn test_explicit_ytdlp_path() {
        let config =
            Config::try_parse_from(["video-gateway", "--ytdlp-path", "/opt/yt-dlp", "-p", "9000"])
                .unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(
            config.build_extractor().mode(),
            &ExtractorMode::Cli {
                ytdlp_path: "/opt/yt-dlp".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_bind_resolves_hostname() {
        let config =
            Config::try_parse_from(["video-gateway", "--host", "localhost", "--port", "0"])
                .unwrap();
        let listener = config.bind().await.unwrap();
        assert!(listener.local_addr().unwrap().ip().is_loopback());
    }

    #[tokio::test]
    async fn test_bind_ip_literal() {
        let config =
            Config::try_parse_from(["video-gateway", "--host", "127.0.0.1", "-p", "0"]).unwrap();
        let listener = config.bind().await.unwrap();
        assert_ne!(listener.local_addr().unwrap().port(), 0);
    }

    #[tokio::test]
    async fn test_bind_unresolvable_host_fails() {
        let config = Config::try_parse_from(["video-gateway", "--host", "not a host"]).unwrap();
        let err = config.bind().await.unwrap_err();
        assert!(err.to_string().contains("not a host:8000"));
    }
}
