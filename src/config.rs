//! Command-line and environment configuration.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use thiserror::Error;
use tracing::Level;

use crate::constants::{DEFAULT_API_BASE_URL, DEFAULT_FRAME_MS, DEFAULT_HTTP_TIMEOUT_SECS};

#[derive(Parser, Debug)]
#[command(
    name = "term-desk",
    version = env!("CARGO_PKG_VERSION"),
    about = "A desktop-style portfolio shell for the terminal"
)]
pub struct DeskArgs {
    /// Origin of the guestbook comments API.
    #[arg(
        long = "api-base-url",
        value_name = "URL",
        env = "TERM_DESK_API_BASE_URL",
        default_value = DEFAULT_API_BASE_URL
    )]
    pub api_base_url: String,

    /// Timeout applied to every guestbook request.
    #[arg(long = "http-timeout-secs", value_name = "SECONDS", default_value_t = DEFAULT_HTTP_TIMEOUT_SECS)]
    pub http_timeout_secs: u64,

    /// Append logs to this file. Without it logs are discarded.
    #[arg(long = "log-file", value_name = "PATH", env = "TERM_DESK_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    #[arg(long = "log-level", value_name = "LEVEL", env = "TERM_DESK_LOG", default_value = "info")]
    pub log_level: Level,

    /// Redraw interval.
    #[arg(long = "frame-ms", value_name = "MS", default_value_t = DEFAULT_FRAME_MS)]
    pub frame_ms: u64,

    /// Keep guestbook comments in memory instead of talking to the API.
    #[arg(long)]
    pub offline: bool,

    /// Owner secret accepted by the in-memory guestbook. Ignored unless
    /// `--offline` is set.
    #[arg(long = "owner-secret", value_name = "SECRET", env = "TERM_DESK_OWNER_SECRET")]
    pub owner_secret: Option<String>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("http timeout must be between 1 and 120 seconds, got {0}")]
    HttpTimeout(u64),
    #[error("frame interval must be between 1 and 1000 ms, got {0}")]
    FrameInterval(u64),
    #[error("api base url must start with http:// or https://, got {0:?}")]
    ApiBaseUrl(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeskConfig {
    pub api_base_url: String,
    pub http_timeout: Duration,
    pub log_file: Option<PathBuf>,
    pub log_level: Level,
    pub frame_interval: Duration,
    pub offline: bool,
    pub owner_secret: Option<String>,
}

impl TryFrom<&DeskArgs> for DeskConfig {
    type Error = ConfigError;

    fn try_from(args: &DeskArgs) -> Result<Self, Self::Error> {
        if !(1..=120).contains(&args.http_timeout_secs) {
            return Err(ConfigError::HttpTimeout(args.http_timeout_secs));
        }
        if !(1..=1000).contains(&args.frame_ms) {
            return Err(ConfigError::FrameInterval(args.frame_ms));
        }
        let base = args.api_base_url.trim().trim_end_matches('/');
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(ConfigError::ApiBaseUrl(args.api_base_url.clone()));
        }
        Ok(Self {
            api_base_url: base.to_string(),
            http_timeout: Duration::from_secs(args.http_timeout_secs),
            log_file: args.log_file.clone(),
            log_level: args.log_level,
            frame_interval: Duration::from_millis(args.frame_ms),
            offline: args.offline,
            owner_secret: args.owner_secret.clone(),
        })
    }
}
