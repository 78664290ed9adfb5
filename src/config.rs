use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use url::Url;

use crate::summary::{SummaryConfig, SUMMARY_REQUEST_TIMEOUT_SEC};
use crate::wiki;

/// Log levels as defined in log2 crate
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}
/// All program arguments. `SummaryConfig` is derived from the subset that
/// concerns the summary lookup.
#[derive(Parser, Debug, Serialize, Deserialize)]
#[command(author, version, about = "Record a Wikipedia browsing session as a tree", long_about = None)]
pub struct Config {
    /// Wikipedia article to start the session with
    #[arg(short, long)]
    pub start_url: Option<String>,
    /// File the session tree is written to (Graphviz DOT) after every change
    #[arg(short, long)]
    pub output_file: Option<PathBuf>,
    /// Timeout of a single summary request in seconds
    #[arg(long, default_value_t = SUMMARY_REQUEST_TIMEOUT_SEC)]
    pub request_timeout: u64,
    /// Base URL used instead of https://<lang>.wikipedia.org/ for summaries
    #[arg(long)]
    pub api_host: Option<String>,
    /// Window width in points
    #[arg(long, default_value = "1100")]
    pub window_width: f32,
    /// Window height in points
    #[arg(long, default_value = "720")]
    pub window_height: f32,
    /// Enable verbose logging (same as --log-level debug)
    #[arg(short, long)]
    pub verbose: bool,
    /// Logging level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", value_enum)]
    pub log_level: LogLevel,
}

impl Config {
    pub fn new() -> Self {
        Self::parse()
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.request_timeout == 0 {
            anyhow::bail!("request_timeout must be greater than 0");
        }
        if let Some(url) = &self.start_url {
            if !wiki::is_valid_url(url) {
                anyhow::bail!("start_url is not a Wikipedia article URL: {}", url);
            }
        }
        if let Some(host) = &self.api_host {
            Url::parse(host).map_err(|e| anyhow::anyhow!("api_host {} is not a valid URL: {}", host, e))?;
        }
        if self.window_width <= 0.0 || self.window_height <= 0.0 {
            anyhow::bail!("window size must be positive");
        }
        Ok(())
    }

    /// Level handed to log2, `--verbose` wins over anything quieter than debug
    pub fn effective_log_level(&self) -> LogLevel {
        match self.log_level {
            LogLevel::Info | LogLevel::Warn | LogLevel::Error if self.verbose => LogLevel::Debug,
            level => level,
        }
    }

    pub fn summary_config(&self) -> anyhow::Result<SummaryConfig> {
        let mut cfg = SummaryConfig::new().with_request_timeout(self.request_timeout);
        if let Some(host) = &self.api_host {
            cfg = cfg.with_api_host(Url::parse(host)?);
        }
        Ok(cfg)
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        };
        write!(f, "{}", s)
    }
}
