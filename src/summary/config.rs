use url::Url;

/// Default cap for a single summary request in seconds
pub const SUMMARY_REQUEST_TIMEOUT_SEC: u64 = 5;

pub const DEFAULT_USER_AGENT: &str = concat!("WikiTracker/", env!("CARGO_PKG_VERSION"));

/// Configuration for the summary lookup
#[derive(Debug, Clone)]
pub struct SummaryConfig {
    pub request_timeout_sec: u64,
    pub user_agent: String,
    /// Replaces `https://<lang>.wikipedia.org/` for every endpoint when set
    pub api_host: Option<Url>,
}

impl SummaryConfig {
    pub fn new() -> Self {
        Self {
            request_timeout_sec: SUMMARY_REQUEST_TIMEOUT_SEC,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            api_host: None,
        }
    }

    pub fn with_request_timeout(mut self, timeout_sec: u64) -> Self {
        self.request_timeout_sec = timeout_sec;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_api_host(mut self, host: Url) -> Self {
        self.api_host = Some(host);
        self
    }

    /// Base URL the endpoints for `language` hang off
    pub fn base_url(&self, language: &str) -> Result<Url, url::ParseError> {
        match &self.api_host {
            Some(host) => Ok(host.clone()),
            None => Url::parse(&format!("https://{}.wikipedia.org/", language)),
        }
    }
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self::new()
    }
}
