use anyhow::{anyhow, Result};
use log2::{debug, info};
use reqwest::header::ACCEPT;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;
use url::Url;

use super::config::SummaryConfig;

/// Where a summary came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummarySource {
    /// `/api/rest_v1/page/summary/<title>`
    Rest,
    /// Action API `prop=extracts`
    Extracts,
    /// Action API `action=opensearch`
    OpenSearch,
    /// Nothing answered, text synthesized locally
    Placeholder,
}

impl SummarySource {
    pub fn label(&self) -> &'static str {
        match self {
            SummarySource::Rest => "summary",
            SummarySource::Extracts => "extract",
            SummarySource::OpenSearch => "search",
            SummarySource::Placeholder => "unavailable",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleSummary {
    pub title: String,
    pub summary: String,
    pub source: SummarySource,
}

impl ArticleSummary {
    /// True when no endpoint produced a usable summary
    pub fn is_degraded(&self) -> bool {
        self.source == SummarySource::Placeholder
    }
}

pub fn placeholder_summary(title: &str) -> ArticleSummary {
    ArticleSummary {
        title: title.to_string(),
        summary: format!(
            "Wikipedia article \"{}\" was added. Open the article link to read it.",
            title
        ),
        source: SummarySource::Placeholder,
    }
}

#[derive(Deserialize)]
struct RestSummary {
    #[serde(rename = "type")]
    kind: Option<String>,
    title: Option<String>,
    extract: Option<String>,
}

#[derive(Deserialize)]
struct QueryResponse {
    query: Option<QueryPages>,
}

#[derive(Deserialize)]
struct QueryPages {
    #[serde(default)]
    pages: HashMap<String, QueryPage>,
}

#[derive(Deserialize)]
struct QueryPage {
    title: Option<String>,
    extract: Option<String>,
    /// Present (usually as `""`) when the page does not exist
    missing: Option<Value>,
}

fn non_empty(text: Option<String>) -> Option<String> {
    text.filter(|t| !t.trim().is_empty())
}

/// Best-effort article summary lookup against the Wikipedia APIs
#[derive(Debug, Clone)]
pub struct SummaryClient {
    client: Client,
    config: SummaryConfig,
}

impl SummaryClient {
    pub fn new(config: SummaryConfig) -> Result<Self> {
        let client = Client::builder().user_agent(config.user_agent.clone()).build()?;
        Ok(Self::with_client(client, config))
    }

    pub fn with_client(client: Client, config: SummaryConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &SummaryConfig {
        &self.config
    }

    /// Try the REST summary, the extracts query and opensearch in that order.
    /// Never fails: when all three come back empty a placeholder is returned.
    pub async fn fetch_summary(&self, title: &str, language: &str) -> ArticleSummary {
        info!("Fetching summary for \"{}\" in language {}", title, language);

        for source in [SummarySource::Rest, SummarySource::Extracts, SummarySource::OpenSearch] {
            match self.try_source(source, title, language).await {
                Ok(Some(summary)) => {
                    debug!("Summary for \"{}\" served by {:?}", title, source);
                    return summary;
                }
                Ok(None) => debug!("{:?} had no usable summary for \"{}\"", source, title),
                Err(e) => debug!("{:?} lookup for \"{}\" failed: {}", source, title, e),
            }
        }

        info!("No summary found for \"{}\", using placeholder", title);
        placeholder_summary(title)
    }

    async fn try_source(
        &self,
        source: SummarySource,
        title: &str,
        language: &str,
    ) -> Result<Option<ArticleSummary>> {
        let base = self.config.base_url(language)?;
        match source {
            SummarySource::Rest => self.fetch_rest(base, title).await,
            SummarySource::Extracts => self.fetch_extracts(base, title).await,
            SummarySource::OpenSearch => self.fetch_opensearch(base, title).await,
            SummarySource::Placeholder => Ok(Some(placeholder_summary(title))),
        }
    }

    async fn fetch_rest(&self, base: Url, title: &str) -> Result<Option<ArticleSummary>> {
        let url = endpoint(base, &["api", "rest_v1", "page", "summary", title])?;
        let data: RestSummary = serde_json::from_str(&self.get_text(url).await?)?;

        if data.kind.as_deref() == Some("disambiguation") {
            debug!("\"{}\" is a disambiguation page", title);
            return Ok(None);
        }
        Ok(non_empty(data.extract).map(|summary| ArticleSummary {
            title: data.title.unwrap_or_else(|| title.to_string()),
            summary,
            source: SummarySource::Rest,
        }))
    }

    async fn fetch_extracts(&self, base: Url, title: &str) -> Result<Option<ArticleSummary>> {
        let mut url = endpoint(base, &["w", "api.php"])?;
        url.query_pairs_mut()
            .append_pair("action", "query")
            .append_pair("format", "json")
            .append_pair("titles", title)
            .append_pair("prop", "extracts")
            .append_pair("exintro", "")
            .append_pair("explaintext", "");

        let data: QueryResponse = serde_json::from_str(&self.get_text(url).await?)?;
        let Some(page) = data.query.and_then(|q| q.pages.into_values().next()) else {
            return Ok(None);
        };
        if page.missing.is_some() {
            return Ok(None);
        }
        Ok(non_empty(page.extract).map(|summary| ArticleSummary {
            title: page.title.unwrap_or_else(|| title.to_string()),
            summary,
            source: SummarySource::Extracts,
        }))
    }

    async fn fetch_opensearch(&self, base: Url, title: &str) -> Result<Option<ArticleSummary>> {
        let mut url = endpoint(base, &["w", "api.php"])?;
        url.query_pairs_mut()
            .append_pair("action", "opensearch")
            .append_pair("search", title)
            .append_pair("limit", "1")
            .append_pair("namespace", "0")
            .append_pair("format", "json");

        // [query, [titles], [descriptions], [urls]]
        let data: Vec<Value> = serde_json::from_str(&self.get_text(url).await?)?;
        let first = |i: usize| {
            data.get(i)
                .and_then(|v| v.get(0))
                .and_then(Value::as_str)
                .map(str::to_string)
        };

        Ok(non_empty(first(2)).map(|summary| ArticleSummary {
            title: non_empty(first(1)).unwrap_or_else(|| title.to_string()),
            summary,
            source: SummarySource::OpenSearch,
        }))
    }

    async fn get_text(&self, url: Url) -> Result<String> {
        debug!("GET {}", url);
        let response = self
            .client
            .get(url.clone())
            .header(ACCEPT, "application/json")
            .timeout(Duration::from_secs(self.config.request_timeout_sec))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(anyhow!("{} answered {}", url, response.status()));
        }
        Ok(response.text().await?)
    }
}

/// Append `segments` (percent-encoded) to the path of `base`
fn endpoint(mut base: Url, segments: &[&str]) -> Result<Url> {
    base.path_segments_mut()
        .map_err(|_| anyhow!("api host cannot be a base url"))?
        .pop_if_empty()
        .extend(segments);
    Ok(base)
}
