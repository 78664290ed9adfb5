use once_cell::sync::Lazy;
use percent_encoding::percent_decode_str;
use regex::Regex;

use crate::tracker::{NodeId, TrackerError};

/// Language used when the URL carries no recognizable `<lang>.wikipedia.org` host.
/// The tracker was first written for Japanese Wikipedia, so that stays the fallback.
pub const DEFAULT_LANGUAGE: &str = "ja";

/// Single source of truth for "is this a Wikipedia article URL".
/// Used by the input fields and by `TrackerState::add_node`.
static VALID_ARTICLE_URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^https?://[a-z]+\.wikipedia\.org/wiki/[^/\s]+").unwrap());

static LANGUAGE_HOST: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"https?://([a-z]+)\.wikipedia\.org").unwrap());

/// Tried in order, first match wins
static TITLE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"/wiki/([^#?]+)",
        r"/wiki/([^#?/]+)",
        r"wikipedia\.org/wiki/([^#?]+)",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

/// Identity facts derived once from an article URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    pub url: String,
    pub title: String,
    pub language: String,
}

/// Article URL shape plus a title that survives decoding and trimming,
/// so `/wiki/_` or `/wiki/%20` count as invalid here and in `add_node` alike.
pub fn is_valid_url(url: &str) -> bool {
    VALID_ARTICLE_URL.is_match(url) && extract_title(url).is_some()
}

/// Pulls the article title out of the `/wiki/<segment>` part of `url`.
/// Percent-decodes, turns underscores into spaces and cuts at the next `/`.
/// Returns `None` when the URL is not an article URL or the title ends up empty.
pub fn extract_title(url: &str) -> Option<String> {
    let raw = TITLE_PATTERNS
        .iter()
        .find_map(|pattern| pattern.captures(url))
        .and_then(|caps| caps.get(1))?
        .as_str();

    let decoded = percent_decode_str(raw).decode_utf8().ok()?;
    let title = decoded
        .replace('_', " ")
        .split('/')
        .next()
        .unwrap_or_default()
        .trim()
        .to_string();

    if title.is_empty() { None } else { Some(title) }
}

/// Subdomain in front of `.wikipedia.org`, or [`DEFAULT_LANGUAGE`]
pub fn extract_language(url: &str) -> String {
    LANGUAGE_HOST
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string())
}

pub fn generate_id() -> NodeId {
    NodeId::generate()
}

/// Validate and break `url` down into the facts a node is created from.
pub fn parse_article(url: &str) -> Result<Article, TrackerError> {
    if !is_valid_url(url) {
        return Err(TrackerError::InvalidUrl(url.to_string()));
    }
    let title = extract_title(url).ok_or_else(|| TrackerError::InvalidUrl(url.to_string()))?;

    Ok(Article {
        url: url.to_string(),
        title,
        language: extract_language(url),
    })
}
