use std::time::Duration;
use url::Url;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};
use super::*;
use crate::tracker::NodeId;

const REST_CAT: &str = "/api/rest_v1/page/summary/Cat";

fn test_client(server: &MockServer) -> Result<SummaryClient, Box<dyn std::error::Error>> {
    let config = SummaryConfig::new()
        .with_request_timeout(1)
        .with_api_host(Url::parse(&server.uri())?);
    Ok(SummaryClient::new(config)?)
}

async fn mount_extracts(server: &MockServer, body: &str) {
    Mock::given(method("GET"))
        .and(path("/w/api.php"))
        .and(query_param("action", "query"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

async fn mount_opensearch(server: &MockServer, body: &str) {
    Mock::given(method("GET"))
        .and(path("/w/api.php"))
        .and(query_param("action", "opensearch"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

// tests for the fallback chain start here
#[tokio::test]
async fn test_rest_summary_wins() -> Result<(), Box<dyn std::error::Error>> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(REST_CAT))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"type":"standard","title":"Cat","extract":"The cat is a small carnivorous mammal."}"#,
        ))
        .expect(1)
        .mount(&server)
        .await;
    mount_extracts(&server, r#"{"query":{"pages":{"1":{"title":"Cat","extract":"unused"}}}}"#).await;

    let summary = test_client(&server)?.fetch_summary("Cat", "en").await;
    assert_eq!(summary.source, SummarySource::Rest);
    assert_eq!(summary.title, "Cat");
    assert_eq!(summary.summary, "The cat is a small carnivorous mammal.");
    assert!(!summary.is_degraded());
    Ok(())
}

/// disambiguation pages are skipped, the extracts query answers instead
#[tokio::test]
async fn test_disambiguation_falls_through() -> Result<(), Box<dyn std::error::Error>> {
    let server = MockServer::start().await;
    Mock::given(path(REST_CAT))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"type":"disambiguation","title":"Cat","extract":"Cat may refer to:"}"#,
        ))
        .mount(&server)
        .await;
    mount_extracts(
        &server,
        r#"{"batchcomplete":"","query":{"pages":{"6678":{"pageid":6678,"title":"Cat","extract":"Cats are mammals."}}}}"#,
    )
    .await;

    let summary = test_client(&server)?.fetch_summary("Cat", "en").await;
    assert_eq!(summary.source, SummarySource::Extracts);
    assert_eq!(summary.summary, "Cats are mammals.");
    Ok(())
}

#[tokio::test]
async fn test_missing_page_falls_to_opensearch() -> Result<(), Box<dyn std::error::Error>> {
    let server = MockServer::start().await;
    Mock::given(path(REST_CAT))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    mount_extracts(
        &server,
        r#"{"query":{"pages":{"-1":{"ns":0,"title":"Cat","missing":""}}}}"#,
    )
    .await;
    mount_opensearch(
        &server,
        r#"["Cat",["Catalan"],["Catalan is a Romance language."],["https://en.wikipedia.org/wiki/Catalan"]]"#,
    )
    .await;

    let summary = test_client(&server)?.fetch_summary("Cat", "en").await;
    assert_eq!(summary.source, SummarySource::OpenSearch);
    assert_eq!(summary.title, "Catalan");
    assert_eq!(summary.summary, "Catalan is a Romance language.");
    Ok(())
}

#[tokio::test]
async fn test_nothing_found_gives_placeholder() -> Result<(), Box<dyn std::error::Error>> {
    let server = MockServer::start().await;
    let title = "Qwxzzy";
    Mock::given(path("/api/rest_v1/page/summary/Qwxzzy"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    mount_extracts(&server, r#"{"query":{"pages":{"-1":{"title":"Qwxzzy","missing":""}}}}"#).await;
    mount_opensearch(&server, r#"["Qwxzzy",[],[],[]]"#).await;

    let summary = test_client(&server)?.fetch_summary(title, "en").await;
    assert!(summary.is_degraded());
    assert_eq!(summary.title, title);
    assert!(summary.summary.contains(title));
    Ok(())
}

#[tokio::test]
async fn test_malformed_json_is_a_failed_strategy() -> Result<(), Box<dyn std::error::Error>> {
    let server = MockServer::start().await;
    Mock::given(path(REST_CAT))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;
    mount_extracts(&server, "{").await;
    mount_opensearch(&server, r#"["Cat",["Cat"],["Small mammal."],[]]"#).await;

    let summary = test_client(&server)?.fetch_summary("Cat", "en").await;
    assert_eq!(summary.source, SummarySource::OpenSearch);
    assert_eq!(summary.summary, "Small mammal.");
    Ok(())
}

/// a hanging endpoint is cut off by the request timeout
#[tokio::test]
async fn test_slow_rest_endpoint_times_out() -> Result<(), Box<dyn std::error::Error>> {
    let server = MockServer::start().await;
    Mock::given(path(REST_CAT))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"{"type":"standard","title":"Cat","extract":"late"}"#)
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;
    mount_extracts(&server, r#"{"query":{"pages":{"1":{"title":"Cat","extract":"on time"}}}}"#).await;

    let summary = test_client(&server)?.fetch_summary("Cat", "en").await;
    assert_eq!(summary.source, SummarySource::Extracts);
    assert_eq!(summary.summary, "on time");
    Ok(())
}

#[tokio::test]
async fn test_unreachable_host_gives_placeholder() -> Result<(), Box<dyn std::error::Error>> {
    // nothing listens on the discard port
    let config = SummaryConfig::new()
        .with_request_timeout(1)
        .with_api_host(Url::parse("http://127.0.0.1:9/")?);
    let client = SummaryClient::new(config)?;

    let summary = client.fetch_summary("Cat", "en").await;
    assert!(summary.is_degraded());
    Ok(())
}
// tests for the fallback chain end here

#[test]
fn test_default_base_url_uses_language() -> Result<(), Box<dyn std::error::Error>> {
    let config = SummaryConfig::default();
    assert_eq!(config.base_url("ja")?.as_str(), "https://ja.wikipedia.org/");
    assert_eq!(config.request_timeout_sec, SUMMARY_REQUEST_TIMEOUT_SEC);
    assert!(config.user_agent.starts_with("WikiTracker/"));
    Ok(())
}

// tests for `SummarySlot` start here
#[test]
fn test_slot_accepts_current_reply() {
    let mut slot = SummarySlot::new();
    let node = NodeId::generate();
    let ticket = slot.begin(node);
    assert!(slot.is_loading());

    assert!(slot.finish(ticket, node, placeholder_summary("Cat")));
    assert!(!slot.is_loading());
    assert_eq!(slot.value().unwrap().title, "Cat");
}

#[test]
fn test_slot_drops_stale_reply() {
    let mut slot = SummarySlot::new();
    let first = NodeId::generate();
    let second = NodeId::generate();

    let old_ticket = slot.begin(first);
    let new_ticket = slot.begin(second);

    assert!(!slot.finish(old_ticket, first, placeholder_summary("Cat")));
    assert!(slot.value().is_none());
    assert!(slot.is_loading());

    assert!(slot.finish(new_ticket, second, placeholder_summary("Dog")));
    assert_eq!(slot.value().unwrap().title, "Dog");
}

#[test]
fn test_slot_reset_invalidates_in_flight() {
    let mut slot = SummarySlot::new();
    let node = NodeId::generate();
    let ticket = slot.begin(node);
    slot.reset();

    assert!(!slot.finish(ticket, node, placeholder_summary("Cat")));
    assert!(slot.requested_for().is_none());
    assert!(slot.value().is_none());
}
// tests for `SummarySlot` end here
