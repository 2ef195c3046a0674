//! Integration tests for `VideoIndexClient` using wiremock HTTP mocks.

use serde_json::json;
use sponsorlens_analysis::{DetectionService, VideoCatalog};
use sponsorlens_intel::{RetryPolicy, VideoIndexClient};
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const NO_RETRY: RetryPolicy = RetryPolicy {
    max_retries: 0,
    backoff_base_ms: 0,
};

fn test_client(base_url: &str) -> VideoIndexClient {
    VideoIndexClient::with_base_url("test-key", "idx1", 30, base_url)
        .expect("client construction should not fail")
        .with_retry(NO_RETRY)
}

#[tokio::test]
async fn analyze_returns_raw_model_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/analyze"))
        .and(header("x-api-key", "test-key"))
        .and(body_partial_json(json!({"video_id": "vid1", "stream": false})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "gen-1",
            "data": "Found: [{\"brand\": \"Nike\", \"timeline\": [1, 2]}]"
        })))
        .mount(&server)
        .await;

    let text = test_client(&server.uri())
        .analyze("vid1", "find brands")
        .await
        .expect("analyze should succeed");
    assert!(text.starts_with("Found: ["));
}

#[tokio::test]
async fn video_metadata_reads_system_metadata() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/indexes/idx1/videos/vid1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "_id": "vid1",
            "system_metadata": {"filename": "final.mp4", "duration": 612.5}
        })))
        .mount(&server)
        .await;

    let meta = test_client(&server.uri())
        .video_metadata("vid1")
        .await
        .expect("metadata should parse");
    assert_eq!(meta.filename.as_deref(), Some("final.mp4"));
    assert_eq!(meta.duration, Some(612.5));
}

#[tokio::test]
async fn list_videos_attaches_thumbnails_best_effort() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/indexes/idx1/videos"))
        .and(query_param("page", "1"))
        .and(query_param("page_limit", "50"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                {"_id": "abc12345xyz", "created_at": "2025-05-01T00:00:00Z",
                 "system_metadata": {"filename": "a.mp4", "duration": 600.0}},
                {"_id": "def67890uvw", "system_metadata": {}}
            ]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/indexes/idx1/videos/abc12345xyz"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "_id": "abc12345xyz",
            "hls": {"thumbnail_urls": ["https://cdn.example.com/a.jpg"]}
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/indexes/idx1/videos/def67890uvw"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let listing = test_client(&server.uri())
        .list_videos(1, 50)
        .await
        .expect("listing should succeed");

    assert_eq!(listing["total_count"], 2);
    assert_eq!(listing["index_id"], "idx1");
    let videos = listing["videos"].as_array().unwrap();
    assert_eq!(videos[0]["filename"], "a.mp4");
    assert_eq!(videos[0]["thumbnail_url"], "https://cdn.example.com/a.jpg");
    assert_eq!(videos[1]["filename"], "Video_def67890");
    assert!(videos[1]["thumbnail_url"].is_null());
    assert_eq!(videos[1]["duration"], 0.0);
}

#[tokio::test]
async fn missing_video_is_reported_as_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/indexes/idx1/videos/nope"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = test_client(&server.uri())
        .video_details("nope")
        .await
        .unwrap_err();
    assert!(err.not_found, "got: {err:?}");
    assert_eq!(err.service, "twelvelabs");
}

#[tokio::test]
async fn thumbnail_falls_back_to_placeholder() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/indexes/idx1/videos/abcdefghijk"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"_id": "abcdefghijk"})))
        .mount(&server)
        .await;

    let thumb = test_client(&server.uri())
        .video_thumbnail("abcdefghijk")
        .await
        .unwrap();
    assert!(thumb["thumbnail_url"]
        .as_str()
        .unwrap()
        .ends_with("text=Video+abcdefgh"));
}

#[tokio::test]
async fn search_passes_hits_through() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/search"))
        .and(body_partial_json(json!({"index_id": "idx1", "query_text": "nike logo"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"video_id": "vid1", "start": 10.0, "end": 14.5, "confidence": "high"}]
        })))
        .mount(&server)
        .await;

    let found = test_client(&server.uri()).search("nike logo").await.unwrap();
    assert_eq!(found["query"], "nike logo");
    assert_eq!(found["total_results"], 1);
    assert_eq!(found["results"][0]["confidence"], "high");
}

#[tokio::test]
async fn transient_server_error_is_retried() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/analyze"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/analyze"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": "[]"})))
        .mount(&server)
        .await;

    let client = test_client(&server.uri()).with_retry(RetryPolicy {
        max_retries: 2,
        backoff_base_ms: 0,
    });
    let text = client.analyze_text("vid1", "prompt").await.unwrap();
    assert_eq!(text, "[]");
}
