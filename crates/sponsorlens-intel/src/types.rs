//! Wire types for the video index and chat-completions APIs.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SystemMetadata {
    #[serde(default)]
    pub filename: Option<String>,
    /// Seconds.
    #[serde(default)]
    pub duration: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HlsInfo {
    #[serde(default)]
    pub video_url: Option<String>,
    #[serde(default)]
    pub thumbnail_urls: Vec<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// A video as described by the index.
#[derive(Debug, Clone, Deserialize)]
pub struct IndexedVideo {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub system_metadata: SystemMetadata,
    #[serde(default)]
    pub hls: Option<HlsInfo>,
}

impl IndexedVideo {
    #[must_use]
    pub fn thumbnail_url(&self) -> Option<&str> {
        self.hls
            .as_ref()
            .and_then(|h| h.thumbnail_urls.first())
            .map(String::as_str)
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct VideoPage {
    #[serde(default)]
    pub data: Vec<IndexedVideo>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchHit {
    pub video_id: String,
    pub start: f64,
    pub end: f64,
    /// The index reports a label such as `"high"`; kept as-is.
    #[serde(default)]
    pub confidence: Value,
    #[serde(default)]
    pub metadata: Value,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchPage {
    #[serde(default)]
    pub data: Vec<SearchHit>,
}

#[derive(Debug, Serialize)]
pub(crate) struct AnalyzeRequest<'a> {
    pub video_id: &'a str,
    pub prompt: &'a str,
    pub stream: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AnalyzeResponse {
    pub data: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct SearchRequest<'a> {
    pub index_id: &'a str,
    pub query_text: &'a str,
    pub search_options: [&'a str; 2],
    pub page_limit: u32,
}

#[derive(Debug, Serialize)]
pub(crate) struct ChatMessage<'a> {
    pub role: &'a str,
    pub content: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: [ChatMessage<'a>; 2],
    pub temperature: f32,
    pub max_tokens: u32,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatChoice {
    pub message: ChatReply,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatReply {
    #[serde(default)]
    pub content: Option<String>,
}

/// DuckDuckGo instant-answer payload; only the fields we read.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct InstantAnswer {
    #[serde(rename = "Abstract")]
    pub abstract_text: String,
    #[serde(rename = "AbstractURL")]
    pub abstract_url: String,
    #[serde(rename = "RelatedTopics")]
    pub related_topics: Vec<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct WikiSummary {
    pub extract: String,
    pub content_urls: Value,
}
