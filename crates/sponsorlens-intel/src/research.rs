//! Best-effort public web lookups that ground brand background research.
//!
//! Every failure is logged and swallowed; callers get whatever snippets
//! could be gathered, possibly none.

use reqwest::{Client, Url};
use serde_json::Value;
use sponsorlens_analysis::WebSnippet;

use crate::error::IntelError;
use crate::http::{build_client, encode_segment, join, parse_base_url};
use crate::types::{InstantAnswer, WikiSummary};

pub const DUCKDUCKGO_BASE_URL: &str = "https://api.duckduckgo.com";
pub const WIKIPEDIA_BASE_URL: &str = "https://en.wikipedia.org/api/rest_v1";
const RESEARCH_TIMEOUT_SECS: u64 = 8;
const MAX_RELATED_TOPICS: usize = 3;

pub struct WebResearcher {
    client: Client,
    duckduckgo: Url,
    wikipedia: Url,
}

impl WebResearcher {
    /// # Errors
    ///
    /// Returns [`IntelError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new() -> Result<Self, IntelError> {
        Self::with_base_urls(DUCKDUCKGO_BASE_URL, WIKIPEDIA_BASE_URL)
    }

    /// # Errors
    ///
    /// Returns [`IntelError::InvalidBaseUrl`] if either URL does not parse.
    pub fn with_base_urls(duckduckgo: &str, wikipedia: &str) -> Result<Self, IntelError> {
        Ok(Self {
            client: build_client(RESEARCH_TIMEOUT_SECS)?,
            duckduckgo: parse_base_url(duckduckgo)?,
            wikipedia: parse_base_url(wikipedia)?,
        })
    }

    /// Collects instant-answer and encyclopedia snippets about `brand`.
    pub async fn search(&self, brand: &str, query_suffix: &str) -> Vec<WebSnippet> {
        let mut snippets = Vec::new();

        match self.instant_answer(brand, query_suffix).await {
            Ok(found) => snippets.extend(found),
            Err(e) => tracing::warn!(brand, error = %e, "instant answer lookup failed"),
        }
        match self.encyclopedia_summary(brand).await {
            Ok(Some(found)) => snippets.push(found),
            Ok(None) => {}
            Err(e) => tracing::warn!(brand, error = %e, "encyclopedia lookup failed"),
        }

        tracing::debug!(brand, snippets = snippets.len(), "web research finished");
        snippets
    }

    async fn instant_answer(
        &self,
        brand: &str,
        query_suffix: &str,
    ) -> Result<Vec<WebSnippet>, IntelError> {
        let mut url = self.duckduckgo.clone();
        url.query_pairs_mut()
            .append_pair("q", format!("{brand} {query_suffix}").trim())
            .append_pair("format", "json")
            .append_pair("no_html", "1")
            .append_pair("skip_disambig", "1");

        let answer: InstantAnswer = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let mut snippets = Vec::new();
        if !answer.abstract_text.is_empty() {
            snippets.push(WebSnippet {
                source: "DuckDuckGo".to_owned(),
                content: answer.abstract_text,
                url: answer.abstract_url,
            });
        }
        snippets.extend(
            answer
                .related_topics
                .iter()
                .filter_map(|topic| {
                    let text = topic.get("Text").and_then(Value::as_str)?;
                    Some(WebSnippet {
                        source: "DuckDuckGo Related".to_owned(),
                        content: text.to_owned(),
                        url: topic
                            .get("FirstURL")
                            .and_then(Value::as_str)
                            .unwrap_or_default()
                            .to_owned(),
                    })
                })
                .take(MAX_RELATED_TOPICS),
        );
        Ok(snippets)
    }

    async fn encyclopedia_summary(&self, brand: &str) -> Result<Option<WebSnippet>, IntelError> {
        let url = join(
            &self.wikipedia,
            &format!("page/summary/{}", encode_segment(brand)),
        )?;
        let response = self.client.get(url).send().await?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let summary: WikiSummary = response.error_for_status()?.json().await?;
        if summary.extract.is_empty() {
            return Ok(None);
        }
        let page = summary
            .content_urls
            .pointer("/desktop/page")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_owned();
        Ok(Some(WebSnippet {
            source: "Wikipedia".to_owned(),
            content: summary.extract,
            url: page,
        }))
    }
}
