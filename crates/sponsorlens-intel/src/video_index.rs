//! HTTP client for the Twelve Labs video index.
//!
//! Implements [`DetectionService`] for the analysis pipeline and
//! [`VideoCatalog`] for the read-only passthrough endpoints. All requests
//! authenticate with the `x-api-key` header.

use futures::future::join_all;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use sponsorlens_analysis::{
    BoxFuture, CollaboratorError, DetectionService, VideoCatalog, VideoMetadata,
};
use sponsorlens_core::AppConfig;

use crate::error::IntelError;
use crate::http::{build_client, encode_segment, join, parse_base_url};
use crate::retry::{retry_with_backoff, RetryPolicy};
use crate::types::{
    AnalyzeRequest, AnalyzeResponse, IndexedVideo, SearchHit, SearchPage, SearchRequest, VideoPage,
};

pub const DEFAULT_BASE_URL: &str = "https://api.twelvelabs.io/v1.3";
const SERVICE: &str = "twelvelabs";
const SEARCH_PAGE_LIMIT: u32 = 20;

fn short_id(video_id: &str) -> String {
    video_id.chars().take(8).collect()
}

fn collaborator_error(err: IntelError) -> CollaboratorError {
    if err.is_not_found() {
        CollaboratorError::not_found(SERVICE, err.to_string())
    } else {
        CollaboratorError::new(SERVICE, err.to_string())
    }
}

/// Client for one index of the video service.
///
/// Use [`VideoIndexClient::new`] for production or
/// [`VideoIndexClient::with_base_url`] to point at a mock server in tests.
pub struct VideoIndexClient {
    client: Client,
    api_key: String,
    index_id: String,
    base_url: Url,
    retry: RetryPolicy,
}

impl VideoIndexClient {
    /// # Errors
    ///
    /// Returns [`IntelError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, index_id: &str, timeout_secs: u64) -> Result<Self, IntelError> {
        Self::with_base_url(api_key, index_id, timeout_secs, DEFAULT_BASE_URL)
    }

    /// # Errors
    ///
    /// Returns [`IntelError::Http`] if the client cannot be constructed, or
    /// [`IntelError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn with_base_url(
        api_key: &str,
        index_id: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, IntelError> {
        Ok(Self {
            client: build_client(timeout_secs)?,
            api_key: api_key.to_owned(),
            index_id: index_id.to_owned(),
            base_url: parse_base_url(base_url)?,
            retry: RetryPolicy::default(),
        })
    }

    /// Builds a client from the application configuration.
    ///
    /// # Errors
    ///
    /// See [`VideoIndexClient::with_base_url`].
    pub fn from_config(config: &AppConfig) -> Result<Self, IntelError> {
        Ok(Self::with_base_url(
            &config.twelvelabs_api_key,
            &config.twelvelabs_index_id,
            config.request_timeout_secs,
            &config.twelvelabs_base_url,
        )?
        .with_retry(RetryPolicy {
            max_retries: config.max_retries,
            backoff_base_ms: config.retry_backoff_base_ms,
        }))
    }

    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    #[must_use]
    pub fn index_id(&self) -> &str {
        &self.index_id
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, IntelError> {
        let this = self;
        let target = &url;
        let body = retry_with_backoff(self.retry, SERVICE, move || async move {
            let response = this
                .client
                .get(target.clone())
                .header("x-api-key", &this.api_key)
                .send()
                .await?
                .error_for_status()?;
            Ok::<String, IntelError>(response.text().await?)
        })
        .await?;
        serde_json::from_str(&body).map_err(|e| IntelError::Deserialize {
            context: url.to_string(),
            source: e,
        })
    }

    async fn post_json<B, T>(&self, url: Url, payload: &B) -> Result<T, IntelError>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let this = self;
        let target = &url;
        let body = retry_with_backoff(self.retry, SERVICE, move || async move {
            let response = this
                .client
                .post(target.clone())
                .header("x-api-key", &this.api_key)
                .json(payload)
                .send()
                .await?
                .error_for_status()?;
            Ok::<String, IntelError>(response.text().await?)
        })
        .await?;
        serde_json::from_str(&body).map_err(|e| IntelError::Deserialize {
            context: url.to_string(),
            source: e,
        })
    }

    /// Runs an open-ended prompt against one video and returns the raw text.
    ///
    /// # Errors
    ///
    /// Returns [`IntelError`] on transport failure or an unexpected body.
    pub async fn analyze_text(&self, video_id: &str, prompt: &str) -> Result<String, IntelError> {
        let url = join(&self.base_url, "analyze")?;
        let request = AnalyzeRequest {
            video_id,
            prompt,
            stream: false,
        };
        let response: AnalyzeResponse = self.post_json(url, &request).await?;
        tracing::debug!(video_id, len = response.data.len(), "analyze response received");
        Ok(response.data)
    }

    /// Fetches one video's record, including HLS thumbnails when available.
    ///
    /// # Errors
    ///
    /// Returns [`IntelError`] on transport failure or an unexpected body.
    pub async fn fetch_video(&self, video_id: &str) -> Result<IndexedVideo, IntelError> {
        let url = join(
            &self.base_url,
            &format!(
                "indexes/{}/videos/{}",
                encode_segment(&self.index_id),
                encode_segment(video_id)
            ),
        )?;
        self.get_json(url).await
    }

    /// Fetches one page of the index's video listing.
    ///
    /// # Errors
    ///
    /// Returns [`IntelError`] on transport failure or an unexpected body.
    pub async fn fetch_video_page(
        &self,
        page: u32,
        page_limit: u32,
    ) -> Result<Vec<IndexedVideo>, IntelError> {
        let mut url = join(
            &self.base_url,
            &format!("indexes/{}/videos", encode_segment(&self.index_id)),
        )?;
        url.query_pairs_mut()
            .append_pair("page", &page.to_string())
            .append_pair("page_limit", &page_limit.to_string());
        let listing: VideoPage = self.get_json(url).await?;
        Ok(listing.data)
    }

    /// Searches the index visually and by audio.
    ///
    /// # Errors
    ///
    /// Returns [`IntelError`] on transport failure or an unexpected body.
    pub async fn search_index(&self, query: &str) -> Result<Vec<SearchHit>, IntelError> {
        let url = join(&self.base_url, "search")?;
        let request = SearchRequest {
            index_id: &self.index_id,
            query_text: query,
            search_options: ["visual", "audio"],
            page_limit: SEARCH_PAGE_LIMIT,
        };
        let page: SearchPage = self.post_json(url, &request).await?;
        Ok(page.data)
    }

    async fn list_videos_json(&self, page: u32, page_limit: u32) -> Result<Value, IntelError> {
        let listing = self.fetch_video_page(page, page_limit).await?;

        // The listing omits HLS data, so thumbnails need a lookup per video.
        let details = join_all(listing.iter().map(|v| self.fetch_video(&v.id))).await;

        let videos: Vec<Value> = listing
            .iter()
            .zip(details)
            .map(|(video, detail)| {
                let thumbnail_url = match detail {
                    Ok(d) => d.thumbnail_url().map(str::to_owned),
                    Err(e) => {
                        tracing::warn!(video_id = %video.id, error = %e, "thumbnail lookup failed");
                        None
                    }
                };
                json!({
                    "id": video.id,
                    "filename": video
                        .system_metadata
                        .filename
                        .clone()
                        .unwrap_or_else(|| format!("Video_{}", short_id(&video.id))),
                    "duration": video.system_metadata.duration.unwrap_or(0.0),
                    "created_at": video.created_at,
                    "thumbnail_url": thumbnail_url,
                    "status": "ready",
                })
            })
            .collect();

        tracing::info!(count = videos.len(), index_id = %self.index_id, "listed videos");
        Ok(json!({
            "total_count": videos.len(),
            "message": format!("Successfully loaded {} videos from the index", videos.len()),
            "index_id": self.index_id,
            "videos": videos,
        }))
    }

    async fn video_details_json(&self, video_id: &str) -> Result<Value, IntelError> {
        let video = self.fetch_video(video_id).await?;
        let hls = video.hls.as_ref().map(|h| {
            json!({
                "video_url": h.video_url,
                "thumbnail_urls": h.thumbnail_urls,
                "status": h.status,
            })
        });
        Ok(json!({
            "id": video_id,
            "filename": video.system_metadata.filename.as_deref().unwrap_or("Unknown"),
            "duration": video.system_metadata.duration.unwrap_or(0.0),
            "created_at": video.created_at,
            "thumbnail_url": video.thumbnail_url(),
            "hls": hls,
            "status": "ready",
        }))
    }

    async fn thumbnail_json(&self, video_id: &str) -> Result<Value, IntelError> {
        let video = self.fetch_video(video_id).await?;
        let url = video.thumbnail_url().map_or_else(
            || {
                format!(
                    "https://via.placeholder.com/300x200/667eea/ffffff?text=Video+{}",
                    short_id(video_id)
                )
            },
            str::to_owned,
        );
        Ok(json!({ "thumbnail_url": url }))
    }

    async fn search_json(&self, query: &str) -> Result<Value, IntelError> {
        let hits = self.search_index(query).await?;
        let results: Vec<Value> = hits
            .into_iter()
            .map(|hit| {
                json!({
                    "video_id": hit.video_id,
                    "start": hit.start,
                    "end": hit.end,
                    "confidence": hit.confidence,
                    "metadata": hit.metadata,
                })
            })
            .collect();
        Ok(json!({
            "query": query,
            "total_results": results.len(),
            "results": results,
        }))
    }
}

impl DetectionService for VideoIndexClient {
    fn analyze<'a>(
        &'a self,
        video_id: &'a str,
        prompt: &'a str,
    ) -> BoxFuture<'a, Result<String, CollaboratorError>> {
        Box::pin(async move {
            self.analyze_text(video_id, prompt)
                .await
                .map_err(collaborator_error)
        })
    }

    fn video_metadata<'a>(
        &'a self,
        video_id: &'a str,
    ) -> BoxFuture<'a, Result<VideoMetadata, CollaboratorError>> {
        Box::pin(async move {
            let video = self
                .fetch_video(video_id)
                .await
                .map_err(collaborator_error)?;
            Ok(VideoMetadata {
                duration: video.system_metadata.duration.filter(|d| *d > 0.0),
                filename: video.system_metadata.filename.filter(|f| !f.is_empty()),
            })
        })
    }
}

impl VideoCatalog for VideoIndexClient {
    fn list_videos(
        &self,
        page: u32,
        page_limit: u32,
    ) -> BoxFuture<'_, Result<Value, CollaboratorError>> {
        Box::pin(async move {
            self.list_videos_json(page, page_limit)
                .await
                .map_err(collaborator_error)
        })
    }

    fn video_details<'a>(
        &'a self,
        video_id: &'a str,
    ) -> BoxFuture<'a, Result<Value, CollaboratorError>> {
        Box::pin(async move {
            self.video_details_json(video_id)
                .await
                .map_err(collaborator_error)
        })
    }

    fn video_thumbnail<'a>(
        &'a self,
        video_id: &'a str,
    ) -> BoxFuture<'a, Result<Value, CollaboratorError>> {
        Box::pin(async move {
            self.thumbnail_json(video_id)
                .await
                .map_err(collaborator_error)
        })
    }

    fn search<'a>(&'a self, query: &'a str) -> BoxFuture<'a, Result<Value, CollaboratorError>> {
        Box::pin(async move { self.search_json(query).await.map_err(collaborator_error) })
    }
}
