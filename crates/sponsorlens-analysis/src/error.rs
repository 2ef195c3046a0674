use thiserror::Error;

/// A single detection record failed schema checks.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid field '{field}': {reason}")]
pub struct ValidationError {
    pub field: &'static str,
    pub reason: String,
}

impl ValidationError {
    pub(crate) fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The vision service could not analyse the video.
    #[error("brand detection failed for video {video_id}: {reason}")]
    Detection { video_id: String, reason: String },

    /// AI scoring failed for a brand. There is no numeric fallback.
    #[error("AI analysis is required for brand '{brand}': {reason}")]
    Enrichment { brand: String, reason: String },

    #[error("executive summary generation failed: {0}")]
    Summary(String),

    /// No successful per-video result was available to combine.
    #[error("merge failed: {0}")]
    Merge(String),

    #[error("analysis of video {video_id} timed out after {secs}s")]
    Timeout { video_id: String, secs: u64 },
}
