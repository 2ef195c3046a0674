//! Shared domain model and configuration for sponsorlens.
//!
//! Holds the canonical brand-appearance types, the per-brand and per-report
//! metric shapes, the swappable brand classification ruleset, and the
//! env-driven application configuration.

#[macro_use]
mod labels;

pub mod app_config;
pub mod appearance;
pub mod config;
pub mod metrics;
pub mod rules;

use thiserror::Error;

pub use app_config::{AppConfig, Environment, MAX_CONCURRENT_VIDEOS_CEILING};
pub use appearance::{
    BrandAppearance, Detection, PlacementContext, PlacementType, Prominence, SalvagedAppearance,
    SentimentContext, SponsorshipCategory, ViewerAttention,
};
pub use config::{load_app_config, load_app_config_from_env};
pub use metrics::{
    share_percent, AnalysisReport, AnalysisSummary, BrandMetrics, CategoryBreakdown,
    CombinedReport, CombinedSummary, SentimentLabel, SponsorshipBreakdown, VideoWindow,
};
pub use rules::{load_rules, ClassificationRules};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read rules file {path}: {source}")]
    RulesFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse rules file: {0}")]
    RulesFileParse(#[from] serde_yaml::Error),

    #[error("rules validation failed: {0}")]
    Validation(String),
}
