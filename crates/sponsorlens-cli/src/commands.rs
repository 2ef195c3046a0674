//! Command handlers for the CLI.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use sponsorlens_analysis::{
    merge_analyses, AnalysisMode, AnalysisPipeline, BoxFuture, ProgressSink, ProgressUpdate,
};
use sponsorlens_core::{AnalysisReport, AppConfig, ClassificationRules, CombinedReport};
use sponsorlens_intel::{OpenAiGateway, VideoIndexClient};

/// Writes pipeline stages to the log so stdout stays pure JSON.
struct LogProgress;

impl ProgressSink for LogProgress {
    fn report(&self, update: ProgressUpdate) -> BoxFuture<'_, ()> {
        Box::pin(async move {
            tracing::info!(
                stage = update.stage,
                progress = update.progress,
                "{}",
                update.message
            );
        })
    }
}

fn build_pipeline(config: &AppConfig) -> anyhow::Result<AnalysisPipeline> {
    let rules = match &config.rules_path {
        Some(path) => sponsorlens_core::load_rules(path)?,
        None => ClassificationRules::default(),
    };
    Ok(AnalysisPipeline::new(
        Arc::new(VideoIndexClient::from_config(config)?),
        Arc::new(OpenAiGateway::from_config(config)?),
        Arc::new(rules),
    ))
}

pub(crate) async fn run_analyze(
    config: &AppConfig,
    video_id: &str,
    brands: &[String],
) -> anyhow::Result<()> {
    let pipeline = build_pipeline(config)?;
    let report = pipeline
        .analyze_video(video_id, brands, AnalysisMode::Synchronous, &LogProgress)
        .await?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn load_report(path: &Path) -> anyhow::Result<AnalysisReport> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read report {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("{} is not a video report", path.display()))
}

pub(crate) fn merge_files(paths: &[PathBuf]) -> anyhow::Result<CombinedReport> {
    let reports = paths
        .iter()
        .map(|p| load_report(p))
        .collect::<anyhow::Result<Vec<_>>>()?;
    let video_ids: Vec<String> = reports.iter().map(|r| r.video_id.clone()).collect();
    Ok(merge_analyses(&reports, &video_ids)?)
}

pub(crate) fn run_merge(paths: &[PathBuf]) -> anyhow::Result<()> {
    let combined = merge_files(paths)?;
    tracing::info!(
        videos = combined.combined_summary.total_videos,
        brands = combined.combined_summary.total_brands,
        "reports merged"
    );
    println!("{}", serde_json::to_string_pretty(&combined)?);
    Ok(())
}
