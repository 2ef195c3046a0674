mod api;
mod jobs;
mod middleware;
mod orchestrator;
mod scheduler;

#[cfg(test)]
mod test_support;

use std::sync::Arc;

use sponsorlens_analysis::AnalysisPipeline;
use sponsorlens_core::ClassificationRules;
use sponsorlens_intel::{OpenAiGateway, VideoIndexClient};
use tracing_subscriber::EnvFilter;

use crate::{
    api::{build_app, AppState},
    jobs::JobTracker,
    orchestrator::Orchestrator,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Arc::new(sponsorlens_core::load_app_config()?);
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let rules = match &config.rules_path {
        Some(path) => sponsorlens_core::load_rules(path)?,
        None => ClassificationRules::default(),
    };
    let video_index = Arc::new(VideoIndexClient::from_config(&config)?);
    let gateway = Arc::new(OpenAiGateway::from_config(&config)?);
    let pipeline = AnalysisPipeline::new(video_index.clone(), gateway, Arc::new(rules));

    let tracker = JobTracker::new();
    let _scheduler = scheduler::build_scheduler(
        tracker.clone(),
        &config.job_purge_cron,
        config.job_retention_hours,
    )
    .await?;

    let state = AppState {
        orchestrator: Orchestrator::from_config(pipeline, tracker, &config),
        catalog: video_index,
    };
    let app = build_app(state);

    tracing::info!(addr = %config.bind_addr, env = ?config.env, "sponsorlens server listening");
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
