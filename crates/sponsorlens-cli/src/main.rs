mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "sponsorlens-cli")]
#[command(about = "Brand sponsorship analysis from the command line")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Analyze one indexed video and print the report as JSON
    Analyze {
        /// Video id in the configured index
        video_id: String,
        /// Brand to focus on; repeat for several
        #[arg(long = "brand")]
        brands: Vec<String>,
    },
    /// Merge saved single-video reports onto one timeline
    Merge {
        /// Report files in playback order
        #[arg(required = true)]
        reports: Vec<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let env_filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Analyze { video_id, brands }) => {
            let config = sponsorlens_core::load_app_config()?;
            commands::run_analyze(&config, &video_id, &brands).await?;
        }
        Some(Commands::Merge { reports }) => commands::run_merge(&reports)?,
        None => println!("sponsorlens-cli ready; see --help for commands"),
    }

    Ok(())
}
