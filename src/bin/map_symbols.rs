//! map-symbols CLI
//!
//! Commands: list, generate
//! `generate` writes one zip archive into the output directory. Ctrl-C stops
//! the run cooperatively; nothing is written in that case.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::EnvFilter;

use map_symbol_renderer::{
    BatchPipeline, DirectoryDownloader, GenerationRequest, GeneratorConfig, IconGenerator,
    Progress, RunOutcome, ZipArchiveBuilder,
};

#[derive(Parser)]
#[command(name = "map-symbols")]
#[command(about = "Procedural map-symbol icon generator")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON generator configuration
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// List the symbol categories
    List,

    /// Generate icons into a zip archive
    Generate {
        /// Comma separated category ids, or `all`
        #[arg(short = 'C', long, default_value = "all")]
        categories: String,

        /// Icons per category
        #[arg(short = 'n', long, default_value = "100")]
        count: String,

        /// Icon edge length in pixels
        #[arg(short, long, default_value = "64")]
        size: String,

        /// Directory the archive is written to
        #[arg(short, long, default_value = ".")]
        out: PathBuf,

        /// Fixed RNG seed
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<GeneratorConfig> {
    let Some(path) = path else {
        return Ok(GeneratorConfig::default());
    };
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    GeneratorConfig::from_json(&json).with_context(|| format!("invalid config {}", path.display()))
}

fn report(progress: &Progress) {
    tracing::info!(
        category = %progress.category_label,
        produced = progress.produced,
        total = progress.total,
        "progress"
    );
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .init();

    let cli = Cli::parse();
    let mut config = load_config(cli.config.as_ref())?;

    match cli.command {
        Commands::List => {
            let generator = IconGenerator::builtin(config.transform)?;
            let categories: Vec<_> = generator
                .registry()
                .iter()
                .map(|c| {
                    serde_json::json!({
                        "id": c.id,
                        "key": c.key,
                        "label": c.label,
                        "placeholder": generator.design(c.id).is_some_and(|d| d.is_placeholder()),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&categories)?);
        }

        Commands::Generate {
            categories,
            count,
            size,
            out,
            seed,
        } => {
            if seed.is_some() {
                config.pipeline.seed = seed;
            }
            let pipeline = BatchPipeline::from_config(&config, DirectoryDownloader::new(out))?;

            let ids = if categories.trim().eq_ignore_ascii_case("all") {
                pipeline
                    .generator()
                    .registry()
                    .iter()
                    .map(|c| c.id.to_string())
                    .collect::<Vec<_>>()
                    .join(",")
            } else {
                categories
            };
            let request = GenerationRequest::parse(&ids, &count, &size)?;

            let run = pipeline.run(&request, ZipArchiveBuilder::new(), report);
            let watcher = async {
                match tokio::signal::ctrl_c().await {
                    Ok(()) => {
                        pipeline.cancel();
                    }
                    Err(e) => tracing::warn!(error = %e, "cannot listen for ctrl-c"),
                }
                std::future::pending::<RunOutcome>().await
            };

            let outcome = tokio::select! {
                outcome = run => outcome?,
                outcome = watcher => outcome,
            };
            println!("{}", outcome.message());
        }
    }

    Ok(())
}
