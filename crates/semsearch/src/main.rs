use anyhow::Result;
use clap::{Parser, Subcommand};
use semsearch_common::{logger, AppConfig};
use semsearch_embedding::{OllamaClient, TextEmbedder};
use semsearch_server::AppState;
use semsearch_vector::{BuildOptions, BuildOutcome, IndexBuilder, SearchEngine};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "semsearch")]
#[command(about = "Semantic company search over an embedding index", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the vector index from the company catalog
    Index {
        /// Rebuild even if a populated index already exists
        #[arg(long)]
        force: bool,

        /// Catalog CSV path (overrides DATA_PATH)
        #[arg(long)]
        data: Option<String>,
    },

    /// Start the HTTP server
    Serve {
        /// Host to bind to (overrides SERVER_HOST)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to (overrides SERVER_PORT)
        #[arg(long)]
        port: Option<u16>,

        /// Catalog CSV path (overrides DATA_PATH)
        #[arg(long)]
        data: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load environment variables from .env before reading config
    dotenv::dotenv().ok();

    match cli.command {
        Commands::Index { force, data } => {
            if let Some(data) = &data {
                std::env::set_var("DATA_PATH", data);
            }

            let config = AppConfig::from_env()?;
            config.validate()?;
            logger::setup_console_logging(&config.log_level)?;

            run_index(&config, force).await?;
        }
        Commands::Serve { host, port, data } => {
            if let Some(host) = &host {
                std::env::set_var("SERVER_HOST", host);
            }
            if let Some(port) = port {
                std::env::set_var("SERVER_PORT", port.to_string());
            }
            if let Some(data) = &data {
                std::env::set_var("DATA_PATH", data);
            }

            let config = AppConfig::from_env()?;
            config.validate()?;
            logger::setup_logging(&config.log_dir, &config.log_level)?;

            run_serve(config).await?;
        }
    }

    Ok(())
}

/// Offline index build, the operational counterpart of the rebuild endpoint
async fn run_index(config: &AppConfig, force: bool) -> Result<()> {
    let records = semsearch_catalog::load_companies(&config.data_path)?;

    let embedder: Arc<dyn TextEmbedder> = Arc::new(OllamaClient::new(
        &config.ollama_base_url,
        &config.embedding_model,
    )?);
    let builder = IndexBuilder::new(embedder, &config.index_path);

    let opts = BuildOptions {
        force,
        cancel: None,
    };
    match builder.build(&records, opts).await? {
        BuildOutcome::Built(report) => {
            tracing::info!(
                "Index ready at {}: {} companies indexed, {} skipped (model: {})",
                config.index_path.display(),
                report.indexed,
                report.skipped,
                report.model
            );
        }
        BuildOutcome::SkippedExisting(entries) => {
            tracing::info!(
                "Index already contains {} entries, use --force to rebuild",
                entries
            );
        }
        BuildOutcome::Cancelled => {
            tracing::warn!("Index build was cancelled");
        }
    }

    Ok(())
}

async fn run_serve(config: AppConfig) -> Result<()> {
    tracing::info!("SemSearch starting...");
    tracing::info!("  Catalog: {}", config.data_path.display());
    tracing::info!("  Index: {}", config.index_path.display());
    tracing::info!("  Ollama: {}", config.ollama_base_url);

    let embedder: Arc<dyn TextEmbedder> = Arc::new(OllamaClient::new(
        &config.ollama_base_url,
        &config.embedding_model,
    )?);
    let builder = Arc::new(IndexBuilder::new(embedder.clone(), &config.index_path));

    // First run: populate the index before serving; later runs reuse it
    let records = semsearch_catalog::load_companies(&config.data_path)?;
    builder.build(&records, BuildOptions::default()).await?;

    let engine = SearchEngine::open(&config.index_path, embedder, config.default_limit).await?;

    let bind_address = config.server_bind_address();
    let state = Arc::new(AppState::new(config, Arc::new(engine), builder));

    println!("Server listening on http://{}", bind_address);
    semsearch_server::start_server(state).await?;

    Ok(())
}
