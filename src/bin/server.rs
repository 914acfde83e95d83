//! Movie Library Server binary
//!
//! Run with: cargo run --bin movie-server -- --help

use anyhow::{bail, Result};
use clap::{Parser, ValueEnum};
use movie_library::server::{run_server, ServerConfig};
use movie_library::store::StorageConfig;
use std::path::PathBuf;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Backend {
    /// Keep the catalog in process memory
    Memory,
    /// Persist the catalog as a JSON document
    File,
}

#[derive(Parser, Debug)]
#[command(name = "movie-server")]
#[command(about = "Movie library catalog server")]
struct Args {
    /// gRPC listen address
    #[arg(long, env = "MOVIE_LISTEN_ADDR", default_value = "0.0.0.0:50051")]
    listen_addr: String,

    /// Catalog storage backend
    #[arg(long, env = "MOVIE_BACKEND", value_enum, default_value_t = Backend::File)]
    backend: Backend,

    /// Path of the JSON catalog document (file backend)
    #[arg(long, env = "JSON_FILE_PATH")]
    json_file_path: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Number of worker threads for processing requests
    #[arg(long, default_value = "4")]
    worker_threads: usize,
}

fn storage_config(args: &Args) -> Result<StorageConfig> {
    match (args.backend, &args.json_file_path) {
        (Backend::Memory, _) => Ok(StorageConfig::Memory),
        (Backend::File, Some(path)) => Ok(StorageConfig::File(path.clone())),
        (Backend::File, None) => {
            bail!("file backend needs --json-file-path or JSON_FILE_PATH")
        }
    }
}

async fn run_with_config(args: Args) -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&args.log_level)),
        )
        .init();

    let config = ServerConfig {
        listen_addr: args.listen_addr.clone(),
        storage: storage_config(&args)?,
    };

    tracing::info!("=== Movie Library Server Configuration ===");
    tracing::info!("Worker threads: {}", args.worker_threads);
    tracing::info!("Listen address: {}", config.listen_addr);
    tracing::info!("Storage: {:?}", config.storage);
    tracing::info!("==========================================");

    run_server(config).await
}

fn main() -> Result<()> {
    let args = Args::parse();
    let worker_threads = args.worker_threads;

    // Build tokio runtime with specified number of worker threads
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(worker_threads)
        .enable_all()
        .build()?
        .block_on(run_with_config(args))
}
