//! Movie Library Client binary
//!
//! Run with: cargo run --bin movie-client -- --help

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use movie_library::client::{ClientConfig, MovieLibraryClient};
use movie_library::gateway;
use movie_library::ingest::{parse_catalog_document, titles_by_genre};
use movie_library::Movie;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "movie-client")]
#[command(about = "Movie library client and HTTP gateway")]
struct Args {
    /// Server address (gRPC endpoint)
    #[arg(long, env = "MOVIE_SERVER_ADDR", default_value = "http://127.0.0.1:50051")]
    server_addr: String,

    /// Seconds to wait for each RPC, including the dial
    #[arg(long, default_value = "10")]
    timeout_secs: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Serve the HTTP gateway
    Serve {
        /// HTTP listen address
        #[arg(long, default_value = "0.0.0.0:8080")]
        http_addr: String,
    },
    /// Replace the catalog with the movies in an XML document
    Load {
        /// XML document with a <movies> root
        file: PathBuf,
    },
    /// List movies by release date (all movies if omitted)
    Query {
        release_date: Option<String>,
    },
    /// Overwrite the movie at a 1-based position
    Update {
        /// Position in the current catalog
        id: i32,
        #[arg(long)]
        title: String,
        #[arg(long)]
        genre: String,
        #[arg(long)]
        release_date: String,
    },
    /// List titles in a genre from a local XML document, without the server
    Genre {
        /// XML document with a <movies> root
        #[arg(long, default_value = "herd.xml")]
        file: PathBuf,
        /// Genre to match
        #[arg(long, default_value = "crime")]
        genre: String,
    },
}

fn read_document(path: &Path) -> Result<Vec<Movie>> {
    let markup =
        std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    Ok(parse_catalog_document(&markup)?)
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn cmd_load(client: &MovieLibraryClient, file: &Path) -> Result<()> {
    let movies = read_document(file)?;
    match client.load(movies).await {
        Ok(_) => println!("Movie records loaded successfully, and the library is reset."),
        Err(e) => eprintln!("Error: {}", e),
    }
    Ok(())
}

async fn cmd_query(client: &MovieLibraryClient, release_date: &str) -> Result<()> {
    match client.query(release_date).await {
        Ok(movies) => {
            println!("Movie Details:");
            print_json(&movies)?;
        }
        Err(e) => eprintln!("Error: {}", e),
    }
    Ok(())
}

async fn cmd_update(client: &MovieLibraryClient, id: i32, movie: Movie) -> Result<()> {
    match client.update(id, movie).await {
        Ok(updated) => {
            println!("Movie details updated successfully.");
            println!("Updated Movie Details:");
            print_json(&updated)?;
        }
        Err(e) => eprintln!("Error: {}", e),
    }
    Ok(())
}

fn cmd_genre(file: &Path, genre: &str) -> Result<()> {
    let movies = read_document(file)?;
    let titles = titles_by_genre(&movies, genre);
    if titles.is_empty() {
        println!("No movies found in the '{}' genre.", genre);
    } else {
        println!("Movies in the '{}' genre:", genre);
        for title in titles {
            println!("{}", title);
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&args.log_level)),
        )
        .init();

    let client = MovieLibraryClient::new(ClientConfig {
        server_addr: args.server_addr.clone(),
        timeout: Duration::from_secs(args.timeout_secs),
    });

    match args.command {
        Commands::Serve { http_addr } => gateway::serve(Arc::new(client), &http_addr).await?,
        Commands::Load { file } => cmd_load(&client, &file).await?,
        Commands::Query { release_date } => {
            cmd_query(&client, release_date.as_deref().unwrap_or("")).await?
        }
        Commands::Update {
            id,
            title,
            genre,
            release_date,
        } => cmd_update(&client, id, Movie::new(title, genre, release_date)).await?,
        Commands::Genre { file, genre } => cmd_genre(&file, &genre)?,
    }

    Ok(())
}
