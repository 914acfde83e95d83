//! HTTP gateway in front of the catalog server
//!
//! ## Routes
//!
//! - `GET /` - readiness text
//! - `POST /load` - XML document, replaces the catalog, 205
//! - `GET /movie` and `GET /movie/:release_date` - `{"movies": [...]}`, 200
//! - `POST /movie/:id` - XML document with one movie, 201 with the movie
//!
//! Each request gets its own RPC; a failed call becomes an error response
//! for that request only.

use crate::client::MovieLibraryClient;
use crate::error::{Error, Result};
use crate::ingest::{parse_catalog_document, parse_single_movie};
use crate::protocol::Movie;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use bytes::Bytes;
use serde::Serialize;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Body of a successful query
#[derive(Debug, Clone, Serialize)]
pub struct MoviesResponse {
    pub movies: Vec<Movie>,
}

/// Build the gateway router over a shared client
pub fn router(client: Arc<MovieLibraryClient>) -> Router {
    Router::new()
        .route("/", get(ready))
        .route("/load", post(load_movies))
        .route("/movie", get(query_all))
        .route("/movie/:key", get(query_movies).post(update_movie))
        .layer(TraceLayer::new_for_http())
        .with_state(client)
}

/// Serve the gateway at `addr` (e.g. `"0.0.0.0:8080"`)
pub async fn serve(client: Arc<MovieLibraryClient>, addr: &str) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("HTTP gateway listening on {}", listener.local_addr()?);
    axum::serve(listener, router(client)).await
}

async fn ready() -> &'static str {
    "movie library api ready"
}

async fn load_movies(
    State(client): State<Arc<MovieLibraryClient>>,
    body: Bytes,
) -> Result<StatusCode> {
    let movies = parse_catalog_document(&body)?;
    client.load(movies).await?;
    Ok(StatusCode::RESET_CONTENT)
}

async fn query_all(State(client): State<Arc<MovieLibraryClient>>) -> Result<Json<MoviesResponse>> {
    let movies = client.query("").await?;
    Ok(Json(MoviesResponse { movies }))
}

async fn query_movies(
    State(client): State<Arc<MovieLibraryClient>>,
    Path(release_date): Path<String>,
) -> Result<Json<MoviesResponse>> {
    let movies = client.query(&release_date).await?;
    Ok(Json(MoviesResponse { movies }))
}

async fn update_movie(
    State(client): State<Arc<MovieLibraryClient>>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<(StatusCode, Json<Movie>)> {
    let movie_id: i32 = id
        .parse()
        .map_err(|_| Error::Validation(format!("movie id {id:?} is not an integer")))?;
    let updated = parse_single_movie(&body)?;
    let movie = client.update(movie_id, updated).await?;
    Ok((StatusCode::CREATED, Json(movie)))
}
