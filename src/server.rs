//! Movie Library Server implementation
//!
//! The server owns one [`Catalog`] and exposes it over gRPC. Every failure
//! is returned to the caller as a status; none of them stops the server.

use crate::catalog::Catalog;
use crate::error::Error;
use crate::pb::movie_library_service_server::{MovieLibraryService, MovieLibraryServiceServer};
use crate::pb::{
    GetMovieDetailsRequest, GetMovieDetailsResponse, MovieRequest, MovieResponse,
    UpdateMovieDetailsRequest, UpdateMovieDetailsResponse,
};
use crate::protocol::{Movie, STATUS_CREATED, STATUS_RESET_CONTENT};
use crate::store::{open_backend, StorageConfig};
use anyhow::Result;
use std::future::Future;
use std::sync::Arc;
use tonic::{Request, Response, Status};

/// Server configuration
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// gRPC listen address
    pub listen_addr: String,
    /// Where the catalog is kept
    pub storage: StorageConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:50051".to_string(),
            storage: StorageConfig::Memory,
        }
    }
}

/// Movie Library Server
pub struct MovieLibraryServer {
    config: ServerConfig,
    catalog: Arc<Catalog>,
}

impl MovieLibraryServer {
    /// Create a new server over the configured backend
    pub fn new(config: ServerConfig) -> Self {
        let catalog = Arc::new(Catalog::new(open_backend(&config.storage)));
        Self { config, catalog }
    }

    /// Get the gRPC service for this server
    pub fn into_service(self) -> MovieLibraryServiceServer<MovieLibraryServiceImpl> {
        MovieLibraryServiceServer::new(MovieLibraryServiceImpl {
            catalog: self.catalog,
        })
    }

    /// Get the listen address
    pub fn listen_addr(&self) -> &str {
        &self.config.listen_addr
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }
}

/// gRPC service implementation wrapper
pub struct MovieLibraryServiceImpl {
    catalog: Arc<Catalog>,
}

fn reject(operation: &str, err: Error) -> Status {
    tracing::warn!("{} failed: {}", operation, err);
    err.into()
}

/// Run a catalog operation on the blocking pool; file backends do
/// synchronous I/O under the writer lock.
async fn run_blocking<T, F>(operation: &'static str, op: F) -> Result<T, Status>
where
    F: FnOnce() -> crate::error::Result<T> + Send + 'static,
    T: Send + 'static,
{
    match tokio::task::spawn_blocking(op).await {
        Ok(result) => result.map_err(|e| reject(operation, e)),
        Err(e) => {
            tracing::error!("{} task failed: {}", operation, e);
            Err(Status::internal(format!("{} task failed: {}", operation, e)))
        }
    }
}

#[tonic::async_trait]
impl MovieLibraryService for MovieLibraryServiceImpl {
    async fn load_movies(
        &self,
        request: Request<MovieRequest>,
    ) -> Result<Response<MovieResponse>, Status> {
        let req = request.into_inner();
        let movies: Vec<Movie> = req.movies.into_iter().map(Movie::from).collect();

        tracing::debug!("LOAD request: {} movies", movies.len());

        let catalog = Arc::clone(&self.catalog);
        let count = run_blocking("LOAD", move || catalog.load(movies)).await?;

        tracing::info!(
            "Catalog reset with {} movies ({})",
            count,
            self.catalog.backend().describe()
        );
        Ok(Response::new(MovieResponse {
            status_code: STATUS_RESET_CONTENT,
        }))
    }

    async fn get_movie_details(
        &self,
        request: Request<GetMovieDetailsRequest>,
    ) -> Result<Response<GetMovieDetailsResponse>, Status> {
        let req = request.into_inner();

        tracing::debug!("QUERY request: release_date={:?}", req.release_date);

        let catalog = Arc::clone(&self.catalog);
        let release_date = req.release_date;
        let movies = run_blocking("QUERY", move || catalog.query(&release_date)).await?;

        tracing::debug!("QUERY matched {} movies", movies.len());
        Ok(Response::new(GetMovieDetailsResponse {
            movies: movies.into_iter().map(Into::into).collect(),
        }))
    }

    async fn update_movie_details(
        &self,
        request: Request<UpdateMovieDetailsRequest>,
    ) -> Result<Response<UpdateMovieDetailsResponse>, Status> {
        let req = request.into_inner();

        tracing::debug!("UPDATE request: movie_id={}", req.movie_id);

        let updated = req.updated_movie.map(Movie::from).ok_or_else(|| {
            reject(
                "UPDATE",
                Error::Validation("missing updated_movie".to_string()),
            )
        })?;

        let catalog = Arc::clone(&self.catalog);
        let movie_id = req.movie_id;
        let movie = run_blocking("UPDATE", move || catalog.update(movie_id, updated)).await?;

        tracing::info!("Movie {} updated: {}", req.movie_id, movie.title);
        Ok(Response::new(UpdateMovieDetailsResponse {
            status_code: STATUS_CREATED,
            updated_movie: Some(movie.into()),
        }))
    }
}

/// Run the server until `shutdown` resolves
pub async fn run_server_with_shutdown<F>(config: ServerConfig, shutdown: F) -> Result<()>
where
    F: Future<Output = ()>,
{
    let addr = config.listen_addr.parse()?;
    let server = MovieLibraryServer::new(config);

    tracing::info!(
        "Starting movie library server on {} with {} storage",
        addr,
        server.catalog().backend().describe()
    );

    tonic::transport::Server::builder()
        .add_service(server.into_service())
        .serve_with_shutdown(addr, shutdown)
        .await?;

    tracing::info!("Movie library server stopped");
    Ok(())
}

/// Run the server until Ctrl-C
pub async fn run_server(config: ServerConfig) -> Result<()> {
    run_server_with_shutdown(config, async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for shutdown signal: {}", e);
            std::future::pending::<()>().await;
        }
    })
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service_with(storage: StorageConfig) -> MovieLibraryServiceImpl {
        MovieLibraryServiceImpl {
            catalog: MovieLibraryServer::new(ServerConfig {
                storage,
                ..Default::default()
            })
            .catalog()
            .clone(),
        }
    }

    fn memory_service() -> MovieLibraryServiceImpl {
        service_with(StorageConfig::Memory)
    }

    fn betty() -> Vec<crate::pb::Movie> {
        vec![
            Movie::new("Betty-1", "crime", "01-10-2023").into(),
            Movie::new("Betty-2", "sci-fi", "02-10-2023").into(),
        ]
    }

    #[tokio::test]
    async fn test_load_returns_reset_content() {
        let service = memory_service();
        let response = service
            .load_movies(Request::new(MovieRequest { movies: betty() }))
            .await
            .unwrap()
            .into_inner();
        assert_eq!(response.status_code, 205);
    }

    #[tokio::test]
    async fn test_query_before_load_is_not_found() {
        let service = memory_service();
        let status = service
            .get_movie_details(Request::new(GetMovieDetailsRequest {
                release_date: String::new(),
            }))
            .await
            .unwrap_err();
        assert_eq!(status.code(), tonic::Code::NotFound);
    }

    #[tokio::test]
    async fn test_update_echoes_movie_with_created() {
        let service = memory_service();
        service
            .load_movies(Request::new(MovieRequest { movies: betty() }))
            .await
            .unwrap();

        let updated: crate::pb::Movie = Movie::new("Betty-9", "drama", "09-10-2023").into();
        let response = service
            .update_movie_details(Request::new(UpdateMovieDetailsRequest {
                movie_id: 1,
                updated_movie: Some(updated.clone()),
            }))
            .await
            .unwrap()
            .into_inner();
        assert_eq!(response.status_code, 201);
        assert_eq!(response.updated_movie, Some(updated));
    }

    #[tokio::test]
    async fn test_update_rejections() {
        let service = memory_service();
        service
            .load_movies(Request::new(MovieRequest { movies: betty() }))
            .await
            .unwrap();

        let status = service
            .update_movie_details(Request::new(UpdateMovieDetailsRequest {
                movie_id: 1,
                updated_movie: None,
            }))
            .await
            .unwrap_err();
        assert_eq!(status.code(), tonic::Code::InvalidArgument);
        assert!(status.message().contains("missing updated_movie"));

        let status = service
            .update_movie_details(Request::new(UpdateMovieDetailsRequest {
                movie_id: 3,
                updated_movie: Some(betty()[0].clone()),
            }))
            .await
            .unwrap_err();
        assert_eq!(status.code(), tonic::Code::NotFound);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_concurrent_file_backed_updates() {
        let dir = tempfile::tempdir().unwrap();
        let service = Arc::new(service_with(StorageConfig::File(
            dir.path().join("movies.json"),
        )));

        let movies: Vec<crate::pb::Movie> = (1..=6)
            .map(|i| Movie::new(format!("Movie-{i}"), "drama", "01-01-2001").into())
            .collect();
        service
            .load_movies(Request::new(MovieRequest { movies }))
            .await
            .unwrap();

        let mut tasks = Vec::new();
        for id in 1..=6 {
            let service = Arc::clone(&service);
            tasks.push(tokio::spawn(async move {
                service
                    .update_movie_details(Request::new(UpdateMovieDetailsRequest {
                        movie_id: id,
                        updated_movie: Some(
                            Movie::new(format!("Updated-{id}"), "drama", "02-02-2002").into(),
                        ),
                    }))
                    .await
                    .unwrap();
            }));
        }
        for task in tasks {
            task.await.unwrap();
        }

        let response = service
            .get_movie_details(Request::new(GetMovieDetailsRequest {
                release_date: "02-02-2002".to_string(),
            }))
            .await
            .unwrap()
            .into_inner();
        let titles: Vec<_> = response.movies.into_iter().map(|m| m.title).collect();
        let expected: Vec<_> = (1..=6).map(|i| format!("Updated-{i}")).collect();
        assert_eq!(titles, expected);
    }
}
