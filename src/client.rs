//! Movie Library Client implementation
//!
//! The client dials the catalog server for every call and bounds the dial
//! plus the RPC itself by one timeout. Failures come back as
//! [`crate::Error`] values; nothing here terminates the process.

use crate::error::{Error, Result};
use crate::pb::movie_library_service_client::MovieLibraryServiceClient;
use crate::pb::{GetMovieDetailsRequest, MovieRequest, UpdateMovieDetailsRequest};
use crate::protocol::{Movie, STATUS_CREATED, STATUS_RESET_CONTENT};
use std::future::Future;
use std::time::Duration;
use tonic::transport::{Channel, Endpoint};

/// Client configuration
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Server address (gRPC endpoint)
    pub server_addr: String,
    /// Upper bound for connecting and completing one call
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_addr: "http://127.0.0.1:50051".to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

/// Movie Library Client
pub struct MovieLibraryClient {
    config: ClientConfig,
}

impl MovieLibraryClient {
    pub fn new(config: ClientConfig) -> Self {
        Self { config }
    }

    // No endpoint timeouts: `bounded` owns the deadline
    async fn connect(&self) -> Result<MovieLibraryServiceClient<Channel>> {
        let endpoint = Endpoint::from_shared(self.config.server_addr.clone()).map_err(|e| {
            Error::Transport(format!(
                "invalid server address {}: {}",
                self.config.server_addr, e
            ))
        })?;

        let channel = endpoint.connect().await?;
        Ok(MovieLibraryServiceClient::new(channel))
    }

    /// Run `call` under the configured deadline
    async fn bounded<T, F>(&self, operation: &str, call: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        match tokio::time::timeout(self.config.timeout, call).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => {
                tracing::warn!("{} failed: {}", operation, e);
                Err(e)
            }
            Err(_) => {
                tracing::warn!(
                    "{} timed out after {:?}",
                    operation,
                    self.config.timeout
                );
                Err(Error::Timeout(self.config.timeout))
            }
        }
    }

    /// Replace the server's catalog with `movies`
    ///
    /// Returns the status code carried by the server's response.
    pub async fn load(&self, movies: Vec<Movie>) -> Result<i32> {
        let count = movies.len();
        self.bounded("load", async {
            let mut client = self.connect().await?;
            let response = client
                .load_movies(MovieRequest {
                    movies: movies.into_iter().map(Into::into).collect(),
                })
                .await?
                .into_inner();

            if response.status_code != STATUS_RESET_CONTENT {
                return Err(Error::Transport(format!(
                    "unexpected load status code {}",
                    response.status_code
                )));
            }

            tracing::info!("Loaded {} movies, library reset", count);
            Ok(response.status_code)
        })
        .await
    }

    /// Movies released on `release_date`; an empty date returns all of them
    pub async fn query(&self, release_date: &str) -> Result<Vec<Movie>> {
        self.bounded("query", async {
            let mut client = self.connect().await?;
            let response = client
                .get_movie_details(GetMovieDetailsRequest {
                    release_date: release_date.to_string(),
                })
                .await?
                .into_inner();

            tracing::debug!(
                "Query release_date={:?} matched {} movies",
                release_date,
                response.movies.len()
            );
            Ok(response.movies.into_iter().map(Movie::from).collect())
        })
        .await
    }

    /// Overwrite the movie at 1-based position `movie_id`
    pub async fn update(&self, movie_id: i32, updated: Movie) -> Result<Movie> {
        self.bounded("update", async {
            let mut client = self.connect().await?;
            let response = client
                .update_movie_details(UpdateMovieDetailsRequest {
                    movie_id,
                    updated_movie: Some(updated.into()),
                })
                .await?
                .into_inner();

            if response.status_code != STATUS_CREATED {
                return Err(Error::Transport(format!(
                    "unexpected update status code {}",
                    response.status_code
                )));
            }

            let movie = response
                .updated_movie
                .map(Movie::from)
                .ok_or_else(|| Error::Transport("update response carried no movie".into()))?;
            tracing::info!("Updated movie {}: {}", movie_id, movie.title);
            Ok(movie)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert!(config.server_addr.ends_with(":50051"));
    }

    #[tokio::test]
    async fn test_invalid_address_is_transport_error() {
        let client = MovieLibraryClient::new(ClientConfig {
            server_addr: "not a uri".to_string(),
            timeout: Duration::from_secs(1),
        });
        let err = client.query("").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Transport);
    }

    #[tokio::test]
    async fn test_unreachable_server_is_transport_error() {
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let client = MovieLibraryClient::new(ClientConfig {
            server_addr: format!("http://127.0.0.1:{}", port),
            timeout: Duration::from_secs(2),
        });

        let err = client
            .load(vec![Movie::new("Betty-1", "crime", "01-10-2023")])
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Transport);
        assert!(!matches!(err, Error::Timeout(_)));
    }

    #[tokio::test]
    async fn test_silent_server_times_out() {
        // Accepts connections but never answers
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let silent = tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });

        let timeout = Duration::from_millis(500);
        let client = MovieLibraryClient::new(ClientConfig {
            server_addr: format!("http://127.0.0.1:{}", port),
            timeout,
        });

        let err = client.query("").await.unwrap_err();
        assert!(matches!(err, Error::Timeout(t) if t == timeout), "got {err:?}");
        assert_eq!(err.kind(), ErrorKind::Transport);

        silent.abort();
    }
}
