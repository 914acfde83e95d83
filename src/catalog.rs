//! Catalog operations over a storage backend
//!
//! Movies are addressed by their 1-based position in the current catalog,
//! not by content. The same id can name a different movie after a load.

use crate::error::{Error, Result};
use crate::protocol::Movie;
use crate::store::CatalogBackend;
use parking_lot::Mutex;
use std::sync::Arc;

/// The movie catalog owned by one server instance
pub struct Catalog {
    backend: Arc<dyn CatalogBackend>,
    /// Serializes load and update; queries read without it
    writer: Mutex<()>,
}

impl Catalog {
    pub fn new(backend: Arc<dyn CatalogBackend>) -> Self {
        Self {
            backend,
            writer: Mutex::new(()),
        }
    }

    pub fn backend(&self) -> &dyn CatalogBackend {
        self.backend.as_ref()
    }

    /// Replace the whole catalog with `movies`, keeping their order
    pub fn load(&self, movies: Vec<Movie>) -> Result<usize> {
        let _guard = self.writer.lock();
        self.backend.write(&movies)?;
        Ok(movies.len())
    }

    /// Every movie released on `release_date`, or all movies if it is empty
    pub fn query(&self, release_date: &str) -> Result<Vec<Movie>> {
        let movies = self.backend.read()?.ok_or(Error::NotLoaded)?;
        Ok(movies
            .into_iter()
            .filter(|movie| movie.matches_release_date(release_date))
            .collect())
    }

    /// Overwrite the movie at 1-based position `id` and return the new record
    pub fn update(&self, id: i32, updated: Movie) -> Result<Movie> {
        if id < 1 {
            return Err(Error::Validation(format!(
                "movie id must be a positive position, got {id}"
            )));
        }

        let _guard = self.writer.lock();
        let mut movies = self.backend.read()?.ok_or(Error::NotLoaded)?;
        let len = movies.len();
        let slot = usize::try_from(id - 1)
            .ok()
            .and_then(|idx| movies.get_mut(idx))
            .ok_or_else(|| {
                Error::NotFound(format!(
                    "no movie at position {id}, catalog holds {len}"
                ))
            })?;

        *slot = updated.clone();
        self.backend.write(&movies)?;
        Ok(updated)
    }

    /// Number of stored movies, or `None` before the first load
    pub fn count(&self) -> Result<Option<usize>> {
        Ok(self.backend.read()?.map(|movies| movies.len()))
    }

    pub fn is_loaded(&self) -> Result<bool> {
        Ok(self.count()?.is_some())
    }
}
