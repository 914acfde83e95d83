//! Catalog storage backends
//!
//! A backend only knows how to read and replace the whole catalog. Locking
//! and positional addressing live in [`crate::catalog`].

use crate::error::{Error, Result};
use crate::protocol::Movie;
use parking_lot::RwLock;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Storage configuration
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum StorageConfig {
    /// Catalog lives in process memory and is lost on restart
    #[default]
    Memory,
    /// Catalog is a JSON array document at the given path
    File(PathBuf),
}

/// Trait for catalog storage implementations
pub trait CatalogBackend: Send + Sync {
    /// Current catalog, or `None` if nothing has been loaded yet
    fn read(&self) -> Result<Option<Vec<Movie>>>;

    /// Replace the whole catalog
    fn write(&self, movies: &[Movie]) -> Result<()>;

    /// Short human-readable description for logs
    fn describe(&self) -> String;
}

/// Build the backend selected by `config`
pub fn open_backend(config: &StorageConfig) -> Arc<dyn CatalogBackend> {
    match config {
        StorageConfig::Memory => Arc::new(MemoryBackend::new()),
        StorageConfig::File(path) => Arc::new(FileBackend::new(path.clone())),
    }
}

/// Volatile in-process catalog
#[derive(Default)]
pub struct MemoryBackend {
    movies: RwLock<Option<Vec<Movie>>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CatalogBackend for MemoryBackend {
    fn read(&self) -> Result<Option<Vec<Movie>>> {
        Ok(self.movies.read().clone())
    }

    fn write(&self, movies: &[Movie]) -> Result<()> {
        *self.movies.write() = Some(movies.to_vec());
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}

fn encode_failure(source: serde_json::Error) -> Error {
    Error::Storage(format!("failed to encode catalog: {source}"))
}

/// Catalog persisted as a single JSON document
///
/// Writes land in a temporary file next to the document and are renamed over
/// it, so a concurrent reader sees either the old or the new catalog.
pub struct FileBackend {
    path: PathBuf,
}

impl FileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn io_error(&self, source: std::io::Error) -> Error {
        Error::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl CatalogBackend for FileBackend {
    fn read(&self) -> Result<Option<Vec<Movie>>> {
        let data = match std::fs::read(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.io_error(e)),
        };

        let movies = serde_json::from_slice(&data).map_err(|source| Error::Corrupt {
            path: self.path.clone(),
            source,
        })?;
        Ok(Some(movies))
    }

    fn write(&self, movies: &[Movie]) -> Result<()> {
        let data = serde_json::to_vec(movies).map_err(encode_failure)?;

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| self.io_error(e))?;
        tmp.write_all(&data).map_err(|e| self.io_error(e))?;
        tmp.as_file().sync_all().map_err(|e| self.io_error(e))?;
        tmp.persist(&self.path).map_err(|e| self.io_error(e.error))?;

        tracing::debug!("Wrote {} movies to {}", movies.len(), self.path.display());
        Ok(())
    }

    fn describe(&self) -> String {
        format!("file {}", self.path.display())
    }
}
