pub mod catalog;
pub mod client;
pub mod error;
pub mod gateway;
pub mod ingest;
pub mod pb;
pub mod protocol;
pub mod server;
pub mod store;

pub use catalog::Catalog;
pub use client::{ClientConfig, MovieLibraryClient};
pub use error::{Error, ErrorKind};
pub use protocol::Movie;
pub use server::{MovieLibraryServer, ServerConfig};
pub use store::{CatalogBackend, StorageConfig};
