//! Movie Library - Main entry point
//!
//! A catalog server keeps movie records behind a gRPC service; a client
//! ingests XML documents and drives the service, either from the command
//! line or through an HTTP gateway.
//!
//! ## Usage
//!
//! Start the server:
//! ```bash
//! cargo run --bin movie-server -- --backend file --json-file-path movies.json
//! ```
//!
//! Run the client:
//! ```bash
//! cargo run --bin movie-client -- load herd.xml
//! cargo run --bin movie-client -- query 02-10-2023
//! cargo run --bin movie-client -- serve --http-addr 0.0.0.0:8080
//! ```

fn main() {
    println!("Movie Library");
    println!();
    println!("Use the following binaries:");
    println!("  cargo run --bin movie-server -- --help");
    println!("  cargo run --bin movie-client -- --help");
}
