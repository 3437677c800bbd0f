//! # petit
//!
//! A tiny HTTP/1.1 server. One request per connection, five behaviors, one
//! hand-assembled response.
//!
//! ## What it answers
//!
//! | Request                  | Response                                           |
//! |--------------------------|----------------------------------------------------|
//! | `GET /`                  | `200 OK`, empty                                    |
//! | `GET /echo/<text>`       | `200 OK`, `text/plain`, body `<text>`              |
//! | `* /user-agent`          | `200 OK`, `text/plain`, the `User-Agent` value     |
//! | `GET /files/<name>`      | `200 OK`, `application/octet-stream`, or `404`     |
//! | `POST /files/<name>`     | `201 Created` after storing the request body       |
//! | anything else            | `404 Not Found`, empty                             |
//!
//! The `/files/` routes exist only when a blob root is configured.
//!
//! ## What it does not do
//!
//! - **Keep-alive / pipelining**: the connection closes after one response.
//! - **Chunked transfer**: bodies are sized by `Content-Length`, both ways.
//! - **TLS**: put a proxy in front.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use petit::{Config, Context, Server};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = Config { directory: Some("/tmp/blobs".into()), ..Config::default() };
//!     Server::new(Context::new(config)).serve().await.unwrap();
//! }
//! ```

mod config;
mod connection;
mod error;
mod handler;
mod method;
mod reader;
mod request;
mod response;
mod router;
mod server;
mod status;
mod store;

pub use config::{Config, Context};
pub use connection::serve_connection;
pub use error::{BlobError, Error};
pub use handler::{respond, write_failure_status};
pub use method::Method;
pub use reader::{MAX_LINE_BYTES, read_request};
pub use request::{Request, content_length, parse_header_line, parse_request_line};
pub use response::{ContentType, Response};
pub use router::{Route, route};
pub use server::Server;
pub use status::Status;
pub use store::{BlobStore, BoxFuture, DirStore, MemoryStore};
