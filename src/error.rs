//! Unified error types.

use std::time::Duration;

use thiserror::Error;

/// Transport-level failures.
///
/// Application-level outcomes (404, 201, ...) are expressed as
/// [`Response`](crate::Response) values, not as `Error`s. This type surfaces
/// infrastructure failures: binding a port, reading a request off the wire,
/// writing the response back. None of them ever produce an HTTP response; the
/// affected connection is simply dropped.
#[derive(Debug, Error)]
pub enum Error {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    /// The peer closed the stream before a full request line arrived.
    #[error("connection closed before the request line was complete")]
    IncompleteRequestLine,

    /// A request or header line ran past the line cap without a `\n`.
    #[error("line exceeds {limit} bytes")]
    LineTooLong { limit: u64 },

    /// The declared `Content-Length` exceeds the configured cap.
    #[error("request body of {declared} bytes exceeds limit of {limit}")]
    BodyTooLarge { declared: usize, limit: usize },

    /// A read, the handler, or a write did not finish within the connection
    /// deadline.
    #[error("timed out after {0:?}")]
    Timeout(Duration),
}

/// Failures reported by a [`BlobStore`](crate::BlobStore).
#[derive(Debug, Error)]
pub enum BlobError {
    /// No blob exists under that name (or the name is not addressable).
    #[error("blob not found")]
    NotFound,

    /// The blob could not be persisted.
    #[error("blob write failed: {0}")]
    Write(#[source] std::io::Error),
}
