//! One connection, one request, one response.
//!
//! ```text
//! Reading ──▶ Routing ──▶ Responding ──▶ Closed
//!    │                        │
//!    └── error / timeout ─────┴──▶ Closed (nothing written)
//! ```
//!
//! There is no keep-alive: the stream is shut down after the response, even
//! if the client sent more bytes.

use std::future::Future;
use std::io;
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::debug;

use crate::config::Context;
use crate::error::Error;
use crate::handler::respond;
use crate::reader::read_request;
use crate::response::Response;
use crate::router::route;

/// Runs the full request/response cycle on `stream`.
///
/// Reading the request, producing the response and writing it are each
/// bounded by `ctx.config().io_timeout`. A failure in either of the first two
/// returns before anything is written.
pub async fn serve_connection<S>(stream: S, ctx: &Context) -> Result<(), Error>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let config = ctx.config();
    let mut stream = BufReader::new(stream);

    let request = deadline(config.io_timeout, read_request(&mut stream, config.max_body_bytes)).await?;

    let route = route(request.known_method(), request.path(), ctx.files_enabled());
    let response = tokio::time::timeout(config.io_timeout, respond(route, &request, ctx.store()))
        .await
        .map_err(|_| Error::Timeout(config.io_timeout))?;

    debug!(
        method = %request.method().escape_ascii(),
        path = %request.path().escape_ascii(),
        route = route.name(),
        status = response.status_code().code(),
        "request served",
    );

    deadline(config.io_timeout, async {
        write_response(&response, &mut stream).await.map_err(Error::from)
    })
    .await
}

async fn write_response<W>(response: &Response, writer: &mut W) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    response.write_to(writer).await?;
    writer.shutdown().await
}

async fn deadline<T, F>(limit: Duration, fut: F) -> Result<T, Error>
where
    F: Future<Output = Result<T, Error>>,
{
    tokio::time::timeout(limit, fut)
        .await
        .map_err(|_| Error::Timeout(limit))?
}
