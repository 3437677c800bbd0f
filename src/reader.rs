//! Pulls one request off a byte stream.
//!
//! The reader is deliberately permissive: header lines it cannot split are
//! skipped, and a stream that ends in the middle of the header block just ends
//! the header block. A missing request line, a line past [`MAX_LINE_BYTES`]
//! and a truncated or oversized body abort the read.
//!
//! Lines stay raw bytes all the way through; nothing is decoded or replaced.

use std::collections::HashMap;
use std::io;

use bytes::Bytes;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt};
use tracing::debug;

use crate::error::Error;
use crate::request::{Request, content_length, parse_header_line, parse_request_line};

/// Longest single line (request line or header) accepted, terminator included.
pub const MAX_LINE_BYTES: u64 = 8 * 1024;

/// Reads the request line, the header block and the body from `reader`.
///
/// The body is read only when `Content-Length` parses as a number, and then
/// exactly that many bytes are consumed.
pub async fn read_request<R>(reader: &mut R, max_body_bytes: usize) -> Result<Request, Error>
where
    R: AsyncBufRead + Unpin,
{
    let request_line = match read_line(reader).await? {
        Some(line) if line.ends_with(b"\n") => line,
        _ => return Err(Error::IncompleteRequestLine),
    };
    let (method, path) = parse_request_line(&request_line);
    let (method, path) = (Bytes::copy_from_slice(method), Bytes::copy_from_slice(path));

    let headers = read_headers(reader).await?;

    let body = match content_length(&headers) {
        Some(declared) if declared > max_body_bytes => {
            return Err(Error::BodyTooLarge { declared, limit: max_body_bytes });
        }
        Some(declared) => read_body(reader, declared).await?,
        None => Bytes::new(),
    };

    Ok(Request::new(method, path, headers, body))
}

/// Reads header lines up to the blank `\r\n` line.
///
/// Later duplicates overwrite earlier ones. An I/O error or end of stream ends
/// the block; an over-long line does not.
async fn read_headers<R>(reader: &mut R) -> Result<HashMap<Bytes, Bytes>, Error>
where
    R: AsyncBufRead + Unpin,
{
    let mut headers = HashMap::new();
    loop {
        let line = match read_line(reader).await {
            Ok(Some(line)) if line.ends_with(b"\n") => line,
            Ok(_) => break,
            Err(e @ Error::LineTooLong { .. }) => return Err(e),
            Err(e) => {
                debug!("header read stopped: {e}");
                break;
            }
        };
        if line == b"\r\n" {
            break;
        }
        if let Some((name, value)) = parse_header_line(&line) {
            headers.insert(Bytes::copy_from_slice(name), Bytes::copy_from_slice(value));
        }
    }
    Ok(headers)
}

/// Reads exactly `declared` bytes, growing the buffer as they arrive.
async fn read_body<R>(reader: &mut R, declared: usize) -> Result<Bytes, Error>
where
    R: AsyncBufRead + Unpin,
{
    let mut body = Vec::new();
    (&mut *reader).take(declared as u64).read_to_end(&mut body).await?;
    if body.len() != declared {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!("body ended after {} of {declared} bytes", body.len()),
        )
        .into());
    }
    Ok(Bytes::from(body))
}

/// One line, raw. `None` at end of stream.
///
/// A returned line that does not end in `\n` means the stream ended before
/// the terminator arrived.
async fn read_line<R>(reader: &mut R) -> Result<Option<Vec<u8>>, Error>
where
    R: AsyncBufRead + Unpin,
{
    let mut buf = Vec::new();
    let n = (&mut *reader).take(MAX_LINE_BYTES).read_until(b'\n', &mut buf).await?;
    if n == 0 {
        return Ok(None);
    }
    if !buf.ends_with(b"\n") && n as u64 == MAX_LINE_BYTES {
        return Err(Error::LineTooLong { limit: MAX_LINE_BYTES });
    }
    Ok(Some(buf))
}
