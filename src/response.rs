//! Outgoing HTTP response type.
//!
//! A [`Response`] is built once, serialized into a single buffer and written
//! once. `Content-Length` is never set by hand: serialization always stamps
//! it with the real body length, replacing whatever was there.

use bytes::{BufMut, Bytes, BytesMut};
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::request::CONTENT_LENGTH;
use crate::status::Status;

pub const CONTENT_TYPE: &str = "Content-Type";

// ── ContentType ───────────────────────────────────────────────────────────────

/// Content-type values petit sends.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ContentType {
    OctetStream, // application/octet-stream  (blob download)
    Text,        // text/plain
}

impl ContentType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::OctetStream => "application/octet-stream",
            Self::Text        => "text/plain",
        }
    }
}

// ── Response ─────────────────────────────────────────────────────────────────

/// An outgoing HTTP response.
///
/// ```rust
/// use petit::{ContentType, Response, Status};
///
/// Response::text("hello");
/// Response::status(Status::NotFound);
/// Response::bytes(ContentType::OctetStream, b"\x00\x01".to_vec());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Response {
    pub(crate) body: Bytes,
    pub(crate) headers: Vec<(String, String)>,
    pub(crate) status: Status,
}

impl Response {
    /// `200 OK` with a `text/plain` body. The bytes are sent as given, UTF-8
    /// or not.
    pub fn text(body: impl Into<Bytes>) -> Self {
        Self::bytes(ContentType::Text, body)
    }

    /// `200 OK` with a typed body.
    pub fn bytes(content_type: ContentType, body: impl Into<Bytes>) -> Self {
        Self {
            body: body.into(),
            headers: vec![(CONTENT_TYPE.to_owned(), content_type.as_str().to_owned())],
            status: Status::Ok,
        }
    }

    /// Response with no body.
    pub fn status(code: Status) -> Self {
        Self { body: Bytes::new(), headers: Vec::new(), status: code }
    }

    pub fn status_code(&self) -> Status { self.status }
    pub fn body(&self) -> &[u8] { &self.body }

    /// Header lookup, ignoring ASCII case.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Serializes the whole response into one wire buffer.
    ///
    /// Any existing `Content-Length` header is dropped and replaced with the
    /// body's byte length.
    pub fn to_bytes(&self) -> Bytes {
        let headers = self.headers.iter()
            .filter(|(name, _)| !name.eq_ignore_ascii_case(CONTENT_LENGTH));

        let mut buf = BytesMut::with_capacity(128 + self.body.len());
        buf.put_slice(format!("HTTP/1.1 {}\r\n", self.status).as_bytes());
        for (name, value) in headers {
            buf.put_slice(format!("{name}: {value}\r\n").as_bytes());
        }
        buf.put_slice(format!("{CONTENT_LENGTH}: {}\r\n", self.body.len()).as_bytes());
        buf.put_slice(b"\r\n");
        buf.put_slice(&self.body);
        buf.freeze()
    }

    /// Writes the serialized response in one go and flushes.
    pub async fn write_to<W: AsyncWrite + Unpin>(&self, writer: &mut W) -> std::io::Result<()> {
        writer.write_all(&self.to_bytes()).await?;
        writer.flush().await
    }
}
