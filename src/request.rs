//! Incoming HTTP request type and the pure line parsers behind it.
//!
//! Everything here works on raw bytes that have already been pulled off the
//! wire; the socket side lives in [`reader`](crate::read_request). Nothing is
//! decoded as UTF-8, so paths and header values come back exactly as sent.

use std::collections::HashMap;

use bytes::Bytes;

use crate::method::Method;

/// The header whose value sizes the request body.
pub const CONTENT_LENGTH: &str = "Content-Length";

/// An incoming HTTP request, parsed from the raw TCP stream.
///
/// Built once per connection and never mutated afterwards. A malformed request
/// line leaves `method` and `path` empty, which no route matches.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Request {
    pub(crate) method: Bytes,
    pub(crate) path: Bytes,
    pub(crate) headers: HashMap<Bytes, Bytes>,
    pub(crate) body: Bytes,
}

impl Request {
    pub fn new(
        method: impl Into<Bytes>,
        path: impl Into<Bytes>,
        headers: HashMap<Bytes, Bytes>,
        body: impl Into<Bytes>,
    ) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            headers,
            body: body.into(),
        }
    }

    /// The raw method token, empty if the request line was malformed.
    pub fn method(&self) -> &[u8] { &self.method }
    pub fn path(&self) -> &[u8] { &self.path }
    pub fn headers(&self) -> &HashMap<Bytes, Bytes> { &self.headers }
    pub fn body(&self) -> &[u8] { &self.body }

    /// The method as a [`Method`], if it is one the router dispatches on.
    pub fn known_method(&self) -> Option<Method> {
        std::str::from_utf8(&self.method).ok()?.parse().ok()
    }

    /// Header lookup. Names are case-sensitive, exactly as they came off the wire.
    pub fn header(&self, name: &str) -> Option<&[u8]> {
        self.headers.get(name.as_bytes()).map(|value| &value[..])
    }
}

/// Splits a request line into `(method, path)`.
///
/// The line must hold exactly three whitespace-separated tokens
/// (`METHOD PATH VERSION`); the version is checked for presence only.
/// Anything else yields two empty slices.
pub fn parse_request_line(line: &[u8]) -> (&[u8], &[u8]) {
    let mut tokens = line
        .split(u8::is_ascii_whitespace)
        .filter(|token| !token.is_empty());
    match (tokens.next(), tokens.next(), tokens.next(), tokens.next()) {
        (Some(method), Some(path), Some(_version), None) => (method, path),
        _ => (&line[..0], &line[..0]),
    }
}

/// Splits a `Name: Value` header line at the first `": "`.
///
/// CR and LF are trimmed from both ends of the value; the name is returned
/// verbatim. Lines without the separator return `None` and are meant to be
/// skipped, not rejected.
pub fn parse_header_line(line: &[u8]) -> Option<(&[u8], &[u8])> {
    let at = line.windows(2).position(|pair| pair == b": ")?;
    Some((&line[..at], trim_crlf(&line[at + 2..])))
}

/// The declared body length, if `Content-Length` is present and numeric.
pub fn content_length(headers: &HashMap<Bytes, Bytes>) -> Option<usize> {
    let value = headers.get(CONTENT_LENGTH.as_bytes())?;
    std::str::from_utf8(value).ok()?.parse().ok()
}

fn trim_crlf(mut value: &[u8]) -> &[u8] {
    while let [b'\r' | b'\n', rest @ ..] = value {
        value = rest;
    }
    while let [rest @ .., b'\r' | b'\n'] = value {
        value = rest;
    }
    value
}
