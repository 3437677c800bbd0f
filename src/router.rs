//! Request routing.
//!
//! Six behaviors, checked in a fixed order, first match wins. No tree, no
//! registration: the route table is the `match` below.
//!
//! | Order | Method | Path           | Route       |
//! |-------|--------|----------------|-------------|
//! | 1     | any    | `/user-agent`  | `UserAgent` |
//! | 2     | any    | `/echo/…`      | `Echo`      |
//! | 3     | GET    | `/files/…`     | `FileGet`   |
//! | 4     | POST   | `/files/…`     | `FilePost`  |
//! | 5     | any    | `/`            | `Root`      |
//! | 6     | any    | anything else  | `NotFound`  |
//!
//! Rows 3 and 4 only exist when a blob store is configured. Without one,
//! `/files/…` falls through to rows 5 and 6 like any other unknown path.

use crate::method::Method;

const ECHO_PREFIX: &[u8] = b"/echo/";
const FILES_PREFIX: &[u8] = b"/files/";

/// The handler a request resolves to. Borrowed parts point into the raw path.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Route<'a> {
    Root,
    /// Path remainder after `/echo/`, verbatim (no percent-decoding).
    Echo(&'a [u8]),
    UserAgent,
    /// Blob name after `/files/`.
    FileGet(&'a [u8]),
    /// Blob name after `/files/`; the request body is the new content.
    FilePost(&'a [u8]),
    NotFound,
}

impl Route<'_> {
    /// Short label for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Root        => "root",
            Self::Echo(_)     => "echo",
            Self::UserAgent   => "user-agent",
            Self::FileGet(_)  => "file-get",
            Self::FilePost(_) => "file-post",
            Self::NotFound    => "not-found",
        }
    }
}

/// Resolves `(method, path)` to a [`Route`].
///
/// `method` is `None` for anything other than GET or POST (including the empty
/// method of a malformed request line). `files_enabled` is whether a blob
/// store is configured.
pub fn route(method: Option<Method>, path: &[u8], files_enabled: bool) -> Route<'_> {
    if path == b"/user-agent" {
        return Route::UserAgent;
    }
    if let Some(text) = path.strip_prefix(ECHO_PREFIX) {
        return Route::Echo(text);
    }
    if files_enabled {
        if let Some(name) = path.strip_prefix(FILES_PREFIX) {
            match method {
                Some(Method::Get) => return Route::FileGet(name),
                Some(Method::Post) => return Route::FilePost(name),
                None => {}
            }
        }
    }
    if path == b"/" {
        return Route::Root;
    }
    Route::NotFound
}
