//! Route handlers: turn a resolved [`Route`] into a [`Response`].
//!
//! Only the file routes touch the blob store; every other handler is a pure
//! function of the request. Blob names must be UTF-8; any other name is never
//! handed to the store.

use std::io;

use bytes::Bytes;
use tracing::warn;

use crate::error::BlobError;
use crate::request::Request;
use crate::response::{ContentType, Response};
use crate::router::Route;
use crate::status::Status;
use crate::store::BlobStore;

/// Status sent when a blob write fails.
///
/// Kept at `404 Not Found` for wire compatibility with existing clients. This
/// is the only place that decides it.
pub fn write_failure_status(_err: &BlobError) -> Status {
    Status::NotFound
}

/// Produces the response for `route`.
///
/// `store` must be `Some` whenever `route` is a file route; the router never
/// yields one otherwise. A missing store is answered with 404.
pub async fn respond(route: Route<'_>, req: &Request, store: Option<&dyn BlobStore>) -> Response {
    match route {
        Route::Root => Response::status(Status::Ok),
        Route::Echo(text) => Response::text(Bytes::copy_from_slice(text)),
        Route::UserAgent => {
            Response::text(Bytes::copy_from_slice(req.header("User-Agent").unwrap_or_default()))
        }
        Route::FileGet(name) => match store {
            Some(store) => file_get(store, name).await,
            None => Response::status(Status::NotFound),
        },
        Route::FilePost(name) => match store {
            Some(store) => file_post(store, name, req).await,
            None => Response::status(Status::NotFound),
        },
        Route::NotFound => Response::status(Status::NotFound),
    }
}

async fn file_get(store: &dyn BlobStore, name: &[u8]) -> Response {
    let Ok(name) = std::str::from_utf8(name) else {
        return Response::status(Status::NotFound);
    };
    match store.read(name).await {
        Ok(blob) => Response::bytes(ContentType::OctetStream, blob),
        Err(_) => Response::status(Status::NotFound),
    }
}

async fn file_post(store: &dyn BlobStore, name: &[u8], req: &Request) -> Response {
    let written = match std::str::from_utf8(name) {
        Ok(name) => store.write(name, req.body.clone()).await,
        Err(e) => Err(BlobError::Write(io::Error::new(io::ErrorKind::InvalidData, e))),
    };
    match written {
        Ok(()) => Response::status(Status::Created),
        Err(e) => {
            warn!(blob = %name.escape_ascii(), "blob write failed: {e}");
            Response::status(write_failure_status(&e))
        }
    }
}
