//! Blob storage behind the `/files/` routes.
//!
//! # Why the futures are boxed
//!
//! The server holds its store as `Arc<dyn BlobStore>` so one [`Context`] type
//! serves any backend. `async fn` in a trait is not object safe, so each
//! method returns a [`BoxFuture`] instead:
//!
//! ```text
//! store.read("a.txt")                   ← handler calls through the vtable
//!        ↓
//! Box::pin(async move { fs::read(..) }) ← backend builds its own future
//! ```
//!
//! [`Context`]: crate::Context

use std::collections::HashMap;
use std::future::Future;
use std::io;
use std::path::{Component, Path, PathBuf};
use std::pin::Pin;
use std::sync::{Mutex, PoisonError};

use bytes::Bytes;

use crate::error::BlobError;

/// A heap-allocated, type-erased future borrowing from the store.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Named byte blobs. Reads and writes are whole-blob.
pub trait BlobStore: Send + Sync + 'static {
    /// Returns the blob stored under `name`, or [`BlobError::NotFound`].
    fn read<'a>(&'a self, name: &'a str) -> BoxFuture<'a, Result<Bytes, BlobError>>;

    /// Creates or overwrites the blob stored under `name`.
    fn write<'a>(&'a self, name: &'a str, data: Bytes) -> BoxFuture<'a, Result<(), BlobError>>;
}

// ── DirStore ──────────────────────────────────────────────────────────────────

/// Blobs as plain files under a root directory.
///
/// A name is a relative path below the root. Names that are empty, absolute,
/// or step outside the root (`..`) are never touched on disk: reads report
/// [`BlobError::NotFound`] and writes report [`BlobError::Write`].
#[derive(Clone, Debug)]
pub struct DirStore {
    root: PathBuf,
}

impl DirStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, name: &str) -> Option<PathBuf> {
        let rel = Path::new(name);
        let mut normal = false;
        for component in rel.components() {
            match component {
                Component::Normal(_) => normal = true,
                Component::CurDir => {}
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
            }
        }
        normal.then(|| self.root.join(rel))
    }
}

impl BlobStore for DirStore {
    fn read<'a>(&'a self, name: &'a str) -> BoxFuture<'a, Result<Bytes, BlobError>> {
        Box::pin(async move {
            let path = self.resolve(name).ok_or(BlobError::NotFound)?;
            tokio::fs::read(&path)
                .await
                .map(Bytes::from)
                .map_err(|_| BlobError::NotFound)
        })
    }

    fn write<'a>(&'a self, name: &'a str, data: Bytes) -> BoxFuture<'a, Result<(), BlobError>> {
        Box::pin(async move {
            let path = self.resolve(name).ok_or_else(|| {
                BlobError::Write(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("blob name `{name}` is outside the store root"),
                ))
            })?;
            tokio::fs::write(&path, &data).await.map_err(BlobError::Write)
        })
    }
}

// ── MemoryStore ───────────────────────────────────────────────────────────────

/// Blobs kept in process memory. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    blobs: Mutex<HashMap<String, Bytes>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BlobStore for MemoryStore {
    fn read<'a>(&'a self, name: &'a str) -> BoxFuture<'a, Result<Bytes, BlobError>> {
        let found = self.blobs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned();
        Box::pin(async move { found.ok_or(BlobError::NotFound) })
    }

    fn write<'a>(&'a self, name: &'a str, data: Bytes) -> BoxFuture<'a, Result<(), BlobError>> {
        self.blobs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.to_owned(), data);
        Box::pin(async { Ok(()) })
    }
}
