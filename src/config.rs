//! Server configuration and the shared per-server context.
//!
//! Both are built once, before the first connection is accepted, and are
//! read-only from then on. Workers share the [`Context`] through an `Arc`.

use std::fmt;
use std::net::{Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::store::{BlobStore, DirStore};

pub const DEFAULT_PORT: u16 = 4221;
pub const DEFAULT_IO_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

/// Startup settings.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// Address the listener binds to.
    pub listen: SocketAddr,
    /// Blob-store root. `None` (or an empty path) disables the `/files/` routes.
    pub directory: Option<PathBuf>,
    /// Deadline for reading a request, and separately for writing the response.
    pub io_timeout: Duration,
    /// Largest `Content-Length` accepted.
    pub max_body_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen: SocketAddr::from((Ipv4Addr::UNSPECIFIED, DEFAULT_PORT)),
            directory: None,
            io_timeout: DEFAULT_IO_TIMEOUT,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

impl Config {
    /// The configured blob root, if there is a non-empty one.
    pub fn blob_root(&self) -> Option<&Path> {
        self.directory
            .as_deref()
            .filter(|dir| !dir.as_os_str().is_empty())
    }
}

/// Everything a worker needs: the config plus the blob store it implies.
pub struct Context {
    config: Config,
    store: Option<Arc<dyn BlobStore>>,
}

impl Context {
    /// Builds the context, backing `/files/` with a [`DirStore`] when a root
    /// directory is configured.
    pub fn new(config: Config) -> Self {
        let store = config
            .blob_root()
            .map(|root| Arc::new(DirStore::new(root)) as Arc<dyn BlobStore>);
        Self { config, store }
    }

    /// Builds the context around an explicit store, regardless of
    /// `config.directory`.
    pub fn with_store(config: Config, store: Arc<dyn BlobStore>) -> Self {
        Self { config, store: Some(store) }
    }

    pub fn config(&self) -> &Config { &self.config }

    pub fn store(&self) -> Option<&dyn BlobStore> {
        self.store.as_deref()
    }

    /// Whether the `/files/` routes are live.
    pub fn files_enabled(&self) -> bool {
        self.store.is_some()
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("config", &self.config)
            .field("files_enabled", &self.files_enabled())
            .finish()
    }
}
