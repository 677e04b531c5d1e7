//! Destination backends for partition output
//!
//! The distributor writes each partition through a [`Destination`] handle
//! that a [`DestinationFactory`] creates on first use. The traits are
//! runtime-agnostic and use `async_trait` for async support.
//!
//! ## Implementations
//!
//! - [`FileDestinations`]: one local file per partition, named
//!   `<prefix>-<graph>.<suffix>` by an [`OutputLayout`]
//! - [`MemoryDestinations`]: in-memory buffers for tests
//!
//! The [`Backend`] enum selects what happens after distribution. The remote
//! graph-store variant writes local files exactly like `LocalFile`; pushing
//! them to the store is a separate phase (see [`crate::upload`]).

use crate::error::{Error, Result};
use crate::upload::GraphStoreConfig;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::fmt::Debug;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

// ============================================================================
// Core Traits
// ============================================================================

/// An open partition output.
#[async_trait]
pub trait Destination: Debug + Send {
    /// Append raw bytes.
    async fn write(&mut self, bytes: &[u8]) -> io::Result<()>;

    /// Flush and release the underlying resource.
    ///
    /// Called exactly once by the distributor.
    async fn close(&mut self) -> io::Result<()>;
}

/// Creates a destination for a graph name on first use.
#[async_trait]
pub trait DestinationFactory: Debug + Send + Sync {
    type Destination: Destination;

    async fn create(&self, graph: &str) -> io::Result<Self::Destination>;
}

// ============================================================================
// Backend selection
// ============================================================================

/// Where partition output ends up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Backend {
    /// Local files only.
    LocalFile,
    /// Local files, then each file is POSTed to a graph store.
    RemoteGraphStore(GraphStoreConfig),
}

impl Backend {
    pub fn graph_store(&self) -> Option<&GraphStoreConfig> {
        match self {
            Backend::LocalFile => None,
            Backend::RemoteGraphStore(config) => Some(config),
        }
    }
}

// ============================================================================
// Output layout
// ============================================================================

/// File naming for partition output: `<dir>/<prefix>-<graph>.<suffix>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    dir: PathBuf,
    prefix: String,
    suffix: String,
}

impl OutputLayout {
    pub fn new(
        dir: impl Into<PathBuf>,
        prefix: impl Into<String>,
        suffix: impl Into<String>,
    ) -> Self {
        Self {
            dir: dir.into(),
            prefix: prefix.into(),
            suffix: suffix.into(),
        }
    }

    /// Derive prefix and suffix from the input file's base name and extension.
    ///
    /// `/data/people.nt` gives prefix `people` and suffix `nt`. A file without
    /// an extension gets an empty suffix and its outputs carry no dot.
    pub fn from_input(input: &Path, dir: impl Into<PathBuf>) -> Result<Self> {
        let prefix = input
            .file_stem()
            .and_then(|s| s.to_str())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                Error::input(format!("cannot derive output name from {}", input.display()))
            })?;
        let suffix = input.extension().and_then(|s| s.to_str()).unwrap_or("");
        Ok(Self::new(dir, prefix, suffix))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// File name for a graph.
    pub fn file_name(&self, graph: &str) -> String {
        if self.suffix.is_empty() {
            format!("{}-{}", self.prefix, graph)
        } else {
            format!("{}-{}.{}", self.prefix, graph, self.suffix)
        }
    }

    /// Full path for a graph.
    pub fn path_for(&self, graph: &str) -> PathBuf {
        self.dir.join(self.file_name(graph))
    }
}

// ============================================================================
// FileDestinations
// ============================================================================

/// Local file backend. Creating a destination truncates any existing file.
#[derive(Debug, Clone)]
pub struct FileDestinations {
    layout: OutputLayout,
}

impl FileDestinations {
    pub fn new(layout: OutputLayout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> &OutputLayout {
        &self.layout
    }
}

#[async_trait]
impl DestinationFactory for FileDestinations {
    type Destination = FileDestination;

    async fn create(&self, graph: &str) -> io::Result<FileDestination> {
        let path = self.layout.path_for(graph);
        let file = tokio::fs::File::create(&path).await?.into_std().await;
        tracing::debug!(graph, path = %path.display(), "created partition file");
        Ok(FileDestination {
            path,
            writer: Some(BufWriter::new(file)),
        })
    }
}

/// A single open partition file.
///
/// Lines are buffered in a `std::io::BufWriter`, whose `Drop` flushes, so a
/// handle dropped without [`Destination::close`] (an early return or a
/// cancelled task) still leaves every written line on disk. Only `close`
/// reports flush errors and syncs the file.
#[derive(Debug)]
pub struct FileDestination {
    path: PathBuf,
    writer: Option<BufWriter<std::fs::File>>,
}

impl FileDestination {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl Destination for FileDestination {
    async fn write(&mut self, bytes: &[u8]) -> io::Result<()> {
        match self.writer.as_mut() {
            Some(writer) => writer.write_all(bytes),
            None => Err(io::Error::new(
                io::ErrorKind::BrokenPipe,
                format!("{} is already closed", self.path.display()),
            )),
        }
    }

    async fn close(&mut self) -> io::Result<()> {
        // Idempotent: the handle is released on the first call
        if let Some(writer) = self.writer.take() {
            let file = writer.into_inner().map_err(|e| e.into_error())?;
            tokio::fs::File::from_std(file).sync_all().await?;
        }
        Ok(())
    }
}

// ============================================================================
// MemoryDestinations
// ============================================================================

#[derive(Debug, Default, Clone)]
struct MemoryBuffer {
    bytes: Vec<u8>,
    closes: usize,
}

/// In-memory backend for testing.
///
/// Keeps every graph's bytes and how many times it was closed, shared across
/// clones via `Arc<RwLock<...>>` so a test can inspect results after handing
/// the factory to a distributor.
#[derive(Debug, Clone, Default)]
pub struct MemoryDestinations {
    buffers: Arc<RwLock<BTreeMap<String, MemoryBuffer>>>,
}

impl MemoryDestinations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Graph names that were created, in name order.
    pub fn graphs(&self) -> Vec<String> {
        self.buffers
            .read()
            .expect("RwLock poisoned")
            .keys()
            .cloned()
            .collect()
    }

    /// Contents written to a graph as UTF-8.
    pub fn contents(&self, graph: &str) -> Option<String> {
        self.buffers
            .read()
            .expect("RwLock poisoned")
            .get(graph)
            .map(|b| String::from_utf8_lossy(&b.bytes).into_owned())
    }

    /// Number of times a graph's destination was closed.
    pub fn close_count(&self, graph: &str) -> usize {
        self.buffers
            .read()
            .expect("RwLock poisoned")
            .get(graph)
            .map_or(0, |b| b.closes)
    }
}

#[async_trait]
impl DestinationFactory for MemoryDestinations {
    type Destination = MemoryDestination;

    async fn create(&self, graph: &str) -> io::Result<MemoryDestination> {
        self.buffers
            .write()
            .expect("RwLock poisoned")
            .insert(graph.to_string(), MemoryBuffer::default());
        Ok(MemoryDestination {
            graph: graph.to_string(),
            buffers: Arc::clone(&self.buffers),
            closed: false,
        })
    }
}

/// Handle into a [`MemoryDestinations`] buffer.
#[derive(Debug)]
pub struct MemoryDestination {
    graph: String,
    buffers: Arc<RwLock<BTreeMap<String, MemoryBuffer>>>,
    closed: bool,
}

#[async_trait]
impl Destination for MemoryDestination {
    async fn write(&mut self, bytes: &[u8]) -> io::Result<()> {
        if self.closed {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "destination closed"));
        }
        let mut buffers = self.buffers.write().expect("RwLock poisoned");
        buffers
            .entry(self.graph.clone())
            .or_default()
            .bytes
            .extend_from_slice(bytes);
        Ok(())
    }

    async fn close(&mut self) -> io::Result<()> {
        self.closed = true;
        let mut buffers = self.buffers.write().expect("RwLock poisoned");
        buffers.entry(self.graph.clone()).or_default().closes += 1;
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
