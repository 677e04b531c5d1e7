//! # triplesplit core
//!
//! Splits a line-oriented statement corpus (N-Triples) across a fixed number
//! of named graphs and optionally pushes each graph to a graph store.
//!
//! - [`partition`]: fixed-width binary graph names (`render_name`, `parse_name`)
//! - [`destination`]: lazily created partition outputs (`Destination`, `DestinationFactory`)
//! - [`distributor`]: round-robin assignment of lines to partitions
//! - [`upload`]: sequential POST of each partition file to `<url>?graph=<name>`
//! - [`report`]: summaries built from finished results
//! - [`pipeline`]: the whole split, from input file to report
//!
//! ## Example
//!
//! ```ignore
//! use triplesplit_core::{split_file, SplitOptions};
//!
//! let report = split_file(Path::new("data.nt"), &SplitOptions::new(4)).await?;
//! println!("{report}");
//! ```

pub mod destination;
pub mod distributor;
pub mod error;
pub mod partition;
pub mod pipeline;
pub mod report;
pub mod upload;

pub use destination::{
    Backend, Destination, DestinationFactory, FileDestination, FileDestinations,
    MemoryDestination, MemoryDestinations, OutputLayout,
};
pub use distributor::{DistributionSummary, RoundRobinDistributor};
pub use error::{Error, Result, UploadFailure};
pub use partition::{bit_length, parse_name, partition_names, render_name};
pub use pipeline::{split_file, SplitOptions};
pub use report::{FileReport, Report, UploadReport};
pub use upload::{
    upload_partitions, GraphStoreClient, GraphStoreConfig, UploadSummary,
    DEFAULT_TIMEOUT_SECS, N_TRIPLES_CONTENT_TYPE,
};
