//! Attribute-subset visibility for triplesplit graphs
//!
//! Partition names and principal attributes share one representation: a
//! fixed-width bitmap. A principal may read every graph whose bitmap is a
//! non-empty subset of its own.
//!
//! # Core Types
//!
//! - [`AttributeBitmap`]: parsed `{0,1}` string with subset tests
//! - [`VisiblePartitions`]: lazy, ordered enumeration of visible tags
//! - [`VisibilityPolicy`]: the subset rule plus an explicit choice for the
//!   all-zero tag ([`ZeroAttributePolicy`])
//!
//! # Usage
//!
//! ```ignore
//! let principal: AttributeBitmap = "011".parse()?;
//! let graphs = visible_partitions(&principal)?; // 001, 010, 011
//! ```

mod bitmap;
mod error;
mod visibility;

pub use bitmap::AttributeBitmap;
pub use error::{PolicyError, Result};
pub use visibility::{
    cumulative_principals, is_visible, visible_partitions, VisibilityPolicy, VisiblePartitions,
    ZeroAttributePolicy, MAX_ENUMERABLE_ATTRIBUTES,
};
