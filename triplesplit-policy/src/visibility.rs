//! Attribute-subset visibility
//!
//! Data tagged with attribute combination `X` is visible to a principal
//! holding attribute set `U` iff `X` is a non-empty subset of `U`. For a
//! principal bitmap with `k` set positions the visible tags are enumerated
//! by counting `i` from `1` to `2^k - 1` and scattering the bits of `i`
//! (most significant first) into the set positions, left to right.
//!
//! `"011"` yields `"001"`, `"010"`, `"011"` in that order. A principal with
//! no attributes sees nothing unless [`ZeroAttributePolicy::PublicPartition`]
//! is configured explicitly.
//!
//! Everything here is pure and holds no shared state.

use crate::bitmap::AttributeBitmap;
use crate::error::{PolicyError, Result};
use serde::{Deserialize, Serialize};

/// Largest popcount whose subsets can be counted in a `u64`.
pub const MAX_ENUMERABLE_ATTRIBUTES: usize = 63;

/// Lazy, ordered enumeration of the tags visible to one principal.
#[derive(Debug, Clone)]
pub struct VisiblePartitions {
    width: usize,
    positions: Vec<usize>,
    next: u64,
    end: u64,
}

impl VisiblePartitions {
    /// Enumerate the non-empty subsets of `principal`.
    pub fn new(principal: &AttributeBitmap) -> Result<Self> {
        Self::starting_at(principal, 1)
    }

    fn starting_at(principal: &AttributeBitmap, first: u64) -> Result<Self> {
        let positions: Vec<usize> = principal.ones().collect();
        let k = positions.len();
        if k > MAX_ENUMERABLE_ATTRIBUTES {
            return Err(PolicyError::TooManyAttributes {
                count: k,
                limit: MAX_ENUMERABLE_ATTRIBUTES,
            });
        }
        Ok(Self {
            width: principal.width(),
            positions,
            next: first,
            end: 1u64 << k,
        })
    }

    fn scatter(&self, value: u64) -> AttributeBitmap {
        let k = self.positions.len();
        let mut bits = vec![false; self.width];
        for (j, &position) in self.positions.iter().enumerate() {
            bits[position] = (value >> (k - 1 - j)) & 1 == 1;
        }
        AttributeBitmap::from_bits(bits)
    }
}

impl Iterator for VisiblePartitions {
    type Item = AttributeBitmap;

    fn next(&mut self) -> Option<AttributeBitmap> {
        if self.next >= self.end {
            return None;
        }
        let bitmap = self.scatter(self.next);
        self.next += 1;
        Some(bitmap)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.end.saturating_sub(self.next);
        match usize::try_from(remaining) {
            Ok(n) => (n, Some(n)),
            Err(_) => (usize::MAX, None),
        }
    }
}

impl ExactSizeIterator for VisiblePartitions {}

/// Every partition tag visible to `principal`, in enumeration order.
///
/// Returns `2^popcount - 1` bitmaps; empty when no attribute is set.
pub fn visible_partitions(principal: &AttributeBitmap) -> Result<Vec<AttributeBitmap>> {
    Ok(VisiblePartitions::new(principal)?.collect())
}

/// Whether data tagged `tag` is visible to `principal`.
///
/// The all-zero tag is never visible under this rule.
pub fn is_visible(principal: &AttributeBitmap, tag: &AttributeBitmap) -> Result<bool> {
    Ok(!tag.is_zero() && tag.is_subset_of(principal)?)
}

/// Sample principals holding the lowest `0..=width` attributes.
///
/// For width 3: `"000"`, `"001"`, `"011"`, `"111"`.
pub fn cumulative_principals(width: usize) -> Vec<AttributeBitmap> {
    (0..=width)
        .map(|ones| AttributeBitmap::low_ones(width, ones))
        .collect()
}

/// Treatment of the all-zero tag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ZeroAttributePolicy {
    /// The all-zero tag is visible to nobody.
    #[default]
    Deny,
    /// The all-zero tag is a public partition visible to every principal,
    /// including one holding no attributes.
    PublicPartition,
}

/// Visibility rule with an explicit zero-attribute choice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisibilityPolicy {
    #[serde(default)]
    pub zero_attributes: ZeroAttributePolicy,
}

impl VisibilityPolicy {
    pub fn new(zero_attributes: ZeroAttributePolicy) -> Self {
        Self { zero_attributes }
    }

    /// Visible tags for `principal`.
    ///
    /// With [`ZeroAttributePolicy::PublicPartition`] the all-zero tag comes
    /// first, followed by the non-empty subsets.
    pub fn visible_for(&self, principal: &AttributeBitmap) -> Result<VisiblePartitions> {
        let first = match self.zero_attributes {
            ZeroAttributePolicy::Deny => 1,
            ZeroAttributePolicy::PublicPartition => 0,
        };
        VisiblePartitions::starting_at(principal, first)
    }

    pub fn allows(&self, principal: &AttributeBitmap, tag: &AttributeBitmap) -> Result<bool> {
        if tag.is_zero() && self.zero_attributes == ZeroAttributePolicy::PublicPartition {
            if tag.width() != principal.width() {
                return Err(PolicyError::WidthMismatch {
                    expected: principal.width(),
                    actual: tag.width(),
                });
            }
            return Ok(true);
        }
        is_visible(principal, tag)
    }
}
