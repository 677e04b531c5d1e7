//! Attribute bitmaps
//!
//! Position `p` set to `1` means the principal holds attribute `p`, or, for a
//! partition tag, that the data carries attribute `p`. Both uses share one
//! representation, which is what makes subset visibility work.

use crate::error::{PolicyError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Fixed-width attribute bitmap, written most significant position first.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AttributeBitmap {
    bits: Vec<bool>,
}

impl AttributeBitmap {
    pub fn from_bits(bits: Vec<bool>) -> Self {
        Self { bits }
    }

    /// All-zero bitmap of `width` positions.
    pub fn zeros(width: usize) -> Self {
        Self {
            bits: vec![false; width],
        }
    }

    /// Bitmap whose rightmost `ones` positions are set.
    ///
    /// `ones` is capped at `width`.
    pub fn low_ones(width: usize, ones: usize) -> Self {
        let ones = ones.min(width);
        let mut bits = vec![false; width];
        for bit in &mut bits[width - ones..] {
            *bit = true;
        }
        Self { bits }
    }

    pub fn width(&self) -> usize {
        self.bits.len()
    }

    pub fn bits(&self) -> &[bool] {
        &self.bits
    }

    pub fn get(&self, position: usize) -> Option<bool> {
        self.bits.get(position).copied()
    }

    /// Number of set positions.
    pub fn popcount(&self) -> usize {
        self.bits.iter().filter(|b| **b).count()
    }

    /// True when no attribute is set.
    pub fn is_zero(&self) -> bool {
        !self.bits.iter().any(|b| *b)
    }

    /// Set positions, left to right.
    pub fn ones(&self) -> impl Iterator<Item = usize> + '_ {
        self.bits
            .iter()
            .enumerate()
            .filter_map(|(i, b)| b.then_some(i))
    }

    /// `self AND NOT other == 0`.
    pub fn is_subset_of(&self, other: &AttributeBitmap) -> Result<bool> {
        if self.width() != other.width() {
            return Err(PolicyError::WidthMismatch {
                expected: other.width(),
                actual: self.width(),
            });
        }
        Ok(self
            .bits
            .iter()
            .zip(&other.bits)
            .all(|(mine, theirs)| !*mine || *theirs))
    }
}

impl FromStr for AttributeBitmap {
    type Err = PolicyError;

    fn from_str(s: &str) -> Result<Self> {
        if s.is_empty() {
            return Err(PolicyError::invalid_bitmap(s, "bitmap is empty"));
        }
        let bits = s
            .chars()
            .map(|c| match c {
                '0' => Ok(false),
                '1' => Ok(true),
                other => Err(PolicyError::invalid_bitmap(
                    s,
                    format!("unexpected character '{other}'"),
                )),
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { bits })
    }
}

impl TryFrom<String> for AttributeBitmap {
    type Error = PolicyError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<AttributeBitmap> for String {
    fn from(bitmap: AttributeBitmap) -> Self {
        bitmap.to_string()
    }
}

impl fmt::Display for AttributeBitmap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bit in &self.bits {
            f.write_str(if *bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}
