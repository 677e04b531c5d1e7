//! Partition naming
//!
//! A partition (graph) is addressed by a zero-based index in `[0, count)`.
//! Its name is the binary form of `index + 1`, left-padded with zeros to the
//! number of binary digits in `count`. Names are therefore fixed-width and
//! never all-zero: the all-zero bitmap stays reserved for "no attributes".
//!
//! | count | index | name  |
//! |-------|-------|-------|
//! | 2     | 0     | `01`  |
//! | 2     | 1     | `10`  |
//! | 7     | 6     | `111` |

use crate::error::{Error, Result};

/// Number of binary digits needed to represent `n`.
///
/// `bit_length(0)` is defined as 1 so that a zero count still renders a
/// single digit; callers validate `count >= 1` before naming.
#[inline]
pub fn bit_length(n: usize) -> usize {
    if n == 0 {
        1
    } else {
        (usize::BITS - n.leading_zeros()) as usize
    }
}

/// Render the canonical graph name for partition `index` out of `count`.
pub fn render_name(index: usize, count: usize) -> Result<String> {
    if count < 1 || index >= count {
        return Err(Error::invalid_index(index, count));
    }
    Ok(format!("{:0width$b}", index + 1, width = bit_length(count)))
}

/// Decode a graph name back to its zero-based partition index.
///
/// Inverse of [`render_name`]: the name must have exactly
/// `bit_length(count)` binary digits and encode a value in `1..=count`.
pub fn parse_name(name: &str, count: usize) -> Result<usize> {
    if count < 1 {
        return Err(Error::invalid_index(0, count));
    }
    let width = bit_length(count);
    if name.len() != width {
        return Err(Error::invalid_name(
            name,
            format!("expected {width} binary digits"),
        ));
    }
    if !name.bytes().all(|b| b == b'0' || b == b'1') {
        return Err(Error::invalid_name(name, "not a binary string"));
    }
    let value = usize::from_str_radix(name, 2)
        .map_err(|e| Error::invalid_name(name, e.to_string()))?;
    match value {
        0 => Err(Error::invalid_name(name, "all-zero name is reserved")),
        v if v > count => Err(Error::invalid_name(
            name,
            format!("exceeds partition count {count}"),
        )),
        v => Ok(v - 1),
    }
}

/// All graph names for `count` partitions, in index order.
pub fn partition_names(count: usize) -> Result<Vec<String>> {
    if count < 1 {
        return Err(Error::invalid_index(0, count));
    }
    (0..count).map(|i| render_name(i, count)).collect()
}
