//! Edge fingerprints used to decide which tiles and patterns may touch
//!
//! A tile's fingerprint samples a few evenly spaced pixels along each edge,
//! renders them into one string per side and hashes each string. A pattern's
//! fingerprint concatenates the fingerprints of the tiles on each of its sides
//! and hashes again, so two blocks are compatible along an edge exactly when
//! their edge tiles are, regardless of what lies inside.

use crate::io::configuration::validate_edge_samples;
use crate::io::error::{Result, WfcError};
use crate::spatial::grid::Direction;
use crate::spatial::tiles::{PixelBlock, Rgba};
use std::fmt::{self, Write};

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Stable 64-bit FNV-1a hash of a string
///
/// Fingerprints must compare equal across runs and toolchains, which rules
/// out the randomly keyed standard hasher.
pub fn fingerprint(text: &str) -> u64 {
    text.bytes().fold(FNV_OFFSET_BASIS, |hash, byte| {
        (hash ^ u64::from(byte)).wrapping_mul(FNV_PRIME)
    })
}

/// Four-sided edge fingerprint
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EdgeSignature {
    /// Hash of the top edge
    pub top: u64,
    /// Hash of the right edge
    pub right: u64,
    /// Hash of the bottom edge
    pub bottom: u64,
    /// Hash of the left edge
    pub left: u64,
}

impl EdgeSignature {
    /// Fingerprint a pixel block
    ///
    /// Takes `samples` points per edge spaced `floor((dimension - 1) /
    /// (samples - 1))` apart, starting at the top-left corner of each edge.
    ///
    /// # Errors
    ///
    /// Returns an error if `samples` is below two or the block is empty
    pub fn from_pixels(block: &PixelBlock, samples: usize) -> Result<Self> {
        validate_edge_samples(samples)?;

        let (width, height) = (block.width(), block.height());
        if width == 0 || height == 0 {
            return Err(WfcError::InvalidSourceData {
                reason: "cannot fingerprint an empty pixel block".to_string(),
            });
        }

        let x_step = (width - 1) / (samples - 1);
        let y_step = (height - 1) / (samples - 1);

        let mut top = String::new();
        let mut right = String::new();
        let mut bottom = String::new();
        let mut left = String::new();

        for i in 0..samples {
            push_pixel(&mut top, block.get(i * x_step, 0));
            push_pixel(&mut right, block.get(width - 1, i * y_step));
            push_pixel(&mut bottom, block.get(i * x_step, height - 1));
            push_pixel(&mut left, block.get(0, i * y_step));
        }

        Ok(Self::from_edge_strings(&top, &right, &bottom, &left))
    }

    /// Hash four pre-built edge strings
    pub fn from_edge_strings(top: &str, right: &str, bottom: &str, left: &str) -> Self {
        Self {
            top: fingerprint(top),
            right: fingerprint(right),
            bottom: fingerprint(bottom),
            left: fingerprint(left),
        }
    }

    /// Component on the given side
    pub const fn edge(&self, direction: Direction) -> u64 {
        match direction {
            Direction::Up => self.top,
            Direction::Right => self.right,
            Direction::Down => self.bottom,
            Direction::Left => self.left,
        }
    }

    /// Whether `other`, placed in `direction` from `self`, may touch it
    pub const fn compatible(&self, other: &Self, direction: Direction) -> bool {
        self.edge(direction) == other.edge(direction.opposite())
    }
}

impl fmt::Display for EdgeSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{:016x} {:016x} {:016x} {:016x}]",
            self.top, self.right, self.bottom, self.left
        )
    }
}

fn push_pixel(edge: &mut String, pixel: Option<Rgba>) {
    // Sample points never leave the block, the fallback only keeps this total
    let [r, g, b, a] = pixel.unwrap_or_default();
    let _ = write!(edge, "RGBA({r}, {g}, {b}, {a})");
}
