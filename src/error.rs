// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Errors reported by the carver.  Every one of them is a caller
//! error, detected before anything is modified.

use crate::direction::Direction;
use failure::Fail;

/// Everything that can go wrong when talking to a `SeamCarver`.
#[derive(Debug, Fail, PartialEq, Eq, Clone)]
pub enum SeamError {
    /// An energy query outside the current image.
    #[fail(
        display = "pixel ({}, {}) is outside the {}x{} image",
        x, y, width, height
    )]
    OutOfBounds {
        /// Requested column.
        x: u32,
        /// Requested row.
        y: u32,
        /// Current width.
        width: u32,
        /// Current height.
        height: u32,
    },

    /// A seam with the wrong number of entries for its direction.
    #[fail(display = "seam has {} entries, expected {}", found, expected)]
    SeamLength {
        /// Entries the seam needs: the image height for a vertical
        /// seam, the width for a horizontal one.
        expected: usize,
        /// Entries the seam had.
        found: usize,
    },

    /// A seam entry that points off the image.
    #[fail(
        display = "seam entry {} is {}, which is outside 0..{}",
        position, value, bound
    )]
    SeamIndex {
        /// Index into the seam.
        position: usize,
        /// The offending entry.
        value: u32,
        /// Exclusive upper bound for entries.
        bound: u32,
    },

    /// Two adjacent seam entries more than one pixel apart.
    #[fail(
        display = "seam jumps from {} to {} at entry {}",
        from, to, position
    )]
    SeamStep {
        /// Index of the second entry of the pair.
        position: usize,
        /// The entry before the jump.
        from: u32,
        /// The entry after the jump.
        to: u32,
    },

    /// An image with nothing in it cannot be carved.
    #[fail(display = "cannot carve an empty {}x{} image", width, height)]
    EmptyImage {
        /// Width supplied.
        width: u32,
        /// Height supplied.
        height: u32,
    },

    /// Removing another seam in this direction would empty the image.
    #[fail(display = "image is too small to lose a {:?} seam", direction)]
    ImageTooSmall {
        /// The direction of the refused seam.
        direction: Direction,
    },
}

/// Shorthand for results carrying a `SeamError`.
pub type Result<T> = std::result::Result<T, SeamError>;
