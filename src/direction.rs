// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Seam direction

//! Every seam calculation is written once, against "sweep"
//! coordinates `(i, j)`: `i` walks the axis the seam crosses one step
//! at a time, `j` is the position along the other axis.  A vertical
//! seam sweeps the rows, so `(i, j)` is `(y, x)`; a horizontal seam
//! sweeps the columns, so `(i, j)` is `(x, y)`.  This is the image
//! "flipped" 90° without ever copying it.

/// Which way a seam runs through the image.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum Direction {
    /// Top to bottom, one column index per row.
    Vertical,
    /// Left to right, one row index per column.
    Horizontal,
}

impl Direction {
    /// The other direction.
    pub fn turn(self) -> Self {
        match self {
            Direction::Vertical => Direction::Horizontal,
            Direction::Horizontal => Direction::Vertical,
        }
    }

    /// Given the image's (width, height), the (sweep length, span)
    /// pair: how many entries a seam has, and how far each entry may
    /// range.
    pub fn bounds(self, (width, height): (u32, u32)) -> (u32, u32) {
        match self {
            Direction::Vertical => (height, width),
            Direction::Horizontal => (width, height),
        }
    }

    /// Map a sweep coordinate to an image `(x, y)`.
    #[inline]
    pub fn to_image(self, i: u32, j: u32) -> (u32, u32) {
        match self {
            Direction::Vertical => (j, i),
            Direction::Horizontal => (i, j),
        }
    }
}
