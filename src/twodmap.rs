// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! A growable two-dimensional map
//!
//! The backing store for both the pixels being carved and the
//! accumulated energy grid.  The map separates its *logical* extent
//! (what the rest of the crate sees) from its *physical* capacity (how
//! much memory it holds), so that seams can be removed by closing up
//! rows and inserted by opening them up again, with the storage
//! doubling only when it runs out of room.

use itertools::iproduct;
use std::ops::{Index, IndexMut};
use tracing::trace;

/// An addressable two-dimensional field of `P`, addressed as `(x, y)`.
/// Cells beyond the logical width and height are scratch space and
/// hold whatever was last left there.
#[derive(Debug, Clone)]
pub struct TwoDimensionalMap<P: Copy> {
    width: u32,
    height: u32,
    stride: u32,
    rows: u32,
    data: Vec<P>,
}

impl<P: Copy> TwoDimensionalMap<P> {
    /// Define a new map with every cell set to `fill` and no spare
    /// capacity.
    pub fn new(width: u32, height: u32, fill: P) -> Self {
        TwoDimensionalMap {
            width,
            height,
            stride: width,
            rows: height,
            data: vec![fill; width as usize * height as usize],
        }
    }

    /// Define a new map, filling each cell from its address.
    pub fn from_fn<F>(width: u32, height: u32, mut f: F) -> Self
    where
        F: FnMut(u32, u32) -> P,
    {
        TwoDimensionalMap {
            width,
            height,
            stride: width,
            rows: height,
            data: iproduct!(0..height, 0..width)
                .map(|(y, x)| f(x, y))
                .collect(),
        }
    }

    /// Logical width.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Logical height.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Physical (columns, rows) held by the store.
    pub fn capacity(&self) -> (u32, u32) {
        (self.stride, self.rows)
    }

    // Keep the index math in one place.  The stride is the physical
    // width, not the logical one, so shrinking the logical width
    // never moves a row.
    fn get_index(&self, x: u32, y: u32) -> usize {
        debug_assert!(x < self.width && y < self.height);
        (y as usize) * (self.stride as usize) + (x as usize)
    }

    /// The logical portion of row `y`.
    pub fn row(&self, y: u32) -> &[P] {
        let start = y as usize * self.stride as usize;
        &self.data[start..start + self.width as usize]
    }

    fn row_span_mut(&mut self, y: u32, len: u32) -> &mut [P] {
        let start = y as usize * self.stride as usize;
        &mut self.data[start..start + len as usize]
    }

    /// Close up one cell per row: for every row `y`, the cell at
    /// `path[y]` is overwritten by its right-hand neighbours, and the
    /// logical width drops by one.
    pub fn remove_column_path(&mut self, path: &[u32]) {
        debug_assert_eq!(path.len(), self.height as usize);
        let width = self.width;
        for (y, &x) in path.iter().enumerate() {
            let row = self.row_span_mut(y as u32, width);
            row.copy_within(x as usize + 1.., x as usize);
        }
        self.width -= 1;
    }

    /// Close up one cell per column: for every column `x`, the cell at
    /// `path[x]` is overwritten by the cells below it, and the logical
    /// height drops by one.
    pub fn remove_row_path(&mut self, path: &[u32]) {
        debug_assert_eq!(path.len(), self.width as usize);
        let last = self.height - 1;
        for (x, &y) in path.iter().enumerate() {
            let x = x as u32;
            for y in y..last {
                let below = self.data[self.get_index(x, y + 1)];
                let index = self.get_index(x, y);
                self.data[index] = below;
            }
        }
        self.height -= 1;
    }

    /// Open up one cell per row: for every row `y`, the cells from
    /// `path[y]` rightwards move one step right, and `values[y]` goes
    /// into the gap.
    pub fn insert_column_path(&mut self, path: &[u32], values: &[P]) {
        debug_assert_eq!(path.len(), self.height as usize);
        debug_assert_eq!(values.len(), path.len());
        if self.width == self.stride {
            self.make_room(grown(self.stride), self.rows, values.first());
        }
        let width = self.width;
        for (y, (&x, &value)) in path.iter().zip(values).enumerate() {
            let row = self.row_span_mut(y as u32, width + 1);
            row.copy_within(x as usize..width as usize, x as usize + 1);
            row[x as usize] = value;
        }
        self.width += 1;
    }

    /// Open up one cell per column: for every column `x`, the cells
    /// from `path[x]` downwards move one step down, and `values[x]`
    /// goes into the gap.
    pub fn insert_row_path(&mut self, path: &[u32], values: &[P]) {
        debug_assert_eq!(path.len(), self.width as usize);
        debug_assert_eq!(values.len(), path.len());
        if self.height == self.rows {
            self.make_room(self.stride, grown(self.rows), values.first());
        }
        self.height += 1;
        let last = self.height - 1;
        for (x, (&y, &value)) in path.iter().zip(values).enumerate() {
            let x = x as u32;
            for y in (y..last).rev() {
                let above = self.data[self.get_index(x, y)];
                let index = self.get_index(x, y + 1);
                self.data[index] = above;
            }
            let index = self.get_index(x, y);
            self.data[index] = value;
        }
    }

    // An empty path means the map has no logical cells along it, so
    // there is nothing to carry across and nothing to pad with.
    fn make_room(&mut self, stride: u32, rows: u32, pad: Option<&P>) {
        match pad {
            Some(&pad) => self.reserve(stride, rows, pad),
            None => {
                self.stride = stride;
                self.rows = rows;
            }
        }
    }

    // Reallocate to a physical size of `stride` x `rows`, carrying the
    // logical contents across.  Scratch cells are set to `pad`.
    fn reserve(&mut self, stride: u32, rows: u32, pad: P) {
        trace!(
            from = ?(self.stride, self.rows),
            to = ?(stride, rows),
            "growing map storage"
        );
        let size = stride as usize * rows as usize;
        if stride == self.stride {
            self.data.resize(size, pad);
            self.rows = rows;
            return;
        }
        let mut data = Vec::with_capacity(size);
        for y in 0..self.height {
            data.extend_from_slice(self.row(y));
            data.resize(data.len() + (stride - self.width) as usize, pad);
        }
        data.resize(size, pad);
        self.data = data;
        self.stride = stride;
        self.rows = rows;
    }
}

// Amortized doubling, starting from a single cell for empty axes.
fn grown(extent: u32) -> u32 {
    std::cmp::max(1, extent.saturating_mul(2))
}

impl<P: Copy> Index<(u32, u32)> for TwoDimensionalMap<P> {
    type Output = P;

    /// A convenience addressing mode for getting values.
    fn index(&self, (x, y): (u32, u32)) -> &P {
        let index = self.get_index(x, y);
        &self.data[index]
    }
}

impl<P: Copy> IndexMut<(u32, u32)> for TwoDimensionalMap<P> {
    /// A convenience addressing mode for setting values.
    fn index_mut(&mut self, (x, y): (u32, u32)) -> &mut P {
        let index = self.get_index(x, y);
        &mut self.data[index]
    }
}
