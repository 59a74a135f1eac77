// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The accumulated energy map
//!
//! For a given direction, the cell at sweep coordinate `(i, j)` holds
//! the cheapest total energy of any seam running from sweep row 0 down
//! to it, and the step (-1, 0 or +1 along `j`) that seam took out of
//! row `i - 1`.  The map is stored sweep-major (`j` across, `i` down)
//! for both directions, so removing or inserting a seam always means
//! closing or opening one cell per row.
//!
//! Keeping the back pointer *relative* is what lets a row be shifted
//! wholesale: every cell that moves keeps pointing at the same
//! neighbour.  After a shift, only the cells near the seam can be
//! wrong, and `recompute` repairs exactly those.
//!
//! The recurrence, with missing neighbours at +∞:
//!
//! ```text
//!                       ⎧ M(i−1, j−1)
//! M(i,j) = e(i,j) + min ⎨ M(i−1, j)
//!                       ⎩ M(i−1, j+1)
//! ```
//!
//! Ties go left, then straight, then right.

use crate::direction::Direction;
use crate::energy::{sweep_energy, PixelMap};
use crate::twodmap::TwoDimensionalMap;
use itertools::iproduct;
use std::cmp::{max, min};
use tracing::{debug, trace};

/// One cell of the accumulated map.
#[derive(Default, Debug, Copy, Clone, PartialEq)]
pub(crate) struct EnergyAndBackPointer {
    pub energy: f64,
    pub parent: i8,
}

/// The accumulated energy map for one direction.
#[derive(Debug, Clone)]
pub(crate) struct AccumulatedEnergy {
    direction: Direction,
    cells: TwoDimensionalMap<EnergyAndBackPointer>,
}

impl AccumulatedEnergy {
    /// Build the whole map from scratch.
    pub fn build(pixels: &PixelMap, direction: Direction) -> Self {
        let (sweep, span) = direction.bounds((pixels.width(), pixels.height()));
        debug!(?direction, sweep, span, "rebuilding accumulated energy");
        let mut map = AccumulatedEnergy {
            direction,
            cells: TwoDimensionalMap::new(span, sweep, EnergyAndBackPointer::default()),
        };
        for (i, j) in iproduct!(1..sweep, 0..span) {
            map.cells[(j, i)] = map.relax(pixels, i, j);
        }
        map
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    // The cost of reaching (i, j), given that row i - 1 is correct.
    fn relax(&self, pixels: &PixelMap, i: u32, j: u32) -> EnergyAndBackPointer {
        let here = sweep_energy(pixels, self.direction, i, j);
        let above = i - 1;
        let left = if j > 0 {
            here + self.cells[(j - 1, above)].energy
        } else {
            f64::INFINITY
        };
        let straight = here + self.cells[(j, above)].energy;
        let right = if j + 1 < self.cells.width() {
            here + self.cells[(j + 1, above)].energy
        } else {
            f64::INFINITY
        };

        let (energy, parent) = if left <= straight && left <= right {
            (left, -1)
        } else if straight <= left && straight <= right {
            (straight, 0)
        } else {
            (right, 1)
        };
        EnergyAndBackPointer { energy, parent }
    }

    /// The cheapest seam: the first minimum of the last row, walked
    /// back up through the parents.
    pub fn seam(&self) -> Vec<u32> {
        let (span, sweep) = (self.cells.width(), self.cells.height());
        let last = sweep - 1;

        let mut seam_col = 0;
        for j in 1..span {
            if self.cells[(j, last)].energy < self.cells[(seam_col, last)].energy {
                seam_col = j;
            }
        }

        // Working backwards, generate a vec of coordinates that map to
        // the seam, reverse and return.
        (0..sweep)
            .rev()
            .fold(Vec::<u32>::with_capacity(sweep as usize), |mut acc, i| {
                acc.push(seam_col);
                seam_col = step(seam_col, self.cells[(seam_col, i)].parent);
                acc
            })
            .into_iter()
            .rev()
            .collect()
    }

    /// Bring the map up to date after `seam` has been removed from
    /// `pixels`.
    pub fn remove_seam(&mut self, pixels: &PixelMap, seam: &[u32]) {
        self.cells.remove_column_path(seam);
        self.recompute(pixels, seam);
    }

    /// Bring the map up to date after `seam` has been inserted into
    /// `pixels`.
    pub fn insert_seam(&mut self, pixels: &PixelMap, seam: &[u32]) {
        let blank = vec![EnergyAndBackPointer::default(); seam.len()];
        self.cells.insert_column_path(seam, &blank);
        self.recompute(pixels, seam);
    }

    // After a shift, a cell's value can only differ from the one now
    // stored in its place if its own energy changed (within one step
    // of the seam), if its three parents straddle the seam in the row
    // above, or if one of those parents changed.  So each row is
    // recomputed over the window of changed columns of the row above,
    // widened by two on either side, and rows below a window that
    // stopped changing are never looked at.
    fn recompute(&mut self, pixels: &PixelMap, seam: &[u32]) {
        let (span, sweep) = (self.cells.width(), self.cells.height());
        let last = span - 1;
        let (mut lo, mut hi) = (seam[0], seam[0]);
        let mut touched = 0usize;

        for i in 1..sweep {
            let from = lo.saturating_sub(2);
            let to = min(hi.saturating_add(2), last);
            let (mut next_lo, mut next_hi) = (seam[i as usize], seam[i as usize]);
            for j in from..=to {
                let fresh = self.relax(pixels, i, j);
                touched += 1;
                if fresh != self.cells[(j, i)] {
                    self.cells[(j, i)] = fresh;
                    next_lo = min(next_lo, j);
                    next_hi = max(next_hi, j);
                }
            }
            lo = next_lo;
            hi = next_hi;
        }
        trace!(direction = ?self.direction, touched, "incremental recompute");
    }
}

// Follow a back pointer.  Row 0 points straight up, so the walk
// never leaves the map.
fn step(j: u32, parent: i8) -> u32 {
    match parent {
        -1 => j - 1,
        1 => j + 1,
        _ => j,
    }
}
