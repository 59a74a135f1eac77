// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The seam finder interface.

/// This trait defines how we will return seams from an image.  It's a
/// primitive interface, just enough to make room for multiple seam
/// carvers.  Finding a seam may refresh cached state, hence `&mut`.
pub trait SeamFinder {
    /// Request a horizontal seam: one row index per column.
    fn find_horizontal_seam(&mut self) -> Vec<u32>;

    /// Request a vertical seam: one column index per row.
    fn find_vertical_seam(&mut self) -> Vec<u32>;
}
