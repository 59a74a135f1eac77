// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Calculate the energy of a pixel
//!
//! The dual-gradient energy: the squared color distance between a
//! pixel's left and right neighbours, plus the same between its upper
//! and lower neighbours.  Pixels on the border have no neighbour on
//! one side and are pinned at the largest energy a pair of pixels can
//! have, so that seams don't run along the edge of the image for free.
//!
//! There are two ways in.  `pixel_energy` never fails: anything on
//! or past the border is border energy, which is what the seam
//! machinery wants when it looks around a window.  `checked_energy`
//! is what the outside world sees, and refuses coordinates that aren't
//! in the image.

use crate::direction::Direction;
use crate::error::{Result, SeamError};
use crate::pixelpairs::energy_of_pair;
use crate::twodmap::TwoDimensionalMap;
use image::Rgb;

/// The energy of every border pixel: 3 × 255².
pub const BORDER_ENERGY: f64 = 195_075.0;

/// The pixel store the carver works on.
pub type PixelMap = TwoDimensionalMap<Rgb<u8>>;

/// Energy of the pixel at `(x, y)`, with every coordinate on or
/// beyond the edge treated as border.
pub fn pixel_energy(pixels: &PixelMap, x: u32, y: u32) -> f64 {
    let (width, height) = (pixels.width(), pixels.height());
    if x == 0 || y == 0 || x + 1 >= width || y + 1 >= height {
        return BORDER_ENERGY;
    }
    energy_of_pair(&pixels[(x - 1, y)], &pixels[(x + 1, y)])
        + energy_of_pair(&pixels[(x, y - 1)], &pixels[(x, y + 1)])
}

/// Energy at a sweep coordinate.
#[inline]
pub fn sweep_energy(pixels: &PixelMap, direction: Direction, i: u32, j: u32) -> f64 {
    let (x, y) = direction.to_image(i, j);
    pixel_energy(pixels, x, y)
}

/// Energy of the pixel at `(x, y)`, which must be inside the image.
pub fn checked_energy(pixels: &PixelMap, x: u32, y: u32) -> Result<f64> {
    let (width, height) = (pixels.width(), pixels.height());
    if x >= width || y >= height {
        return Err(SeamError::OutOfBounds {
            x,
            y,
            width,
            height,
        });
    }
    Ok(pixel_energy(pixels, x, y))
}
