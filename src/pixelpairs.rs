// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Calculate the energy of a pixel pair
//!
//! Given two pixels, the energy between them is the squared distance
//! between the colors that make them up:
//!
//! ```text
//! |Δ|² = (Δr)² + (Δg)² + (Δb)²
//! ```
//!
//! Also home to the blend used when a seam is inserted.

use image::Rgb;
use itertools::zip;
use num_traits::{cast, pow};

/// (Pixel, Pixel) -> Energy
///
/// Map the difference between each channel, square it, and sum.
#[inline]
pub fn energy_of_pair(p1: &Rgb<u8>, p2: &Rgb<u8>) -> f64 {
    zip(p1.0.iter(), p2.0.iter())
        .map(|(&c1, &c2)| pow(f64::from(c1) - f64::from(c2), 2))
        .sum()
}

/// The per-channel mean of two pixels, rounded down.
pub fn blend(p1: &Rgb<u8>, p2: &Rgb<u8>) -> Rgb<u8> {
    let mut out = [0u8; 3];
    for (o, (&c1, &c2)) in out.iter_mut().zip(zip(p1.0.iter(), p2.0.iter())) {
        let mean = (u16::from(c1) + u16::from(c2)) / 2;
        *o = cast::<u16, u8>(mean).unwrap_or(u8::MAX);
    }
    Rgb(out)
}
