// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Seamcarver - The engine
//!
//! The carver owns a copy of the image and, once a seam has been asked
//! for, the accumulated energy map for the direction last used.  Seam
//! removals and insertions in that same direction patch the map in
//! place; switching direction throws it away and builds a new one.
//!
//! Nothing here is synchronized: every operation takes `&mut self` and
//! runs to completion.

use crate::direction::Direction;
use crate::energy::{checked_energy, pixel_energy, PixelMap};
use crate::energymap::AccumulatedEnergy;
use crate::error::{Result, SeamError};
use crate::pixelpairs::blend;
use crate::seamfinder::SeamFinder;
use image::{DynamicImage, GenericImageView, Rgb, RgbImage};
use std::cmp::min;
use tracing::debug;

/// How `carve` interleaves width and height changes when both are
/// needed.
#[derive(Debug, Default, PartialEq, Eq, Copy, Clone)]
pub enum CarveOrder {
    /// One vertical seam, then one horizontal seam, and so on, until
    /// one of the two dimensions is done.
    #[default]
    Alternate,
    /// Every vertical seam first.
    WidthFirst,
    /// Every horizontal seam first.
    HeightFirst,
}

/// Tunables for a `SeamCarver`.
#[derive(Debug, Default, PartialEq, Eq, Copy, Clone)]
pub struct CarveOptions {
    /// Interleaving used by `carve`.
    pub order: CarveOrder,
}

/// A seam carving engine holding the image being carved.
#[derive(Debug, Clone)]
pub struct SeamCarver {
    pixels: PixelMap,
    cache: Option<AccumulatedEnergy>,
    options: CarveOptions,
}

impl SeamCarver {
    /// Creates a new SeamCarver with a copy of the image to be carved.
    pub fn new<I>(image: &I) -> Result<Self>
    where
        I: GenericImageView<Pixel = Rgb<u8>>,
    {
        Self::with_options(image, CarveOptions::default())
    }

    /// Creates a new SeamCarver with explicit options.
    pub fn with_options<I>(image: &I, options: CarveOptions) -> Result<Self>
    where
        I: GenericImageView<Pixel = Rgb<u8>>,
    {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(SeamError::EmptyImage { width, height });
        }
        Ok(SeamCarver {
            pixels: PixelMap::from_fn(width, height, |x, y| image.get_pixel(x, y)),
            cache: None,
            options,
        })
    }

    /// Creates a new SeamCarver from any decoded image, converting it
    /// to 8-bit RGB.
    pub fn from_dynamic(image: &DynamicImage) -> Result<Self> {
        Self::new(&image.to_rgb8())
    }

    /// Width of the current picture.
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    /// Height of the current picture.
    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Energy of the pixel at column `x` and row `y`.
    pub fn energy(&self, x: u32, y: u32) -> Result<f64> {
        checked_energy(&self.pixels, x, y)
    }

    /// A copy of the current picture.
    pub fn current_image(&self) -> RgbImage {
        RgbImage::from_fn(self.width(), self.height(), |x, y| self.pixels[(x, y)])
    }

    /// Remove a vertical seam, one column index per row.
    pub fn remove_vertical_seam(&mut self, seam: &[u32]) -> Result<()> {
        self.remove_seam(seam, Direction::Vertical)
    }

    /// Remove a horizontal seam, one row index per column.
    pub fn remove_horizontal_seam(&mut self, seam: &[u32]) -> Result<()> {
        self.remove_seam(seam, Direction::Horizontal)
    }

    /// Insert a vertical seam, one column index per row.  The new
    /// pixels go in at the given columns, pushing the rest right.
    pub fn insert_vertical_seam(&mut self, seam: &[u32]) -> Result<()> {
        self.insert_seam(seam, Direction::Vertical)
    }

    /// Insert a horizontal seam, one row index per column.  The new
    /// pixels go in at the given rows, pushing the rest down.
    pub fn insert_horizontal_seam(&mut self, seam: &[u32]) -> Result<()> {
        self.insert_seam(seam, Direction::Horizontal)
    }

    /// Given a desired new width and height, repeatedly remove or
    /// insert seams until the picture has that size, and return it.
    ///
    /// Shrinking removes the cheapest seam each time.  Growing inserts
    /// a run of seams planned together (see `plan_insertions`), so
    /// that the new pixels are spread over the picture rather than
    /// piled up at the one cheapest spot.  A run only lasts while
    /// nothing happens along the other axis.
    pub fn carve(&mut self, new_width: u32, new_height: u32) -> Result<RgbImage> {
        if new_width == 0 || new_height == 0 {
            return Err(SeamError::EmptyImage {
                width: new_width,
                height: new_height,
            });
        }
        let mut next = Direction::Vertical;
        let mut planned: Vec<Vec<u32>> = Vec::new();
        let mut planned_for = None;
        loop {
            let direction = match (self.width() != new_width, self.height() != new_height) {
                (false, false) => break,
                (true, false) => Direction::Vertical,
                (false, true) => Direction::Horizontal,
                (true, true) => match self.options.order {
                    CarveOrder::WidthFirst => Direction::Vertical,
                    CarveOrder::HeightFirst => Direction::Horizontal,
                    CarveOrder::Alternate => {
                        let direction = next;
                        next = next.turn();
                        direction
                    }
                },
            };
            if planned_for != Some(direction) {
                planned.clear();
            }
            let (current, target) = match direction {
                Direction::Vertical => (self.width(), new_width),
                Direction::Horizontal => (self.height(), new_height),
            };
            let grow = current < target;
            if grow {
                if planned.is_empty() {
                    planned = self.plan_insertions(direction, target - current)?;
                    planned.reverse();
                    planned_for = Some(direction);
                }
                if let Some(seam) = planned.pop() {
                    self.insert_planned(&seam, direction)?;
                }
            } else {
                planned_for = None;
                let seam = self.seam(direction);
                self.remove_seam(&seam, direction)?;
            }
            debug!(
                ?direction,
                grow,
                width = self.width(),
                height = self.height(),
                "carved one seam"
            );
        }
        Ok(self.current_image())
    }

    // The accumulated map for `direction`, built if there is none or
    // if the one we have is for the other direction.
    fn accumulated(&mut self, direction: Direction) -> &AccumulatedEnergy {
        if !self.is_cached(direction) {
            self.cache = None;
        }
        let pixels = &self.pixels;
        self.cache
            .get_or_insert_with(|| AccumulatedEnergy::build(pixels, direction))
    }

    fn seam(&mut self, direction: Direction) -> Vec<u32> {
        self.accumulated(direction).seam()
    }

    fn is_cached(&self, direction: Direction) -> bool {
        self.cache.as_ref().map(AccumulatedEnergy::direction) == Some(direction)
    }

    // Length first, then range, then continuity.  Nothing is touched
    // until all three pass.
    fn validate(&self, seam: &[u32], direction: Direction) -> Result<()> {
        self.check_bounds(seam, direction)?;
        if let Some((position, pair)) = seam
            .windows(2)
            .enumerate()
            .find(|(_, pair)| pair[0].max(pair[1]) - pair[0].min(pair[1]) > 1)
        {
            return Err(SeamError::SeamStep {
                position: position + 1,
                from: pair[0],
                to: pair[1],
            });
        }
        Ok(())
    }

    fn check_bounds(&self, seam: &[u32], direction: Direction) -> Result<()> {
        let (sweep, span) = direction.bounds((self.width(), self.height()));
        if seam.len() != sweep as usize {
            return Err(SeamError::SeamLength {
                expected: sweep as usize,
                found: seam.len(),
            });
        }
        if let Some((position, &value)) = seam.iter().enumerate().find(|&(_, &v)| v >= span) {
            return Err(SeamError::SeamIndex {
                position,
                value,
                bound: span,
            });
        }
        Ok(())
    }

    fn remove_seam(&mut self, seam: &[u32], direction: Direction) -> Result<()> {
        self.validate(seam, direction)?;
        let (_, span) = direction.bounds((self.width(), self.height()));
        if span == 1 {
            return Err(SeamError::ImageTooSmall { direction });
        }

        match direction {
            Direction::Vertical => self.pixels.remove_column_path(seam),
            Direction::Horizontal => self.pixels.remove_row_path(seam),
        }
        match self.cache.as_mut() {
            Some(cache) if cache.direction() == direction => cache.remove_seam(&self.pixels, seam),
            _ => self.cache = Some(AccumulatedEnergy::build(&self.pixels, direction)),
        }
        Ok(())
    }

    fn insert_seam(&mut self, seam: &[u32], direction: Direction) -> Result<()> {
        self.validate(seam, direction)?;
        self.open_seam(seam, direction);
        match self.cache.as_mut() {
            Some(cache) if cache.direction() == direction => cache.insert_seam(&self.pixels, seam),
            _ => self.cache = Some(AccumulatedEnergy::build(&self.pixels, direction)),
        }
        Ok(())
    }

    // Planned seams are one index per sweep row and in range, but once
    // mapped back onto the picture they can step more than one column
    // between rows, which the incremental repair does not handle.  The
    // map is dropped instead and rebuilt when next asked for.
    fn insert_planned(&mut self, seam: &[u32], direction: Direction) -> Result<()> {
        self.check_bounds(seam, direction)?;
        self.open_seam(seam, direction);
        self.cache = None;
        Ok(())
    }

    fn open_seam(&mut self, seam: &[u32], direction: Direction) {
        let fill = self.synthesize(seam, direction);
        match direction {
            Direction::Vertical => self.pixels.insert_column_path(seam, &fill),
            Direction::Horizontal => self.pixels.insert_row_path(seam, &fill),
        }
    }

    // Up to `count` seams to insert one after another.  They are the
    // seams that would be removed, one after another, from a scratch
    // copy, so no two of them pick the same pixel of the current
    // picture.  Each is mapped back onto the current picture by
    // undoing the removals before it, then pushed along by the
    // insertions before it.  A picture one pixel across has only the
    // one seam.
    fn plan_insertions(&mut self, direction: Direction, count: u32) -> Result<Vec<Vec<u32>>> {
        let (_, span) = direction.bounds((self.width(), self.height()));
        if span == 1 {
            return Ok(vec![self.seam(direction)]);
        }

        let mut scratch = self.clone();
        let mut removed: Vec<Vec<u32>> = Vec::new();
        for _ in 0..min(count, span - 1) {
            let seam = scratch.seam(direction);
            scratch.remove_seam(&seam, direction)?;
            removed.push(seam);
        }

        let mut planned: Vec<Vec<u32>> = removed
            .iter()
            .enumerate()
            .map(|(k, seam)| {
                let mut seam = seam.clone();
                for gap in removed[..k].iter().rev() {
                    for (j, &g) in seam.iter_mut().zip(gap) {
                        if *j >= g {
                            *j += 1;
                        }
                    }
                }
                seam
            })
            .collect();
        for k in 1..planned.len() {
            let (before, after) = planned.split_at_mut(k);
            let inserted = &before[k - 1];
            for later in after {
                for (j, &at) in later.iter_mut().zip(inserted) {
                    if *j >= at {
                        *j += 1;
                    }
                }
            }
        }
        debug!(?direction, planned = planned.len(), "planned seam insertions");
        Ok(planned)
    }

    // The colors for a seam about to be inserted, taken from the
    // picture as it is now.  The two ends copy the pixel they're
    // inserted next to.  In between, each new pixel looks at the seam
    // pixel it's inserted next to and at the seam pixels one sweep row
    // before and after: if both of those have lower energy, it's their
    // blend; if one does, it's a copy of that one; otherwise it's a
    // copy of its own neighbour.
    fn synthesize(&self, seam: &[u32], direction: Direction) -> Vec<Rgb<u8>> {
        let at = |i: usize| direction.to_image(i as u32, seam[i]);
        let energy = |(x, y): (u32, u32)| pixel_energy(&self.pixels, x, y);
        let last = seam.len() - 1;

        (0..seam.len())
            .map(|i| {
                let here = at(i);
                if i == 0 || i == last {
                    return self.pixels[here];
                }
                let (before, after) = (at(i - 1), at(i + 1));
                let threshold = energy(here);
                match (energy(before) < threshold, energy(after) < threshold) {
                    (true, true) => blend(&self.pixels[before], &self.pixels[after]),
                    (true, false) => self.pixels[before],
                    (false, true) => self.pixels[after],
                    (false, false) => self.pixels[here],
                }
            })
            .collect()
    }
}

impl SeamFinder for SeamCarver {
    fn find_horizontal_seam(&mut self) -> Vec<u32> {
        self.seam(Direction::Horizontal)
    }

    fn find_vertical_seam(&mut self) -> Vec<u32> {
        self.seam(Direction::Vertical)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DARK: Rgb<u8> = Rgb([10, 10, 10]);
    const BRIGHT: Rgb<u8> = Rgb([250, 250, 250]);

    fn striped(width: u32, height: u32) -> SeamCarver {
        let image = RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x * 37 % 256) as u8, (y * 59 % 256) as u8, ((x + y) * 13 % 256) as u8])
        });
        SeamCarver::new(&image).expect("non-empty image")
    }

    #[test]
    fn cache_is_built_lazily() {
        let mut carver = striped(6, 5);
        assert!(carver.cache.is_none());
        carver.find_vertical_seam();
        assert!(carver.is_cached(Direction::Vertical));
        carver.find_horizontal_seam();
        assert!(carver.is_cached(Direction::Horizontal));
    }

    #[test]
    fn removal_pins_the_cached_direction() {
        let mut carver = striped(6, 5);
        carver.find_horizontal_seam();
        carver.remove_vertical_seam(&[2, 2, 3, 3, 2]).expect("valid seam");
        assert!(carver.is_cached(Direction::Vertical));
        assert_eq!(carver.width(), 5);
    }

    #[test]
    fn failed_removal_leaves_everything_alone() {
        let mut carver = striped(6, 5);
        let seam = carver.find_vertical_seam();
        let before = carver.current_image();
        let result = carver.remove_vertical_seam(&seam[1..]);
        assert_eq!(
            result,
            Err(SeamError::SeamLength {
                expected: 5,
                found: 4
            })
        );
        assert_eq!(carver.current_image(), before);
        assert!(carver.is_cached(Direction::Vertical));
        assert_eq!(carver.find_vertical_seam(), seam);
    }

    #[test]
    fn malformed_seams_are_refused() {
        let mut carver = striped(6, 5);
        let seam = carver.find_vertical_seam();
        let before = carver.current_image();
        assert_eq!(
            carver.remove_vertical_seam(&[0, 1, 6, 5, 4]),
            Err(SeamError::SeamIndex {
                position: 2,
                value: 6,
                bound: 6
            })
        );
        assert_eq!(
            carver.insert_vertical_seam(&[0, 1, 3, 3, 3]),
            Err(SeamError::SeamStep {
                position: 2,
                from: 1,
                to: 3
            })
        );
        assert_eq!(
            carver.insert_vertical_seam(&[0, 1, 2]),
            Err(SeamError::SeamLength {
                expected: 5,
                found: 3
            })
        );
        assert_eq!(carver.current_image(), before);
        assert!(carver.is_cached(Direction::Vertical));
        assert_eq!(carver.find_vertical_seam(), seam);
    }

    #[test]
    fn cannot_remove_the_last_column() {
        let image = RgbImage::from_pixel(1, 3, DARK);
        let mut carver = SeamCarver::new(&image).expect("non-empty image");
        assert_eq!(
            carver.remove_vertical_seam(&[0, 0, 0]),
            Err(SeamError::ImageTooSmall {
                direction: Direction::Vertical
            })
        );
        assert_eq!(carver.width(), 1);
    }

    #[test]
    fn inserted_pixels_blend_lower_energy_neighbours() {
        // (2, 2) sits between a dark and a bright pixel and is far more
        // expensive than the seam pixels above and below it.
        let mut image = RgbImage::from_pixel(5, 5, DARK);
        image.put_pixel(3, 2, BRIGHT);
        image.put_pixel(2, 3, Rgb([20, 20, 20]));
        let mut carver = SeamCarver::new(&image).expect("non-empty image");
        assert_eq!(carver.energy(2, 2), Ok(172_800.0 + 300.0));
        assert_eq!(carver.energy(2, 1), Ok(0.0));
        assert_eq!(carver.energy(2, 3), Ok(0.0));

        carver.insert_vertical_seam(&[2, 2, 2, 2, 2]).expect("valid seam");
        let out = carver.current_image();
        assert_eq!(out.dimensions(), (6, 5));
        assert_eq!(*out.get_pixel(2, 2), Rgb([15, 15, 15]));
        assert_eq!(*out.get_pixel(3, 2), DARK);
        assert_eq!(*out.get_pixel(4, 2), BRIGHT);
        // Nothing cheaper around the rows above and below: plain copies.
        assert_eq!(*out.get_pixel(2, 1), DARK);
        assert_eq!(*out.get_pixel(2, 3), Rgb([20, 20, 20]));
        assert_eq!(*out.get_pixel(3, 3), Rgb([20, 20, 20]));
        // The ends copy the pixel they were inserted beside.
        assert_eq!(*out.get_pixel(2, 0), DARK);
        assert_eq!(*out.get_pixel(2, 4), DARK);
    }

    #[test]
    fn inserted_rows_blend_lower_energy_neighbours() {
        // The same picture turned on its side: (2, 2) sits between a
        // dark pixel above and a bright one below.
        let mut image = RgbImage::from_pixel(5, 5, DARK);
        image.put_pixel(2, 3, BRIGHT);
        image.put_pixel(3, 2, Rgb([20, 20, 20]));
        let mut carver = SeamCarver::new(&image).expect("non-empty image");
        assert_eq!(carver.energy(2, 2), Ok(172_800.0 + 300.0));
        assert_eq!(carver.energy(1, 2), Ok(0.0));
        assert_eq!(carver.energy(3, 2), Ok(0.0));

        carver.insert_horizontal_seam(&[2, 2, 2, 2, 2]).expect("valid seam");
        let out = carver.current_image();
        assert_eq!(out.dimensions(), (5, 6));
        assert_eq!(*out.get_pixel(2, 2), Rgb([15, 15, 15]));
        assert_eq!(*out.get_pixel(2, 3), DARK);
        assert_eq!(*out.get_pixel(2, 4), BRIGHT);
        assert_eq!(*out.get_pixel(1, 2), DARK);
        assert_eq!(*out.get_pixel(3, 2), Rgb([20, 20, 20]));
        assert_eq!(*out.get_pixel(3, 3), Rgb([20, 20, 20]));
        assert_eq!(*out.get_pixel(0, 2), DARK);
        assert_eq!(*out.get_pixel(4, 2), DARK);
        assert!(carver.is_cached(Direction::Horizontal));
    }

    #[test]
    fn planned_insertions_pick_distinct_pixels() {
        let mut carver = striped(12, 6);
        let cheapest = carver.find_vertical_seam();
        let planned = carver
            .plan_insertions(Direction::Vertical, 4)
            .expect("plannable");
        assert_eq!(planned.len(), 4);
        assert_eq!(planned[0], cheapest);

        // Take back the shift each earlier insertion applies; what is
        // left are columns of the current picture, all different.
        for row in 0..6 {
            let mut columns: Vec<u32> = planned
                .iter()
                .enumerate()
                .map(|(k, seam)| {
                    planned[..k]
                        .iter()
                        .rev()
                        .fold(seam[row], |j, earlier| if j > earlier[row] { j - 1 } else { j })
                })
                .collect();
            assert!(columns.iter().all(|&j| j < 12));
            columns.sort();
            columns.dedup();
            assert_eq!(columns.len(), 4, "row {}", row);
        }
    }

    #[test]
    fn planning_is_capped_by_what_can_be_removed() {
        let mut carver = striped(4, 3);
        let planned = carver
            .plan_insertions(Direction::Vertical, 10)
            .expect("plannable");
        assert_eq!(planned.len(), 3);

        let mut thin = striped(1, 3);
        let planned = thin
            .plan_insertions(Direction::Vertical, 10)
            .expect("plannable");
        assert_eq!(planned, vec![vec![0, 0, 0]]);
    }

    #[test]
    fn carve_grows_across_a_flat_band() {
        // The flat band down the middle is the cheapest place to insert.
        let image = RgbImage::from_fn(12, 6, |x, y| {
            if x == 5 || x == 6 {
                DARK
            } else {
                Rgb([(x * 47 % 256) as u8, (y * 83 % 256) as u8, ((x * y) * 29 % 256) as u8])
            }
        });
        let mut carver = SeamCarver::new(&image).expect("non-empty image");
        let out = carver.carve(16, 6).expect("carvable");
        assert_eq!(out.dimensions(), (16, 6));
        let mut fresh = SeamCarver::new(&out).expect("non-empty image");
        assert_eq!(carver.find_vertical_seam(), fresh.find_vertical_seam());
    }

    #[test]
    fn carve_alternates_until_one_axis_is_done() {
        let mut carver = striped(9, 7);
        let out = carver.carve(6, 6).expect("carvable");
        assert_eq!(out.dimensions(), (6, 6));
        assert!(carver.is_cached(Direction::Vertical));
    }

    #[test]
    fn carve_can_grow_and_shrink_at_once() {
        let options = CarveOptions {
            order: CarveOrder::HeightFirst,
        };
        let image = striped(8, 8).current_image();
        let mut carver = SeamCarver::with_options(&image, options).expect("non-empty image");
        let out = carver.carve(11, 5).expect("carvable");
        assert_eq!(out.dimensions(), (11, 5));
        // Planned insertions leave the map to be rebuilt on demand.
        assert!(carver.cache.is_none());
        let mut fresh = SeamCarver::new(&out).expect("non-empty image");
        assert_eq!(carver.find_vertical_seam(), fresh.find_vertical_seam());
    }

    #[test]
    fn options_default_to_alternating() {
        assert_eq!(CarveOptions::default().order, CarveOrder::Alternate);
    }

    #[test]
    fn carve_refuses_an_empty_target() {
        let mut carver = striped(4, 4);
        assert_eq!(
            carver.carve(0, 2),
            Err(SeamError::EmptyImage {
                width: 0,
                height: 2
            })
        );
    }
}
