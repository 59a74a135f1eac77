// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Seam carving with an incrementally maintained energy map.
//!
//! A `SeamCarver` holds an RGB image and finds, removes, and inserts
//! the lowest-energy seams through it.  The accumulated energy map is
//! built once per direction and then repaired around each seam that
//! is removed or inserted, rather than rebuilt.
#![deny(missing_docs)]

pub mod direction;
pub use direction::Direction;

pub mod energy;
pub use energy::BORDER_ENERGY;

mod energymap;

pub mod error;
pub use error::{Result, SeamError};

pub mod pixelpairs;

pub mod seamcarver;
pub use seamcarver::{CarveOptions, CarveOrder, SeamCarver};

pub mod seamfinder;
pub use seamfinder::SeamFinder;

pub mod twodmap;
