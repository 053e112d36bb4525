// SPDX-License-Identifier: Apache-2.0
// Copyright 2026 The genapt Contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Geodesy, polygon algebra and triangulation primitives for airport
//! surface construction.
//!
//! This crate has no knowledge of airports, runways or lighting: it is
//! the 2D/geodetic math substrate that `aptcore` builds on, the way
//! `arinc424` knows nothing about flight planning in the crate this
//! workspace is modeled on.

pub mod algebra;
pub mod bucket;
pub mod contour;
pub mod error;
pub mod geodesy;
pub mod nodes;
pub mod point;
pub mod polygon;
pub mod repair;
pub mod tessellate;
pub mod texture;

mod lattice;

pub use contour::Contour;
pub use error::Error;
pub use point::GeoPoint;
pub use polygon::Polygon;
pub use texture::{TexParams, TexProjection};

/// Fixed epsilon used for 2D coordinate equality, in degrees.
///
/// This is `SG_EPSILON` in the system this crate is modeled on: the
/// tolerance below which two geodetic points are considered the same
/// vertex.
pub const SG_EPSILON: f64 = 1.0e-6;

/// Default snap grid resolution in degrees, used by [`repair::snap`].
pub const DEFAULT_SNAP_GRID: f64 = 1.0e-7;
