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

//! The geodetic point: the one coordinate type every other module in
//! this workspace builds on.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::SG_EPSILON;

/// A point in geodetic degrees with an elevation in meters.
///
/// 2D equality (`==`) uses [`SG_EPSILON`]; elevation is not considered
/// by `PartialEq`, matching the data model's 2D contour dedup semantics
/// (two points at the same lon/lat but different elevation are the same
/// vertex for topology purposes, and repair picks the higher one — see
/// [`crate::repair::remove_dups`]).
#[derive(Copy, Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GeoPoint {
    pub lon_deg: f64,
    pub lat_deg: f64,
    pub elevation_m: f64,
}

impl GeoPoint {
    pub const fn new(lon_deg: f64, lat_deg: f64, elevation_m: f64) -> Self {
        Self {
            lon_deg,
            lat_deg,
            elevation_m,
        }
    }

    pub const fn flat(lon_deg: f64, lat_deg: f64) -> Self {
        Self::new(lon_deg, lat_deg, 0.0)
    }

    /// Whether this point and `other` are within [`SG_EPSILON`] in both
    /// longitude and latitude.
    pub fn close_to(&self, other: &GeoPoint) -> bool {
        (self.lon_deg - other.lon_deg).abs() < SG_EPSILON
            && (self.lat_deg - other.lat_deg).abs() < SG_EPSILON
    }

    pub fn with_elevation(mut self, elevation_m: f64) -> Self {
        self.elevation_m = elevation_m;
        self
    }
}

impl PartialEq for GeoPoint {
    fn eq(&self, other: &Self) -> bool {
        self.close_to(other)
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({:.7}, {:.7}, {:.2}m)",
            self.lon_deg, self.lat_deg, self.elevation_m
        )
    }
}

impl From<GeoPoint> for geo::Coord<f64> {
    fn from(p: GeoPoint) -> Self {
        geo::Coord {
            x: p.lon_deg,
            y: p.lat_deg,
        }
    }
}

impl From<geo::Coord<f64>> for GeoPoint {
    fn from(c: geo::Coord<f64>) -> Self {
        Self::flat(c.x, c.y)
    }
}

impl From<GeoPoint> for geo::Point<f64> {
    fn from(p: GeoPoint) -> Self {
        geo::Point::new(p.lon_deg, p.lat_deg)
    }
}

impl From<geo::Point<f64>> for GeoPoint {
    fn from(p: geo::Point<f64>) -> Self {
        Self::flat(p.x(), p.y())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn epsilon_equality_ignores_elevation() {
        let a = GeoPoint::new(9.0, 53.0, 10.0);
        let b = GeoPoint::new(9.0, 53.0, 200.0);
        assert_eq!(a, b);
    }

    #[test]
    fn epsilon_equality_rejects_far_points() {
        let a = GeoPoint::flat(9.0, 53.0);
        let b = GeoPoint::flat(9.001, 53.0);
        assert_ne!(a, b);
    }
}
