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

//! The cyclic contour type (spec §3, §9 "Cyclic polygon handling").
//!
//! A contour is a sequence of points where the last point implicitly
//! connects back to the first. That cyclic relation is a convention
//! honored by every function here (`edges`, `prev_of`, `next_of`), not
//! an explicit back-edge stored in the type.

use crate::point::GeoPoint;

/// An ordered ring of points, either an outer boundary (CCW) or a hole
/// (CW). Minimum valid size is 3 points.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Contour {
    points: Vec<GeoPoint>,
    hole: bool,
}

impl Contour {
    /// Builds a new contour. Does not validate size or orientation;
    /// callers that need the invariant enforced should call
    /// [`Contour::canonicalize`].
    pub fn new(points: Vec<GeoPoint>, hole: bool) -> Self {
        Self { points, hole }
    }

    pub fn outer(points: Vec<GeoPoint>) -> Self {
        Self::new(points, false)
    }

    pub fn hole(points: Vec<GeoPoint>) -> Self {
        Self::new(points, true)
    }

    pub fn points(&self) -> &[GeoPoint] {
        &self.points
    }

    pub fn points_mut(&mut self) -> &mut Vec<GeoPoint> {
        &mut self.points
    }

    pub fn into_points(self) -> Vec<GeoPoint> {
        self.points
    }

    pub fn is_hole(&self) -> bool {
        self.hole
    }

    pub fn set_hole(&mut self, hole: bool) {
        self.hole = hole;
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Whether this contour satisfies the minimum-valid-size invariant.
    pub fn is_valid(&self) -> bool {
        self.points.len() >= 3
    }

    /// Point at cyclic index `i` (wraps around).
    pub fn at(&self, i: usize) -> GeoPoint {
        self.points[i % self.points.len()]
    }

    pub fn prev_of(&self, i: usize) -> GeoPoint {
        let n = self.points.len();
        self.points[(i + n - 1) % n]
    }

    pub fn next_of(&self, i: usize) -> GeoPoint {
        self.at(i + 1)
    }

    /// Iterates the contour's edges as `(start, end)` pairs, including
    /// the closing edge from the last point back to the first.
    pub fn edges(&self) -> impl Iterator<Item = (GeoPoint, GeoPoint)> + '_ {
        let n = self.points.len();
        (0..n).map(move |i| (self.points[i], self.points[(i + 1) % n]))
    }

    /// Signed planar area in square degrees (shoelace formula on raw
    /// lon/lat). Positive for CCW, negative for CW — airport footprints
    /// are small enough that the flat-earth approximation used by the
    /// sliver/degeneracy thresholds in spec §4.C is adequate.
    pub fn signed_area(&self) -> f64 {
        if self.points.len() < 3 {
            return 0.0;
        }
        let mut sum = 0.0;
        let n = self.points.len();
        for i in 0..n {
            let a = self.points[i];
            let b = self.points[(i + 1) % n];
            sum += a.lon_deg * b.lat_deg - b.lon_deg * a.lat_deg;
        }
        sum / 2.0
    }

    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    pub fn is_ccw(&self) -> bool {
        self.signed_area() > 0.0
    }

    /// Reverses point order, flipping CCW<->CW.
    pub fn reverse(&mut self) {
        self.points.reverse();
    }

    /// Forces canonical orientation: outer rings CCW, holes CW.
    pub fn canonicalize(&mut self) {
        let ccw = self.is_ccw();
        if (self.hole && ccw) || (!self.hole && !ccw) {
            self.reverse();
        }
    }

    /// Interior angle in degrees at vertex `i`, measured between the
    /// edges `(prev, i)` and `(i, next)`. Used by [`crate::repair::remove_spikes`]
    /// and [`crate::repair::remove_slivers`].
    pub fn interior_angle_deg(&self, i: usize) -> f64 {
        let prev = self.prev_of(i);
        let cur = self.at(i);
        let next = self.next_of(i);

        let v1 = (prev.lon_deg - cur.lon_deg, prev.lat_deg - cur.lat_deg);
        let v2 = (next.lon_deg - cur.lon_deg, next.lat_deg - cur.lat_deg);

        let dot = v1.0 * v2.0 + v1.1 * v2.1;
        let mag1 = (v1.0 * v1.0 + v1.1 * v1.1).sqrt();
        let mag2 = (v2.0 * v2.0 + v2.1 * v2.1).sqrt();
        if mag1 < f64::EPSILON || mag2 < f64::EPSILON {
            return 0.0;
        }
        let cos_theta = (dot / (mag1 * mag2)).clamp(-1.0, 1.0);
        cos_theta.acos().to_degrees()
    }

    /// The smallest interior angle over all vertices, in degrees.
    ///
    /// Spec §9 Open Question 1: the sliver test uses this minimum, not
    /// an average — the implementer's documented choice.
    pub fn min_interior_angle_deg(&self) -> f64 {
        (0..self.points.len())
            .map(|i| self.interior_angle_deg(i))
            .fold(f64::INFINITY, f64::min)
    }
}

impl From<Contour> for geo::LineString<f64> {
    fn from(c: Contour) -> Self {
        let mut coords: Vec<geo::Coord<f64>> = c.points.iter().map(|&p| p.into()).collect();
        if let Some(&first) = coords.first() {
            coords.push(first);
        }
        geo::LineString::new(coords)
    }
}

impl From<&Contour> for geo::LineString<f64> {
    fn from(c: &Contour) -> Self {
        c.clone().into()
    }
}

impl From<geo::LineString<f64>> for Contour {
    fn from(ls: geo::LineString<f64>) -> Self {
        let mut coords = ls.0;
        // geo closes rings by repeating the first point; contours don't.
        if coords.len() > 1 && coords.first() == coords.last() {
            coords.pop();
        }
        Contour::new(coords.into_iter().map(GeoPoint::from).collect(), false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(ccw: bool) -> Contour {
        let mut pts = vec![
            GeoPoint::flat(0.0, 0.0),
            GeoPoint::flat(1.0, 0.0),
            GeoPoint::flat(1.0, 1.0),
            GeoPoint::flat(0.0, 1.0),
        ];
        if !ccw {
            pts.reverse();
        }
        Contour::outer(pts)
    }

    #[test]
    fn area_of_unit_square() {
        assert!((square(true).area() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn orientation_detection() {
        assert!(square(true).is_ccw());
        assert!(!square(false).is_ccw());
    }

    #[test]
    fn canonicalize_flips_wrong_orientation() {
        let mut hole = square(true);
        hole.set_hole(true);
        hole.canonicalize();
        assert!(!hole.is_ccw());

        let mut outer = square(false);
        outer.canonicalize();
        assert!(outer.is_ccw());
    }

    #[test]
    fn right_angle_square_corners() {
        let sq = square(true);
        for i in 0..4 {
            assert!((sq.interior_angle_deg(i) - 90.0).abs() < 1e-6);
        }
    }
}
