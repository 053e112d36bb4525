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

//! Constrained Delaunay triangulation of a polygon-with-holes (spec
//! §4.D), backed by [`spade`].
//!
//! The triangulation inserts every contour vertex plus any caller-
//! supplied "extra nodes" (used to thread a neighboring terrain seam
//! through the mesh), constrains every contour edge, then keeps only
//! the faces whose centroid falls inside the polygon — spade triangulates
//! the full convex-ish hull of its input points, so faces inside holes
//! or outside the outer ring have to be discarded after the fact.

use geo::Contains;
use spade::{ConstrainedDelaunayTriangulation, Point2, Triangulation};

use crate::error::Error;
use crate::point::GeoPoint;
use crate::polygon::Polygon;

/// One output triangle, as three geodetic points.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Triangle {
    pub a: GeoPoint,
    pub b: GeoPoint,
    pub c: GeoPoint,
}

impl Triangle {
    pub fn points(&self) -> [GeoPoint; 3] {
        [self.a, self.b, self.c]
    }

    /// Planar centroid in lon/lat, used only for the inside/outside
    /// test during tessellation.
    fn centroid(&self) -> (f64, f64) {
        (
            (self.a.lon_deg + self.b.lon_deg + self.c.lon_deg) / 3.0,
            (self.a.lat_deg + self.b.lat_deg + self.c.lat_deg) / 3.0,
        )
    }
}

type Cdt = ConstrainedDelaunayTriangulation<Point2<f64>>;

/// Triangulates `polygon`, respecting every contour edge as a
/// constraint and every hole as excluded area. `extra_nodes` are
/// inserted as unconstrained points so they participate in the mesh
/// without altering the boundary.
pub fn tessellate(polygon: &Polygon, extra_nodes: &[GeoPoint]) -> Result<Vec<Triangle>, Error> {
    let outer = polygon
        .outer()
        .ok_or(Error::DegenerateContour { size: 0 })?;
    if !outer.is_valid() {
        return Err(Error::DegenerateContour { size: outer.len() });
    }

    let mut cdt = Cdt::new();

    for contour in polygon.contours() {
        if !contour.is_valid() {
            continue;
        }
        let handles: Vec<_> = contour
            .points()
            .iter()
            .map(|p| {
                cdt.insert(Point2::new(p.lon_deg, p.lat_deg))
                    .map_err(|_| Error::BadConstraint)
            })
            .collect::<Result<_, _>>()?;

        let n = handles.len();
        for i in 0..n {
            let from = handles[i];
            let to = handles[(i + 1) % n];
            if from != to {
                cdt.add_constraint(from, to);
            }
        }
    }

    for p in extra_nodes {
        cdt.insert(Point2::new(p.lon_deg, p.lat_deg))
            .map_err(|_| Error::BadConstraint)?;
    }

    let geo_poly: geo::Polygon<f64> = polygon.into();

    let mut triangles = Vec::new();
    for face in cdt.inner_faces() {
        let verts = face.vertices();
        let pts: Vec<GeoPoint> = verts
            .iter()
            .map(|v| {
                let pos = v.position();
                GeoPoint::flat(pos.x, pos.y)
            })
            .collect();
        let tri = Triangle {
            a: pts[0],
            b: pts[1],
            c: pts[2],
        };
        let (cx, cy) = tri.centroid();
        if geo_poly.contains(&geo::Coord { x: cx, y: cy }) {
            triangles.push(tri);
        }
    }

    Ok(triangles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contour::Contour;

    fn square() -> Polygon {
        Polygon::new(Contour::outer(vec![
            GeoPoint::flat(0.0, 0.0),
            GeoPoint::flat(1.0, 0.0),
            GeoPoint::flat(1.0, 1.0),
            GeoPoint::flat(0.0, 1.0),
        ]))
    }

    #[test]
    fn square_triangulates_to_two_triangles() {
        let tris = tessellate(&square(), &[]).unwrap();
        assert_eq!(tris.len(), 2);
    }

    #[test]
    fn total_area_matches_source_polygon() {
        let sq = square();
        let tris = tessellate(&sq, &[]).unwrap();
        let area: f64 = tris
            .iter()
            .map(|t| {
                let (a, b, c) = (t.a, t.b, t.c);
                0.5 * ((b.lon_deg - a.lon_deg) * (c.lat_deg - a.lat_deg)
                    - (c.lon_deg - a.lon_deg) * (b.lat_deg - a.lat_deg))
                    .abs()
            })
            .sum();
        assert!((area - sq.area()).abs() < 1e-9);
    }

    #[test]
    fn hole_is_excluded_from_output() {
        let mut p = square();
        p.add_hole(Contour::hole(vec![
            GeoPoint::flat(0.25, 0.25),
            GeoPoint::flat(0.25, 0.75),
            GeoPoint::flat(0.75, 0.75),
            GeoPoint::flat(0.75, 0.25),
        ]));
        let tris = tessellate(&p, &[]).unwrap();
        let area: f64 = tris
            .iter()
            .map(|t| {
                let (a, b, c) = (t.a, t.b, t.c);
                0.5 * ((b.lon_deg - a.lon_deg) * (c.lat_deg - a.lat_deg)
                    - (c.lon_deg - a.lon_deg) * (b.lat_deg - a.lat_deg))
                    .abs()
            })
            .sum();
        assert!((area - p.area()).abs() < 1e-6);
    }

    #[test]
    fn extra_node_is_threaded_into_mesh() {
        let sq = square();
        let extra = [GeoPoint::flat(0.5, 0.5)];
        let tris = tessellate(&sq, &extra).unwrap();
        assert!(tris.len() > 2);
        assert!(tris
            .iter()
            .flat_map(Triangle::points)
            .any(|p| p.close_to(&extra[0])));
    }

    #[test]
    fn degenerate_polygon_is_rejected() {
        let p = Polygon::new(Contour::outer(vec![
            GeoPoint::flat(0.0, 0.0),
            GeoPoint::flat(1.0, 0.0),
        ]));
        assert!(tessellate(&p, &[]).is_err());
    }
}
