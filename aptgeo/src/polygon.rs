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

//! The multi-contour polygon-with-holes (spec §3).

use crate::contour::Contour;
use crate::point::GeoPoint;
use crate::texture::TexParams;

/// A polygon: an outer contour plus zero or more hole contours, with
/// the metadata the airport builder attaches to every pavement or base
/// piece it emits.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Polygon {
    contours: Vec<Contour>,
    pub material: String,
    pub tex_params: Option<TexParams>,
    pub preserve_3d: bool,
    pub id: u64,
}

impl Polygon {
    pub fn new(outer: Contour) -> Self {
        Self {
            contours: vec![outer],
            material: String::new(),
            tex_params: None,
            preserve_3d: false,
            id: 0,
        }
    }

    pub fn empty() -> Self {
        Self {
            contours: Vec::new(),
            material: String::new(),
            tex_params: None,
            preserve_3d: false,
            id: 0,
        }
    }

    pub fn with_material(mut self, material: impl Into<String>) -> Self {
        self.material = material.into();
        self
    }

    pub fn with_tex_params(mut self, tex: TexParams) -> Self {
        self.tex_params = Some(tex);
        self
    }

    pub fn add_hole(&mut self, hole: Contour) {
        debug_assert!(hole.is_hole());
        self.contours.push(hole);
    }

    pub fn add_contour(&mut self, contour: Contour) {
        self.contours.push(contour);
    }

    pub fn contours(&self) -> &[Contour] {
        &self.contours
    }

    pub fn contours_mut(&mut self) -> &mut Vec<Contour> {
        &mut self.contours
    }

    pub fn into_contours(self) -> Vec<Contour> {
        self.contours
    }

    pub fn outer(&self) -> Option<&Contour> {
        self.contours.iter().find(|c| !c.is_hole())
    }

    pub fn holes(&self) -> impl Iterator<Item = &Contour> {
        self.contours.iter().filter(|c| c.is_hole())
    }

    pub fn is_empty(&self) -> bool {
        self.contours.is_empty() || self.outer().is_none()
    }

    pub fn contour_count(&self) -> usize {
        self.contours.len()
    }

    /// Total signed area of the outer ring minus the area of each hole.
    pub fn area(&self) -> f64 {
        self.contours
            .iter()
            .map(|c| if c.is_hole() { -c.area() } else { c.area() })
            .sum()
    }

    /// All points across all contours, in order. Used to build the
    /// `tmp_nodes` set that seeds T-junction repair (spec §4.H step 6).
    pub fn all_points(&self) -> impl Iterator<Item = GeoPoint> + '_ {
        self.contours.iter().flat_map(|c| c.points().iter().copied())
    }

    /// Canonicalizes orientation on every contour (outer CCW, holes CW).
    pub fn canonicalize(&mut self) {
        for c in &mut self.contours {
            c.canonicalize();
        }
    }

    /// Whether every contour of this polygon meets the minimum-size
    /// invariant (spec §8 property 3).
    pub fn is_topologically_valid(&self) -> bool {
        !self.contours.is_empty() && self.contours.iter().all(Contour::is_valid)
    }
}

/// Converts to a `geo::Polygon`, dropping genapt metadata. The first
/// non-hole contour becomes the exterior; all hole contours become
/// interior rings, regardless of their position in the source list.
impl From<&Polygon> for geo::Polygon<f64> {
    fn from(p: &Polygon) -> Self {
        let exterior = p
            .outer()
            .cloned()
            .map(geo::LineString::from)
            .unwrap_or_else(|| geo::LineString::new(Vec::new()));
        let interiors: Vec<geo::LineString<f64>> =
            p.holes().cloned().map(geo::LineString::from).collect();
        geo::Polygon::new(exterior, interiors)
    }
}

impl From<geo::Polygon<f64>> for Polygon {
    fn from(gp: geo::Polygon<f64>) -> Self {
        let (exterior, interiors) = gp.into_inner();
        let mut poly = Polygon::new(Contour::outer(
            Contour::from(exterior).into_points(),
        ));
        for interior in interiors {
            poly.add_hole(Contour::hole(Contour::from(interior).into_points()));
        }
        poly
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Contour {
        Contour::outer(vec![
            GeoPoint::flat(0.0, 0.0),
            GeoPoint::flat(1.0, 0.0),
            GeoPoint::flat(1.0, 1.0),
            GeoPoint::flat(0.0, 1.0),
        ])
    }

    #[test]
    fn area_subtracts_holes() {
        let mut p = Polygon::new(square());
        let hole = Contour::hole(vec![
            GeoPoint::flat(0.25, 0.25),
            GeoPoint::flat(0.25, 0.75),
            GeoPoint::flat(0.75, 0.75),
            GeoPoint::flat(0.75, 0.25),
        ]);
        p.add_hole(hole);
        assert!((p.area() - 0.75).abs() < 1e-9);
    }

    #[test]
    fn roundtrips_through_geo_polygon() {
        let p = Polygon::new(square()).with_material("pa_rwy");
        let gp: geo::Polygon<f64> = (&p).into();
        let back: Polygon = gp.into();
        assert_eq!(back.outer().unwrap().len(), p.outer().unwrap().len());
    }
}
