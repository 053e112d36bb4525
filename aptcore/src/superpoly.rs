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

//! The superpoly (spec §3, §9 "Parallel output structures bound by
//! index"): a polygon together with per-point normals, a material, and
//! (once tessellated) a triangle list and per-triangle texcoords.
//!
//! Used for both filled pavement and light-point groups; the normals
//! array, when present, must always track the point array 1:1.

use aptgeo::tessellate::Triangle;
use aptgeo::Polygon;

use crate::error::Error;

/// A 3D unit vector, used for per-light-point normals.
pub type Normal = (f64, f64, f64);

#[derive(Clone, Debug, Default)]
pub struct Superpoly {
    pub polygon: Polygon,
    normals: Option<Vec<Normal>>,
    pub material: String,
    pub triangles: Option<Vec<Triangle>>,
    pub texcoords: Option<Vec<(f64, f64)>>,
    /// Identifies the runway-end group this superpoly belongs to, used
    /// by the builder to look up elevation-lift offsets (spec §4.H).
    pub flag: Option<String>,
}

impl Superpoly {
    pub fn new(polygon: Polygon, material: impl Into<String>) -> Self {
        Self {
            polygon,
            normals: None,
            material: material.into(),
            triangles: None,
            texcoords: None,
            flag: None,
        }
    }

    /// Attaches a parallel normal array. Fails the invariant (spec §9)
    /// that normals, when present, track point count 1:1.
    pub fn with_normals(mut self, normals: Vec<Normal>) -> Result<Self, Error> {
        let point_count = self.polygon.all_points().count();
        if normals.len() != point_count {
            return Err(Error::InvariantViolation(format!(
                "superpoly has {} points but {} normals",
                point_count,
                normals.len()
            )));
        }
        self.normals = Some(normals);
        Ok(self)
    }

    pub fn with_flag(mut self, flag: impl Into<String>) -> Self {
        self.flag = Some(flag.into());
        self
    }

    pub fn normals(&self) -> Option<&[Normal]> {
        self.normals.as_deref()
    }

    pub fn set_triangles(&mut self, triangles: Vec<Triangle>) {
        self.triangles = Some(triangles);
    }

    pub fn set_texcoords(&mut self, texcoords: Vec<(f64, f64)>) {
        self.texcoords = Some(texcoords);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aptgeo::{Contour, GeoPoint};

    fn square() -> Polygon {
        Polygon::new(Contour::outer(vec![
            GeoPoint::flat(0.0, 0.0),
            GeoPoint::flat(1.0, 0.0),
            GeoPoint::flat(1.0, 1.0),
            GeoPoint::flat(0.0, 1.0),
        ]))
    }

    #[test]
    fn matching_normal_count_is_accepted() {
        let sp = Superpoly::new(square(), "RWY_WHITE_LIGHTS")
            .with_normals(vec![(0.0, 0.0, 1.0); 4])
            .unwrap();
        assert_eq!(sp.normals().unwrap().len(), 4);
    }

    #[test]
    fn mismatched_normal_count_is_rejected() {
        let err = Superpoly::new(square(), "RWY_WHITE_LIGHTS").with_normals(vec![(0.0, 0.0, 1.0); 3]);
        assert!(err.is_err());
    }
}
