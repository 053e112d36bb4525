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

//! Texture parameters (spec §3): projects a geodetic point into the
//! runway-aligned (length, cross) frame and normalizes it into a u/v
//! pair.

use crate::geodesy;
use crate::point::GeoPoint;

/// How out-of-range texture coordinates are handled.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TexProjection {
    /// Clamp u/v to `[0, 1]` — used for runway/pavement marking layers.
    Clip,
    /// Leave u/v unclamped so the material tiles — used for taxiways.
    Tile,
}

/// The anchor/orientation/extent a polygon's points are textured
/// against.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TexParams {
    pub anchor: GeoPoint,
    pub width_m: f64,
    pub length_m: f64,
    pub heading_deg: f64,
    pub min_u: f64,
    pub max_u: f64,
    pub min_v: f64,
    pub max_v: f64,
    pub method: TexProjection,
}

impl TexParams {
    pub fn new(anchor: GeoPoint, width_m: f64, length_m: f64, heading_deg: f64) -> Self {
        Self {
            anchor,
            width_m,
            length_m,
            heading_deg,
            min_u: 0.0,
            max_u: 1.0,
            min_v: 0.0,
            max_v: 1.0,
            method: TexProjection::Clip,
        }
    }

    pub fn with_method(mut self, method: TexProjection) -> Self {
        self.method = method;
        self
    }

    pub fn with_uv_limits(mut self, min_u: f64, max_u: f64, min_v: f64, max_v: f64) -> Self {
        self.min_u = min_u;
        self.max_u = max_u;
        self.min_v = min_v;
        self.max_v = max_v;
        self
    }

    /// Projects `p` into the runway-aligned frame and returns its `(u,
    /// v)` texture coordinate.
    ///
    /// `v` runs along the length axis (heading direction), `u` across
    /// it. Both are normalized by length/width before the configured
    /// `min`/`max` remap, then clamped when `method` is [`TexProjection::Clip`].
    pub fn project(&self, p: &GeoPoint) -> (f64, f64) {
        let solved = geodesy::inverse(
            self.anchor.lat_deg,
            self.anchor.lon_deg,
            p.lat_deg,
            p.lon_deg,
        );
        let bearing_rad = solved.forward_azimuth_deg.to_radians();
        let heading_rad = self.heading_deg.to_radians();
        let relative = bearing_rad - heading_rad;

        // Along-heading (length) and cross-heading (width) components.
        let along = solved.distance_m * relative.cos();
        let cross = solved.distance_m * relative.sin();

        let raw_v = if self.length_m.abs() > f64::EPSILON {
            along / self.length_m
        } else {
            0.0
        };
        let raw_u = if self.width_m.abs() > f64::EPSILON {
            0.5 + cross / self.width_m
        } else {
            0.0
        };

        let u = self.min_u + raw_u * (self.max_u - self.min_u);
        let v = self.min_v + raw_v * (self.max_v - self.min_v);

        match self.method {
            TexProjection::Clip => (u.clamp(0.0, 1.0), v.clamp(0.0, 1.0)),
            TexProjection::Tile => (u, v),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn anchor_projects_to_half_u_zero_v() {
        let anchor = GeoPoint::flat(9.0, 53.0);
        let tex = TexParams::new(anchor, 30.0, 1000.0, 0.0);
        let (u, v) = tex.project(&anchor);
        assert_relative_eq!(u, 0.5, epsilon = 1e-9);
        assert_relative_eq!(v, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn tile_method_does_not_clamp() {
        let anchor = GeoPoint::flat(9.0, 53.0);
        let far = geodesy::offset(&anchor, 0.0, 5000.0);
        let tex = TexParams::new(anchor, 30.0, 1000.0, 0.0).with_method(TexProjection::Tile);
        let (_, v) = tex.project(&far);
        assert!(v > 1.0);
    }

    #[test]
    fn clip_method_clamps() {
        let anchor = GeoPoint::flat(9.0, 53.0);
        let far = geodesy::offset(&anchor, 0.0, 5000.0);
        let tex = TexParams::new(anchor, 30.0, 1000.0, 0.0).with_method(TexProjection::Clip);
        let (_, v) = tex.project(&far);
        assert_relative_eq!(v, 1.0, epsilon = 1e-9);
    }
}
