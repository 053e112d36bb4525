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

//! WGS-84 geodesy primitives (spec §4.A).
//!
//! Every metric offset used by runway geometry and lighting (light
//! spacing, overrun extension, threshold shifts) goes through
//! [`direct`] and [`inverse`].

use geo::{Bearing, Destination, Distance, Geodesic};

use crate::point::GeoPoint;

/// WGS-84 semi-major axis, in meters.
pub const WGS84_A: f64 = 6_378_137.0;
/// WGS-84 flattening.
pub const WGS84_F: f64 = 1.0 / 298.257_223_563;

/// Result of the direct geodesic problem: given a start point, azimuth
/// and distance, find the destination and the reverse azimuth back to
/// the start.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DirectSolution {
    pub lon_deg: f64,
    pub lat_deg: f64,
    pub reverse_azimuth_deg: f64,
}

/// Solves the direct geodesic problem on the WGS-84 ellipsoid: from
/// `(lat1, lon1)`, travel `distance_m` along `azimuth_deg`.
pub fn direct(lat1: f64, lon1: f64, azimuth_deg: f64, distance_m: f64) -> DirectSolution {
    let origin = geo::Point::new(lon1, lat1);
    let dest = Geodesic.destination(origin, azimuth_deg, distance_m);
    let reverse = Geodesic.bearing(dest, origin);
    DirectSolution {
        lon_deg: dest.x(),
        lat_deg: dest.y(),
        reverse_azimuth_deg: normalize_deg(reverse),
    }
}

/// Result of the inverse geodesic problem.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct InverseSolution {
    pub forward_azimuth_deg: f64,
    pub reverse_azimuth_deg: f64,
    pub distance_m: f64,
}

/// Solves the inverse geodesic problem: the forward/reverse azimuth and
/// distance between two points on the WGS-84 ellipsoid.
pub fn inverse(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> InverseSolution {
    let a = geo::Point::new(lon1, lat1);
    let b = geo::Point::new(lon2, lat2);
    InverseSolution {
        forward_azimuth_deg: normalize_deg(Geodesic.bearing(a, b)),
        reverse_azimuth_deg: normalize_deg(Geodesic.bearing(b, a)),
        distance_m: Geodesic.distance(a, b),
    }
}

/// The initial course (forward azimuth) from `a` to `b`, in degrees.
pub fn course(a: &GeoPoint, b: &GeoPoint) -> f64 {
    inverse(a.lat_deg, a.lon_deg, b.lat_deg, b.lon_deg).forward_azimuth_deg
}

/// The geodesic distance between `a` and `b`, in meters.
pub fn distance_m(a: &GeoPoint, b: &GeoPoint) -> f64 {
    inverse(a.lat_deg, a.lon_deg, b.lat_deg, b.lon_deg).distance_m
}

/// The midpoint of the geodesic between `a` and `b`.
///
/// Approximated as the destination point reached by travelling half the
/// geodesic distance along the forward azimuth, which is exact enough
/// for airport-scale spans (a few kilometers).
pub fn midpoint(a: &GeoPoint, b: &GeoPoint) -> GeoPoint {
    let solved = inverse(a.lat_deg, a.lon_deg, b.lat_deg, b.lon_deg);
    let half = direct(
        a.lat_deg,
        a.lon_deg,
        solved.forward_azimuth_deg,
        solved.distance_m / 2.0,
    );
    GeoPoint::flat(half.lon_deg, half.lat_deg)
}

/// Offsets `origin` by `distance_m` along `azimuth_deg`, preserving
/// elevation.
pub fn offset(origin: &GeoPoint, azimuth_deg: f64, distance_m: f64) -> GeoPoint {
    let solved = direct(origin.lat_deg, origin.lon_deg, azimuth_deg, distance_m);
    GeoPoint::new(solved.lon_deg, solved.lat_deg, origin.elevation_m)
}

/// Geocentric cartesian coordinates in meters (ECEF), used for the
/// vertex arrays of the binary scenery object and bounding-sphere math.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Cartesian {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Cartesian {
    pub fn distance_to(&self, other: &Cartesian) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2) + (self.z - other.z).powi(2))
            .sqrt()
    }
}

/// Converts a geodetic point (degrees, meters elevation) to ECEF
/// cartesian coordinates on the WGS-84 ellipsoid.
pub fn geod_to_cart(p: &GeoPoint) -> Cartesian {
    let lat = p.lat_deg.to_radians();
    let lon = p.lon_deg.to_radians();
    let e2 = WGS84_F * (2.0 - WGS84_F);
    let sin_lat = lat.sin();
    let n = WGS84_A / (1.0 - e2 * sin_lat * sin_lat).sqrt();

    let x = (n + p.elevation_m) * lat.cos() * lon.cos();
    let y = (n + p.elevation_m) * lat.cos() * lon.sin();
    let z = (n * (1.0 - e2) + p.elevation_m) * sin_lat;

    Cartesian { x, y, z }
}

/// The geocentric "up" unit vector at a geodetic point: used as a
/// placeholder light normal for omnidirectional lights (spec §4.F).
pub fn geocentric_up(p: &GeoPoint) -> (f64, f64, f64) {
    let lat = p.lat_deg.to_radians();
    let lon = p.lon_deg.to_radians();
    (lat.cos() * lon.cos(), lat.cos() * lon.sin(), lat.sin())
}

/// Approximate degrees-of-longitude/latitude per meter at a given
/// latitude, used to convert buffer/expand distances into the polygon
/// algebra's lattice units (spec §4.B).
pub fn meters_to_deg_lat(meters: f64) -> f64 {
    meters / 111_320.0
}

pub fn meters_to_deg_lon(meters: f64, at_lat_deg: f64) -> f64 {
    let lat = at_lat_deg.to_radians();
    let m_per_deg_lon = 111_320.0 * lat.cos().max(1.0e-6);
    meters / m_per_deg_lon
}

fn normalize_deg(deg: f64) -> f64 {
    let mut d = deg % 360.0;
    if d < 0.0 {
        d += 360.0;
    }
    d
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn direct_then_inverse_roundtrip() {
        let solved = direct(53.0, 9.0, 45.0, 1000.0);
        let inv = inverse(53.0, 9.0, solved.lat_deg, solved.lon_deg);
        assert_relative_eq!(inv.distance_m, 1000.0, epsilon = 0.01);
        assert_relative_eq!(inv.forward_azimuth_deg, 45.0, epsilon = 0.01);
    }

    #[test]
    fn offset_north_increases_latitude() {
        let origin = GeoPoint::flat(9.0, 53.0);
        let north = offset(&origin, 0.0, 500.0);
        assert!(north.lat_deg > origin.lat_deg);
        assert_relative_eq!(north.lon_deg, origin.lon_deg, epsilon = 1.0e-6);
    }

    #[test]
    fn geod_to_cart_is_on_ellipsoid_surface() {
        let p = GeoPoint::flat(0.0, 0.0);
        let c = geod_to_cart(&p);
        assert_relative_eq!(c.x, WGS84_A, epsilon = 1.0);
        assert_relative_eq!(c.y, 0.0, epsilon = 1.0);
        assert_relative_eq!(c.z, 0.0, epsilon = 1.0);
    }
}
