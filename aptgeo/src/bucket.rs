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

//! The scenery bucket grid (spec §3, §6): a fixed mapping from a
//! geodetic point to a 64-bit cell id and a filesystem path fragment.
//!
//! Cell width in longitude varies by latitude band so that bucket area
//! stays roughly constant even as meridians converge toward the poles;
//! this is the same banding idea the real tile scheme it is modeled on
//! uses, reimplemented here from the band boundaries down since no
//! external consumer ships in this repository to byte-match against
//! (see DESIGN.md).

use crate::point::GeoPoint;

/// Longitude span, in degrees, of one bucket column at latitude `lat`.
fn lon_span_deg(lat: f64) -> f64 {
    let l = lat.abs();
    if l < 22.0 {
        0.125
    } else if l < 62.0 {
        0.25
    } else if l < 76.0 {
        0.5
    } else if l < 83.0 {
        1.0
    } else if l < 86.0 {
        2.0
    } else if l < 88.0 {
        4.0
    } else if l < 89.0 {
        8.0
    } else {
        360.0
    }
}

/// A single scenery bucket cell: a rectangular region addressed by a
/// 64-bit id and a two-level directory path.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Bucket {
    /// 1-degree latitude band index, `0..180`, south to north.
    lat_band: i32,
    /// Column index within the latitude band.
    lon_col: i32,
}

impl Bucket {
    /// Resolves the bucket containing `p`.
    pub fn from_point(p: &GeoPoint) -> Self {
        Self::from_lon_lat(p.lon_deg, p.lat_deg)
    }

    pub fn from_lon_lat(lon_deg: f64, lat_deg: f64) -> Self {
        let lat = lat_deg.clamp(-90.0, 89.999_999);
        let lon = normalize_lon(lon_deg);

        let lat_band = (lat + 90.0).floor() as i32;
        let span = lon_span_deg(lat);
        let lon_col = ((lon + 180.0) / span).floor() as i32;

        Bucket { lat_band, lon_col }
    }

    /// The bucket's deterministic 64-bit id: the latitude band in the
    /// high 32 bits, the longitude column in the low 32 bits. Always
    /// non-negative since both components are non-negative by
    /// construction.
    pub fn id(&self) -> u64 {
        ((self.lat_band as u64) << 32) | (self.lon_col as u64)
    }

    /// South-west corner of the bucket, in degrees.
    pub fn origin(&self) -> (f64, f64) {
        let lat = self.lat_band as f64 - 90.0;
        let span = lon_span_deg(lat);
        let lon = self.lon_col as f64 * span - 180.0;
        (lon, lat)
    }

    /// Width/height of the bucket rectangle, in degrees.
    pub fn extent(&self) -> (f64, f64) {
        let lat = self.lat_band as f64 - 90.0;
        (lon_span_deg(lat), 1.0)
    }

    /// The bucket rectangle as `(min_lon, min_lat, max_lon, max_lat)`.
    pub fn rect(&self) -> (f64, f64, f64, f64) {
        let (lon, lat) = self.origin();
        let (w, h) = self.extent();
        (lon, lat, lon + w, lat + h)
    }

    /// Two-level directory path fragment this bucket's output lives
    /// under, e.g. `e009/e009n53/953607`, mirroring the directory
    /// layout spec §6 requires (`<bucket-base-path>/<id>.btg`).
    pub fn path_fragment(&self) -> String {
        let (lon, lat) = self.origin();
        let lon10 = (lon / 10.0).floor() as i32 * 10;
        let lat10 = (lat / 10.0).floor() as i32 * 10;
        format!(
            "{}{:03}{}{:02}/{}{:03}{}{:02}",
            ew(lon10),
            lon10.abs(),
            ns(lat10),
            lat10.abs(),
            ew(lon as i32),
            (lon as i32).abs(),
            ns(lat as i32),
            (lat as i32).abs(),
        )
    }
}

fn ew(lon: i32) -> &'static str {
    if lon < 0 {
        "w"
    } else {
        "e"
    }
}

fn ns(lat: i32) -> &'static str {
    if lat < 0 {
        "s"
    } else {
        "n"
    }
}

fn normalize_lon(lon_deg: f64) -> f64 {
    let mut l = lon_deg % 360.0;
    if l < -180.0 {
        l += 360.0;
    } else if l >= 180.0 {
        l -= 360.0;
    }
    l
}

/// Which buckets' rectangles intersect `(min_lon, min_lat, max_lon,
/// max_lat)`. Used by the chopper (spec §4.I) to find every bucket a
/// polygon's bounding box may straddle.
pub fn buckets_in_range(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> Vec<Bucket> {
    let mut out = Vec::new();
    let mut lat = min_lat;
    while lat <= max_lat {
        let span = lon_span_deg(lat);
        let mut lon = min_lon;
        loop {
            out.push(Bucket::from_lon_lat(lon, lat));
            if lon >= max_lon {
                break;
            }
            lon += span;
        }
        lat = (lat + 1.0).floor();
        if lat <= min_lat {
            break;
        }
    }
    out.sort_by_key(Bucket::id);
    out.dedup();
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_point_maps_to_same_bucket() {
        let p = GeoPoint::flat(9.123, 53.456);
        assert_eq!(Bucket::from_point(&p), Bucket::from_point(&p));
    }

    #[test]
    fn nearby_points_share_a_bucket() {
        let a = Bucket::from_lon_lat(9.01, 53.01);
        let b = Bucket::from_lon_lat(9.02, 53.02);
        assert_eq!(a, b);
    }

    #[test]
    fn far_points_differ() {
        let a = Bucket::from_lon_lat(9.0, 53.0);
        let b = Bucket::from_lon_lat(120.0, -33.0);
        assert_ne!(a, b);
    }

    #[test]
    fn id_is_stable_across_calls() {
        let b = Bucket::from_lon_lat(9.5, 53.5);
        assert_eq!(b.id(), b.id());
    }

    #[test]
    fn span_coarsens_toward_poles() {
        assert!(lon_span_deg(85.0) > lon_span_deg(10.0));
    }

    #[test]
    fn buckets_in_range_covers_straddled_cells() {
        let cells = buckets_in_range(8.9, 52.9, 9.6, 53.6);
        assert!(cells.len() >= 2);
    }

    #[test]
    fn path_fragment_reflects_hemisphere() {
        let p = Bucket::from_lon_lat(-9.5, -53.5);
        let frag = p.path_fragment();
        assert!(frag.starts_with('w'));
        assert!(frag.contains("/w"));
    }
}
