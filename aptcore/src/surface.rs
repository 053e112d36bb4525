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

//! The airport terrain-fit surface (spec §4.G).
//!
//! `AptSurface` samples a stack of [`DemSource`]s in priority order over
//! a grid spanning the airport bounds, then answers [`AptSurface::query`]
//! by inverse-distance-weighted interpolation of the nearest retained
//! samples via an `rstar` spatial index. This is a smooth, deterministic
//! fit; it is not the thin-plate spline the original discusses as one
//! option, which would pull in a dense linear-algebra dependency this
//! workspace has no other use for.

use rstar::{PointDistance, RTree, RTreeObject, AABB};

use crate::error::Error;

/// A stacked elevation source. Returns `None` where it has no coverage,
/// so [`AptSurface::new`] can fall through to the next-lower-priority
/// source. Implementations wrap a DEM tile reader; this crate only
/// defines the trait and an in-memory test double, per the
/// DEM-raster-loader non-goal.
pub trait DemSource: Sync {
    fn sample(&self, lon_deg: f64, lat_deg: f64) -> Option<f64>;
}

/// A simple regular-grid elevation source, used for tests and as a
/// reference `DemSource` implementation. Out-of-bounds queries return
/// `None`, matching the stacked-fallback contract.
pub struct GridDem {
    min_lon: f64,
    min_lat: f64,
    cell_deg: f64,
    cols: usize,
    rows: usize,
    values: Vec<f64>,
}

impl GridDem {
    pub fn new(min_lon: f64, min_lat: f64, cell_deg: f64, cols: usize, rows: usize, values: Vec<f64>) -> Self {
        assert_eq!(values.len(), cols * rows, "grid DEM value count mismatch");
        Self {
            min_lon,
            min_lat,
            cell_deg,
            cols,
            rows,
            values,
        }
    }

    /// A flat DEM at a constant elevation, useful in tests.
    pub fn flat(min_lon: f64, min_lat: f64, cell_deg: f64, cols: usize, rows: usize, elevation_m: f64) -> Self {
        Self::new(min_lon, min_lat, cell_deg, cols, rows, vec![elevation_m; cols * rows])
    }
}

impl DemSource for GridDem {
    fn sample(&self, lon_deg: f64, lat_deg: f64) -> Option<f64> {
        let col = ((lon_deg - self.min_lon) / self.cell_deg).round();
        let row = ((lat_deg - self.min_lat) / self.cell_deg).round();
        if col < 0.0 || row < 0.0 {
            return None;
        }
        let (col, row) = (col as usize, row as usize);
        if col >= self.cols || row >= self.rows {
            return None;
        }
        Some(self.values[row * self.cols + col])
    }
}

#[derive(Copy, Clone, Debug)]
struct Sample {
    lon_deg: f64,
    lat_deg: f64,
    elevation_m: f64,
}

impl RTreeObject for Sample {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point([self.lon_deg, self.lat_deg])
    }
}

impl PointDistance for Sample {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.lon_deg - point[0];
        let dy = self.lat_deg - point[1];
        dx * dx + dy * dy
    }
}

/// A fitted elevation field over an airport's extended bounds.
pub struct AptSurface {
    samples: RTree<Sample>,
    neighbors: usize,
    fallback_elevation_m: f64,
}

/// Default grid resolution used to sample the DEM stack, in degrees
/// (~10 m at mid-latitudes).
pub const DEFAULT_GRID_STEP_DEG: f64 = 1.0e-4;
const DEFAULT_NEIGHBORS: usize = 6;

impl AptSurface {
    /// Builds a surface over `[min_lon, max_lon] x [min_lat, max_lat]` by
    /// sampling `sources` (highest priority first) on a regular grid at
    /// `grid_step_deg`. At least one source must produce at least one
    /// in-bounds sample, or construction fails — once it succeeds,
    /// [`AptSurface::query`] never fails (spec §4.G).
    pub fn new(
        sources: &[&dyn DemSource],
        min_lon: f64,
        min_lat: f64,
        max_lon: f64,
        max_lat: f64,
        grid_step_deg: f64,
    ) -> Result<Self, Error> {
        if sources.is_empty() {
            return Err(Error::InputFormat("no DEM sources supplied".into()));
        }
        if grid_step_deg <= 0.0 || max_lon <= min_lon || max_lat <= min_lat {
            return Err(Error::InputFormat("degenerate AptSurface bounds".into()));
        }

        let cols = ((max_lon - min_lon) / grid_step_deg).ceil() as usize + 1;
        let rows = ((max_lat - min_lat) / grid_step_deg).ceil() as usize + 1;

        let mut samples = Vec::with_capacity(cols * rows);
        for r in 0..rows {
            let lat = min_lat + r as f64 * grid_step_deg;
            for c in 0..cols {
                let lon = min_lon + c as f64 * grid_step_deg;
                if let Some(elevation_m) = sample_stack(sources, lon, lat) {
                    samples.push(Sample {
                        lon_deg: lon,
                        lat_deg: lat,
                        elevation_m,
                    });
                }
            }
        }

        if samples.is_empty() {
            return Err(Error::GeometricDegeneracy(
                "no DEM source covered the requested AptSurface bounds".into(),
            ));
        }

        let fallback_elevation_m = samples.iter().map(|s| s.elevation_m).sum::<f64>() / samples.len() as f64;

        Ok(Self {
            samples: RTree::bulk_load(samples),
            neighbors: DEFAULT_NEIGHBORS,
            fallback_elevation_m,
        })
    }

    /// Smooth elevation at `(lon, lat)` via inverse-distance-squared
    /// weighting of the nearest retained grid samples. Never fails once
    /// construction has succeeded.
    pub fn query(&self, lon_deg: f64, lat_deg: f64) -> f64 {
        let point = [lon_deg, lat_deg];
        let mut weight_sum = 0.0;
        let mut value_sum = 0.0;
        let mut exact = None;

        for sample in self.samples.nearest_neighbor_iter(&point).take(self.neighbors) {
            let d2 = sample.distance_2(&point);
            if d2 < 1.0e-18 {
                exact = Some(sample.elevation_m);
                break;
            }
            let weight = 1.0 / d2;
            weight_sum += weight;
            value_sum += weight * sample.elevation_m;
        }

        if let Some(e) = exact {
            return e;
        }
        if weight_sum <= 0.0 {
            return self.fallback_elevation_m;
        }
        value_sum / weight_sum
    }
}

fn sample_stack(sources: &[&dyn DemSource], lon_deg: f64, lat_deg: f64) -> Option<f64> {
    sources.iter().find_map(|s| s.sample(lon_deg, lat_deg))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_dem_query_returns_constant() {
        let dem = GridDem::flat(-1.0, -1.0, 0.01, 300, 300, 100.0);
        let sources: Vec<&dyn DemSource> = vec![&dem];
        let surface = AptSurface::new(&sources, -0.01, -0.01, 0.01, 0.01, 0.001).unwrap();
        let e = surface.query(0.0, 0.0);
        assert!((e - 100.0).abs() < 1e-6);
    }

    #[test]
    fn lower_priority_source_fills_gaps() {
        let primary = GridDem::new(100.0, 100.0, 0.01, 1, 1, vec![500.0]);
        let fallback = GridDem::flat(-1.0, -1.0, 0.01, 300, 300, 50.0);
        let sources: Vec<&dyn DemSource> = vec![&primary, &fallback];
        let surface = AptSurface::new(&sources, -0.01, -0.01, 0.01, 0.01, 0.001).unwrap();
        let e = surface.query(0.0, 0.0);
        assert!((e - 50.0).abs() < 1e-6);
    }

    #[test]
    fn no_coverage_is_an_error() {
        let dem = GridDem::new(100.0, 100.0, 0.01, 1, 1, vec![500.0]);
        let sources: Vec<&dyn DemSource> = vec![&dem];
        let result = AptSurface::new(&sources, -0.01, -0.01, 0.01, 0.01, 0.001);
        assert!(result.is_err());
    }

    #[test]
    fn query_is_deterministic() {
        let dem = GridDem::flat(-1.0, -1.0, 0.01, 300, 300, 75.0);
        let sources: Vec<&dyn DemSource> = vec![&dem];
        let surface = AptSurface::new(&sources, -0.01, -0.01, 0.01, 0.01, 0.001).unwrap();
        let a = surface.query(0.0034, -0.0012);
        let b = surface.query(0.0034, -0.0012);
        assert_eq!(a, b);
    }

    #[test]
    fn interpolates_between_gradient_samples() {
        let mut values = Vec::new();
        for r in 0..50 {
            for _ in 0..50 {
                values.push(r as f64);
            }
        }
        let dem = GridDem::new(-0.01, -0.01, 0.001, 50, 50, values);
        let sources: Vec<&dyn DemSource> = vec![&dem];
        let surface = AptSurface::new(&sources, -0.01, -0.01, 0.009, 0.009, 0.001).unwrap();
        let low = surface.query(0.0, -0.009);
        let high = surface.query(0.0, 0.009);
        assert!(high > low);
    }
}
