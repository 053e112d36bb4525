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

//! The deduplicated node table (spec §3), modeled on `TGNodes`'
//! `unique_add`/`find` pair: every vertex that ends up in the final
//! scenery object passes through here exactly once.
//!
//! Lookup is grid-bucketed by [`SG_EPSILON`] cell rather than backed by
//! a kd-tree, since `aptgeo` has no spatial-index dependency of its own
//! (`aptcore`, one layer up, uses `rstar` where it needs range queries
//! over already-triangulated meshes).

use std::collections::HashMap;

use crate::point::GeoPoint;
use crate::SG_EPSILON;

/// The kind of node, mirroring the distinction the original keeps
/// between surface-derived and interpolated vertices so elevation
/// recomputation can skip nodes that already carry an authoritative
/// height.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NodeKind {
    /// Height comes from the DEM/terrain surface query.
    Terrain,
    /// Height was assigned directly (e.g. a runway threshold elevation
    /// from the airport description).
    Fixed,
    /// Height is interpolated from neighboring nodes.
    Interpolated,
}

fn cell_key(lon_deg: f64, lat_deg: f64) -> (i64, i64) {
    (
        (lon_deg / SG_EPSILON).round() as i64,
        (lat_deg / SG_EPSILON).round() as i64,
    )
}

/// A deduplicated table of [`GeoPoint`]s with unique-insert semantics.
#[derive(Clone, Debug, Default)]
pub struct NodeTable {
    points: Vec<GeoPoint>,
    kinds: Vec<NodeKind>,
    index: HashMap<(i64, i64), Vec<usize>>,
}

impl NodeTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Finds the index of an existing point within [`SG_EPSILON`] of
    /// `p`, or `None`.
    pub fn find(&self, p: &GeoPoint) -> Option<usize> {
        let key = cell_key(p.lon_deg, p.lat_deg);
        for dx in -1..=1 {
            for dy in -1..=1 {
                if let Some(bucket) = self.index.get(&(key.0 + dx, key.1 + dy)) {
                    for &idx in bucket {
                        if self.points[idx].close_to(p) {
                            return Some(idx);
                        }
                    }
                }
            }
        }
        None
    }

    /// Inserts `p` if no existing point is within epsilon, otherwise
    /// returns the existing index. Either way returns the node's final
    /// index.
    pub fn unique_add(&mut self, p: GeoPoint, kind: NodeKind) -> usize {
        if let Some(idx) = self.find(&p) {
            return idx;
        }
        let idx = self.points.len();
        let key = cell_key(p.lon_deg, p.lat_deg);
        self.points.push(p);
        self.kinds.push(kind);
        self.index.entry(key).or_default().push(idx);
        idx
    }

    pub fn get(&self, idx: usize) -> Option<&GeoPoint> {
        self.points.get(idx)
    }

    pub fn kind(&self, idx: usize) -> Option<NodeKind> {
        self.kinds.get(idx).copied()
    }

    /// Overwrites the elevation of an existing node, e.g. after a
    /// terrain-surface query resolves its height.
    pub fn set_elevation(&mut self, idx: usize, elevation_m: f64, kind: NodeKind) {
        if let Some(p) = self.points.get_mut(idx) {
            p.elevation_m = elevation_m;
        }
        if let Some(k) = self.kinds.get_mut(idx) {
            *k = kind;
        }
    }

    pub fn points(&self) -> &[GeoPoint] {
        &self.points
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &GeoPoint)> {
        self.points.iter().enumerate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unique_add_dedups_close_points() {
        let mut nodes = NodeTable::new();
        let a = nodes.unique_add(GeoPoint::flat(9.0, 53.0), NodeKind::Fixed);
        let b = nodes.unique_add(GeoPoint::flat(9.0000001, 53.0000001), NodeKind::Fixed);
        assert_eq!(a, b);
        assert_eq!(nodes.len(), 1);
    }

    #[test]
    fn unique_add_keeps_distinct_points() {
        let mut nodes = NodeTable::new();
        let a = nodes.unique_add(GeoPoint::flat(9.0, 53.0), NodeKind::Fixed);
        let b = nodes.unique_add(GeoPoint::flat(9.01, 53.0), NodeKind::Fixed);
        assert_ne!(a, b);
        assert_eq!(nodes.len(), 2);
    }

    #[test]
    fn find_returns_none_for_missing_point() {
        let mut nodes = NodeTable::new();
        nodes.unique_add(GeoPoint::flat(9.0, 53.0), NodeKind::Fixed);
        assert!(nodes.find(&GeoPoint::flat(50.0, 10.0)).is_none());
    }

    #[test]
    fn set_elevation_updates_existing_node() {
        let mut nodes = NodeTable::new();
        let idx = nodes.unique_add(GeoPoint::flat(9.0, 53.0), NodeKind::Interpolated);
        nodes.set_elevation(idx, 123.4, NodeKind::Terrain);
        assert_eq!(nodes.get(idx).unwrap().elevation_m, 123.4);
        assert_eq!(nodes.kind(idx), Some(NodeKind::Terrain));
    }
}
