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

//! The typed record model (spec §3, §6) that [`crate::parser`] produces.

use aptgeo::GeoPoint;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Which of the three airport-header record codes introduced this
/// airport.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AirportKind {
    Land,
    Sea,
    Heliport,
}

/// The `1`/`16`/`17` header record.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AirportHeader {
    pub kind: AirportKind,
    pub elevation_ft: f64,
    pub icao: String,
    pub name: String,
}

/// Runway/taxiway surface material, numeric codes per the apt.dat
/// surface-type table.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Surface {
    Asphalt,
    Concrete,
    Turf,
    Dirt,
    Gravel,
    DryLakebed,
    Water,
    Snow,
    Transparent,
    Other(u8),
}

impl Surface {
    pub fn from_code(code: u8) -> Self {
        match code {
            1 => Self::Asphalt,
            2 => Self::Concrete,
            3 => Self::Turf,
            4 => Self::Dirt,
            5 => Self::Gravel,
            12 => Self::DryLakebed,
            13 => Self::Water,
            14 => Self::Snow,
            15 => Self::Transparent,
            other => Self::Other(other),
        }
    }
}

/// Pavement markings painted on one runway end, numeric code per the
/// apt.dat marking table (0 = none).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Marking(pub u8);

impl Marking {
    pub const NONE: Marking = Marking(0);

    pub fn is_precision(&self) -> bool {
        matches!(self.0, 3 | 5)
    }

    pub fn is_non_precision(&self) -> bool {
        matches!(self.0, 2 | 4)
    }
}

/// Approach-light system on one runway end, numeric code per the
/// apt.dat approach-lighting table. Negative and unrecognized codes
/// (e.g. -1 "not supported by database") are preserved as [`Self::Unsupported`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ApproachLights {
    None,
    AlsfI,
    AlsfII,
    CalvertI,
    CalvertII,
    Ssalr,
    Ssalf,
    Sals,
    Malsr,
    Malsf,
    Malsx,
    Odals,
    Rail,
    Unsupported(i32),
}

impl ApproachLights {
    pub fn from_code(code: i32) -> Self {
        match code {
            0 => Self::None,
            1 => Self::AlsfI,
            2 => Self::AlsfII,
            3 => Self::CalvertI,
            4 => Self::CalvertII,
            5 => Self::Ssalr,
            6 => Self::Ssalf,
            7 => Self::Sals,
            8 => Self::Malsr,
            9 => Self::Malsf,
            10 => Self::Malsx,
            11 => Self::Odals,
            12 => Self::Rail,
            other => Self::Unsupported(other),
        }
    }
}

/// One runway threshold.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RunwayEnd {
    pub ident: String,
    pub lat_deg: f64,
    pub lon_deg: f64,
    pub threshold_m: f64,
    pub overrun_m: f64,
    pub marking: Marking,
    pub approach_lights: ApproachLights,
    pub tz_lights: bool,
    pub reil: bool,
}

impl RunwayEnd {
    pub fn point(&self) -> GeoPoint {
        GeoPoint::flat(self.lon_deg, self.lat_deg)
    }
}

/// Which code (100/101/102) introduced a [`Runway`] record.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RunwayKind {
    Land,
    Water,
    Helipad,
}

/// A `100`/`101`/`102` runway record: the pair of thresholds plus every
/// per-runway attribute needed by the geometry and lighting generators.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Runway {
    pub kind: RunwayKind,
    pub width_m: f64,
    pub surface: Surface,
    pub shoulder: u8,
    pub smoothness: f64,
    pub centerline_lights: bool,
    pub edge_lights: u8,
    pub dist_remain_signs: bool,
    pub ends: [RunwayEnd; 2],
    /// Set by the caller, not the parser: whether this record should be
    /// treated as a taxiway-like surface for pass ordering (spec §4.E).
    pub is_taxiway: bool,
}

/// A boundary/pavement node sub-record (111-116).
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PavementNode {
    pub point: GeoPoint,
    pub bezier_control: Option<GeoPoint>,
    /// True for 113/114 (close node): this node is the last of the
    /// ring and the ring is implicitly closed.
    pub closes_ring: bool,
    /// True for 115/116 (terminating node): this node ends an open
    /// shape (used by linear features), not a closed ring.
    pub terminates: bool,
}

/// A `110` pavement block or `130` boundary block: a surface type plus
/// an ordered list of node sub-records describing one ring.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PavementBoundary {
    pub surface: Surface,
    pub texture_heading_deg: f64,
    pub nodes: Vec<PavementNode>,
    /// True for a `130` boundary record, false for `110` pavement.
    pub is_boundary: bool,
}

/// A `120` linear feature: a named line style plus its node list.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LinearFeature {
    pub description: String,
    pub nodes: Vec<PavementNode>,
}

/// Every record belonging to one airport, as produced by the parser.
/// Grouping starts at a header record and ends at the next header or
/// end-of-file.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Airport {
    pub header: Option<AirportHeader>,
    pub runways: Vec<Runway>,
    pub pavements: Vec<PavementBoundary>,
    pub boundary: Option<PavementBoundary>,
    pub linear_features: Vec<LinearFeature>,
}

impl Airport {
    pub fn id(&self) -> &str {
        self.header.as_ref().map(|h| h.icao.as_str()).unwrap_or("")
    }
}
