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

//! Parser for the line-oriented airport description format that feeds
//! `aptcore`'s builder. This crate only tokenizes and types records; it
//! has no geometry-construction logic of its own beyond the geodetic
//! point type it borrows from `aptgeo`.

pub mod error;
pub mod parser;
pub mod records;

pub use error::Error;
pub use parser::{parse_file, parse_str};
pub use records::{
    Airport, AirportHeader, AirportKind, ApproachLights, LinearFeature, Marking, PavementBoundary,
    PavementNode, Runway, RunwayEnd, RunwayKind, Surface,
};
