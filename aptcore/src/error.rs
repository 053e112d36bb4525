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

use std::fmt;

/// The four error kinds of spec §7. `InputFormat` and `GeometricDegeneracy`
/// and most `Io` variants are fatal only to the airport that raised
/// them; `InvariantViolation` indicates a bug and should abort the
/// airport with a polygon dump; the shared-counter `Io` case is the one
/// exception that the orchestrator must treat as fatal to the whole run.
#[derive(Debug)]
pub enum Error {
    /// Unknown surface flag, unknown marking code, short record.
    InputFormat(String),
    /// `expand` produced more than one contour, a skirt node was
    /// missing, a pavement polygon came back empty after clipping.
    GeometricDegeneracy(String),
    /// A DEM source could not be read, or output could not be written.
    Io(String),
    /// A contour had fewer than 3 vertices after repair, wrong
    /// orientation, or a duplicate survived — always a bug.
    InvariantViolation(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InputFormat(msg) => write!(f, "input format error: {msg}"),
            Self::GeometricDegeneracy(msg) => write!(f, "geometric degeneracy: {msg}"),
            Self::Io(msg) => write!(f, "io error: {msg}"),
            Self::InvariantViolation(msg) => write!(f, "invariant violation: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<aptgeo::Error> for Error {
    fn from(e: aptgeo::Error) -> Self {
        Self::GeometricDegeneracy(e.to_string())
    }
}

impl From<aptdat::Error> for Error {
    fn from(e: aptdat::Error) -> Self {
        Self::InputFormat(e.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}
