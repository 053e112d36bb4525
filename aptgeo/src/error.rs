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

/// Geometric-degeneracy errors raised by the polygon algebra and
/// topology repair layers (see spec §7: these are always fatal to the
/// one airport/polygon being processed, never to the whole run).
#[derive(Clone, Debug, PartialEq)]
pub enum Error {
    /// `expand` produced more than one output contour.
    ExpandProducedMultipleContours { contours: usize },
    /// A contour has fewer than 3 vertices after an operation that
    /// should have preserved validity.
    DegenerateContour { size: usize },
    /// A constrained edge could not be inserted into the triangulation
    /// (it crosses another constrained edge or is degenerate).
    BadConstraint,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ExpandProducedMultipleContours { contours } => write!(
                f,
                "expand produced {contours} contours, expected exactly 1"
            ),
            Self::DegenerateContour { size } => {
                write!(f, "contour has {size} vertices, need at least 3")
            }
            Self::BadConstraint => write!(f, "could not insert constrained edge into triangulation"),
        }
    }
}

impl std::error::Error for Error {}
