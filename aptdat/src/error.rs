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

/// Input-format errors (spec §7): always attributable to a specific
/// source line, always fatal to the airport currently being read, never
/// to the whole run.
#[derive(Clone, Debug, PartialEq)]
pub enum Error {
    Io(String),
    /// A record had fewer whitespace-delimited fields than its code
    /// requires.
    ShortRecord { line: usize, code: String },
    /// A field that should parse as a number (or a recognized code)
    /// did not.
    BadField {
        line: usize,
        field: &'static str,
        value: String,
    },
    /// A node sub-record (111-116) appeared outside of a pavement,
    /// boundary or linear-feature block.
    NodeOutsideBlock { line: usize },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(msg) => write!(f, "io error: {msg}"),
            Self::ShortRecord { line, code } => {
                write!(f, "line {line}: record {code} has too few fields")
            }
            Self::BadField { line, field, value } => write!(
                f,
                "line {line}: field `{field}` has invalid value `{value}`"
            ),
            Self::NodeOutsideBlock { line } => {
                write!(f, "line {line}: node record outside pavement/boundary/feature block")
            }
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}
