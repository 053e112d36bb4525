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

//! Airport surface construction: turns parsed `aptdat` records into
//! tile-indexed binary scenery objects.

pub mod btg;
pub mod builder;
pub mod chop;
pub mod counter;
pub mod error;
pub mod lighting;
pub mod runway;
pub mod superpoly;
pub mod surface;

pub use builder::{build_airport, BuildOptions, BuildOutcome};
pub use error::Error;
pub use superpoly::Superpoly;
