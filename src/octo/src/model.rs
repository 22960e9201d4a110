// Copyright 2025 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use serde::Deserialize;

/// A machine (deployment target) registered with an Octopus Deploy server.
///
/// The server returns many more fields; only the ones this crate consumes are
/// deserialized, and unknown fields are ignored so newer server versions do
/// not break decoding.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct Machine {
    /// The server-assigned machine identifier, e.g. `Machines-42`.
    #[serde(rename = "Id", default)]
    pub id: String,

    /// The human-readable machine name.
    #[serde(rename = "Name", default)]
    pub name: String,
}
