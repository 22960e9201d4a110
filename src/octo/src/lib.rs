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

//! A minimal client for the [Octopus Deploy] REST API.
//!
//! This crate implements the small slice of the API needed to deregister
//! deployment targets: looking up a machine by name and deleting a machine.
//! Requests authenticate with an API key sent in the `X-Octopus-ApiKey`
//! header.
//!
//! [Octopus Deploy]: https://octopus.com/docs/octopus-rest-api

pub mod client;
pub mod error;
pub mod model;

pub use client::{Builder, Client};
pub use error::Error;
pub use model::Machine;

// Re-exported for applications that need to inspect `Error::Status`.
pub use reqwest::StatusCode;
