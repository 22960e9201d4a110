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

//! Deregisters Octopus Deploy machines when their EC2 instances terminate.
//!
//! The Lambda subscribes to EC2 instance state-change notifications. For a
//! `terminated` instance it looks up the instance's `octopus_name` tag, finds
//! the Octopus machine registered under that name, and deletes it. Events
//! that do not apply (wrong state, untagged instance, unknown machine) finish
//! successfully with a log line, so the triggering system does not redeliver
//! them; only genuine infrastructure failures surface as invocation errors.
//!
//! The Octopus client needs an API key stored in S3. Fetching the key and
//! constructing the client is deferred until an event actually requires the
//! client, and runs at most once per invocation (see [handler::Handler]).

/// Environment-derived configuration, validated at startup.
pub mod config;

/// Decoding of EC2 instance state-change notifications.
pub mod event;

/// The orchestration of one deregistration.
pub mod handler;

/// Instance descriptions and tag lookup, backed by EC2.
pub mod inventory;

/// The machine registry capability set and its credential-backed factory.
pub mod registry;

/// Retrieval of the API key from S3.
pub mod secrets;

pub use config::Config;
pub use event::StateChangeEnvelope;
pub use handler::{Handler, HandlerError, Outcome};
