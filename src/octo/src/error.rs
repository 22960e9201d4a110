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

//! The error type for the Octopus Deploy client.

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The error type for [Client][crate::Client] operations.
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// The configured server endpoint is not a valid URL. The client cannot
    /// be constructed, let alone send requests.
    #[error("invalid Octopus server endpoint {endpoint:?}: {source}")]
    InvalidEndpoint {
        endpoint: String,
        #[source]
        source: url::ParseError,
    },

    /// The request could not be sent, or the response was not received.
    #[error("error communicating with the Octopus server: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with an unexpected HTTP status.
    #[error("unexpected HTTP status {status} from the Octopus server")]
    Status { status: reqwest::StatusCode },

    /// The response body could not be deserialized.
    #[error("error deserializing the Octopus server response: {0}")]
    Deserialization(#[source] BoxError),
}
