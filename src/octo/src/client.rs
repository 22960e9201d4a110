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

use crate::Error;
use crate::model::Machine;
use std::time::Duration;

const API_KEY_HEADER: &str = "X-Octopus-ApiKey";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// A builder for [Client].
///
/// # Example
/// ```no_run
/// # use octo_api::Builder;
/// let client = Builder::new("https://octopus.example.com")
///     .with_api_key("API-XXXX")
///     .build()?;
/// # Ok::<(), octo_api::Error>(())
/// ```
pub struct Builder {
    endpoint: String,
    api_key: String,
    timeout: Duration,
}

impl Builder {
    /// Creates a builder for a client talking to `endpoint`.
    pub fn new<T: Into<String>>(endpoint: T) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: String::new(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Sets the API key sent with every request.
    pub fn with_api_key<T: Into<String>>(mut self, api_key: T) -> Self {
        self.api_key = api_key.into();
        self
    }

    /// Overrides the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Creates the client, validating the endpoint.
    pub fn build(self) -> Result<Client, Error> {
        // Parse only to validate. Paths are appended textually, so strip any
        // trailing slash to avoid `//api/...`.
        url::Url::parse(&self.endpoint).map_err(|source| Error::InvalidEndpoint {
            endpoint: self.endpoint.clone(),
            source,
        })?;
        let inner = reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(Error::Transport)?;
        Ok(Client {
            inner,
            endpoint: self.endpoint.trim_end_matches('/').to_string(),
            api_key: self.api_key,
        })
    }
}

/// A client for the Octopus Deploy REST API.
#[derive(Clone, Debug)]
pub struct Client {
    inner: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl Client {
    /// Looks up a machine by its exact name.
    ///
    /// Returns `Ok(None)` when no machine is registered under `name`. The
    /// server treats the `name` parameter as a partial match, so the results
    /// are filtered for an exact match before the first one is returned.
    pub async fn get_machine_by_name(&self, name: &str) -> Result<Option<Machine>, Error> {
        let response = self
            .inner
            .get(format!("{}/api/machines/all", self.endpoint))
            .query(&[("name", name)])
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await?;
        let response = Self::check_status(response)?;
        let machines = response
            .json::<Vec<Machine>>()
            .await
            .map_err(|e| Error::Deserialization(e.into()))?;
        Ok(machines.into_iter().find(|m| m.name == name))
    }

    /// Deletes a machine from the server.
    pub async fn delete_machine(&self, machine: &Machine) -> Result<(), Error> {
        let response = self
            .inner
            .delete(format!("{}/api/machines/{}", self.endpoint, machine.id))
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await?;
        Self::check_status(response)?;
        Ok(())
    }

    fn check_status(response: reqwest::Response) -> Result<reqwest::Response, Error> {
        if !response.status().is_success() {
            return Err(Error::Status {
                status: response.status(),
            });
        }
        Ok(response)
    }
}
