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

use crate::config::Config;
use crate::secrets::{SecretError, SecretStore};
use std::sync::Arc;

pub use octo_api::Machine;

/// The fleet-management operations the orchestrator needs.
///
/// Modeled as a named capability set so test doubles substitute for the real
/// Octopus client.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MachineRegistry: Send + Sync {
    /// Finds the machine registered under `name`, if any.
    async fn find_machine_by_name(&self, name: &str) -> Result<Option<Machine>, octo_api::Error>;

    /// Deletes a machine from the registry.
    async fn delete_machine(&self, machine: &Machine) -> Result<(), octo_api::Error>;
}

#[async_trait::async_trait]
impl MachineRegistry for octo_api::Client {
    async fn find_machine_by_name(&self, name: &str) -> Result<Option<Machine>, octo_api::Error> {
        self.get_machine_by_name(name).await
    }

    async fn delete_machine(&self, machine: &Machine) -> Result<(), octo_api::Error> {
        octo_api::Client::delete_machine(self, machine).await
    }
}

/// The error type for registry construction.
///
/// Construction results are cached for the lifetime of a
/// [Handler][crate::Handler], failures included, so every caller of the lazy
/// cell observes the same outcome. That requires `Clone`, hence the
/// `Arc`-wrapped sources.
#[derive(Clone, Debug)]
#[non_exhaustive]
pub enum InitError {
    /// The API key object could not be retrieved.
    SecretFetch(Arc<SecretError>),
    /// The API key object stream could not be fully read.
    SecretRead(Arc<SecretError>),
    /// The Octopus client itself could not be constructed.
    ClientConstruction(Arc<octo_api::Error>),
}

impl std::fmt::Display for InitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SecretFetch(e) | Self::SecretRead(e) => write!(f, "{e}"),
            Self::ClientConstruction(e) => {
                write!(f, "failed to construct the Octopus client: {e}")
            }
        }
    }
}

impl std::error::Error for InitError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::SecretFetch(e) | Self::SecretRead(e) => Some(e.as_ref()),
            Self::ClientConstruction(e) => Some(e.as_ref()),
        }
    }
}

impl From<SecretError> for InitError {
    fn from(value: SecretError) -> Self {
        match value {
            e @ SecretError::Fetch { .. } => Self::SecretFetch(Arc::new(e)),
            e => Self::SecretRead(Arc::new(e)),
        }
    }
}

/// Builds a [MachineRegistry] on demand.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait RegistryFactory: Send + Sync {
    async fn create_registry(&self) -> Result<Arc<dyn MachineRegistry>, InitError>;
}

/// The production [RegistryFactory]: fetches the Octopus API key from the
/// secret store and constructs an [octo_api::Client] against the configured
/// server.
pub struct OctoRegistryFactory<S> {
    secrets: S,
    config: Config,
}

impl<S> OctoRegistryFactory<S> {
    pub fn new(secrets: S, config: Config) -> Self {
        Self { secrets, config }
    }
}

#[async_trait::async_trait]
impl<S: SecretStore> RegistryFactory for OctoRegistryFactory<S> {
    async fn create_registry(&self) -> Result<Arc<dyn MachineRegistry>, InitError> {
        tracing::info!(
            bucket = %self.config.api_key_bucket,
            key = %self.config.api_key_path,
            "fetching the Octopus API key"
        );
        let api_key = self
            .secrets
            .fetch_secret(&self.config.api_key_bucket, &self.config.api_key_path)
            .await?;
        tracing::info!("got the Octopus API key");

        let client = octo_api::Builder::new(&self.config.server_uri)
            .with_api_key(api_key)
            .build()
            .map_err(|e| InitError::ClientConstruction(Arc::new(e)))?;
        Ok(Arc::new(client))
    }
}
