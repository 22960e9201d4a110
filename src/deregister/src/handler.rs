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

use crate::event::{StateChangeDetail, TERMINATED_STATE};
use crate::inventory::{InstanceSource, LookupError};
use crate::registry::{InitError, MachineRegistry, RegistryFactory};
use std::sync::Arc;
use tokio::sync::OnceCell;

/// The instance tag naming the Octopus machine to deregister.
pub const NAME_TAG: &str = "octopus_name";

/// How an invocation that did not fail ended.
#[derive(Clone, Debug, PartialEq)]
pub enum Outcome {
    /// The machine was deleted from the Octopus server.
    Deregistered { machine_id: String },
    /// The event did not apply; nothing was deleted. Reported as success so
    /// the triggering system does not redeliver the event.
    Skipped(SkipReason),
}

/// Why an event did not lead to a deregistration.
#[derive(Clone, Debug, PartialEq)]
pub enum SkipReason {
    /// The instance is in a state other than `terminated`.
    WrongState { state: String },
    /// The inventory has no record of the instance.
    InstanceNotFound { instance_id: String },
    /// The instance carries no `octopus_name` tag.
    NoNameTag { instance_id: String },
    /// No machine is registered under the resolved name.
    NoSuchMachine { name: String },
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::WrongState { state } => {
                write!(f, "received a {state:?} event; nothing to deregister")
            }
            Self::InstanceNotFound { instance_id } => {
                write!(f, "no instance found for {instance_id:?}")
            }
            Self::NoNameTag { instance_id } => {
                write!(f, "no {NAME_TAG} tag on instance {instance_id:?}")
            }
            Self::NoSuchMachine { name } => {
                write!(f, "no machine registered under the name {name:?}")
            }
        }
    }
}

/// The error type for a failed invocation.
///
/// Every variant identifies the failed stage and wraps the underlying cause.
/// The hosting runtime treats any of these as grounds for redelivery.
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum HandlerError {
    #[error(transparent)]
    InstanceLookup(#[from] LookupError),

    #[error(transparent)]
    ClientInit(#[from] InitError),

    #[error("failed to look up machine named {name:?}: {source}")]
    MachineLookup {
        name: String,
        #[source]
        source: octo_api::Error,
    },

    #[error("failed to delete machine {machine_id:?}: {source}")]
    Delete {
        machine_id: String,
        #[source]
        source: octo_api::Error,
    },
}

/// Orchestrates one deregistration.
///
/// A `Handler` is created fresh for every invocation and owns the lazy cell
/// for the Octopus client: the client is only constructed once an event
/// proves it is needed, the construction runs at most once per `Handler` no
/// matter how many callers ask for it concurrently, and its outcome (success
/// or failure) is shared by all of them.
pub struct Handler<I, F> {
    inventory: I,
    factory: F,
    registry: OnceCell<Result<Arc<dyn MachineRegistry>, InitError>>,
}

impl<I, F> Handler<I, F>
where
    I: InstanceSource,
    F: RegistryFactory,
{
    pub fn new(inventory: I, factory: F) -> Self {
        Self {
            inventory,
            factory,
            registry: OnceCell::new(),
        }
    }

    /// Handles one state-change notification.
    pub async fn handle(&self, detail: &StateChangeDetail) -> Result<Outcome, HandlerError> {
        if detail.state != TERMINATED_STATE {
            return Ok(self.skip(SkipReason::WrongState {
                state: detail.state.clone(),
            }));
        }

        tracing::info!(instance_id = %detail.instance_id, "looking up the Octopus name");
        let descriptor = match self.inventory.describe_instance(&detail.instance_id).await {
            Ok(descriptor) => descriptor,
            Err(LookupError::NotFound { instance_id }) => {
                return Ok(self.skip(SkipReason::InstanceNotFound { instance_id }));
            }
            Err(e) => return Err(e.into()),
        };
        let Some(name) = descriptor.tag_value(NAME_TAG).map(str::to_string) else {
            return Ok(self.skip(SkipReason::NoNameTag {
                instance_id: detail.instance_id.clone(),
            }));
        };
        tracing::info!(instance_id = %detail.instance_id, name = %name, "found Octopus name");

        let registry = self.registry().await?;
        let machine = match registry.find_machine_by_name(&name).await {
            Ok(Some(machine)) => machine,
            Ok(None) => return Ok(self.skip(SkipReason::NoSuchMachine { name })),
            Err(source) => return Err(HandlerError::MachineLookup { name, source }),
        };
        tracing::info!(machine_id = %machine.id, name = %name, "found machine");

        registry
            .delete_machine(&machine)
            .await
            .map_err(|source| HandlerError::Delete {
                machine_id: machine.id.clone(),
                source,
            })?;
        tracing::info!(machine_id = %machine.id, "deleted machine from the Octopus server");
        Ok(Outcome::Deregistered {
            machine_id: machine.id,
        })
    }

    /// Returns the Octopus client, constructing it on first use.
    ///
    /// The cell stores the `Result` itself, so a failed construction is
    /// cached exactly like a successful one: later callers see the original
    /// error without the secret fetch or the construction re-running.
    async fn registry(&self) -> Result<Arc<dyn MachineRegistry>, InitError> {
        self.registry
            .get_or_init(|| self.factory.create_registry())
            .await
            .clone()
    }

    fn skip(&self, reason: SkipReason) -> Outcome {
        tracing::info!("{reason}");
        Outcome::Skipped(reason)
    }
}
