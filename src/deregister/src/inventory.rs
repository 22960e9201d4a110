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

use aws_sdk_ec2::operation::describe_instances::DescribeInstancesOutput;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A key/value tag attached to an instance.
#[derive(Clone, Debug, PartialEq)]
pub struct Tag {
    pub key: String,
    pub value: String,
}

/// The slice of an instance description this Lambda consumes.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InstanceDescriptor {
    pub instance_id: String,
    pub tags: Vec<Tag>,
}

impl InstanceDescriptor {
    /// The value of the first tag whose key matches `key` exactly.
    ///
    /// Absence is an expected outcome, not an error.
    pub fn tag_value(&self, key: &str) -> Option<&str> {
        self.tags
            .iter()
            .find(|tag| tag.key == key)
            .map(|tag| tag.value.as_str())
    }
}

/// The error type for instance lookups.
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum LookupError {
    /// The query succeeded but returned no matching instance.
    #[error("no result found for {instance_id}")]
    NotFound { instance_id: String },

    /// The query itself failed.
    #[error("failed to retrieve instance information for {instance_id}: {source}")]
    Upstream {
        instance_id: String,
        #[source]
        source: BoxError,
    },
}

/// Describes instances by id.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait InstanceSource: Send + Sync {
    async fn describe_instance(&self, instance_id: &str)
    -> Result<InstanceDescriptor, LookupError>;
}

/// An [InstanceSource] backed by the EC2 `DescribeInstances` API.
#[derive(Clone, Debug)]
pub struct Ec2Inventory {
    client: aws_sdk_ec2::Client,
}

impl Ec2Inventory {
    pub fn new(client: aws_sdk_ec2::Client) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl InstanceSource for Ec2Inventory {
    async fn describe_instance(
        &self,
        instance_id: &str,
    ) -> Result<InstanceDescriptor, LookupError> {
        let output = self
            .client
            .describe_instances()
            .instance_ids(instance_id)
            .send()
            .await
            .map_err(|e| LookupError::Upstream {
                instance_id: instance_id.to_string(),
                source: e.into(),
            })?;
        first_descriptor(output).ok_or_else(|| LookupError::NotFound {
            instance_id: instance_id.to_string(),
        })
    }
}

/// Shapes a `DescribeInstances` response into a descriptor.
///
/// An id-keyed query returns at most one reservation with one instance; a
/// response with no reservation and one with an empty reservation are the
/// same outcome for the caller.
fn first_descriptor(output: DescribeInstancesOutput) -> Option<InstanceDescriptor> {
    let instance = output
        .reservations
        .unwrap_or_default()
        .into_iter()
        .next()?
        .instances
        .unwrap_or_default()
        .into_iter()
        .next()?;
    let tags = instance
        .tags
        .unwrap_or_default()
        .into_iter()
        .filter_map(|tag| match (tag.key, tag.value) {
            (Some(key), Some(value)) => Some(Tag { key, value }),
            _ => None,
        })
        .collect();
    Some(InstanceDescriptor {
        instance_id: instance.instance_id.unwrap_or_default(),
        tags,
    })
}
