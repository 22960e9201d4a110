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

use lambda_runtime::{Error, LambdaEvent, run, service_fn};
use octopus_deregister::config::Config;
use octopus_deregister::event::StateChangeEnvelope;
use octopus_deregister::handler::{Handler, Outcome};
use octopus_deregister::inventory::Ec2Inventory;
use octopus_deregister::registry::OctoRegistryFactory;
use octopus_deregister::secrets::S3SecretStore;
use serde_json::Value;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .json()
        .with_max_level(tracing::Level::INFO)
        .init();

    // Fail at startup, not per event, when the deployment is misconfigured.
    let config = Config::from_env()?;
    let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let ec2 = aws_sdk_ec2::Client::new(&aws_config);
    let s3 = aws_sdk_s3::Client::new(&aws_config);

    run(service_fn(|event| {
        function_handler(event, &ec2, &s3, &config)
    }))
    .await
}

async fn function_handler(
    event: LambdaEvent<Value>,
    ec2: &aws_sdk_ec2::Client,
    s3: &aws_sdk_s3::Client,
    config: &Config,
) -> Result<(), Error> {
    let envelope = StateChangeEnvelope::from_value(event.payload)?;
    tracing::info!(
        id = %envelope.id,
        region = %envelope.region,
        instance_id = %envelope.detail.instance_id,
        state = %envelope.detail.state,
        "received state change notification"
    );

    // The Handler, and with it the lazily constructed Octopus client, lives
    // for exactly one invocation.
    let handler = Handler::new(
        Ec2Inventory::new(ec2.clone()),
        OctoRegistryFactory::new(S3SecretStore::new(s3.clone()), config.clone()),
    );
    match handler.handle(&envelope.detail).await? {
        Outcome::Deregistered { machine_id } => {
            tracing::info!(machine_id = %machine_id, "machine deregistered");
        }
        // Already logged with its reason; nothing else to do.
        Outcome::Skipped(_) => {}
    }
    Ok(())
}
