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

/// The state an instance must be in to trigger a deregistration. Every other
/// state is valid but ignored.
pub const TERMINATED_STATE: &str = "terminated";

/// An "EC2 Instance State-change Notification" as delivered by EventBridge.
///
/// Decoding is forward compatible: unknown fields are ignored, and missing
/// fields decode to empty values rather than failing. The `id` and `region`
/// fields are carried for log context only.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct StateChangeEnvelope {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub detail: StateChangeDetail,
}

/// The inner payload describing the state change.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct StateChangeDetail {
    #[serde(rename = "instance-id", default)]
    pub instance_id: String,
    #[serde(default)]
    pub state: String,
}

/// The event payload could not be parsed into a [StateChangeEnvelope].
///
/// Redelivering the same payload will not help, but the hosting runtime does
/// not distinguish: any invocation error may cause a redelivery.
#[derive(thiserror::Error, Debug)]
#[error("failed to decode state change notification: {0}")]
pub struct DecodeError(#[from] serde_json::Error);

impl StateChangeEnvelope {
    /// Decodes a raw event payload.
    pub fn parse(payload: &[u8]) -> Result<Self, DecodeError> {
        serde_json::from_slice(payload).map_err(DecodeError)
    }

    /// Decodes an event payload already parsed into a JSON value, as handed
    /// over by the Lambda runtime.
    pub fn from_value(payload: serde_json::Value) -> Result<Self, DecodeError> {
        serde_json::from_value(payload).map_err(DecodeError)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // The sample payload from the EventBridge documentation.
    const SAMPLE: &[u8] = br#"{
      "id": "7bf73129-1428-4cd3-a780-95db273d1602",
      "detail-type": "EC2 Instance State-change Notification",
      "source": "aws.ec2",
      "account": "123456789012",
      "time": "2015-11-11T21:29:54Z",
      "region": "us-east-1",
      "resources": [
        "arn:aws:ec2:us-east-1:123456789012:instance/i-abcd1111"
      ],
      "detail": {
        "instance-id": "i-abcd1111",
        "state": "pending"
      }
    }"#;

    #[test]
    fn parses_envelope() -> anyhow::Result<()> {
        let envelope = StateChangeEnvelope::parse(SAMPLE)?;
        assert_eq!(envelope.id, "7bf73129-1428-4cd3-a780-95db273d1602");
        assert_eq!(envelope.region, "us-east-1");
        Ok(())
    }

    #[test]
    fn parses_detail() -> anyhow::Result<()> {
        let envelope = StateChangeEnvelope::parse(SAMPLE)?;
        assert_eq!(envelope.detail.instance_id, "i-abcd1111");
        assert_eq!(envelope.detail.state, "pending");
        Ok(())
    }

    #[test]
    fn parses_from_value() -> anyhow::Result<()> {
        let value: serde_json::Value = serde_json::from_slice(SAMPLE)?;
        let envelope = StateChangeEnvelope::from_value(value)?;
        assert_eq!(envelope.detail.instance_id, "i-abcd1111");
        Ok(())
    }

    #[test]
    fn missing_fields_decode_to_empty_values() -> anyhow::Result<()> {
        let envelope = StateChangeEnvelope::parse(br#"{"region": "eu-west-1"}"#)?;
        assert_eq!(envelope.region, "eu-west-1");
        assert_eq!(envelope.id, "");
        assert_eq!(envelope.detail, StateChangeDetail::default());
        Ok(())
    }

    #[test]
    fn malformed_payload_is_an_error() {
        let err = StateChangeEnvelope::parse(b"{not json").unwrap_err();
        assert!(err.to_string().contains("failed to decode"), "{err}");
    }

    #[test]
    fn wrong_top_level_type_is_an_error() {
        StateChangeEnvelope::parse(b"[1, 2, 3]").unwrap_err();
    }
}
