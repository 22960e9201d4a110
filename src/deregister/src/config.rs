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

/// The S3 bucket holding the Octopus API key.
pub const API_KEY_BUCKET_VAR: &str = "OCTOPUS_API_KEY_BUCKET";
/// The S3 object key of the Octopus API key.
pub const API_KEY_PATH_VAR: &str = "OCTOPUS_API_KEY_PATH";
/// The Octopus server URI.
pub const SERVER_URI_VAR: &str = "OCTOPUS_URI";

/// The environment-derived configuration of the Lambda.
///
/// All variables are required. [Config::from_env] runs before the first event
/// is served, so a misconfigured deployment fails at startup rather than on
/// every delivery.
#[derive(Clone, Debug)]
pub struct Config {
    pub api_key_bucket: String,
    pub api_key_path: String,
    pub server_uri: String,
}

/// A required environment variable is unset or empty.
#[derive(thiserror::Error, Debug, PartialEq)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("no {0} defined")]
    Missing(&'static str),
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            api_key_bucket: required(API_KEY_BUCKET_VAR)?,
            api_key_path: required(API_KEY_PATH_VAR)?,
            server_uri: required(SERVER_URI_VAR)?,
        })
    }
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    std::env::var(name)
        .ok()
        .filter(|value| !value.is_empty())
        .ok_or(ConfigError::Missing(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use scoped_env::ScopedEnv;

    #[test]
    #[serial_test::serial]
    fn from_env_with_all_variables() -> anyhow::Result<()> {
        let _b = ScopedEnv::set(API_KEY_BUCKET_VAR, "secrets-bucket");
        let _p = ScopedEnv::set(API_KEY_PATH_VAR, "octopus/api-key");
        let _u = ScopedEnv::set(SERVER_URI_VAR, "https://octopus.example.com");

        let config = Config::from_env()?;
        assert_eq!(config.api_key_bucket, "secrets-bucket");
        assert_eq!(config.api_key_path, "octopus/api-key");
        assert_eq!(config.server_uri, "https://octopus.example.com");
        Ok(())
    }

    #[test]
    #[serial_test::serial]
    fn from_env_missing_bucket() {
        let _b = ScopedEnv::remove(API_KEY_BUCKET_VAR);
        let _p = ScopedEnv::set(API_KEY_PATH_VAR, "octopus/api-key");
        let _u = ScopedEnv::set(SERVER_URI_VAR, "https://octopus.example.com");

        let err = Config::from_env().unwrap_err();
        assert_eq!(err, ConfigError::Missing(API_KEY_BUCKET_VAR));
        assert_eq!(err.to_string(), "no OCTOPUS_API_KEY_BUCKET defined");
    }

    #[test]
    #[serial_test::serial]
    fn from_env_missing_path() {
        let _b = ScopedEnv::set(API_KEY_BUCKET_VAR, "secrets-bucket");
        let _p = ScopedEnv::remove(API_KEY_PATH_VAR);
        let _u = ScopedEnv::set(SERVER_URI_VAR, "https://octopus.example.com");

        let err = Config::from_env().unwrap_err();
        assert_eq!(err, ConfigError::Missing(API_KEY_PATH_VAR));
    }

    #[test]
    #[serial_test::serial]
    fn from_env_empty_uri() {
        let _b = ScopedEnv::set(API_KEY_BUCKET_VAR, "secrets-bucket");
        let _p = ScopedEnv::set(API_KEY_PATH_VAR, "octopus/api-key");
        let _u = ScopedEnv::set(SERVER_URI_VAR, "");

        let err = Config::from_env().unwrap_err();
        assert_eq!(err, ConfigError::Missing(SERVER_URI_VAR));
    }
}
