// Copyright 2026 BadCompany
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::constants::{config as env_keys, opa};
use crate::errors::RelayError;
use std::env;
use std::time::Duration;

/// Relay configuration. Built once in `main` and passed down explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// OPA base address, e.g. `http://localhost:8181`
    pub opa_url: String,
    pub timeout: Duration,
    pub log_level: String,
    pub log_format: String, // "json" or "text"
}

impl Config {
    pub fn from_env() -> Result<Self, RelayError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as `from_env` but reads through `lookup`, so tests need not touch
    /// the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, RelayError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let timeout_secs = match lookup(env_keys::ENV_TIMEOUT_SECS) {
            Some(raw) => raw.trim().parse::<u64>().map_err(|e| {
                RelayError::Configuration(format!(
                    "{} must be a whole number of seconds, got '{}': {}",
                    env_keys::ENV_TIMEOUT_SECS,
                    raw,
                    e
                ))
            })?,
            None => opa::TIMEOUT_SECS,
        };

        Ok(Self {
            opa_url: lookup(env_keys::ENV_OPA_URL).unwrap_or_else(|| opa::DEFAULT_URL.to_string()),
            timeout: Duration::from_secs(timeout_secs),
            log_level: lookup(env_keys::ENV_LOG_LEVEL).unwrap_or_else(|| "warn".to_string()),
            log_format: lookup(env_keys::ENV_LOG_FORMAT).unwrap_or_else(|| "text".to_string()),
        })
    }

    /// Full query URL: base address without trailing slashes, then the policy path.
    pub fn policy_url(&self) -> String {
        format!("{}{}", self.opa_url.trim_end_matches('/'), opa::POLICY_PATH)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            opa_url: opa::DEFAULT_URL.to_string(),
            timeout: Duration::from_secs(opa::TIMEOUT_SECS),
            log_level: "warn".to_string(),
            log_format: "text".to_string(),
        }
    }
}
