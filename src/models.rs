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

//! Domain models for the hook relay.
//!
//! Pure data: the decision enum, the decision handed back to the agent, its
//! wire envelope, and the request body sent to OPA. No I/O lives here.

use crate::constants::hook;
use crate::errors::RelayError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Permission verdict understood by the agent. Closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionDecision {
    /// Tool runs without prompting
    Allow,
    /// Tool call is blocked
    Deny,
    /// User is asked to confirm
    Ask,
}

impl PermissionDecision {
    pub fn as_str(self) -> &'static str {
        match self {
            PermissionDecision::Allow => "allow",
            PermissionDecision::Deny => "deny",
            PermissionDecision::Ask => "ask",
        }
    }
}

impl FromStr for PermissionDecision {
    type Err = RelayError;

    /// Exact, case-sensitive match. Anything else is an invalid decision.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "allow" => Ok(PermissionDecision::Allow),
            "deny" => Ok(PermissionDecision::Deny),
            "ask" => Ok(PermissionDecision::Ask),
            other => Err(RelayError::InvalidDecision(other.to_string())),
        }
    }
}

impl std::fmt::Display for PermissionDecision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The single verdict a run produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookDecision {
    pub decision: PermissionDecision,
    pub reason: String,
}

impl HookDecision {
    pub fn new(decision: PermissionDecision, reason: impl Into<String>) -> Self {
        Self {
            decision,
            reason: reason.into(),
        }
    }

    pub fn deny(reason: impl Into<String>) -> Self {
        Self::new(PermissionDecision::Deny, reason)
    }

    /// Wrap in the `hookSpecificOutput` envelope.
    pub fn into_output(self) -> HookOutput {
        HookOutput {
            hook_specific_output: HookSpecificOutput {
                hook_event_name: hook::EVENT_NAME.to_string(),
                permission_decision: self.decision,
                permission_decision_reason: self.reason,
            },
        }
    }
}

/// Fail closed: every relay error becomes a deny carrying the error text.
impl From<RelayError> for HookDecision {
    fn from(err: RelayError) -> Self {
        HookDecision::deny(err.to_string())
    }
}

/// Top-level JSON object written to stdout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HookOutput {
    #[serde(rename = "hookSpecificOutput")]
    pub hook_specific_output: HookSpecificOutput,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HookSpecificOutput {
    pub hook_event_name: String,
    pub permission_decision: PermissionDecision,
    pub permission_decision_reason: String,
}

/// Body of the OPA Data API query: the hook input, untouched, under `input`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyRequest {
    pub input: serde_json::Value,
}

impl PolicyRequest {
    pub fn new(input: serde_json::Value) -> Self {
        Self { input }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, RelayError> {
        serde_json::to_vec(self).map_err(|e| RelayError::RequestFailed(e.to_string()))
    }
}
