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

//! Relay error types.
//!
//! The `Display` text of every variant is exactly the reason string handed
//! back to the agent, so keep these messages stable.

use thiserror::Error;

/// Everything that can stop the relay short of a policy verdict.
///
/// None of these is fatal to the process: each one collapses into a `deny`
/// decision (see `HookDecision::from`).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RelayError {
    /// Stdin was empty, unreadable, oversized or not JSON.
    /// `detail` is for the log only; the agent sees the fixed message.
    #[error("failed to read hook input from stdin")]
    InputRead { detail: String },

    /// Connection refused, DNS failure or timeout.
    #[error("OPA unreachable: {0}")]
    Unreachable(String),

    /// Any other failure while talking to OPA, including an unparseable body.
    #[error("OPA request failed: {0}")]
    RequestFailed(String),

    /// OPA answered with something other than 200.
    #[error("OPA returned HTTP {0}")]
    BadStatus(u16),

    /// The response had no `result` object.
    #[error("OPA response missing 'result' object")]
    MissingResult,

    /// `result.decision` was not one of allow, deny, ask.
    #[error("invalid decision from OPA: '{0}'")]
    InvalidDecision(String),

    /// The relay itself panicked. Only produced by the binary's panic hook.
    #[error("internal error: {0}")]
    Internal(String),

    /// Bad environment or CLI configuration. Never surfaces as a decision;
    /// the binary falls back to defaults.
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl RelayError {
    /// Short stable label for structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            RelayError::InputRead { .. } => "input_read",
            RelayError::Unreachable(_) => "unreachable",
            RelayError::RequestFailed(_) => "request_failed",
            RelayError::BadStatus(_) => "bad_status",
            RelayError::MissingResult => "missing_result",
            RelayError::InvalidDecision(_) => "invalid_decision",
            RelayError::Internal(_) => "internal",
            RelayError::Configuration(_) => "configuration",
        }
    }

    pub(crate) fn input_read(detail: impl std::fmt::Display) -> Self {
        RelayError::InputRead {
            detail: detail.to_string(),
        }
    }
}

/// Render an error and its full source chain on one line (`outer: inner: root`).
pub(crate) fn chain<E>(err: E) -> String
where
    E: std::error::Error + Send + Sync + 'static,
{
    format!("{:#}", anyhow::Error::new(err))
}

/// Best-effort text of a panic payload (`panic!` yields `&str` or `String`).
pub fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}
