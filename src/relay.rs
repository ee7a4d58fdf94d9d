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

//! Decision relay.
//!
//! A chain of fallible steps: parse the hook input, wrap it for OPA, query,
//! pull `result.decision` / `result.reason` out of the answer. The first
//! step to fail short-circuits and its error becomes a `deny`. Callers always
//! get a `HookDecision`, never an error.

use crate::client::{OpaClient, PolicyQuery};
use crate::config::Config;
use crate::constants::hook;
use crate::errors::RelayError;
use crate::models::{HookDecision, PermissionDecision, PolicyRequest};
use serde_json::Value;
use tracing::{info, warn};

/// Parse raw stdin bytes. Any JSON document is accepted and forwarded as is.
pub fn parse_input(raw: &[u8]) -> Result<Value, RelayError> {
    serde_json::from_slice(raw).map_err(RelayError::input_read)
}

/// Turn a 200 response body into a verdict.
///
/// `result` must be an object. A missing `decision` counts as `""` and a
/// missing `reason` as "no reason provided".
pub fn decision_from_body(body: &Value) -> Result<HookDecision, RelayError> {
    let result = body
        .get("result")
        .and_then(Value::as_object)
        .ok_or(RelayError::MissingResult)?;

    let decision = match result.get("decision") {
        Some(value) => render(value),
        None => String::new(),
    };
    let reason = match result.get("reason") {
        None | Some(Value::Null) => hook::DEFAULT_REASON.to_string(),
        Some(value) => render(value),
    };

    let decision: PermissionDecision = decision.parse()?;
    Ok(HookDecision::new(decision, reason))
}

/// Strings verbatim, everything else as compact JSON.
fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Full pipeline against an arbitrary policy service.
pub async fn relay<Q>(client: &Q, raw_input: &[u8]) -> HookDecision
where
    Q: PolicyQuery + ?Sized,
{
    match parse_input(raw_input) {
        Ok(input) => relay_input(client, input).await,
        Err(err) => fail_closed(err),
    }
}

/// Full pipeline against the OPA instance named by `config`.
///
/// The input is parsed before the HTTP client is built, so bad stdin never
/// costs a network setup.
pub async fn run(config: &Config, raw_input: &[u8]) -> HookDecision {
    let input = match parse_input(raw_input) {
        Ok(input) => input,
        Err(err) => return fail_closed(err),
    };

    match OpaClient::new(config) {
        Ok(client) => relay_input(&client, input).await,
        Err(err) => fail_closed(err),
    }
}

async fn relay_input<Q>(client: &Q, input: Value) -> HookDecision
where
    Q: PolicyQuery + ?Sized,
{
    let tool = input
        .get("tool_name")
        .and_then(Value::as_str)
        .unwrap_or("<unknown>")
        .to_string();

    let request = PolicyRequest::new(input);
    let outcome = match client.query(&request).await {
        Ok(body) => decision_from_body(&body),
        Err(err) => Err(err),
    };

    match outcome {
        Ok(decision) => {
            info!(
                tool = %tool,
                decision = %decision.decision,
                reason = %decision.reason,
                "Policy decision"
            );
            decision
        }
        Err(err) => fail_closed(err),
    }
}

fn fail_closed(err: RelayError) -> HookDecision {
    match &err {
        RelayError::InputRead { detail } => {
            warn!(kind = err.kind(), detail = %detail, "Denying: {}", err)
        }
        _ => warn!(kind = err.kind(), "Denying: {}", err),
    }
    err.into()
}
