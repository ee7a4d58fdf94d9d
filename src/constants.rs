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

//! lilith-hook Constants - Single source of truth for wire values and defaults.

/// Policy service endpoint
pub mod opa {
    /// Base address used when `OPA_URL` is not set
    pub const DEFAULT_URL: &str = "http://localhost:8181";
    /// Data API path of the authorization rule
    pub const POLICY_PATH: &str = "/v1/data/claudecode/authz/result";
    /// Request timeout in seconds
    pub const TIMEOUT_SECS: u64 = 5;
}

/// Hook protocol values
pub mod hook {
    /// The only event this hook answers
    pub const EVENT_NAME: &str = "PreToolUse";
    /// Reason used when the policy result carries none
    pub const DEFAULT_REASON: &str = "no reason provided";
}

/// Configuration Environment Variables
pub mod config {
    pub const ENV_OPA_URL: &str = "OPA_URL";
    pub const ENV_TIMEOUT_SECS: &str = "LILITH_HOOK_TIMEOUT_SECS";
    pub const ENV_LOG_LEVEL: &str = "LOG_LEVEL";
    pub const ENV_LOG_FORMAT: &str = "LOG_FORMAT";
}

/// Transport Limits (DoS Protection)
pub mod limits {
    /// Maximum accepted hook input size (10 MB)
    pub const MAX_INPUT_SIZE_BYTES: u64 = 10 * 1024 * 1024;
}
