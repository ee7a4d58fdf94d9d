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

//! lilith-hook: a fail-closed PreToolUse hook.
//!
//! Reads a tool invocation from stdin, asks an OPA policy service for a
//! verdict and writes exactly one `allow` / `deny` / `ask` decision to stdout.
//! Every fault along the way degrades to `deny`.

pub mod client;
pub mod config;
pub mod constants;
pub mod errors;
pub mod models;
pub mod relay;
pub mod transport;
