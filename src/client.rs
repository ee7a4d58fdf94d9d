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

//! HTTP client for the OPA Data API.

use crate::config::Config;
use crate::errors::{chain, RelayError};
use crate::models::PolicyRequest;
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error};
use uuid::Uuid;

/// One round trip to a policy service.
///
/// Returns the parsed body of a 200 response. Transport failures, non-200
/// statuses and unparseable bodies come back as the matching `RelayError`.
#[async_trait]
pub trait PolicyQuery: Send + Sync {
    async fn query(&self, request: &PolicyRequest) -> Result<Value, RelayError>;
}

/// `PolicyQuery` over HTTP. No retries, no pooling beyond what reqwest does
/// for a single request.
pub struct OpaClient {
    http_client: Client,
    url: String,
    timeout: Duration,
}

impl OpaClient {
    pub fn new(config: &Config) -> Result<Self, RelayError> {
        let http_client = Client::builder()
            .timeout(config.timeout)
            .tcp_nodelay(true)
            .build()
            .map_err(|e| RelayError::RequestFailed(chain(e)))?;

        Ok(Self {
            http_client,
            url: config.policy_url(),
            timeout: config.timeout,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Connect, DNS and timeout errors mean the service could not be reached;
    /// everything else is a failed request.
    fn classify_send_error(err: reqwest::Error) -> RelayError {
        if err.is_connect() || err.is_timeout() {
            RelayError::Unreachable(chain(err))
        } else {
            RelayError::RequestFailed(chain(err))
        }
    }
}

#[async_trait]
impl PolicyQuery for OpaClient {
    async fn query(&self, request: &PolicyRequest) -> Result<Value, RelayError> {
        let request_id = Uuid::new_v4();
        let body = request.to_bytes()?;

        debug!(
            url = %self.url,
            request_id = %request_id,
            bytes = body.len(),
            "Querying OPA"
        );

        let response = self
            .http_client
            .post(&self.url)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(Self::classify_send_error)?;

        let status = response.status();
        if status != StatusCode::OK {
            error!(
                status = %status,
                url = %self.url,
                request_id = %request_id,
                "OPA returned non-200 status"
            );
            return Err(RelayError::BadStatus(status.as_u16()));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| RelayError::RequestFailed(chain(e)))?;

        serde_json::from_slice(&bytes).map_err(|e| {
            error!(error = %e, request_id = %request_id, "Failed to parse OPA response");
            RelayError::RequestFailed(e.to_string())
        })
    }
}
