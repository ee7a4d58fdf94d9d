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

//! Hook stdio transport.
//!
//! The agent writes one JSON document to our stdin and closes it; we answer
//! with one JSON object on stdout. Nothing else may be written to stdout.

use anyhow::{Context, Result};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, Stdin, Stdout};
use tracing::debug;

use crate::constants::limits;
use crate::errors::RelayError;
use crate::models::HookDecision;

pub struct HookTransport<R, W> {
    reader: R,
    writer: W,
    max_input_bytes: u64,
}

impl HookTransport<Stdin, Stdout> {
    pub fn stdio() -> Self {
        Self::new(tokio::io::stdin(), tokio::io::stdout())
    }
}

impl<R, W> HookTransport<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            reader,
            writer,
            max_input_bytes: limits::MAX_INPUT_SIZE_BYTES,
        }
    }

    pub fn with_max_input_bytes(mut self, max_input_bytes: u64) -> Self {
        self.max_input_bytes = max_input_bytes;
        self
    }

    /// Read the whole hook input.
    /// Reads at most one byte past the limit so a huge payload is never buffered.
    pub async fn read_input(&mut self) -> Result<Vec<u8>, RelayError> {
        let mut buf = Vec::new();
        (&mut self.reader)
            .take(self.max_input_bytes.saturating_add(1))
            .read_to_end(&mut buf)
            .await
            .map_err(RelayError::input_read)?;

        if buf.len() as u64 > self.max_input_bytes {
            return Err(RelayError::input_read(format!(
                "input exceeded size limit of {} bytes",
                self.max_input_bytes
            )));
        }

        debug!(bytes = buf.len(), "Received hook input");
        Ok(buf)
    }

    /// Write the decision envelope and flush.
    pub async fn write_decision(&mut self, decision: HookDecision) -> Result<()> {
        let json = serde_json::to_string(&decision.into_output())
            .context("Failed to serialize hook output")?;
        debug!("Sending: {}", json);

        self.writer.write_all(json.as_bytes()).await?;
        self.writer.flush().await?;
        Ok(())
    }

    pub fn into_writer(self) -> W {
        self.writer
    }
}

/// Synchronous counterpart of `write_decision`, for paths with no runtime
/// left to drive the async writer (runtime startup failure, panic hook).
pub fn write_decision_blocking<W: std::io::Write>(
    writer: &mut W,
    decision: HookDecision,
) -> Result<()> {
    serde_json::to_writer(&mut *writer, &decision.into_output())
        .context("Failed to serialize hook output")?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PermissionDecision;

    #[tokio::test]
    async fn test_reads_entire_input() {
        let input: &[u8] = br#"{"tool_name":"Read","tool_input":{"file_path":"/tmp/x"}}"#;
        let mut transport = HookTransport::new(input, Vec::new());
        assert_eq!(transport.read_input().await.unwrap(), input.to_vec());
    }

    #[tokio::test]
    async fn test_oversized_input_is_rejected() {
        let input = vec![b' '; 65];
        let mut transport = HookTransport::new(input.as_slice(), Vec::new()).with_max_input_bytes(64);
        let err = transport.read_input().await.unwrap_err();
        assert_eq!(err.to_string(), "failed to read hook input from stdin");
    }

    #[tokio::test]
    async fn test_input_at_limit_is_accepted() {
        let input = vec![b' '; 64];
        let mut transport = HookTransport::new(input.as_slice(), Vec::new()).with_max_input_bytes(64);
        assert_eq!(transport.read_input().await.unwrap().len(), 64);
    }

    #[tokio::test]
    async fn test_writes_single_json_object() {
        let mut transport = HookTransport::new(&b""[..], Vec::new());
        transport
            .write_decision(HookDecision::new(PermissionDecision::Allow, "ok"))
            .await
            .unwrap();

        let written = transport.into_writer();
        let value: serde_json::Value = serde_json::from_slice(&written).unwrap();
        assert_eq!(value["hookSpecificOutput"]["permissionDecision"], "allow");
        assert_eq!(value["hookSpecificOutput"]["permissionDecisionReason"], "ok");
        assert_eq!(value["hookSpecificOutput"]["hookEventName"], "PreToolUse");
    }

    #[test]
    fn test_blocking_writer_emits_deny_for_internal_error() {
        let mut out = Vec::new();
        write_decision_blocking(
            &mut out,
            RelayError::Internal("index out of bounds".to_string()).into(),
        )
        .unwrap();

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["hookSpecificOutput"]["hookEventName"], "PreToolUse");
        assert_eq!(value["hookSpecificOutput"]["permissionDecision"], "deny");
        assert_eq!(
            value["hookSpecificOutput"]["permissionDecisionReason"],
            "internal error: index out of bounds"
        );
    }
}
