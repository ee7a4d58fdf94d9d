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

// Main entry point for the lilith-hook PreToolUse hook.
//
// Exit status is always 0: the agent reads the verdict from stdout, so every
// failure has to end up as a `deny` there instead of a non-zero exit.
use clap::error::ErrorKind;
use clap::Parser;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::{error, warn};

use lilith_hook::config::Config;
use lilith_hook::constants::config::ENV_TIMEOUT_SECS;
use lilith_hook::errors::{panic_message, RelayError};
use lilith_hook::models::HookDecision;
use lilith_hook::relay;
use lilith_hook::transport::{write_decision_blocking, HookTransport};

/// Set once a decision has reached stdout; the panic hook must not add a second one.
static DECISION_EMITTED: AtomicBool = AtomicBool::new(false);

#[derive(Parser, Debug)]
#[command(name = "lilith-hook", version, about, long_about = None)]
struct Cli {
    /// OPA base address (overrides OPA_URL), e.g. "http://localhost:8181"
    #[arg(long)]
    opa_url: Option<String>,

    /// Policy query timeout in seconds (overrides LILITH_HOOK_TIMEOUT_SECS)
    #[arg(long)]
    timeout_secs: Option<u64>,
}

fn main() {
    install_panic_hook();

    let cli = match Cli::try_parse() {
        Ok(cli) => Some(cli),
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(e) => {
            eprintln!("Warning: ignoring invalid command line: {}", e);
            None
        }
    };

    let mut config = Config::from_env().unwrap_or_else(|e| {
        eprintln!("Warning: {}, using the default timeout", e);
        Config::from_lookup(|key| {
            if key == ENV_TIMEOUT_SECS {
                None
            } else {
                std::env::var(key).ok()
            }
        })
        .unwrap_or_default()
    });

    // CLI overlay
    if let Some(cli) = cli {
        if let Some(url) = cli.opa_url {
            config.opa_url = url;
        }
        if let Some(secs) = cli.timeout_secs {
            config.timeout = Duration::from_secs(secs);
        }
    }

    if let Err(e) = init_tracing(&config) {
        eprintln!("Failed to init tracing: {}", e);
    }

    match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime.block_on(run(config)),
        Err(e) => {
            error!(error = %e, "Failed to start runtime");
            emit_blocking(RelayError::RequestFailed(e.to_string()).into());
        }
    }
}

async fn run(config: Config) {
    let mut transport = HookTransport::stdio();

    let decision = match transport.read_input().await {
        Ok(raw) => relay::run(&config, &raw).await,
        Err(err) => {
            warn!(kind = err.kind(), "Denying: {}", err);
            err.into()
        }
    };

    match transport.write_decision(decision).await {
        Ok(()) => DECISION_EMITTED.store(true, Ordering::SeqCst),
        Err(e) => error!(error = %e, "Failed to write hook decision"),
    }
}

/// Last-resort writer for when there is no runtime to drive the transport.
fn emit_blocking(decision: HookDecision) {
    let mut stdout = std::io::stdout().lock();
    match write_decision_blocking(&mut stdout, decision) {
        Ok(()) => DECISION_EMITTED.store(true, Ordering::SeqCst),
        Err(e) => eprintln!("Failed to write hook decision: {}", e),
    }
}

/// A panic still answers the agent: deny, then exit 0 before the release
/// profile's abort can run.
fn install_panic_hook() {
    std::panic::set_hook(Box::new(|panic_info| {
        let location = panic_info
            .location()
            .map(|l| format!("{}:{}:{}", l.file(), l.line(), l.column()))
            .unwrap_or_else(|| "unknown".to_string());

        let message = panic_message(panic_info.payload());
        eprintln!("PANIC: {} at {}", message, location);

        if !DECISION_EMITTED.swap(true, Ordering::SeqCst) {
            emit_blocking(RelayError::Internal(message).into());
        }
        std::process::exit(0);
    }));
}

/// Logs always go to stderr; stdout carries only the decision.
fn init_tracing(config: &Config) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let subscriber = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_writer(std::io::stderr);

    if config.log_format == "json" {
        subscriber.json().try_init()?;
    } else {
        subscriber.try_init()?;
    }

    Ok(())
}
