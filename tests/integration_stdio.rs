use assert_cmd::Command;
use serde_json::Value;

const POLICY_PATH: &str = "/v1/data/claudecode/authz/result";
const BIN: &str = env!("CARGO_BIN_EXE_lilith-hook");

/// Runs the binary against `opa_url` with `stdin`, asserts exit 0 and returns
/// the single JSON object it printed.
fn run_hook(opa_url: &str, stdin: impl Into<Vec<u8>>, args: &[&str]) -> Value {
    let output = Command::new(BIN)
        .env("OPA_URL", opa_url)
        .env_remove("LILITH_HOOK_TIMEOUT_SECS")
        .env_remove("RUST_LOG")
        .args(args)
        .write_stdin(stdin.into())
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    serde_json::from_slice(&output).expect("stdout must be exactly one JSON object")
}

fn decision(out: &Value) -> (&str, &str) {
    let inner = &out["hookSpecificOutput"];
    assert_eq!(inner["hookEventName"], "PreToolUse");
    (
        inner["permissionDecision"].as_str().unwrap(),
        inner["permissionDecisionReason"].as_str().unwrap(),
    )
}

#[test]
fn test_empty_stdin_denied() {
    let out = run_hook("http://127.0.0.1:1", "", &[]);
    assert_eq!(
        decision(&out),
        ("deny", "failed to read hook input from stdin")
    );
}

#[test]
fn test_garbage_stdin_denied() {
    let out = run_hook("http://127.0.0.1:1", &b"{\"tool\": \"\xFF\xFF"[..], &[]);
    assert_eq!(
        decision(&out),
        ("deny", "failed to read hook input from stdin")
    );
}

#[test]
fn test_unreachable_service_denied() {
    let out = run_hook("http://127.0.0.1:1", r#"{"tool":"read_file"}"#, &[]);
    let (verdict, reason) = decision(&out);
    assert_eq!(verdict, "deny");
    assert!(reason.starts_with("OPA unreachable:"), "reason: {}", reason);
}

#[test]
fn test_policy_verdict_relayed() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", POLICY_PATH)
        .match_header("content-type", "application/json")
        .with_status(200)
        .with_body(r#"{"result":{"decision":"deny","reason":"destructive command"}}"#)
        .expect(1)
        .create();

    let out = run_hook(
        &server.url(),
        r#"{"tool":"shell","args":["rm","-rf","/"]}"#,
        &[],
    );

    mock.assert();
    assert_eq!(decision(&out), ("deny", "destructive command"));
}

#[test]
fn test_ask_relayed_with_default_reason() {
    let mut server = mockito::Server::new();
    server
        .mock("POST", POLICY_PATH)
        .with_status(200)
        .with_body(r#"{"result":{"decision":"ask"}}"#)
        .create();

    let out = run_hook(&server.url(), r#"{"tool":"write_file"}"#, &[]);
    assert_eq!(decision(&out), ("ask", "no reason provided"));
}

#[test]
fn test_cli_url_overrides_env() {
    let mut server = mockito::Server::new();
    server
        .mock("POST", POLICY_PATH)
        .with_status(200)
        .with_body(r#"{"result":{"decision":"allow","reason":"ok"}}"#)
        .create();

    let url = server.url();
    let out = run_hook("http://127.0.0.1:1", "{}", &["--opa-url", url.as_str()]);
    assert_eq!(decision(&out), ("allow", "ok"));
}

#[test]
fn test_unknown_flag_still_decides() {
    let out = run_hook("http://127.0.0.1:1", "{}", &["--no-such-flag"]);
    let (verdict, reason) = decision(&out);
    assert_eq!(verdict, "deny");
    assert!(reason.starts_with("OPA unreachable:"), "reason: {}", reason);
}

#[test]
fn test_bad_timeout_env_still_decides() {
    let output = Command::new(BIN)
        .env("OPA_URL", "http://127.0.0.1:1")
        .env("LILITH_HOOK_TIMEOUT_SECS", "soon")
        .write_stdin("{}")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let out: Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(out["hookSpecificOutput"]["permissionDecision"], "deny");
}

#[test]
fn test_binary_help() {
    Command::new(BIN)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicates::str::contains("--opa-url"));
}
