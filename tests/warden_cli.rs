use std::{
    fs,
    path::{Path, PathBuf},
    process::{Command, Output},
};

use warden_audit::{AuditBackendKind, AuditConfig, AuditEvent, AuditLog};
use warden_common::TenantId;

const MASTER_KEY: &str = "000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f";

fn write_config(dir: &Path, file_name: &str) -> PathBuf {
    let audit_dir = dir.join("audit");
    let config_path = dir.join(file_name);
    fs::write(
        &config_path,
        format!(
            r#"
name = "warden-cli-test"
env = "dev"

[observability]
filter_level = "warn"

[audit]
backend = "file"
path = "{audit}"

[vault]
key = "{key}"
"#,
            audit = audit_dir.display(),
            key = MASTER_KEY,
        ),
    )
    .expect("write config");

    config_path
}

fn run_warden(args: &[&str], current_dir: Option<&Path>) -> Output {
    let mut cmd = Command::new(PathBuf::from(env!("CARGO_BIN_EXE_warden")));
    cmd.args(args);
    cmd.env_remove("RUST_LOG");
    if let Some(dir) = current_dir {
        cmd.current_dir(dir);
    }
    cmd.output().expect("run warden command")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

#[test]
fn tenant_validate_sets_exit_status() {
    let ok = run_warden(&["tenant", "validate", "acme-corp"], None);
    assert!(ok.status.success());
    assert_eq!(stdout(&ok), "valid");

    let bad = run_warden(&["tenant", "validate", "Acme Corp"], None);
    assert_eq!(bad.status.code(), Some(1));
    assert_eq!(stdout(&bad), "invalid");
}

#[test]
fn tenant_generate_and_slug() {
    let generated = run_warden(&["tenant", "generate"], None);
    assert!(generated.status.success());
    assert!(warden_common::is_valid_tenant_id(&stdout(&generated)));

    let slug = run_warden(&["tenant", "slug", "  ACME Corp.  (EU) "], None);
    assert_eq!(stdout(&slug), "acme-corp-eu");
}

#[test]
fn roles_prints_permission_table() {
    let all = run_warden(&["roles"], None);
    assert!(all.status.success());
    let text = stdout(&all);
    assert_eq!(text.lines().count(), 5);
    assert!(text.lines().next().unwrap().starts_with("owner (19)"));

    let guest = run_warden(&["roles", "--role", "guest"], None);
    assert_eq!(stdout(&guest), "guest (1): case:read");

    let unknown = run_warden(&["roles", "--role", "superuser"], None);
    assert!(!unknown.status.success());
}

#[test]
fn mask_keeps_suffix() {
    let output = run_warden(&["mask", "4111111111111111"], None);
    assert_eq!(stdout(&output), "************1111");

    let output = run_warden(&["mask", "secret", "--keep", "0"], None);
    assert_eq!(stdout(&output), "******");
}

#[test]
fn keygen_output_is_a_master_key() {
    let output = run_warden(&["keygen"], None);
    assert!(output.status.success());
    assert!(warden_vault::MasterKey::parse(&stdout(&output)).is_ok());
}

#[test]
fn encrypt_then_decrypt_with_configured_key() {
    let temp = tempfile::tempdir().expect("temp dir");
    let config = write_config(temp.path(), "warden.toml");
    let config = config.to_str().expect("utf8 path");

    let encrypted = run_warden(
        &["--config", config, "encrypt", "--tenant", "acme", "DE89 3704 0044 0532 0130 00"],
        None,
    );
    assert!(
        encrypted.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&encrypted.stderr)
    );
    let value = stdout(&encrypted);
    assert!(value.starts_with("enc:v1:"));

    let decrypted = run_warden(&["--config", config, "decrypt", "--tenant", "acme", &value], None);
    assert_eq!(stdout(&decrypted), "DE89 3704 0044 0532 0130 00");

    let foreign = run_warden(&["--config", config, "decrypt", "--tenant", "globex", &value], None);
    assert!(!foreign.status.success());
}

#[test]
fn encrypt_without_master_key_fails() {
    let temp = tempfile::tempdir().expect("temp dir");
    let output = run_warden(&["encrypt", "--tenant", "acme", "x"], Some(temp.path()));
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("VaultUnavailable"));
}

#[test]
fn audit_list_and_verify_use_configured_backend() {
    let temp = tempfile::tempdir().expect("temp dir");
    let config = write_config(temp.path(), "config.toml");

    let log = AuditLog::from_config(&AuditConfig {
        backend: AuditBackendKind::File,
        path: temp.path().join("audit").to_string_lossy().into_owned(),
    })
    .expect("open audit log");
    let tenant = TenantId::new("acme");
    for action in ["case.create", "case.read", "case.read"] {
        log.create_audit_entry(AuditEvent::new(tenant.clone(), "u-1", action, "case"))
            .expect("append");
    }

    let listed = run_warden(
        &["audit", "list", "--tenant", "acme", "--action", "case.read", "--limit", "1"],
        Some(temp.path()),
    );
    assert!(listed.status.success());
    let text = stdout(&listed);
    assert_eq!(text.lines().count(), 1);
    assert!(text.contains("\"action\":\"case.read\""));
    assert!(text.contains("\"sequence\":1"));

    let verified = run_warden(&["audit", "verify", "--tenant", "acme"], Some(temp.path()));
    assert!(verified.status.success());
    assert_eq!(stdout(&verified), "ok: 3 entries");

    let path = temp.path().join("audit").join("acme.jsonl");
    let raw = fs::read_to_string(&path).expect("read partition");
    fs::write(&path, raw.replacen("case.create", "case.delete", 1)).expect("tamper");

    let broken = run_warden(
        &["--config", config.to_str().expect("utf8 path"), "audit", "verify", "--tenant", "acme"],
        None,
    );
    assert!(!broken.status.success());
    assert!(stdout(&broken).starts_with("broken:"));
}

#[test]
fn check_accepts_valid_config() {
    let temp = tempfile::tempdir().expect("temp dir");
    let config_path = write_config(temp.path(), "valid.toml");
    let output = run_warden(&["check", config_path.to_str().expect("utf8 path")], None);

    assert!(
        output.status.success(),
        "command should succeed, stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}

#[test]
fn check_accepts_warning_only_config() {
    let temp = tempfile::tempdir().expect("temp dir");
    let config_path = temp.path().join("warn.toml");
    fs::write(&config_path, "name = \"warden\"\nenv = \"prod\"\n").expect("write config");

    let output = run_warden(&["check", config_path.to_str().expect("utf8 path")], None);
    assert!(output.status.success());
}

#[test]
fn check_fails_for_missing_config() {
    let temp = tempfile::tempdir().expect("temp dir");
    let missing_path = temp.path().join("missing.toml");
    let output = run_warden(&["check", missing_path.to_str().expect("utf8 path")], None);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success(), "command should fail");
    assert!(
        stderr.contains("Configuration file not found"),
        "unexpected stderr: {stderr}"
    );
}

#[test]
fn check_fails_for_invalid_config() {
    let temp = tempfile::tempdir().expect("temp dir");
    let bad_path = temp.path().join("bad.toml");
    fs::write(&bad_path, "name = \"broken\"\nenv = \"staging\"\n").expect("write config");

    let output = run_warden(&["check", bad_path.to_str().expect("utf8 path")], None);
    assert!(!output.status.success(), "command should fail");
    assert!(
        String::from_utf8_lossy(&output.stderr).contains("staging"),
        "validation problems should be reported"
    );
}
