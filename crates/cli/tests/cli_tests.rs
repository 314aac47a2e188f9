// End-to-end tests for the `bomsync` binary against mock sheet and table servers.
// Run with: cargo test -p bomsync-cli --test cli_tests -- --nocapture

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use httpmock::prelude::*;
use tempfile::TempDir;

fn fixture(name: &str) -> String {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../recon/tests/fixtures").join(name);
    std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("read {}: {e}", path.display()))
}

/// Isolated environment: no inherited BOMSYNC_* variables and a throwaway
/// config dir, so a developer's own config never leaks into a test.
struct Env {
    dir: TempDir,
}

impl Env {
    fn new() -> Self {
        Self { dir: tempfile::tempdir().unwrap() }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn write_credentials(&self, base_url: &str) -> PathBuf {
        let path = self.path("credentials.json");
        let body = serde_json::json!({ "projectUrl": base_url, "serviceRoleKey": "test-key" });
        std::fs::write(&path, body.to_string()).unwrap();
        path
    }

    fn write_config(&self, contents: &str) -> PathBuf {
        let path = self.path("config.toml");
        std::fs::write(&path, contents).unwrap();
        path
    }

    fn bomsync(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_bomsync"));
        cmd.env_remove("BOMSYNC_CONFIG")
            .env_remove("BOMSYNC_CREDENTIALS")
            .env_remove("BOMSYNC_SHEET_URL")
            .env_remove("RUST_LOG")
            .env("HOME", self.dir.path())
            .env("XDG_CONFIG_HOME", self.path("xdg"));
        cmd
    }
}

fn stdout(out: &Output) -> String {
    String::from_utf8_lossy(&out.stdout).into_owned()
}

fn stderr(out: &Output) -> String {
    String::from_utf8_lossy(&out.stderr).into_owned()
}

fn mock_sheet(server: &MockServer) {
    server.mock(|when, then| {
        when.method(GET).path("/sheet.csv");
        then.status(200).header("content-type", "text/csv").body(fixture("sheet.csv"));
    });
}

fn mock_table(server: &MockServer) {
    server.mock(|when, then| {
        when.method(GET)
            .path("/rest/v1/bom_final_assemblies")
            .header("apikey", "test-key");
        then.status(200)
            .header("content-type", "application/json")
            .body(fixture("table.json"));
    });
}

// ---------------------------------------------------------------------------
// compare
// ---------------------------------------------------------------------------

#[test]
fn compare_prints_text_report() {
    let server = MockServer::start();
    mock_sheet(&server);
    mock_table(&server);
    let env = Env::new();
    let creds = env.write_credentials(&server.base_url());

    let out = env
        .bomsync()
        .args(["compare", "--sheet-url", &server.url("/sheet.csv")])
        .arg("--credentials")
        .arg(&creds)
        .output()
        .unwrap();

    assert!(out.status.success(), "stderr: {}", stderr(&out));
    let text = stdout(&out);
    assert!(text.contains(
        "Sheet: 5 parts\n  (1 rows without a part name skipped, 1 duplicate part names, later row kept)\n"
    ));
    assert!(text.contains("Table: 5 parts\n"));
    assert!(text.contains("Missing in table (in sheet, not in table): 1\n  BR-300\n"));
    assert!(text.contains("Missing in sheet (in table, not in sheet): 1\n  BR-900\n"));
    assert!(text.contains("Parts with mismatches: 1 / 4"));
    assert!(text.contains("    total_cost: Sheet=5.500000  DB=5.250000"));
}

#[test]
fn compare_json_with_all_fields() {
    let server = MockServer::start();
    mock_sheet(&server);
    mock_table(&server);
    let env = Env::new();
    env.write_credentials(&server.base_url());

    let out = env
        .bomsync()
        .args(["compare", "--json", "--all-fields"])
        .env("BOMSYNC_SHEET_URL", server.url("/sheet.csv"))
        .env("BOMSYNC_CREDENTIALS", env.path("credentials.json"))
        .output()
        .unwrap();

    assert!(out.status.success(), "stderr: {}", stderr(&out));
    let json: serde_json::Value = serde_json::from_str(&stdout(&out)).unwrap();
    assert_eq!(json["meta"]["fields"].as_array().unwrap().len(), 20);
    assert_eq!(json["counts"]["compared"], 4);
    assert_eq!(json["counts"]["mismatched"], 2);
    assert_eq!(json["counts"]["sheet_rows_skipped"], 1);
    assert_eq!(json["counts"]["sheet_duplicates"], 1);
    assert_eq!(json["mismatches"]["BR-500"][0]["field"], "overhead_cost");
    assert!(json["meta"]["run_at"].as_str().unwrap().ends_with('Z'));
}

#[test]
fn compare_reads_config_file_and_writes_output() {
    let server = MockServer::start();
    mock_sheet(&server);
    mock_table(&server);
    let env = Env::new();
    let creds = env.write_credentials(&server.base_url());
    let config = env.write_config(&format!(
        "[sheet]\nurl = \"{}\"\n\n[store]\ncredentials = {:?}\n\n[compare]\ntolerance = 0.5\nfields = [\"total_cost\"]\n",
        server.url("/sheet.csv"),
        creds.display().to_string(),
    ));
    let report = env.path("report.json");

    let out = env
        .bomsync()
        .arg("compare")
        .arg("--config")
        .arg(&config)
        .arg("--output")
        .arg(&report)
        .output()
        .unwrap();

    assert!(out.status.success(), "stderr: {}", stderr(&out));
    // 5.5 vs 5.25 is inside a 0.5 tolerance
    assert!(stdout(&out).contains("Parts with mismatches: 0 / 4"));

    let json: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&report).unwrap()).unwrap();
    assert_eq!(json["meta"]["tolerance"], 0.5);
    assert_eq!(json["meta"]["fields"], serde_json::json!(["total_cost"]));
}

#[test]
fn compare_unauthorized_table_is_fetch_error() {
    let server = MockServer::start();
    mock_sheet(&server);
    server.mock(|when, then| {
        when.method(GET).path("/rest/v1/bom_final_assemblies");
        then.status(401).body(r#"{"message":"Invalid API key"}"#);
    });
    let env = Env::new();
    let creds = env.write_credentials(&server.base_url());

    let out = env
        .bomsync()
        .args(["compare", "--sheet-url", &server.url("/sheet.csv")])
        .arg("--credentials")
        .arg(&creds)
        .output()
        .unwrap();

    assert_eq!(out.status.code(), Some(5));
    assert!(stdout(&out).is_empty(), "no partial report");
    let err = stderr(&out);
    assert!(err.contains("error: cannot read table bom_final_assemblies: HTTP 401"));
    assert!(err.contains("hint:"));
}

#[test]
fn compare_sheet_not_published() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/sheet.csv");
        then.status(404).body("not found");
    });
    let env = Env::new();
    let creds = env.write_credentials(&server.base_url());

    let out = env
        .bomsync()
        .args(["compare", "--sheet-url", &server.url("/sheet.csv")])
        .arg("--credentials")
        .arg(&creds)
        .output()
        .unwrap();

    assert_eq!(out.status.code(), Some(5));
    assert!(stderr(&out).contains("cannot fetch sheet: HTTP 404"));
}

#[test]
fn missing_credentials_exit_code() {
    let env = Env::new();
    let out = env
        .bomsync()
        .args(["compare", "--sheet-url", "http://127.0.0.1:1/sheet.csv"])
        .arg("--credentials")
        .arg(env.path("absent.json"))
        .output()
        .unwrap();

    assert_eq!(out.status.code(), Some(4));
    assert!(stderr(&out).contains("credentials file not found"));
}

#[test]
fn missing_sheet_url_is_config_error() {
    let env = Env::new();
    let creds = env.write_credentials("http://127.0.0.1:1");
    let out = env.bomsync().arg("compare").arg("--credentials").arg(&creds).output().unwrap();

    assert_eq!(out.status.code(), Some(3));
    assert!(stderr(&out).contains("no sheet export URL configured"));
}

#[test]
fn invalid_config_is_config_error() {
    let env = Env::new();
    let config = env.write_config("[compare]\nfields = [\"bogus_field\"]\n");
    let out = env.bomsync().arg("compare").arg("--config").arg(&config).output().unwrap();

    assert_eq!(out.status.code(), Some(3));
    assert!(stderr(&out).contains("config parse error"));
}

#[test]
fn bad_tolerance_is_usage_error() {
    let env = Env::new();
    let creds = env.write_credentials("http://127.0.0.1:1");
    let out = env
        .bomsync()
        .args(["compare", "--tolerance=-1", "--sheet-url", "http://127.0.0.1:1/s.csv"])
        .arg("--credentials")
        .arg(&creds)
        .output()
        .unwrap();

    assert_eq!(out.status.code(), Some(2));
}

// ---------------------------------------------------------------------------
// sync
// ---------------------------------------------------------------------------

#[test]
fn sync_continues_past_failed_rows() {
    let server = MockServer::start();
    mock_sheet(&server);
    let failing = server.mock(|when, then| {
        when.method(PATCH)
            .path("/rest/v1/bom_final_assemblies")
            .query_param("part_number", "eq.BR-300");
        then.status(400).body("bad row");
    });
    let patches = server.mock(|when, then| {
        when.method(PATCH)
            .path("/rest/v1/bom_final_assemblies")
            .header("prefer", "return=minimal")
            .header("authorization", "Bearer test-key");
        then.status(204);
    });
    let env = Env::new();
    let creds = env.write_credentials(&server.base_url());

    let out = env
        .bomsync()
        .args(["sync", "--sheet-url", &server.url("/sheet.csv")])
        .arg("--credentials")
        .arg(&creds)
        .output()
        .unwrap();

    assert!(out.status.success(), "per-record failures keep exit 0: {}", stderr(&out));
    failing.assert_hits(1);
    patches.assert_hits(4);
    let text = stdout(&out);
    assert!(text.contains("Sheet: 5 parts"));
    assert!(text.contains("  ERROR BR-300: HTTP 400: bad row"));
    assert!(text.ends_with("Updated: 4, Errors: 1\n"));
}

#[test]
fn sync_dry_run_sends_nothing() {
    let server = MockServer::start();
    mock_sheet(&server);
    let patches = server.mock(|when, then| {
        when.method(PATCH);
        then.status(204);
    });
    let env = Env::new();

    // No credentials file: dry runs never touch the table.
    let out = env
        .bomsync()
        .args(["sync", "--dry-run", "--sheet-url", &server.url("/sheet.csv")])
        .arg("--credentials")
        .arg(env.path("absent.json"))
        .output()
        .unwrap();

    assert!(out.status.success(), "stderr: {}", stderr(&out));
    patches.assert_hits(0);
    let text = stdout(&out);
    assert!(text.contains("  BR-100: 20 fields"));
    assert!(text.contains("Dry run: 5 updates to bom_final_assemblies not sent"));
}

// ---------------------------------------------------------------------------
// fields
// ---------------------------------------------------------------------------

#[test]
fn fields_lists_default_mapping() {
    let env = Env::new();
    let out = env.bomsync().arg("fields").output().unwrap();

    assert!(out.status.success(), "stderr: {}", stderr(&out));
    let text = stdout(&out);
    assert!(text.contains("Key column: \"Part name \""));
    assert!(text.contains("\"Shipping/staging/QA labor cost \""));
}

#[test]
fn fields_json() {
    let env = Env::new();
    let out = env.bomsync().args(["fields", "--json"]).output().unwrap();

    assert!(out.status.success());
    let json: serde_json::Value = serde_json::from_str(&stdout(&out)).unwrap();
    assert_eq!(json["key_column"], "Part name ");
    assert_eq!(json["fields"].as_array().unwrap().len(), 20);
    assert_eq!(json["fields"][0]["field"], "parts_per_package");
    assert_eq!(json["fields"][0]["compared"], true);
}

#[test]
fn unknown_subcommand_is_usage_error() {
    let env = Env::new();
    let out = env.bomsync().arg("frobnicate").output().unwrap();
    assert_eq!(out.status.code(), Some(2));
}

#[test]
fn version_flag() {
    let env = Env::new();
    let out = env.bomsync().arg("--version").output().unwrap();
    assert!(out.status.success());
    assert!(stdout(&out).starts_with(concat!("bomsync ", env!("CARGO_PKG_VERSION"))));
}
