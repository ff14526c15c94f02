use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

fn cargo_bin() -> PathBuf {
    if let Ok(path) = env::var("CARGO_BIN_EXE_lom") {
        return PathBuf::from(path);
    }

    let target_dir = env::var("CARGO_TARGET_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| repo_root().join("target"));
    let executable_name = format!("lom{}", std::env::consts::EXE_SUFFIX);
    let fallback = target_dir.join("debug").join(executable_name);

    if fallback.exists() {
        return fallback;
    }

    panic!(
        "CARGO_BIN_EXE_lom is not set and fallback binary was not found at {}",
        fallback.display()
    );
}

fn repo_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
}

fn testdata(relative: &str) -> String {
    repo_root()
        .join("testdata")
        .join(relative)
        .to_string_lossy()
        .into_owned()
}

fn run_lom(args: &[&str]) -> Output {
    Command::new(cargo_bin())
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("run lom")
}

fn assert_exit_code(output: &Output, expected: i32) {
    let actual = output.status.code().unwrap_or(-1);
    assert_eq!(
        actual,
        expected,
        "unexpected exit code; stdout: {}; stderr: {}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
}

fn stdout_json(output: &Output) -> serde_json::Value {
    let stdout = String::from_utf8_lossy(&output.stdout);
    serde_json::from_str(&stdout).expect("stdout should contain valid JSON")
}

fn write_file(dir: &Path, name: &str, content: &str) -> String {
    let path = dir.join(name);
    fs::write(&path, content).expect("temporary file should be writable");
    path.to_string_lossy().into_owned()
}

#[test]
fn deserialize_command_outputs_form() {
    let config = testdata("config.yaml");
    let record = testdata("records/published.json");

    let output = run_lom(&["--config", &config, "deserialize", &record]);

    assert_exit_code(&output, 0);
    let parsed = stdout_json(&output);
    let form = &parsed["metadata"]["form"];
    assert_eq!(form["title"], "Introduction to Linear Algebra");
    assert_eq!(form["contributor"][3], serde_json::json!({"role": {"value": ""}, "name": "Jane Doe"}));
    assert_eq!(form["oefos"].as_array().map(Vec::len), Some(6));
    assert!(parsed.get("revision_id").is_none());
}

#[test]
fn serialize_command_writes_output_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = testdata("config.yaml");
    let record = testdata("records/draft_form.json");
    let target = dir.path().join("saved.json");
    let target_arg = target.to_string_lossy().into_owned();

    let output = run_lom(&[
        "--config", &config, "--locale", "de", "serialize", &record, "--output", &target_arg, "--pretty",
    ]);

    assert_exit_code(&output, 0);
    assert!(output.stdout.is_empty());
    let saved: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&target).expect("output file")).expect("valid JSON");
    assert_eq!(saved["metadata"]["general"]["title"]["langstring"]["lang"], "de");
    assert!(saved["metadata"].get("form").is_none());
    assert_eq!(
        saved["metadata"]["classification"][0]["taxonpath"].as_array().map(Vec::len),
        Some(2)
    );
}

#[test]
fn unsupported_locale_falls_back_to_default() {
    let config = testdata("config.yaml");
    let record = testdata("records/draft_form.json");

    let output = run_lom(&["--config", &config, "--locale", "fr", "serialize", &record]);

    assert_exit_code(&output, 0);
    assert_eq!(stdout_json(&output)["metadata"]["general"]["title"]["langstring"]["lang"], "en");
    assert!(String::from_utf8_lossy(&output.stderr).contains("not supported"));
}

#[test]
fn errors_command_prints_flat_paths() {
    let errors = testdata("errors/server_errors.json");

    let output = run_lom(&["errors", &errors, "--flat"]);

    assert_exit_code(&output, 0);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("metadata.form.license: bad url bad desc\n"));
    assert!(stdout.contains("metadata.custom.thing: Unexpected field.\n"));
}

#[test]
fn errors_command_outputs_tree() {
    let errors = testdata("errors/server_errors.json");

    let output = run_lom(&["errors", &errors]);

    assert_exit_code(&output, 0);
    assert_eq!(stdout_json(&output)["metadata"]["form"]["contributor"], "Name is required.");
}

#[test]
fn missing_label_returns_data_exit_code() {
    let dir = tempfile::tempdir().expect("tempdir");
    let record = write_file(
        dir.path(),
        "record.json",
        r#"{"metadata": {"form": {"oefos": [{"value": "2075"}]}}}"#,
    );
    let config = testdata("config.yaml");

    let output = run_lom(&["--config", &config, "serialize", &record]);

    assert_exit_code(&output, 2);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERROR:"));
    assert!(stderr.contains("2075"), "stderr should name the code: {stderr}");
}

#[test]
fn non_object_record_returns_data_exit_code() {
    let dir = tempfile::tempdir().expect("tempdir");
    let record = write_file(dir.path(), "record.json", "[1, 2, 3]");

    let output = run_lom(&["deserialize", &record]);

    assert_exit_code(&output, 2);
}

#[test]
fn invalid_config_returns_fatal_exit_code() {
    let dir = tempfile::tempdir().expect("tempdir");
    let bad_config = write_file(dir.path(), "config.yaml", "color: neon");
    let record = testdata("records/published.json");

    let output = run_lom(&["--config", &bad_config, "deserialize", &record]);

    assert_exit_code(&output, 3);
    assert!(
        String::from_utf8_lossy(&output.stderr).contains("ERROR:"),
        "expected error prefix; stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}

#[test]
fn missing_vocabulary_file_returns_fatal_exit_code() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = write_file(
        dir.path(),
        "config.yaml",
        "vocabularies:\n  oefos: missing/oefos.csv\n",
    );
    let record = testdata("records/published.json");

    let output = run_lom(&["--config", &config, "deserialize", &record]);

    assert_exit_code(&output, 3);
}

#[test]
fn vocab_command_prints_label() {
    let config = testdata("config.yaml");

    let output = run_lom(&["--config", &config, "vocab", "oefos", "--code", "2074"]);

    assert_exit_code(&output, 0);
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "Environmental Engineering, Applied Geosciences\n"
    );
}

#[test]
fn vocab_command_lists_builtin_vocabulary() {
    let output = run_lom(&["vocab", "contributor"]);

    assert_exit_code(&output, 0);
    let parsed = stdout_json(&output);
    assert!(parsed.get("Author").is_some());
    assert!(parsed.get("Publisher").is_some());
}

#[test]
fn unknown_vocabulary_returns_data_exit_code() {
    let output = run_lom(&["vocab", "colors"]);

    assert_exit_code(&output, 2);
    assert!(String::from_utf8_lossy(&output.stderr).contains("Unknown vocabulary 'colors'"));
}
