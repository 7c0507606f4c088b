use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const NOTICE: &str = "美菱移模通知单（外调）\n\
                      模具移模时间2024-05-10\n\
                      零件图号 模具名称 模具编号 模具厂家 移至地方 封样单号\n\
                      1 C23122.21.1 把手座 ML01230271 红旗 ML-FYJYD-20240510-1000123\n";

const NOT_A_NOTICE: &str = "美菱采购订单\n订单日期 2024-05-10\n";

/// `mtn` with the config directory pointed into `home`.
fn mtn(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("mtn").unwrap();
    cmd.env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join("config"));
    cmd
}

fn write(dir: &Path, name: &str, content: &str) -> String {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path.to_string_lossy().into_owned()
}

#[test]
fn inspect_without_files_is_usage_error() {
    let home = TempDir::new().unwrap();
    mtn(&home).arg("inspect").assert().code(2);
}

#[test]
fn inspect_masks_successful_notice() {
    let home = TempDir::new().unwrap();
    let file = write(home.path(), "ok.txt", NOTICE);

    mtn(&home)
        .args(["inspect", &file])
        .assert()
        .success()
        .stdout(predicate::str::contains("=== ok.txt ==="))
        .stdout(predicate::str::contains("parseOk: true"))
        .stdout(predicate::str::contains("mouldMoveDate: 2024-05-10"))
        .stdout(predicate::str::contains("rows: 1"))
        .stdout(predicate::str::contains("A#####.##.#"))
        .stdout(predicate::str::contains("C23122").not());
}

#[test]
fn inspect_reports_failures_and_exits_zero() {
    let home = TempDir::new().unwrap();
    let bad = write(home.path(), "bad.txt", NOT_A_NOTICE);
    let missing = home.path().join("missing.txt");

    mtn(&home)
        .args(["inspect", &bad, &missing.to_string_lossy()])
        .assert()
        .success()
        .stdout(predicate::str::contains("titleHit: false"))
        .stdout(predicate::str::contains("parseOk: false"))
        .stdout(predicate::str::contains("error: title marker"))
        .stdout(predicate::str::contains("=== missing.txt ==="));
}

#[test]
fn inspect_json_lines() {
    let home = TempDir::new().unwrap();
    let file = write(home.path(), "ok.txt", NOTICE);

    mtn(&home)
        .args(["inspect", "--json", &file])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""parseOk":true"#))
        .stdout(predicate::str::contains(r#""documentDate":"2024-05-10""#));
}

#[test]
fn parse_text_file_to_json() {
    let home = TempDir::new().unwrap();
    let file = write(home.path(), "notice.txt", NOTICE);

    mtn(&home)
        .args(["parse", &file])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""status":"success""#))
        .stdout(predicate::str::contains(r#""partNo":"C23122.21.1""#))
        .stdout(predicate::str::contains(r#""mouldNo":"ML01230271""#));
}

#[test]
fn parse_csv_to_output_file() {
    let home = TempDir::new().unwrap();
    let file = write(home.path(), "notice.txt", NOTICE);
    let out = home.path().join("rows.csv");

    mtn(&home)
        .args(["parse", &file, "--format", "csv", "--output", &out.to_string_lossy()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Output written to"));

    let csv = fs::read_to_string(&out).unwrap();
    assert!(csv.starts_with("document_date,index,part_no,"));
    assert!(csv.contains("2024-05-10,1,C23122.21.1,把手座,ML01230271,"));
}

#[test]
fn parse_rejects_other_documents() {
    let home = TempDir::new().unwrap();
    let file = write(home.path(), "order.txt", NOT_A_NOTICE);

    mtn(&home)
        .args(["parse", &file])
        .assert()
        .failure()
        .stderr(predicate::str::contains("is not importable"));
}

#[test]
fn parse_rejects_unsupported_extension() {
    let home = TempDir::new().unwrap();
    let file = write(home.path(), "notice.docx", NOTICE);

    mtn(&home)
        .args(["parse", &file])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported file format"));
}

#[test]
fn batch_writes_outputs_and_summary() {
    let home = TempDir::new().unwrap();
    let inputs = home.path().join("in");
    let outputs = home.path().join("out");
    fs::create_dir_all(&inputs).unwrap();
    write(&inputs, "a.txt", NOTICE);
    write(&inputs, "b.txt", NOT_A_NOTICE);

    let pattern = inputs.join("*.txt");
    mtn(&home)
        .args([
            "batch",
            &pattern.to_string_lossy(),
            "--output-dir",
            &outputs.to_string_lossy(),
            "--format",
            "text",
            "--summary",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 2 files"))
        .stdout(predicate::str::contains("Imported 1 of 2 notices"))
        .stdout(predicate::str::contains("b.txt (rejected)"));

    let text = fs::read_to_string(outputs.join("a.txt")).unwrap();
    assert!(text.contains("Mould move date: 2024-05-10"));
    assert!(!outputs.join("b.txt").exists());

    let summary = fs::read_to_string(outputs.join("summary.csv")).unwrap();
    assert!(summary.starts_with("filename,status,document_date,rows,error"));
    assert!(summary.contains("a.txt,imported,2024-05-10,1,"));
    assert!(summary.contains("b.txt,rejected,,,\"title marker"));
}

#[test]
fn batch_without_matches_fails() {
    let home = TempDir::new().unwrap();
    let pattern = home.path().join("*.pdf");

    mtn(&home)
        .args(["batch", &pattern.to_string_lossy()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No matching files"));
}

#[test]
fn config_init_get_set() {
    let home = TempDir::new().unwrap();
    let config = home.path().join("mtn.json");
    let config = config.to_string_lossy();

    mtn(&home)
        .args(["--config", &config, "config", "init"])
        .assert()
        .success();

    mtn(&home)
        .args(["--config", &config, "config", "set", "layout.char_width", "6.5"])
        .assert()
        .success();

    mtn(&home)
        .args(["--config", &config, "config", "get", "layout.char_width"])
        .assert()
        .success()
        .stdout(predicate::str::contains("6.5"));

    mtn(&home)
        .args(["--config", &config, "config", "set", "layout.unknown", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration key not found"));
}

#[test]
fn config_path_uses_config_dir() {
    let home = TempDir::new().unwrap();

    mtn(&home)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.json"))
        .stdout(predicate::str::contains("not created"));
}
