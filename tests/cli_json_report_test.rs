//! Binary tests for `--format json` reports

use anonymap::cli::commands::RunReport;
use std::process::Command;
use tempfile::tempdir;

fn anonymap() -> Command {
    Command::new(env!("CARGO_BIN_EXE_anonymap"))
}

#[test]
fn test_anonymize_json_stdout_is_parseable() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("memo.txt"), "Jane Doe met Acme Corp.").unwrap();
    std::fs::write(
        dir.path().join("map.csv"),
        "person_001,Jane Doe\norg_001,Acme Corp\nlonely\n",
    )
    .unwrap();

    let output = anonymap()
        .current_dir(dir.path())
        .args([
            "anonymize",
            "memo.txt",
            "-m",
            "map.csv",
            "--no-header",
            "--format",
            "json",
            "-o",
            "out.txt",
        ])
        .output()
        .unwrap();

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let run: RunReport = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(run.mapping.summary, "2 of 3 rows loaded");
    assert_eq!(run.mapping.warnings.len(), 1);
    assert_eq!(run.mapping.warnings[0].row, Some(3));
    assert_eq!(run.report.total_replacements(), 2);
    assert!(!run.dry_run);
    assert_eq!(
        std::fs::read_to_string(dir.path().join("out.txt")).unwrap(),
        "**person_001** met **org_001**."
    );
}

#[test]
fn test_deanonymize_dry_run_json_stdout_is_parseable() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("memo.md"), "**person_001** and **xyz_001**").unwrap();
    std::fs::write(
        dir.path().join("map.csv"),
        "base_placeholder,real_entity_name\nperson_001,Jane Doe\nxyz_001,Widget\n",
    )
    .unwrap();

    let output = anonymap()
        .current_dir(dir.path())
        .args([
            "deanonymize",
            "memo.md",
            "-m",
            "map.csv",
            "--format",
            "json",
            "--dry-run",
        ])
        .output()
        .unwrap();

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let run: RunReport = serde_json::from_slice(&output.stdout).unwrap();
    assert!(run.dry_run);
    assert!(run.output.is_none());
    assert_eq!(run.mapping.summary, "2 of 2 rows loaded");
    assert_eq!(run.report.issues.len(), 1);
    assert!(String::from_utf8_lossy(&output.stderr).contains("Dry run"));
    assert!(!dir.path().join("memo_deanonymized.md").exists());
}
