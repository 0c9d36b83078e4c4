use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;

/// A throwaway HOME so settings and data never touch the real user's.
struct Sandbox {
    home: tempfile::TempDir,
}

impl Sandbox {
    fn new() -> Self {
        Self {
            home: tempfile::tempdir().unwrap(),
        }
    }

    fn data_dir(&self) -> PathBuf {
        self.home.path().join("data")
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("tally").unwrap();
        cmd.env("HOME", self.home.path())
            .env("NO_COLOR", "1")
            .env_remove("TALLY_LOG")
            .env_remove("DB_HOST")
            .env_remove("DB_NAME")
            .env_remove("DB_USER")
            .env_remove("DB_PASS");
        cmd
    }

    fn init(&self) -> &Self {
        self.cmd()
            .args(["init", "--data-dir"])
            .arg(self.data_dir())
            .assert()
            .success()
            .stdout(predicate::str::contains("Initialized tally"));
        self
    }

    fn add(&self, category: &str, amount: &str) {
        self.cmd().args(["add", category, amount]).assert().success();
    }
}

#[test]
fn add_list_delete_updates_total() {
    let sb = Sandbox::new();
    sb.init();
    sb.cmd()
        .args(["add", "Food", "1500"])
        .assert()
        .success()
        .stdout(predicate::str::contains("'Food' added!"));
    sb.add("Transport", "300");

    sb.cmd()
        .arg("total")
        .assert()
        .success()
        .stdout(predicate::str::contains("Total: 1,800 Tenge"));

    sb.cmd()
        .args(["delete", "0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted: Food - 1,500 Tenge"));

    sb.cmd()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Transport").and(predicate::str::contains("Food").not()))
        .stdout(predicate::str::contains("Total: 300 Tenge"));
}

#[test]
fn invalid_amounts_are_rejected() {
    let sb = Sandbox::new();
    sb.init();
    sb.add("Food", "100");

    for bad in ["0", "-5", "abc"] {
        sb.cmd()
            .args(["add", "Food", bad])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Amount must be"));
    }
    sb.cmd()
        .args(["add", "  ", "10"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("category is empty"));

    sb.cmd()
        .arg("total")
        .assert()
        .stdout(predicate::str::contains("Total: 100 Tenge"));
}

#[test]
fn delete_out_of_range_is_noop() {
    let sb = Sandbox::new();
    sb.init();
    sb.add("Food", "100");
    sb.cmd()
        .args(["delete", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No expense at position 3."));
    sb.cmd()
        .arg("total")
        .assert()
        .stdout(predicate::str::contains("Total: 100 Tenge"));
}

#[test]
fn mirror_file_follows_database() {
    let sb = Sandbox::new();
    sb.init();
    sb.add("Food", "1500");
    sb.add("Transport", "300");
    sb.cmd().args(["delete", "1"]).assert().success();

    let mirror = std::fs::read_to_string(sb.data_dir().join("expenses.json")).unwrap();
    let rows: Vec<serde_json::Value> = serde_json::from_str(&mirror).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["category"], "Food");
    assert_eq!(rows[0]["amount"], 1500);
}

#[test]
fn unreachable_database_falls_back_to_mirror() {
    let sb = Sandbox::new();
    sb.init();
    std::fs::write(
        sb.data_dir().join("expenses.json"),
        r#"[{"category": "Rent", "amount": 90000, "date": "2025-01-01"}]"#,
    )
    .unwrap();
    let missing = sb.home.path().join("no").join("such").join("dir");

    sb.cmd()
        .env("DB_HOST", &missing)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Rent"))
        .stdout(predicate::str::contains("read-only"));

    sb.cmd()
        .env("DB_HOST", &missing)
        .args(["add", "Food", "10"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unavailable"));

    let mirror = std::fs::read_to_string(sb.data_dir().join("expenses.json")).unwrap();
    assert!(!mirror.contains("Food"));
}

#[test]
fn export_then_import_roundtrips_csv() {
    let source = Sandbox::new();
    source.init();
    source.add("Food", "1500");
    source.add("Transport", "300");
    source.add("Food", "250");

    let csv = source.home.path().join("out.csv");
    source
        .cmd()
        .arg("export")
        .arg(&csv)
        .assert()
        .success()
        .stdout(predicate::str::contains("Data exported to: out.csv"));

    let target = Sandbox::new();
    target.init();
    target
        .cmd()
        .arg("import")
        .arg(&csv)
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported 3 records from CSV!"));
    target
        .cmd()
        .arg("total")
        .assert()
        .stdout(predicate::str::contains("Total: 2,050 Tenge"));
}

#[test]
fn import_skips_bad_rows() {
    let sb = Sandbox::new();
    sb.init();
    let csv = sb.home.path().join("in.csv");
    std::fs::write(&csv, "category,amount,date\nFood,100,2025-01-01\nBad,xx,2025-01-01\n").unwrap();
    sb.cmd()
        .arg("import")
        .arg(&csv)
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported 1 records from CSV! (1 rows skipped)"));
}

#[test]
fn export_of_empty_ledger_fails() {
    let sb = Sandbox::new();
    sb.init();
    sb.cmd()
        .args(["export", "empty.csv"])
        .current_dir(sb.home.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("No data to export"));
}

#[test]
fn stats_search_and_chart() {
    let sb = Sandbox::new();
    sb.init();
    sb.cmd()
        .arg("stats")
        .assert()
        .success()
        .stdout(predicate::str::contains("No data found."));

    sb.add("Coffee", "800");
    sb.add("Rent", "150000");
    sb.add("Gum", "200");

    sb.cmd()
        .arg("stats")
        .assert()
        .success()
        .stdout(predicate::str::contains("Max: Rent (150,000 Tenge)"))
        .stdout(predicate::str::contains("Min: Gum (200 Tenge)"));

    sb.cmd()
        .args(["search", "RENT"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Rent").and(predicate::str::contains("Coffee").not()));

    sb.cmd()
        .args(["search", "pizza"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing found."));

    sb.cmd()
        .arg("chart")
        .assert()
        .success()
        .stdout(predicate::str::contains("Expense Distribution by Category"))
        .stdout(predicate::str::contains("Coffee"));
}

#[test]
fn sync_pull_seeds_empty_database_once() {
    let sb = Sandbox::new();
    sb.init();
    std::fs::write(
        sb.data_dir().join("expenses.json"),
        r#"[{"category": "Food", "amount": 1500, "date": "2025-01-02"}]"#,
    )
    .unwrap();

    sb.cmd()
        .args(["sync", "pull"])
        .assert()
        .success()
        .stdout(predicate::str::contains("seeded with 1 records"));
    sb.cmd()
        .args(["sync", "pull"])
        .assert()
        .success()
        .stdout(predicate::str::contains("already has data"));
    sb.cmd()
        .arg("total")
        .assert()
        .stdout(predicate::str::contains("Total: 1,500 Tenge"));
}

#[test]
fn file_backend_needs_no_database() {
    let sb = Sandbox::new();
    sb.cmd()
        .args(["init", "--backend", "file", "--data-dir"])
        .arg(sb.data_dir())
        .assert()
        .success();
    sb.add("Food", "1500");
    assert!(!sb.data_dir().join("expenses.db").exists());
    sb.cmd()
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Backend:    file"))
        .stdout(predicate::str::contains("Expenses:   1"));
}
