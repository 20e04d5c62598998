mod common;

use std::fs;

use common::{entry, ids, messages, TestEnv};
use profit_ledger::{
    core::{backup, services::ImportMode, validator},
    domain::{BackupSnapshot, Entry, Ledger},
    errors::LedgerError,
};
use serde_json::json;
use tempfile::TempDir;

fn write_backup(dir: &TempDir, name: &str, entries: &[Entry]) -> std::path::PathBuf {
    let snapshot = BackupSnapshot::capture(
        &Ledger::from_entries(entries.to_vec()),
        common::start(),
    );
    let path = dir.path().join(name);
    fs::write(&path, serde_json::to_string_pretty(&snapshot).unwrap()).unwrap();
    path
}

#[test]
fn merge_prepends_only_unknown_ids() {
    let env = TestEnv::new();
    let files = TempDir::new().unwrap();
    let mut manager = env.open();

    let current = write_backup(&files, "current.json", &[entry(1, 1.0, 0.0), entry(2, 1.0, 0.0), entry(3, 1.0, 0.0)]);
    let candidate = manager.import_file(&current).unwrap();
    manager.import_resolved(candidate, ImportMode::Replace);

    let incoming = write_backup(
        &files,
        "incoming.json",
        &[entry(2, 1.0, 0.0), entry(3, 1.0, 0.0), entry(4, 1.0, 0.0), entry(5, 1.0, 0.0)],
    );
    let candidate = manager.import_file(&incoming).unwrap();
    assert_eq!(manager.import_resolved(candidate, ImportMode::Merge), 2);
    assert_eq!(ids(&manager), vec![4, 5, 1, 2, 3]);
    assert!(messages(&mut manager)
        .contains(&"Imported 2 new entries (merged with existing data)".to_string()));

    // The merge survives a restart.
    drop(manager);
    assert_eq!(ids(&env.open()), vec![4, 5, 1, 2, 3]);
}

#[test]
fn replace_adopts_the_validated_candidate() {
    let env = TestEnv::new();
    let files = TempDir::new().unwrap();
    let mut manager = env.open();
    manager.add_sample_entries();

    let raw = json!({
        "entries": [
            {"id": 11, "date": "2024-02-01", "revenue": "500", "commission": 50, "expenses": 5, "profit": 45},
            42,
            {"id": 12, "date": "2024-02-02"}
        ]
    });
    let path = files.path().join("replace.json");
    fs::write(&path, raw.to_string()).unwrap();

    let candidate = manager.import_file(&path).unwrap();
    assert_eq!(candidate.skipped, 1);
    let expected = validator::validate(&raw["entries"], manager.now()).entries;
    assert_eq!(manager.import_resolved(candidate, ImportMode::Replace), 2);
    assert_eq!(manager.ledger().entries, expected);
    assert_eq!(manager.aggregates().total_revenue, 500.0);
    assert!(messages(&mut manager)
        .contains(&"Imported 2 entries (replaced existing data)".to_string()));
}

#[test]
fn rejected_imports_leave_ledger_untouched() {
    let env = TestEnv::new();
    let files = TempDir::new().unwrap();
    let mut manager = env.open();
    manager.add_sample_entries();
    let before = manager.ledger().clone();

    let cases = [
        ("broken.json", "{not json", "Error reading backup file!"),
        ("shape.json", r#"{"entries": "nope"}"#, "Invalid backup file format!"),
        ("empty.json", r#"{"entries": [1, 2]}"#, "No valid entries found in backup file!"),
    ];
    for (name, contents, notice) in cases {
        let path = files.path().join(name);
        fs::write(&path, contents).unwrap();
        assert!(manager.import_file(&path).is_err(), "{name} should be rejected");
        assert_eq!(manager.visible_notice().unwrap().message, notice);
    }
    assert!(matches!(
        manager.import_file(&files.path().join("missing.json")),
        Err(LedgerError::Io(_))
    ));
    assert_eq!(manager.ledger(), &before);
}

#[test]
fn json_export_round_trips_through_import() {
    let env = TestEnv::new();
    let out = TempDir::new().unwrap();
    let mut manager = env.open();
    manager.add_sample_entries();

    let path = manager.export_json(out.path()).unwrap();
    assert_eq!(
        path.file_name().unwrap().to_string_lossy(),
        "ashok_kumar_and_sons_backup_2024-01-10.json"
    );
    assert_eq!(
        manager.visible_notice().unwrap().message,
        "Backup exported successfully! (3 entries)"
    );

    let contents = fs::read_to_string(&path).unwrap();
    assert!(contents.contains("\n  \"entries\": ["));
    let snapshot: BackupSnapshot = serde_json::from_str(&contents).unwrap();
    assert_eq!(snapshot.company.as_deref(), Some("Ashok Kumar and Sons"));
    assert_eq!(snapshot.total_entries, 3);

    let candidate = backup::import_from_file(&contents, manager.now()).unwrap();
    assert_eq!(candidate.entries, manager.ledger().entries);
}

#[test]
fn csv_export_writes_header_and_rows() {
    let env = TestEnv::new();
    let out = TempDir::new().unwrap();
    let mut manager = env.open();
    manager.add_sample_entries();

    let path = manager.export_csv(out.path()).unwrap();
    assert_eq!(
        path.file_name().unwrap().to_string_lossy(),
        "ashok_kumar_and_sons_profit_2024-01-10.csv"
    );
    let contents = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(
        lines[0],
        "Date,Time,Revenue (₹),Commission (₹),Expenses (₹),Profit (₹)"
    );
    assert_eq!(lines.len(), 4);
    assert!(lines[1].starts_with("16 Dec 2023,09:15 am,12000.00,600.00,3000.00,-2400.00"));
    assert!(lines[3].starts_with("15 Dec 2023,10:30 am,10000.00,500.00,2000.00,-1500.00"));
}

#[test]
fn empty_ledger_exports_nothing() {
    let env = TestEnv::new();
    let out = TempDir::new().unwrap();
    let mut manager = env.open();

    assert!(matches!(
        manager.export_json(out.path()),
        Err(LedgerError::NothingToExport)
    ));
    assert!(matches!(
        manager.export_csv(out.path()),
        Err(LedgerError::NothingToExport)
    ));
    let notices = messages(&mut manager);
    assert!(notices.contains(&"No data to backup!".to_string()));
    assert!(notices.contains(&"No data to export!".to_string()));
    assert_eq!(fs::read_dir(out.path()).unwrap().count(), 0);
}
