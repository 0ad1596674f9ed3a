#![cfg(feature = "storage-rocksdb")]

use assert_cmd::cargo_bin;
use std::process::Command;
use tempfile::tempdir;

mod common;

#[test]
fn test_rocksdb_persistence_recovery() {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("test_db");

    // 1. First run: seed the database and transfer 1000 from account 1 to 2
    let output1 = common::seeded_command()
        .arg("--db-path")
        .arg(&db_path)
        .args([
            "transfer", "--user", "User1", "--from", "1", "--to", "2", "--amount", "1000",
            "--title", "Persisted",
        ])
        .output()
        .expect("Failed to execute command");
    assert!(output1.status.success());
    let stdout1 = String::from_utf8_lossy(&output1.stdout);
    assert!(stdout1.contains("6,1,2,1000,Persisted,"));

    // 2. Second run: no seed files, balances come from the database
    let output2 = Command::new(cargo_bin!("funds-transfer"))
        .arg("--db-path")
        .arg(&db_path)
        .arg("accounts")
        .output()
        .expect("Failed to execute command");
    assert!(output2.status.success());
    let stdout2 = String::from_utf8_lossy(&output2.stdout);
    assert!(stdout2.contains("1,User1,4000"));
    assert!(stdout2.contains("2,User2,4000"));

    // 3. Third run: the id sequence continues after the recovered history
    let output3 = Command::new(cargo_bin!("funds-transfer"))
        .arg("--db-path")
        .arg(&db_path)
        .args([
            "transfer", "--user", "User2", "--from", "2", "--to", "1", "--amount", "1",
            "--title", "Back",
        ])
        .output()
        .expect("Failed to execute command");
    assert!(output3.status.success());
    let stdout3 = String::from_utf8_lossy(&output3.stdout);
    assert!(stdout3.contains("7,2,1,1,Back,"));
}
