use assert_cmd::prelude::*;
use predicates::prelude::*;

mod common;

#[test]
fn test_search_by_account_matches_either_side() {
    let mut cmd = common::seeded_command();
    cmd.args(["search", "--account-id", "3"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("5,3,2,20,Gift,2023-01-05T08:00:00"))
        .stdout(predicate::str::contains("Groceries").not());

    let mut cmd = common::seeded_command();
    cmd.args(["search", "--account-id", "1"]);

    // Account 1 is the source of 1 and 4 and the destination of 2 and 3.
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Groceries"))
        .stdout(predicate::str::contains("Dinner"))
        .stdout(predicate::str::contains("Refund"))
        .stdout(predicate::str::contains("Rent"))
        .stdout(predicate::str::contains("Gift").not());
}

#[test]
fn test_search_date_to_includes_whole_day() {
    let mut cmd = common::seeded_command();
    cmd.args(["search", "--date-to", "2023-01-02"]);

    // Dinner happened at 18:45 on the 2nd and is still included.
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Groceries"))
        .stdout(predicate::str::contains("Dinner"))
        .stdout(predicate::str::contains("Refund").not());
}

#[test]
fn test_search_amount_and_date_range() {
    let mut cmd = common::seeded_command();
    cmd.args([
        "search",
        "--amount-from",
        "60",
        "--amount-to",
        "150",
        "--date-from",
        "2023-01-02",
    ]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Dinner"))
        .stdout(predicate::str::contains("Rent"))
        .stdout(predicate::str::contains("Refund").not())
        .stdout(predicate::str::contains("Groceries").not());
}

#[test]
fn test_search_paging() {
    let mut cmd = common::seeded_command();
    cmd.args(["search", "--page", "1", "--size", "2"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Refund"))
        .stdout(predicate::str::contains("Rent"))
        .stdout(predicate::str::contains("Dinner").not())
        .stdout(predicate::str::contains("Gift").not());
}

#[test]
fn test_search_rejects_bad_date() {
    let mut cmd = common::seeded_command();
    cmd.args(["search", "--date-to", "02/01/2023"]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Invalid date"));
}

#[test]
fn test_search_date_to_last_representable_day() {
    let mut cmd = common::seeded_command();
    cmd.args(["search", "--date-to", "+262142-12-31"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Groceries"))
        .stdout(predicate::str::contains("Gift"));
}
