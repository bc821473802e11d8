#![allow(clippy::unwrap_used)]

use rust_decimal_macros::dec;

use super::app::{App, InputMode, PendingAction, Screen};
use super::commands::{handle_command, parse_new_transaction, parse_update, COMMANDS};
use crate::analytics::AnalyticsConfig;
use crate::db::Database;
use crate::models::MonthKey;

fn month(s: &str) -> MonthKey {
    s.parse().unwrap()
}

fn setup() -> (App, Database) {
    let db = Database::open_in_memory().unwrap();
    let mut app = App::new(AnalyticsConfig::new(month("2024-03")));
    app.refresh_all(&db).unwrap();
    (app, db)
}

fn run(input: &str, app: &mut App, db: &mut Database) {
    handle_command(input, app, db).unwrap();
}

// ── Parsing ───────────────────────────────────────────────────

#[test]
fn test_parse_new_transaction() {
    let txn = parse_new_transaction("2024-03-05 12.50 food Lunch at the cafe").unwrap();
    assert_eq!(txn.amount, dec!(12.50));
    assert_eq!(txn.date.to_string(), "2024-03-05");
    assert_eq!(txn.category, "Food");
    assert_eq!(txn.description, "Lunch at the cafe");
}

#[test]
fn test_parse_new_transaction_rejects_bad_input() {
    assert!(parse_new_transaction("").is_err());
    assert!(parse_new_transaction("2024-03-05 12.50 Food").is_err());
    assert!(parse_new_transaction("2024-13-05 12.50 Food Lunch").is_err());
    assert!(parse_new_transaction("2024-03-05 abc Food Lunch").is_err());
    assert!(parse_new_transaction("2024-03-05 12.50 Pets Vet").is_err());
    assert!(parse_new_transaction("2024-03-05 0 Food Lunch").is_err());
    assert!(parse_new_transaction("2024-03-05 -4 Food Lunch").is_err());
}

#[test]
fn test_parse_update_fields() {
    assert_eq!(parse_update("amount 14.00").unwrap().amount, Some(dec!(14.00)));
    assert_eq!(
        parse_update("category gifts").unwrap().category.as_deref(),
        Some("Gifts")
    );
    assert_eq!(
        parse_update("description Team lunch").unwrap().description.as_deref(),
        Some("Team lunch")
    );
    assert!(parse_update("date 2024-02-29").unwrap().date.is_some());
}

#[test]
fn test_parse_update_rejects_bad_input() {
    assert!(parse_update("amount").is_err());
    assert!(parse_update("colour red").is_err());
    assert!(parse_update("amount -3").is_err());
    assert!(parse_update("date 2023-02-29").is_err());
}

// ── Registry ──────────────────────────────────────────────────

#[test]
fn test_registry_has_every_command() {
    for name in [
        "add",
        "edit",
        "delete-txn",
        "budget",
        "unbudget",
        "month",
        "next-month",
        "prev-month",
        "window",
        "export",
        "help",
        "quit",
        "dashboard",
        "transactions",
        "budgets",
        "charts",
    ] {
        assert!(COMMANDS.contains_key(name), "missing :{name}");
    }
}

#[test]
fn test_unknown_command_suggests_closest() {
    let (mut app, mut db) = setup();
    run("unbudgt Food", &mut app, &mut db);
    assert_eq!(
        app.status_message,
        "Unknown command: :unbudgt. Did you mean :unbudget?"
    );
}

// ── Transactions ──────────────────────────────────────────────

#[test]
fn test_add_refreshes_views() {
    let (mut app, mut db) = setup();
    run("add 2024-03-01 1000 Income Salary", &mut app, &mut db);
    run("add 2024-03-05 200 Food Groceries", &mut app, &mut db);

    assert_eq!(app.transactions.len(), 2);
    assert_eq!(app.dashboard.transaction_count, 2);
    assert_eq!(app.dashboard.summary.net_savings, dec!(800));
    assert_eq!(app.dashboard.breakdown.len(), 1);
    assert!(app.status_message.starts_with("Added #"));
}

#[test]
fn test_add_with_bad_input_only_sets_status() {
    let (mut app, mut db) = setup();
    run("add yesterday 5 Food Coffee", &mut app, &mut db);
    assert!(app.transactions.is_empty());
    assert!(app.status_message.starts_with("Invalid date"));
}

#[test]
fn test_edit_selected_transaction() {
    let (mut app, mut db) = setup();
    run("add 2024-03-05 200 Food Groceries", &mut app, &mut db);
    app.screen = Screen::Transactions;
    run("edit amount 250", &mut app, &mut db);

    assert_eq!(app.transactions[0].amount, dec!(250));
    assert_eq!(app.dashboard.summary.total_expenses, dec!(250));
}

#[test]
fn test_edit_requires_transactions_screen() {
    let (mut app, mut db) = setup();
    run("add 2024-03-05 200 Food Groceries", &mut app, &mut db);
    run("edit amount 250", &mut app, &mut db);
    assert_eq!(app.transactions[0].amount, dec!(200));
}

#[test]
fn test_delete_asks_for_confirmation() {
    let (mut app, mut db) = setup();
    run("add 2024-03-05 200 Food Groceries", &mut app, &mut db);
    app.screen = Screen::Transactions;
    run("delete-txn", &mut app, &mut db);

    assert_eq!(app.input_mode, InputMode::Confirm);
    assert!(matches!(
        app.pending_action,
        Some(PendingAction::DeleteTransaction { ref description, .. }) if description == "Groceries"
    ));
    // Nothing is removed until confirmed
    assert_eq!(db.get_transaction_count().unwrap(), 1);
}

// ── Search ────────────────────────────────────────────────────

#[test]
fn test_search_filters_listed_transactions_only() {
    let (mut app, mut db) = setup();
    run("add 2024-03-01 1000 Income Salary", &mut app, &mut db);
    run("add 2024-03-05 200 Food Groceries", &mut app, &mut db);
    run("add 2024-03-06 12 Food Grocery snacks", &mut app, &mut db);

    app.set_search("GROCER", &db).unwrap();
    assert!(app.is_searching());
    assert_eq!(app.listed_transactions().len(), 2);
    assert_eq!(app.transaction_index, 0);
    // Aggregates still cover every transaction
    assert_eq!(app.dashboard.transaction_count, 3);
    assert_eq!(app.dashboard.summary.total_income, dec!(1000));

    app.set_search("", &db).unwrap();
    assert_eq!(app.listed_transactions().len(), 3);
}

#[test]
fn test_search_selection_drives_edit_and_delete() {
    let (mut app, mut db) = setup();
    run("add 2024-03-05 200 Food Groceries", &mut app, &mut db);
    run("add 2024-03-06 40 Transportation Fuel", &mut app, &mut db);
    app.screen = Screen::Transactions;

    app.set_search("fuel", &db).unwrap();
    run("edit amount 45", &mut app, &mut db);
    let fuel = app.listed_transactions()[0].clone();
    assert_eq!(fuel.description, "Fuel");
    assert_eq!(fuel.amount, dec!(45));

    run("delete-txn", &mut app, &mut db);
    assert!(matches!(
        app.pending_action,
        Some(PendingAction::DeleteTransaction { id, .. }) if Some(id) == fuel.id
    ));
}

#[test]
fn test_search_survives_refresh_and_clamps_cursor() {
    let (mut app, mut db) = setup();
    run("add 2024-03-05 200 Food Groceries", &mut app, &mut db);
    run("add 2024-03-06 30 Food Groceries top-up", &mut app, &mut db);
    app.set_search("groceries", &db).unwrap();
    app.transaction_index = 1;

    let id = app.listed_transactions()[1].id.unwrap();
    db.delete_transaction(id).unwrap();
    app.refresh_all(&db).unwrap();

    assert_eq!(app.listed_transactions().len(), 1);
    assert_eq!(app.transaction_index, 0);
}

#[test]
fn test_search_with_no_matches() {
    let (mut app, mut db) = setup();
    run("add 2024-03-05 200 Food Groceries", &mut app, &mut db);
    app.set_search("rent", &db).unwrap();
    assert!(app.listed_transactions().is_empty());
    assert!(app.selected_transaction().is_none());
}

// ── Budgets ───────────────────────────────────────────────────

#[test]
fn test_budget_merges_into_month() {
    let (mut app, mut db) = setup();
    run("add 2024-03-05 200 Food Groceries", &mut app, &mut db);
    run("budget Food 300", &mut app, &mut db);
    run("budget housing 1200", &mut app, &mut db);

    let budget = db.get_budget(month("2024-03")).unwrap().unwrap();
    assert_eq!(budget.limit_for("Food"), dec!(300));
    assert_eq!(budget.limit_for("Housing"), dec!(1200));

    run("budget Food 350", &mut app, &mut db);
    assert_eq!(
        app.status_message,
        "Budget set: Food = $350 for 2024-03 (was $300)"
    );

    assert_eq!(app.screen, Screen::Budget);
    let food = app
        .dashboard
        .budget
        .iter()
        .find(|r| r.category == "Food")
        .unwrap();
    assert_eq!(food.actual, dec!(200));
    assert_eq!(food.remaining, dec!(150));
}

#[test]
fn test_budget_rejects_negative_limit() {
    let (mut app, mut db) = setup();
    run("budget Food -5", &mut app, &mut db);
    assert!(db.get_budget(month("2024-03")).unwrap().is_none());
}

#[test]
fn test_unbudget_removes_limit() {
    let (mut app, mut db) = setup();
    run("budget Food 300", &mut app, &mut db);
    run("budget Gifts 50", &mut app, &mut db);
    run("unbudget food", &mut app, &mut db);

    let budget = db.get_budget(month("2024-03")).unwrap().unwrap();
    assert_eq!(budget.categories.len(), 1);
    assert_eq!(budget.limit_for("Food"), dec!(0));
    assert_eq!(app.dashboard.budget.len(), 1);
}

#[test]
fn test_unbudget_without_budget() {
    let (mut app, mut db) = setup();
    run("unbudget Food", &mut app, &mut db);
    assert_eq!(app.status_message, "No budget set for 2024-03");
}

// ── Month and window ──────────────────────────────────────────

#[test]
fn test_month_navigation_reloads_budget() {
    let (mut app, mut db) = setup();
    run("budget Food 300", &mut app, &mut db);
    run("next-month", &mut app, &mut db);
    assert_eq!(app.reference_month(), month("2024-04"));
    assert!(app.budget.is_none());

    run("prev-month", &mut app, &mut db);
    assert!(app.budget.is_some());

    run("month 2023-12", &mut app, &mut db);
    assert_eq!(app.reference_month(), month("2023-12"));
    assert_eq!(app.dashboard.monthly.last().unwrap().month_key, month("2023-12"));
}

#[test]
fn test_month_rejects_bad_format() {
    let (mut app, mut db) = setup();
    run("month 2024-3", &mut app, &mut db);
    assert_eq!(app.reference_month(), month("2024-03"));
}

#[test]
fn test_window_resizes_series() {
    let (mut app, mut db) = setup();
    assert_eq!(app.dashboard.monthly.len(), 6);
    run("window 12", &mut app, &mut db);
    assert_eq!(app.dashboard.monthly.len(), 12);
    run("window 0", &mut app, &mut db);
    assert_eq!(app.dashboard.monthly.len(), 12);
}

#[test]
fn test_window_rejects_oversized() {
    let (mut app, mut db) = setup();
    run("window 120", &mut app, &mut db);
    assert_eq!(app.dashboard.monthly.len(), 120);
    run("window 10000000000", &mut app, &mut db);
    assert_eq!(app.config.window_size, 120);
    assert_eq!(app.status_message, "Usage: :window <months> (1 to 120)");
}

// ── Export and quit ───────────────────────────────────────────

#[test]
fn test_export_reference_month() {
    let (mut app, mut db) = setup();
    run("add 2024-03-05 200 Food Groceries", &mut app, &mut db);
    run("add 2024-02-05 50 Food Snacks", &mut app, &mut db);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("march.csv");
    run(&format!("export {}", path.display()), &mut app, &mut db);

    assert!(app.status_message.starts_with("Exported 1 transactions"));
    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.contains("Groceries"));
    assert!(!content.contains("Snacks"));
}

#[test]
fn test_quit() {
    let (mut app, mut db) = setup();
    run("quit", &mut app, &mut db);
    assert!(!app.running);
}
