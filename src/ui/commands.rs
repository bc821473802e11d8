use std::collections::HashMap;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::LazyLock;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::app::{App, InputMode, PendingAction, Screen};
use crate::analytics::MAX_WINDOW_SIZE;
use crate::db::{Database, DATE_FORMAT};
use crate::models::{validate_limits, MonthKey, Transaction, TransactionUpdate};
use crate::run::resolve_category;

pub(crate) struct Command {
    pub(crate) description: &'static str,
    pub(crate) run: fn(&str, &mut App, &mut Database) -> anyhow::Result<()>,
}

macro_rules! register_command {
    ($name:expr, $desc:expr, $func:expr, $registry:expr) => {{
        $registry.insert(
            $name,
            Command {
                description: $desc,
                run: $func,
            },
        );
    }};
}

pub(crate) static COMMANDS: LazyLock<HashMap<&str, Command>> = LazyLock::new(|| {
    let mut r: HashMap<&str, Command> = HashMap::new();

    register_command!("q", "Quit fintrack", cmd_quit, r);
    register_command!("quit", "Quit fintrack", cmd_quit, r);
    register_command!("d", "Go to Dashboard", cmd_dashboard, r);
    register_command!("dashboard", "Go to Dashboard", cmd_dashboard, r);
    register_command!("t", "Go to Transactions", cmd_transactions, r);
    register_command!("transactions", "Go to Transactions", cmd_transactions, r);
    register_command!("b", "Go to Budget", cmd_budget_screen, r);
    register_command!("budgets", "Go to Budget", cmd_budget_screen, r);
    register_command!("c", "Go to Charts", cmd_charts, r);
    register_command!("charts", "Go to Charts", cmd_charts, r);
    register_command!("help", "Show available commands", cmd_help, r);
    register_command!("h", "Show available commands", cmd_help, r);
    register_command!(
        "add",
        "Add transaction (e.g. :add 2024-03-05 12.50 Food Lunch)",
        cmd_add,
        r
    );
    register_command!(
        "a",
        "Add transaction (e.g. :a 2024-03-05 12.50 Food Lunch)",
        cmd_add,
        r
    );
    register_command!(
        "edit",
        "Edit selected transaction (e.g. :edit amount 14.00)",
        cmd_edit,
        r
    );
    register_command!(
        "e",
        "Edit selected transaction (e.g. :e category Gifts)",
        cmd_edit,
        r
    );
    register_command!(
        "delete-txn",
        "Delete selected transaction",
        cmd_delete_txn,
        r
    );
    register_command!(
        "budget",
        "Set a limit for the month (e.g. :budget Food 300)",
        cmd_budget,
        r
    );
    register_command!(
        "unbudget",
        "Remove a limit for the month (e.g. :unbudget Food)",
        cmd_unbudget,
        r
    );
    register_command!("month", "Set month (e.g. :month 2024-01)", cmd_month, r);
    register_command!("m", "Set month (e.g. :m 2024-01)", cmd_month, r);
    register_command!("next-month", "Go to next month", cmd_next_month, r);
    register_command!("prev-month", "Go to previous month", cmd_prev_month, r);
    register_command!(
        "window",
        "Months in the monthly series (e.g. :window 12)",
        cmd_window,
        r
    );
    register_command!(
        "export",
        "Export the month to CSV (e.g. :export ~/march.csv)",
        cmd_export,
        r
    );

    r
});

pub(crate) fn handle_command(input: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let trimmed = input.trim();
    let mut parts = trimmed.splitn(2, ' ');
    let cmd_name = parts.next().unwrap_or("");
    let args = parts.next().unwrap_or("").trim();

    if let Some(cmd) = COMMANDS.get(cmd_name) {
        tracing::debug!(command = cmd_name, "running command");
        (cmd.run)(args, app, db)?;
    } else {
        let suggestion = find_closest(cmd_name);
        app.set_status(format!(
            "Unknown command: :{cmd_name}. Did you mean :{suggestion}?"
        ));
    }

    Ok(())
}

fn find_closest(input: &str) -> String {
    COMMANDS
        .keys()
        .filter(|k| k.len() > 1) // skip single-letter aliases for suggestions
        .min_by_key(|k| (levenshtein(input, k), **k))
        .unwrap_or(&"help")
        .to_string()
}

fn levenshtein(a: &str, b: &str) -> usize {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for i in 1..=a.len() {
        curr[0] = i;
        for j in 1..=b.len() {
            let cost = if a[i - 1] == b[j - 1] { 0 } else { 1 };
            curr[j] = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// Parse `<date> <amount> <category> <description...>` into a new transaction.
pub(crate) fn parse_new_transaction(args: &str) -> Result<Transaction, String> {
    const USAGE: &str = "Usage: :add <YYYY-MM-DD> <amount> <category> <description>";

    let mut parts = args.splitn(4, ' ').map(str::trim);
    let (Some(date), Some(amount), Some(category), Some(description)) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(USAGE.into());
    };

    let date = NaiveDate::parse_from_str(date, DATE_FORMAT)
        .map_err(|_| format!("Invalid date: {date}. Use YYYY-MM-DD"))?;
    let amount = Decimal::from_str(amount).map_err(|_| format!("Invalid amount: {amount}"))?;
    let category = resolve_category(category).map_err(|e| e.to_string())?;

    let txn = Transaction::new(amount, date, description.to_string(), category);
    txn.validate().map_err(|e| e.to_string())?;
    Ok(txn)
}

/// Parse `<field> <value>` into a single-field update.
pub(crate) fn parse_update(args: &str) -> Result<TransactionUpdate, String> {
    const USAGE: &str = "Usage: :edit <date|amount|category|description> <value>";

    let Some((field, value)) = args.split_once(' ') else {
        return Err(USAGE.into());
    };
    let value = value.trim();

    let mut update = TransactionUpdate::default();
    match field {
        "date" => {
            update.date = Some(
                NaiveDate::parse_from_str(value, DATE_FORMAT)
                    .map_err(|_| format!("Invalid date: {value}. Use YYYY-MM-DD"))?,
            );
        }
        "amount" => {
            update.amount =
                Some(Decimal::from_str(value).map_err(|_| format!("Invalid amount: {value}"))?);
        }
        "category" => {
            update.category = Some(resolve_category(value).map_err(|e| e.to_string())?);
        }
        "description" => update.description = Some(value.to_string()),
        _ => return Err(USAGE.into()),
    }
    update.validate().map_err(|e| e.to_string())?;
    Ok(update)
}

// ── Command implementations ──────────────────────────────────

fn cmd_quit(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    app.running = false;
    Ok(())
}

fn cmd_dashboard(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    app.screen = Screen::Dashboard;
    Ok(())
}

fn cmd_transactions(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    app.screen = Screen::Transactions;
    Ok(())
}

fn cmd_budget_screen(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    app.screen = Screen::Budget;
    Ok(())
}

fn cmd_charts(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    app.screen = Screen::Charts;
    Ok(())
}

fn cmd_help(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    app.show_help = true;
    Ok(())
}

fn cmd_add(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let txn = match parse_new_transaction(args) {
        Ok(t) => t,
        Err(msg) => {
            app.set_status(msg);
            return Ok(());
        }
    };

    let id = db.insert_transaction(&txn)?;
    app.refresh_all(db)?;
    if let Some(pos) = app.listed_transactions().iter().position(|t| t.id == Some(id)) {
        app.transaction_index = pos;
    }
    app.set_status(format!(
        "Added #{id}: {} ${:.2} ({})",
        txn.description, txn.amount, txn.category
    ));
    Ok(())
}

fn cmd_edit(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    if app.screen != Screen::Transactions {
        app.set_status("Navigate to Transactions and select one first");
        return Ok(());
    }
    let Some(id) = app.selected_transaction().and_then(|t| t.id) else {
        app.set_status("No transaction selected");
        return Ok(());
    };

    let update = match parse_update(args) {
        Ok(u) => u,
        Err(msg) => {
            app.set_status(msg);
            return Ok(());
        }
    };

    if db.update_transaction(id, &update)? {
        app.refresh_all(db)?;
        app.set_status(format!("Updated transaction #{id}"));
    } else {
        app.refresh_all(db)?;
        app.set_status(format!("Transaction #{id} no longer exists"));
    }
    Ok(())
}

fn cmd_delete_txn(_args: &str, app: &mut App, _db: &mut Database) -> anyhow::Result<()> {
    if app.screen != Screen::Transactions || app.listed_transactions().is_empty() {
        app.set_status("Navigate to Transactions and select one first");
        return Ok(());
    }

    if let Some(txn) = app.selected_transaction() {
        if let Some(id) = txn.id {
            let desc = txn.description.clone();
            app.confirm_message = format!("Delete '{desc}'?");
            app.pending_action = Some(PendingAction::DeleteTransaction {
                id,
                description: desc,
            });
            app.input_mode = InputMode::Confirm;
        }
    }

    Ok(())
}

fn cmd_budget(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let Some((name, amount_str)) = args.rsplit_once(' ') else {
        app.set_status("Usage: :budget <category> <amount>. Example: :budget Food 300");
        return Ok(());
    };

    let category = match resolve_category(name) {
        Ok(c) => c,
        Err(e) => {
            app.set_status(e.to_string());
            return Ok(());
        }
    };
    let amount = match Decimal::from_str(amount_str.trim()) {
        Ok(a) => a,
        Err(_) => {
            app.set_status(format!("Invalid amount: {amount_str}"));
            return Ok(());
        }
    };

    let month = app.reference_month();
    let previous = app
        .budget
        .as_ref()
        .map_or(Decimal::ZERO, |b| b.limit_for(&category));
    let mut limits = app
        .budget
        .as_ref()
        .map(|b| b.categories.clone())
        .unwrap_or_default();
    limits.insert(category.clone(), amount);
    if let Err(e) = validate_limits(&limits) {
        app.set_status(e.to_string());
        return Ok(());
    }

    db.save_budget(month, &limits)?;
    app.refresh_all(db)?;
    app.screen = Screen::Budget;
    if previous.is_zero() {
        app.set_status(format!("Budget set: {category} = ${amount} for {month}"));
    } else {
        app.set_status(format!(
            "Budget set: {category} = ${amount} for {month} (was ${previous})"
        ));
    }
    Ok(())
}

fn cmd_unbudget(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    if args.is_empty() {
        app.set_status("Usage: :unbudget <category>");
        return Ok(());
    }
    let category = match resolve_category(args) {
        Ok(c) => c,
        Err(e) => {
            app.set_status(e.to_string());
            return Ok(());
        }
    };

    let month = app.reference_month();
    let Some(mut limits) = app.budget.as_ref().map(|b| b.categories.clone()) else {
        app.set_status(format!("No budget set for {month}"));
        return Ok(());
    };
    if limits.remove(&category).is_none() {
        app.set_status(format!("{category} has no limit for {month}"));
        return Ok(());
    }

    db.save_budget(month, &limits)?;
    app.refresh_all(db)?;
    app.set_status(format!("Removed {category} limit for {month}"));
    Ok(())
}

fn cmd_month(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    if args.is_empty() {
        app.set_status(format!("Month: {}", app.reference_month()));
        return Ok(());
    }

    match MonthKey::from_str(args) {
        Ok(month) => {
            app.set_reference_month(month, db)?;
            app.set_status(format!("Switched to month: {month}"));
        }
        Err(_) => app.set_status("Invalid month format. Use YYYY-MM (e.g. 2024-01)"),
    }
    Ok(())
}

fn cmd_next_month(_args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let month = app.reference_month().next();
    switch_month(app, db, month)
}

fn cmd_prev_month(_args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let month = app.reference_month().prev();
    switch_month(app, db, month)
}

fn switch_month(app: &mut App, db: &mut Database, month: MonthKey) -> anyhow::Result<()> {
    app.set_reference_month(month, db)?;
    app.set_status(format!("Month: {month}"));
    Ok(())
}

fn cmd_window(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    match args.parse::<usize>() {
        Ok(n) if (1..=MAX_WINDOW_SIZE).contains(&n) => {
            app.set_window(n, db)?;
            app.set_status(format!("Showing {n} months"));
        }
        _ => app.set_status(format!("Usage: :window <months> (1 to {MAX_WINDOW_SIZE})")),
    }
    Ok(())
}

fn cmd_export(args: &str, app: &mut App, db: &mut Database) -> anyhow::Result<()> {
    let month = app.reference_month();
    let path = if args.is_empty() {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        PathBuf::from(home).join(format!("fintrack-export-{month}.csv"))
    } else {
        PathBuf::from(crate::run::shellexpand(args))
    };

    match db.export_to_csv(&path, Some(month)) {
        Ok(0) => app.set_status(format!("No transactions in {month} to export")),
        Ok(count) => app.set_status(format!(
            "Exported {count} transactions to {}",
            path.display()
        )),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "export failed");
            app.set_status(format!("Export failed: {e}"));
        }
    }
    Ok(())
}
