use anyhow::{Context, Result};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

use super::{resolve_category, shellexpand, BudgetCommand, Command, ViewArgs};
use crate::analytics::{
    category_breakdown, compare_budget, monthly_series, summarize, AnalyticsConfig,
};
use crate::db::Database;
use crate::models::{validate_limits, Category, MonthKey, Transaction, TransactionUpdate};

pub(crate) fn as_cli(command: Command, db: &mut Database, config: AnalyticsConfig) -> Result<()> {
    match command {
        Command::Add {
            date,
            amount,
            category,
            description,
        } => {
            let txn = Transaction::new(amount, date, description, resolve_category(&category)?);
            txn.validate()?;
            let id = db.insert_transaction(&txn)?;
            println!("Added transaction #{id}");
            Ok(())
        }
        Command::Edit {
            id,
            date,
            amount,
            category,
            description,
        } => {
            let update = TransactionUpdate {
                amount,
                date,
                description,
                category: category.as_deref().map(resolve_category).transpose()?,
            };
            cli_edit(db, id, &update)
        }
        Command::Delete { id } => {
            if !db.delete_transaction(id)? {
                anyhow::bail!("Transaction #{id} not found");
            }
            println!("Deleted transaction #{id}");
            Ok(())
        }
        Command::Show { id } => {
            let txn = db
                .get_transaction(id)?
                .ok_or_else(|| anyhow::anyhow!("Transaction #{id} not found"))?;
            println!("ID:          {id}");
            println!("Date:        {}", txn.date);
            println!("Description: {}", txn.description);
            println!("Category:    {}", txn.category);
            println!("Amount:      ${:.2}", txn.amount);
            println!("Created:     {}", txn.created_at);
            println!("Updated:     {}", txn.updated_at);
            Ok(())
        }
        Command::List { limit } => cli_list(db, limit),
        Command::Budget(BudgetCommand::Set { for_month, limits }) => {
            let month = for_month.unwrap_or(config.reference_month);
            cli_budget_set(db, month, limits)
        }
        Command::Budget(BudgetCommand::Show { for_month }) => {
            cli_budget_show(db, for_month.unwrap_or(config.reference_month))
        }
        Command::Summary(args) => cli_summary(db, &args),
        Command::Breakdown(args) => cli_breakdown(db, &args),
        Command::Monthly { json } => cli_monthly(db, &config, json),
        Command::Compare { for_month, json } => {
            cli_compare(db, for_month.unwrap_or(config.reference_month), json)
        }
        Command::Categories => {
            for category in Category::expense_categories() {
                println!("{:<16} expense", category.as_str());
            }
            println!("{:<16} income", Category::INCOME);
            Ok(())
        }
        Command::Export { path, in_month } => cli_export(db, path, in_month),
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn load(db: &Database, month: Option<MonthKey>) -> Result<Vec<Transaction>> {
    match month {
        Some(m) => db.get_transactions_for_month(m),
        None => db.get_transactions(),
    }
}

fn cli_edit(db: &mut Database, id: i64, update: &TransactionUpdate) -> Result<()> {
    if update.is_empty() {
        anyhow::bail!("Nothing to change: pass --date, --amount, --category or --description");
    }
    update.validate()?;

    let mut txn = db
        .get_transaction(id)?
        .ok_or_else(|| anyhow::anyhow!("Transaction #{id} not found"))?;
    update.apply_to(&mut txn);
    txn.validate()?;

    if !db.update_transaction(id, update)? {
        anyhow::bail!("Transaction #{id} not found");
    }
    println!(
        "Updated transaction #{id}: {} {} ${:.2} ({})",
        txn.date, txn.description, txn.amount, txn.category
    );
    Ok(())
}

fn cli_list(db: &Database, limit: Option<usize>) -> Result<()> {
    let txns = db.get_transactions()?;
    if txns.is_empty() {
        println!("No transactions");
        return Ok(());
    }

    println!(
        "{:<6} {:<10}  {:<30} {:<14} {:>12}",
        "ID", "Date", "Description", "Category", "Amount"
    );
    println!("{}", "─".repeat(76));
    for txn in txns.iter().take(limit.unwrap_or(usize::MAX)) {
        println!(
            "{:<6} {:<10}  {:<30} {:<14} {:>12}",
            txn.id.unwrap_or(0),
            txn.date.to_string(),
            crate::ui::util::truncate(&txn.description, 30),
            txn.category,
            format!("${:.2}", txn.amount),
        );
    }
    Ok(())
}

fn cli_budget_set(db: &mut Database, month: MonthKey, limits: Vec<(String, Decimal)>) -> Result<()> {
    let categories: BTreeMap<String, Decimal> = limits.into_iter().collect();
    validate_limits(&categories)?;
    let budget = db.save_budget(month, &categories)?;
    println!(
        "Saved budget for {month}: {} categories, ${:.2} total",
        budget.categories.len(),
        budget.total_budgeted()
    );
    Ok(())
}

fn cli_budget_show(db: &Database, month: MonthKey) -> Result<()> {
    let Some(budget) = db.get_budget(month)? else {
        println!("No budget set for {month}");
        return Ok(());
    };

    println!("Budget for {month}");
    println!("{}", "─".repeat(40));
    for (name, limit) in &budget.categories {
        println!("  {name:<24} ${limit:.2}");
    }
    println!("  {:<24} ${:.2}", "Total", budget.total_budgeted());
    Ok(())
}

fn cli_summary(db: &Database, args: &ViewArgs) -> Result<()> {
    let txns = load(db, args.in_month)?;
    let summary = summarize(&txns);
    if args.json {
        return print_json(&summary);
    }

    let count = match args.in_month {
        Some(m) => {
            println!("fintrack - {m}");
            txns.len() as i64
        }
        None => {
            println!("fintrack - all time");
            db.get_transaction_count()?
        }
    };
    println!("{}", "─".repeat(40));
    println!("  Income:     ${:.2}", summary.total_income);
    println!("  Expenses:   ${:.2}", summary.total_expenses);
    println!("  Net:        ${:.2}", summary.net_savings);
    println!("  Total Txns: {count}");
    Ok(())
}

fn cli_breakdown(db: &Database, args: &ViewArgs) -> Result<()> {
    let txns = load(db, args.in_month)?;
    let breakdown = category_breakdown(&txns);
    if args.json {
        return print_json(&breakdown);
    }
    if breakdown.is_empty() {
        println!("No expenses");
        return Ok(());
    }

    let total = summarize(&txns).total_expenses;
    println!("Spending by Category:");
    for row in &breakdown {
        println!(
            "  {:<24} ${:>10.2}  {:>5.1}%",
            row.category,
            row.total_amount,
            row.share_of(total)
        );
    }
    Ok(())
}

fn cli_monthly(db: &Database, config: &AnalyticsConfig, json: bool) -> Result<()> {
    let txns = db.get_transactions()?;
    let series = monthly_series(&txns, config);
    if json {
        return print_json(&series);
    }

    println!(
        "{:<9} {:>12} {:>12} {:>12}",
        "Month", "Income", "Expenses", "Net"
    );
    println!("{}", "─".repeat(48));
    for row in &series {
        println!(
            "{:<9} {:>12} {:>12} {:>12}",
            row.month_key.to_string(),
            format!("${:.2}", row.income),
            format!("${:.2}", row.expenses),
            format!("${:.2}", row.net()),
        );
    }
    Ok(())
}

fn cli_compare(db: &Database, month: MonthKey, json: bool) -> Result<()> {
    let budget = db.get_budget(month)?;
    let txns = db.get_transactions_for_month(month)?;
    let rows = compare_budget(&txns, budget.as_ref());
    if json {
        return print_json(&rows);
    }
    if budget.is_none() {
        println!("No budget set for {month}");
        return Ok(());
    }

    println!("Budget vs actual - {month}");
    println!(
        "  {:<20} {:>12} {:>12} {:>12} {:>7}",
        "Category", "Budgeted", "Actual", "Remaining", "Used"
    );
    println!("{}", "─".repeat(68));
    for row in &rows {
        let flag = if row.is_over_budget() { " OVER" } else { "" };
        println!(
            "  {:<20} {:>12} {:>12} {:>12} {:>6.0}%{flag}",
            row.category,
            format!("${:.2}", row.budgeted),
            format!("${:.2}", row.actual),
            format!("${:.2}", row.remaining),
            row.usage(),
        );
    }
    Ok(())
}

fn cli_export(db: &Database, path: Option<PathBuf>, month: Option<MonthKey>) -> Result<()> {
    let output_path = match path {
        Some(p) => PathBuf::from(shellexpand(&p.to_string_lossy())),
        None => {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
            let suffix = month.map_or_else(|| "all".to_string(), |m| m.to_string());
            PathBuf::from(home).join(format!("fintrack-export-{suffix}.csv"))
        }
    };

    let count = db
        .export_to_csv(&output_path, month)
        .with_context(|| format!("Export to {} failed", output_path.display()))?;
    if count == 0 {
        println!("No transactions to export");
    } else {
        println!("Exported {count} transactions to {}", output_path.display());
    }
    Ok(())
}
