mod cli;
mod tui;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use std::path::PathBuf;
use std::str::FromStr;

use crate::models::{Category, MonthKey, ValidationError};

pub(crate) use cli::as_cli;
pub(crate) use tui::as_tui;

/// fintrack - local-only personal finance tracker.
///
/// Run without a command to open the interactive dashboard.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub(crate) struct Cli {
    /// SQLite database file (defaults to the platform data directory).
    #[arg(long, env = "FINTRACK_DB", global = true)]
    pub(crate) db: Option<PathBuf>,

    /// Month treated as "now" for the monthly series and budget views (YYYY-MM).
    #[arg(long, env = "FINTRACK_MONTH", global = true)]
    pub(crate) month: Option<MonthKey>,

    /// Number of trailing months in the monthly series.
    #[arg(long, env = "FINTRACK_WINDOW", global = true)]
    pub(crate) window: Option<usize>,

    #[command(subcommand)]
    pub(crate) command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Command {
    /// Record a transaction.
    Add {
        #[arg(long)]
        date: NaiveDate,
        #[arg(long)]
        amount: Decimal,
        #[arg(long)]
        category: String,
        #[arg(long)]
        description: String,
    },
    /// Change some fields of a transaction.
    Edit {
        id: i64,
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long)]
        amount: Option<Decimal>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    /// Delete a transaction.
    Delete { id: i64 },
    /// Print one transaction.
    Show { id: i64 },
    /// List transactions, newest first.
    List {
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Manage monthly budgets.
    #[command(subcommand)]
    Budget(BudgetCommand),
    /// Total income, expenses and net savings.
    Summary(ViewArgs),
    /// Expenses per category, largest first.
    Breakdown(ViewArgs),
    /// Income and expenses for each month of the trailing window.
    Monthly {
        #[arg(long)]
        json: bool,
    },
    /// Budget against actual spending.
    Compare {
        /// Budget month (defaults to the reference month).
        #[arg(long = "for")]
        for_month: Option<MonthKey>,
        #[arg(long)]
        json: bool,
    },
    /// List the predefined categories.
    Categories,
    /// Export transactions to CSV.
    Export {
        path: Option<PathBuf>,
        /// Only this month.
        #[arg(long = "in")]
        in_month: Option<MonthKey>,
    },
}

#[derive(Subcommand, Debug)]
pub(crate) enum BudgetCommand {
    /// Replace a month's limits, e.g. `budget set Food=300 Housing=1200`.
    Set {
        #[arg(long = "for")]
        for_month: Option<MonthKey>,
        #[arg(value_parser = parse_limit, required = true)]
        limits: Vec<(String, Decimal)>,
    },
    /// Print a month's limits.
    Show {
        #[arg(long = "for")]
        for_month: Option<MonthKey>,
    },
}

#[derive(Args, Debug)]
pub(crate) struct ViewArgs {
    /// Restrict to transactions in this month.
    #[arg(long = "in")]
    pub(crate) in_month: Option<MonthKey>,
    #[arg(long)]
    pub(crate) json: bool,
}

/// Map user input onto a predefined category's canonical name.
pub(crate) fn resolve_category(name: &str) -> Result<String, ValidationError> {
    Category::parse(name)
        .map(|c| c.as_str().to_string())
        .ok_or_else(|| ValidationError::UnknownCategory(name.trim().to_string()))
}

fn parse_limit(s: &str) -> Result<(String, Decimal), String> {
    let (name, amount) = s
        .rsplit_once('=')
        .ok_or_else(|| format!("expected CATEGORY=AMOUNT, got '{s}'"))?;
    let category = resolve_category(name).map_err(|e| e.to_string())?;
    let limit = Decimal::from_str(amount.trim()).map_err(|_| format!("invalid amount '{amount}'"))?;
    Ok((category, limit))
}

pub(crate) fn shellexpand(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        format!("{home}/{rest}")
    } else {
        path.to_string()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_limit() {
        assert_eq!(parse_limit("food=300").unwrap(), ("Food".to_string(), dec!(300)));
        assert_eq!(
            parse_limit("Housing = 1200.50").unwrap(),
            ("Housing".to_string(), dec!(1200.50))
        );
        assert!(parse_limit("Food").is_err());
        assert!(parse_limit("Food=abc").is_err());
        assert!(parse_limit("Pets=10").is_err());
    }

    #[test]
    fn test_resolve_category() {
        assert_eq!(resolve_category("gifts").unwrap(), "Gifts");
        assert_eq!(
            resolve_category("Pets"),
            Err(ValidationError::UnknownCategory("Pets".into()))
        );
    }

    #[test]
    fn test_cli_parses_global_flags() {
        let cli = Cli::try_parse_from([
            "fintrack", "--month", "2024-06", "--window", "3", "monthly", "--json",
        ])
        .unwrap();
        assert_eq!(cli.month, Some("2024-06".parse().unwrap()));
        assert_eq!(cli.window, Some(3));
        assert!(matches!(cli.command, Some(Command::Monthly { json: true })));
    }

    #[test]
    fn test_cli_rejects_bad_month() {
        assert!(Cli::try_parse_from(["fintrack", "--month", "2024-6", "summary"]).is_err());
    }

    #[test]
    fn test_cli_budget_set() {
        let cli = Cli::try_parse_from([
            "fintrack", "budget", "set", "--for", "2024-03", "Food=300", "Gifts=0",
        ])
        .unwrap();
        match cli.command {
            Some(Command::Budget(BudgetCommand::Set { for_month, limits })) => {
                assert_eq!(for_month, Some("2024-03".parse().unwrap()));
                assert_eq!(limits.len(), 2);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_no_command_means_tui() {
        let cli = Cli::try_parse_from(["fintrack"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_shellexpand() {
        assert_eq!(shellexpand("/tmp/x.csv"), "/tmp/x.csv");
        assert!(shellexpand("~/x.csv").ends_with("/x.csv"));
    }
}
