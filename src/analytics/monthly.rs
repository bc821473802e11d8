use rust_decimal::Decimal;
use serde::Serialize;

use super::AnalyticsConfig;
use crate::models::{MonthKey, Transaction};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyTotals {
    pub month_label: String,
    pub month_key: MonthKey,
    pub income: Decimal,
    pub expenses: Decimal,
}

impl MonthlyTotals {
    fn empty(month_key: MonthKey) -> Self {
        Self {
            month_label: month_key.label().to_string(),
            month_key,
            income: Decimal::ZERO,
            expenses: Decimal::ZERO,
        }
    }

    pub fn net(&self) -> Decimal {
        self.income.saturating_sub(self.expenses)
    }
}

/// Income and expenses for each month of the trailing window ending at the
/// reference month, oldest first.
///
/// Always returns exactly `config.window_size` rows. Transactions dated
/// outside the window are skipped.
pub fn monthly_series(transactions: &[Transaction], config: &AnalyticsConfig) -> Vec<MonthlyTotals> {
    let mut rows: Vec<MonthlyTotals> = config
        .reference_month
        .trailing(config.window_size)
        .into_iter()
        .map(MonthlyTotals::empty)
        .collect();

    let Some(first) = rows.first().map(|r| r.month_key) else {
        return rows;
    };

    let mut skipped = 0usize;
    for txn in transactions {
        let key = txn.month();
        // Window months are consecutive, so the row index is the distance from the first
        let index = (key.year() as i64 - first.year() as i64) * 12
            + (key.month() as i64 - first.month() as i64);
        let Some(row) = usize::try_from(index).ok().and_then(|i| rows.get_mut(i)) else {
            skipped += 1;
            continue;
        };
        if txn.is_income() {
            row.income = row.income.saturating_add(txn.amount);
        } else {
            row.expenses = row.expenses.saturating_add(txn.amount);
        }
    }

    if skipped > 0 {
        tracing::trace!(skipped, window = config.window_size, "transactions outside monthly window");
    }
    rows
}
