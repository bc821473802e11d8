use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::Transaction;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total_income: Decimal,
    pub total_expenses: Decimal,
    pub net_savings: Decimal,
}

impl Summary {
    pub fn is_saving(&self) -> bool {
        self.net_savings >= Decimal::ZERO
    }
}

/// Income and expense totals over `transactions`.
///
/// Amounts are summed as stored; a negative amount that slipped past input
/// validation reduces its side's total rather than being clamped. Totals
/// saturate at the `Decimal` bounds.
pub fn summarize(transactions: &[Transaction]) -> Summary {
    let (total_income, total_expenses) = transactions.iter().fold(
        (Decimal::ZERO, Decimal::ZERO),
        |(income, expenses), txn| {
            if txn.is_income() {
                (income.saturating_add(txn.amount), expenses)
            } else {
                (income, expenses.saturating_add(txn.amount))
            }
        },
    );

    Summary {
        total_income,
        total_expenses,
        net_savings: total_income.saturating_sub(total_expenses),
    }
}
