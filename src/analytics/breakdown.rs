use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::models::Transaction;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTotal {
    pub category: String,
    pub total_amount: Decimal,
}

impl CategoryTotal {
    /// Percentage of `total` this category accounts for.
    pub fn share_of(&self, total: Decimal) -> Decimal {
        super::percent(self.total_amount, total)
    }
}

/// Expense totals per category, largest first.
///
/// Income is excluded. Equal totals are ordered by category name so the
/// output is reproducible.
pub fn category_breakdown(transactions: &[Transaction]) -> Vec<CategoryTotal> {
    let mut totals: BTreeMap<&str, Decimal> = BTreeMap::new();
    for txn in transactions.iter().filter(|t| t.is_expense()) {
        let total = totals.entry(txn.category.as_str()).or_insert(Decimal::ZERO);
        *total = total.saturating_add(txn.amount);
    }

    let mut breakdown: Vec<CategoryTotal> = totals
        .into_iter()
        .map(|(category, total_amount)| CategoryTotal {
            category: category.to_string(),
            total_amount,
        })
        .collect();
    breakdown.sort_by(|a, b| {
        b.total_amount
            .cmp(&a.total_amount)
            .then_with(|| a.category.cmp(&b.category))
    });
    breakdown
}
