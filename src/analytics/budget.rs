use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::models::{Budget, Transaction};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetComparison {
    pub category: String,
    pub budgeted: Decimal,
    pub actual: Decimal,
    /// Never negative; overspend shows as `actual > budgeted`.
    pub remaining: Decimal,
}

impl BudgetComparison {
    pub fn is_over_budget(&self) -> bool {
        self.actual > self.budgeted
    }

    /// Spending as a percentage of the limit.
    pub fn usage(&self) -> Decimal {
        super::percent(self.actual, self.budgeted)
    }
}

/// Budget-vs-actual rows for the budget's month, highest spend first.
///
/// Only categories with a positive limit produce a row. With no budget the
/// result is empty.
pub fn compare_budget(transactions: &[Transaction], budget: Option<&Budget>) -> Vec<BudgetComparison> {
    let Some(budget) = budget else {
        return Vec::new();
    };

    let mut actual_by_category: BTreeMap<&str, Decimal> = BTreeMap::new();
    for txn in transactions
        .iter()
        .filter(|t| t.is_expense() && budget.month.contains(t.date))
    {
        let actual = actual_by_category
            .entry(txn.category.as_str())
            .or_insert(Decimal::ZERO);
        *actual = actual.saturating_add(txn.amount);
    }

    let mut rows: Vec<BudgetComparison> = budget
        .budgeted()
        .map(|(category, limit)| {
            let actual = actual_by_category
                .get(category)
                .copied()
                .unwrap_or(Decimal::ZERO);
            BudgetComparison {
                category: category.to_string(),
                budgeted: limit,
                actual,
                remaining: limit.saturating_sub(actual).max(Decimal::ZERO),
            }
        })
        .collect();
    rows.sort_by(|a, b| {
        b.actual
            .cmp(&a.actual)
            .then_with(|| a.category.cmp(&b.category))
    });
    rows
}
