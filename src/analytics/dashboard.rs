use serde::Serialize;

use super::{
    category_breakdown, compare_budget, monthly_series, summarize, AnalyticsConfig,
    BudgetComparison, CategoryTotal, MonthlyTotals, Summary,
};
use crate::models::{Budget, Transaction};

pub const RECENT_LIMIT: usize = 5;

/// Every derived view for one snapshot, computed together.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub summary: Summary,
    pub transaction_count: usize,
    pub recent: Vec<Transaction>,
    pub breakdown: Vec<CategoryTotal>,
    pub monthly: Vec<MonthlyTotals>,
    pub budget: Vec<BudgetComparison>,
}

impl Dashboard {
    pub fn build(
        transactions: &[Transaction],
        budget: Option<&Budget>,
        config: &AnalyticsConfig,
    ) -> Self {
        Self {
            summary: summarize(transactions),
            transaction_count: transactions.len(),
            recent: recent_transactions(transactions, RECENT_LIMIT),
            breakdown: category_breakdown(transactions),
            monthly: monthly_series(transactions, config),
            budget: compare_budget(transactions, budget),
        }
    }
}

/// The `limit` latest transactions, newest first.
///
/// Same-day entries keep the higher id first, matching the store's listing.
pub fn recent_transactions(transactions: &[Transaction], limit: usize) -> Vec<Transaction> {
    let mut sorted: Vec<&Transaction> = transactions.iter().collect();
    sorted.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| b.id.cmp(&a.id)));
    sorted.into_iter().take(limit).cloned().collect()
}
