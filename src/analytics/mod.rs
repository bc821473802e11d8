//! The aggregation engine.
//!
//! Every function here is a pure transformation of an in-memory snapshot of
//! transactions (and optionally one month's budget) into the view models the
//! CLI and TUI display. Nothing in this module touches the store or reads the
//! clock: the reference month is always passed in.

mod breakdown;
mod budget;
mod dashboard;
mod monthly;
mod summary;

pub use breakdown::{category_breakdown, CategoryTotal};
pub use budget::{compare_budget, BudgetComparison};
pub use dashboard::Dashboard;
pub use monthly::{monthly_series, MonthlyTotals};
pub use summary::{summarize, Summary};

use rust_decimal::Decimal;

use crate::models::MonthKey;

pub const DEFAULT_WINDOW_SIZE: usize = 6;
/// Ten years of trailing months.
pub const MAX_WINDOW_SIZE: usize = 120;

/// Inputs that shape time-dependent views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalyticsConfig {
    /// Number of trailing months in the monthly series.
    pub window_size: usize,
    /// The month treated as "now".
    pub reference_month: MonthKey,
}

impl AnalyticsConfig {
    pub fn new(reference_month: MonthKey) -> Self {
        Self {
            window_size: DEFAULT_WINDOW_SIZE,
            reference_month,
        }
    }

    pub fn with_window(mut self, window_size: usize) -> Self {
        self.window_size = window_size;
        self
    }
}

/// `part` as a percentage of `whole`. Ratios too large for a `Decimal`
/// saturate at `Decimal::MAX` (or `MIN` when the signs differ).
fn percent(part: Decimal, whole: Decimal) -> Decimal {
    if whole.is_zero() {
        return Decimal::ZERO;
    }
    part.checked_div(whole)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .unwrap_or(if part.is_sign_negative() == whole.is_sign_negative() {
            Decimal::MAX
        } else {
            Decimal::MIN
        })
}

#[cfg(test)]
mod tests;
