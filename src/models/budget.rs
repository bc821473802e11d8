use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

use super::{MonthKey, ValidationError, MAX_AMOUNT};

/// One month's spending limits, keyed by category name.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    pub month: MonthKey,
    pub categories: BTreeMap<String, Decimal>,
    pub created_at: String,
    pub updated_at: String,
}

impl Budget {
    pub fn new(month: MonthKey, categories: BTreeMap<String, Decimal>) -> Self {
        Self {
            month,
            categories,
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    /// The limit for `category`; unbudgeted categories read as zero.
    pub fn limit_for(&self, category: &str) -> Decimal {
        self.categories
            .get(category)
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    /// Categories with a positive limit.
    pub fn budgeted(&self) -> impl Iterator<Item = (&str, Decimal)> {
        self.categories
            .iter()
            .filter(|(_, limit)| **limit > Decimal::ZERO)
            .map(|(name, limit)| (name.as_str(), *limit))
    }

    pub fn total_budgeted(&self) -> Decimal {
        self.budgeted()
            .fold(Decimal::ZERO, |total, (_, limit)| total.saturating_add(limit))
    }
}

/// Check a limit mapping before it replaces a month's budget.
pub fn validate_limits(categories: &BTreeMap<String, Decimal>) -> Result<(), ValidationError> {
    for (name, limit) in categories {
        if name.trim().is_empty() {
            return Err(ValidationError::EmptyCategory);
        }
        if *limit < Decimal::ZERO {
            return Err(ValidationError::NegativeLimit {
                category: name.clone(),
                limit: *limit,
            });
        }
        if *limit > Decimal::from(MAX_AMOUNT) {
            return Err(ValidationError::LimitTooLarge {
                category: name.clone(),
                limit: *limit,
            });
        }
    }
    Ok(())
}
