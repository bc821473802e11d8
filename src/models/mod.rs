mod budget;
mod category;
mod error;
mod month;
mod transaction;

pub use budget::{validate_limits, Budget};
pub use category::Category;
pub use error::ValidationError;
pub use month::MonthKey;
pub use transaction::{Transaction, TransactionUpdate};

/// Largest amount or budget limit accepted from input.
pub const MAX_AMOUNT: i64 = 1_000_000_000_000;
