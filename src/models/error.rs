use rust_decimal::Decimal;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("amount must be greater than 0 (got {0})")]
    NonPositiveAmount(Decimal),
    #[error("amount cannot exceed {max} (got {0})", max = super::MAX_AMOUNT)]
    AmountTooLarge(Decimal),
    #[error("description is required")]
    EmptyDescription,
    #[error("category is required")]
    EmptyCategory,
    #[error("unknown category '{0}'")]
    UnknownCategory(String),
    #[error("budget limit for {category} cannot be negative (got {limit})")]
    NegativeLimit { category: String, limit: Decimal },
    #[error("budget limit for {category} cannot exceed {max} (got {limit})", max = super::MAX_AMOUNT)]
    LimitTooLarge { category: String, limit: Decimal },
}
