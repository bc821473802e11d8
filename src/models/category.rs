/// The predefined transaction categories.
///
/// Transactions store their category as text, so names outside this set
/// (e.g. written by a newer version) are still aggregated as expenses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    Housing,
    Transportation,
    Food,
    Utilities,
    Insurance,
    Healthcare,
    Savings,
    Personal,
    Entertainment,
    Clothing,
    Education,
    Gifts,
    Income,
    Other,
}

impl Category {
    /// The only category that marks a transaction as income.
    pub const INCOME: &'static str = "Income";

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Housing => "Housing",
            Self::Transportation => "Transportation",
            Self::Food => "Food",
            Self::Utilities => "Utilities",
            Self::Insurance => "Insurance",
            Self::Healthcare => "Healthcare",
            Self::Savings => "Savings",
            Self::Personal => "Personal",
            Self::Entertainment => "Entertainment",
            Self::Clothing => "Clothing",
            Self::Education => "Education",
            Self::Gifts => "Gifts",
            Self::Income => "Income",
            Self::Other => "Other",
        }
    }

    /// Case-insensitive lookup of a predefined category.
    pub fn parse(s: &str) -> Option<Self> {
        let lower = s.trim().to_lowercase();
        Self::all()
            .iter()
            .copied()
            .find(|c| c.as_str().to_lowercase() == lower)
    }

    pub fn all() -> &'static [Category] {
        &[
            Self::Housing,
            Self::Transportation,
            Self::Food,
            Self::Utilities,
            Self::Insurance,
            Self::Healthcare,
            Self::Savings,
            Self::Personal,
            Self::Entertainment,
            Self::Clothing,
            Self::Education,
            Self::Gifts,
            Self::Income,
            Self::Other,
        ]
    }

    /// Every category a budget limit can be set for.
    pub fn expense_categories() -> impl Iterator<Item = Category> {
        Self::all().iter().copied().filter(|c| !c.is_income())
    }

    pub fn is_income(&self) -> bool {
        matches!(self, Self::Income)
    }

    /// Whether a stored category name designates income.
    pub fn is_income_name(name: &str) -> bool {
        name == Self::INCOME
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
