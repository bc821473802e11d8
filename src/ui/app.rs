use anyhow::Result;

use crate::analytics::{AnalyticsConfig, Dashboard};
use crate::db::Database;
use crate::models::{Budget, MonthKey, Transaction};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Screen {
    Dashboard,
    Transactions,
    Budget,
    Charts,
}

impl Screen {
    pub(crate) fn all() -> &'static [Screen] {
        &[
            Self::Dashboard,
            Self::Transactions,
            Self::Budget,
            Self::Charts,
        ]
    }

    pub(crate) fn next(self) -> Self {
        let screens = Self::all();
        let idx = screens.iter().position(|s| *s == self).unwrap_or(0);
        screens[(idx + 1) % screens.len()]
    }

    pub(crate) fn prev(self) -> Self {
        let screens = Self::all();
        let idx = screens.iter().position(|s| *s == self).unwrap_or(0);
        screens[(idx + screens.len() - 1) % screens.len()]
    }
}

impl std::fmt::Display for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Dashboard => write!(f, "Dashboard"),
            Self::Transactions => write!(f, "Transactions"),
            Self::Budget => write!(f, "Budget"),
            Self::Charts => write!(f, "Charts"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InputMode {
    Normal,
    Command,
    Search,
    Confirm,
}

impl std::fmt::Display for InputMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Normal => write!(f, "NORMAL"),
            Self::Command => write!(f, "COMMAND"),
            Self::Search => write!(f, "SEARCH"),
            Self::Confirm => write!(f, "CONFIRM"),
        }
    }
}

/// Pending action that requires user confirmation.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum PendingAction {
    DeleteTransaction { id: i64, description: String },
}

pub(crate) struct App {
    pub(crate) running: bool,
    pub(crate) screen: Screen,
    pub(crate) input_mode: InputMode,
    pub(crate) command_input: String,
    pub(crate) search_input: String,
    pub(crate) status_message: String,
    pub(crate) show_help: bool,
    pub(crate) config: AnalyticsConfig,

    // Snapshot of the store and every view derived from it
    pub(crate) transactions: Vec<Transaction>,
    pub(crate) budget: Option<Budget>,
    pub(crate) dashboard: Dashboard,
    /// Description matches for `search_input`; unused while it is empty.
    pub(crate) search_results: Vec<Transaction>,

    pub(crate) transaction_index: usize,
    pub(crate) transaction_scroll: usize,
    pub(crate) budget_index: usize,
    pub(crate) budget_scroll: usize,

    pub(crate) pending_action: Option<PendingAction>,
    pub(crate) confirm_message: String,

    // Layout (updated each render frame)
    pub(crate) visible_rows: usize,
}

impl App {
    pub(crate) fn new(config: AnalyticsConfig) -> Self {
        Self {
            running: true,
            screen: Screen::Dashboard,
            input_mode: InputMode::Normal,
            command_input: String::new(),
            search_input: String::new(),
            status_message: String::new(),
            show_help: false,
            config,

            transactions: Vec::new(),
            budget: None,
            dashboard: Dashboard::build(&[], None, &config),
            search_results: Vec::new(),

            transaction_index: 0,
            transaction_scroll: 0,
            budget_index: 0,
            budget_scroll: 0,

            pending_action: None,
            confirm_message: String::new(),

            visible_rows: 20,
        }
    }

    pub(crate) fn reference_month(&self) -> MonthKey {
        self.config.reference_month
    }

    /// Re-read the store and recompute every view.
    pub(crate) fn refresh_all(&mut self, db: &Database) -> Result<()> {
        self.transactions = db.get_transactions()?;
        self.budget = db.get_budget(self.config.reference_month)?;
        self.dashboard = Dashboard::build(&self.transactions, self.budget.as_ref(), &self.config);
        self.refresh_search(db)?;
        tracing::debug!(
            transactions = self.transactions.len(),
            budget_rows = self.dashboard.budget.len(),
            month = %self.config.reference_month,
            "refreshed snapshot"
        );

        clamp_cursor(
            &mut self.budget_index,
            &mut self.budget_scroll,
            self.dashboard.budget.len(),
        );
        Ok(())
    }

    /// Re-run the description search. Only the Transactions list is
    /// filtered; the dashboard views keep covering the whole snapshot.
    pub(crate) fn refresh_search(&mut self, db: &Database) -> Result<()> {
        if self.search_input.is_empty() {
            self.search_results.clear();
        } else {
            self.search_results = db.search_transactions(&self.search_input)?;
        }
        let listed = self.listed_transactions().len();
        clamp_cursor(&mut self.transaction_index, &mut self.transaction_scroll, listed);
        Ok(())
    }

    pub(crate) fn set_search(&mut self, query: impl Into<String>, db: &Database) -> Result<()> {
        self.search_input = query.into();
        self.transaction_index = 0;
        self.transaction_scroll = 0;
        self.refresh_search(db)
    }

    pub(crate) fn is_searching(&self) -> bool {
        !self.search_input.is_empty()
    }

    /// What the Transactions screen shows: search matches, or everything.
    pub(crate) fn listed_transactions(&self) -> &[Transaction] {
        if self.is_searching() {
            &self.search_results
        } else {
            &self.transactions
        }
    }

    pub(crate) fn set_reference_month(&mut self, month: MonthKey, db: &Database) -> Result<()> {
        self.config.reference_month = month;
        self.budget_index = 0;
        self.budget_scroll = 0;
        self.refresh_all(db)
    }

    pub(crate) fn set_window(&mut self, window_size: usize, db: &Database) -> Result<()> {
        self.config = self.config.with_window(window_size);
        self.refresh_all(db)
    }

    pub(crate) fn selected_transaction(&self) -> Option<&Transaction> {
        self.listed_transactions().get(self.transaction_index)
    }

    /// Rows that fit in the transactions table (borders and header excluded).
    pub(crate) fn transaction_page(&self) -> usize {
        self.visible_rows.saturating_sub(3).max(1)
    }

    pub(crate) fn budget_page(&self) -> usize {
        self.visible_rows.saturating_sub(2).max(1)
    }

    pub(crate) fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = msg.into();
    }
}

fn clamp_cursor(index: &mut usize, scroll: &mut usize, len: usize) {
    if *index >= len {
        *index = len.saturating_sub(1);
    }
    if *scroll > *index {
        *scroll = *index;
    }
}
