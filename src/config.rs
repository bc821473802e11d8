use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::analytics::{AnalyticsConfig, DEFAULT_WINDOW_SIZE, MAX_WINDOW_SIZE};
use crate::models::MonthKey;

/// Where fintrack keeps its files.
pub(crate) struct DataPaths {
    pub(crate) db: PathBuf,
    pub(crate) log: PathBuf,
}

impl DataPaths {
    /// Resolve the platform data directory, creating it if needed.
    /// An explicit database path overrides the default location.
    pub(crate) fn resolve(db_override: Option<PathBuf>) -> Result<Self> {
        let proj_dirs = directories::ProjectDirs::from("com", "fintrack", "fintrack")
            .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
        let data_dir = proj_dirs.data_dir();
        std::fs::create_dir_all(data_dir)
            .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;

        Ok(Self {
            db: db_override.unwrap_or_else(|| data_dir.join("fintrack.db")),
            log: data_dir.join("fintrack.log"),
        })
    }
}

/// Build the analytics settings, falling back to the current month and the
/// default window. This is the only place the clock is consulted.
pub(crate) fn analytics_config(
    reference_month: Option<MonthKey>,
    window_size: Option<usize>,
) -> Result<AnalyticsConfig> {
    let window_size = window_size.unwrap_or(DEFAULT_WINDOW_SIZE);
    if !(1..=MAX_WINDOW_SIZE).contains(&window_size) {
        anyhow::bail!("Window size must be between 1 and {MAX_WINDOW_SIZE} months");
    }
    let reference_month = reference_month.unwrap_or_else(MonthKey::current);
    Ok(AnalyticsConfig::new(reference_month).with_window(window_size))
}
