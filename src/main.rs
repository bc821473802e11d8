mod analytics;
mod config;
mod db;
mod logging;
mod models;
mod run;
mod ui;

use anyhow::Result;
use clap::Parser;

use crate::run::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let paths = config::DataPaths::resolve(cli.db.clone())?;
    logging::init(&paths.log)?;

    let analytics = config::analytics_config(cli.month, cli.window)?;
    tracing::info!(
        reference_month = %analytics.reference_month,
        window = analytics.window_size,
        "starting fintrack {}",
        env!("CARGO_PKG_VERSION")
    );

    let mut db = db::Database::open(&paths.db)?;

    match cli.command {
        None => run::as_tui(&mut db, analytics),
        Some(command) => run::as_cli(command, &mut db, analytics),
    }
}
