mod schema;

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;

use crate::models::*;

pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";

const TRANSACTION_COLUMNS: &str =
    "id, date, description, category, amount, created_at, updated_at";

pub(crate) struct Database {
    conn: Connection,
}

impl Database {
    pub(crate) fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {}", path.display()))?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")
            .context("Failed to set database pragmas")?;
        let mut db = Self { conn };
        db.migrate().context("Database migration failed")?;
        tracing::info!(path = %path.display(), "database opened");
        Ok(db)
    }

    #[cfg(test)]
    pub(crate) fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        let mut db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&mut self) -> Result<()> {
        let has_version_table: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
            [],
            |row| row.get(0),
        )?;

        if !has_version_table {
            self.conn.execute_batch(schema::SCHEMA_V1)?;
            self.conn.execute(
                "INSERT INTO schema_version (version) VALUES (?1)",
                params![schema::CURRENT_VERSION],
            )?;
            tracing::debug!(version = schema::CURRENT_VERSION, "created schema");
            return Ok(());
        }

        let current: i32 = self
            .conn
            .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
                row.get(0)
            })
            .optional()?
            .unwrap_or(0);

        for &(from_version, sql) in schema::MIGRATIONS {
            if current <= from_version {
                self.conn.execute_batch(sql)?;
            }
        }

        if current < schema::CURRENT_VERSION {
            self.conn.execute(
                "UPDATE schema_version SET version = ?1",
                params![schema::CURRENT_VERSION],
            )?;
            tracing::info!(from = current, to = schema::CURRENT_VERSION, "migrated schema");
        }

        Ok(())
    }

    // ── Transactions ──────────────────────────────────────────

    pub(crate) fn insert_transaction(&self, txn: &Transaction) -> Result<i64> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO transactions (date, description, category, amount, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
            params![
                txn.date.format(DATE_FORMAT).to_string(),
                txn.description,
                txn.category,
                txn.amount.to_string(),
                now,
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        tracing::debug!(id, category = %txn.category, "inserted transaction");
        Ok(id)
    }

    /// Write the fields present in `update`. Returns false when no row has `id`.
    pub(crate) fn update_transaction(&self, id: i64, update: &TransactionUpdate) -> Result<bool> {
        let mut sets: Vec<String> = Vec::new();
        let mut param_values: Vec<Box<dyn rusqlite::types::ToSql>> = Vec::new();

        if let Some(amount) = update.amount {
            param_values.push(Box::new(amount.to_string()));
            sets.push(format!("amount = ?{}", param_values.len()));
        }
        if let Some(date) = update.date {
            param_values.push(Box::new(date.format(DATE_FORMAT).to_string()));
            sets.push(format!("date = ?{}", param_values.len()));
        }
        if let Some(description) = &update.description {
            param_values.push(Box::new(description.clone()));
            sets.push(format!("description = ?{}", param_values.len()));
        }
        if let Some(category) = &update.category {
            param_values.push(Box::new(category.clone()));
            sets.push(format!("category = ?{}", param_values.len()));
        }

        param_values.push(Box::new(Utc::now().to_rfc3339()));
        sets.push(format!("updated_at = ?{}", param_values.len()));
        param_values.push(Box::new(id));
        let sql = format!(
            "UPDATE transactions SET {} WHERE id = ?{}",
            sets.join(", "),
            param_values.len()
        );

        let params_ref: Vec<&dyn rusqlite::types::ToSql> =
            param_values.iter().map(|p| p.as_ref()).collect();
        let changed = self.conn.execute(&sql, params_ref.as_slice())?;
        tracing::debug!(id, changed, "updated transaction");
        Ok(changed > 0)
    }

    /// Returns false when no row has `id`.
    pub(crate) fn delete_transaction(&self, id: i64) -> Result<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM transactions WHERE id = ?1", params![id])?;
        tracing::debug!(id, changed, "deleted transaction");
        Ok(changed > 0)
    }

    pub(crate) fn get_transaction(&self, id: i64) -> Result<Option<Transaction>> {
        let txn = self
            .conn
            .query_row(
                &format!("SELECT {TRANSACTION_COLUMNS} FROM transactions WHERE id = ?1"),
                params![id],
                transaction_from_row,
            )
            .optional()?;
        Ok(txn)
    }

    /// Every transaction, newest first.
    pub(crate) fn get_transactions(&self) -> Result<Vec<Transaction>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM transactions ORDER BY date DESC, id DESC"
        ))?;
        let rows = stmt.query_map([], transaction_from_row)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    /// Transactions whose description contains `query` (case-insensitive
    /// for ASCII), newest first.
    pub(crate) fn search_transactions(&self, query: &str) -> Result<Vec<Transaction>> {
        let pattern = format!(
            "%{}%",
            query
                .replace('\\', "\\\\")
                .replace('%', "\\%")
                .replace('_', "\\_")
        );
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM transactions
             WHERE description LIKE ?1 ESCAPE '\\'
             ORDER BY date DESC, id DESC"
        ))?;
        let rows = stmt.query_map(params![pattern], transaction_from_row)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    pub(crate) fn get_transactions_for_month(&self, month: MonthKey) -> Result<Vec<Transaction>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM transactions WHERE date LIKE ?1
             ORDER BY date DESC, id DESC"
        ))?;
        let rows = stmt.query_map(params![format!("{month}-%")], transaction_from_row)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    pub(crate) fn get_transaction_count(&self) -> Result<i64> {
        Ok(self
            .conn
            .query_row("SELECT COUNT(*) FROM transactions", [], |row| row.get(0))?)
    }

    // ── Budgets ───────────────────────────────────────────────

    pub(crate) fn get_budget(&self, month: MonthKey) -> Result<Option<Budget>> {
        let stamps: Option<(String, String)> = self
            .conn
            .query_row(
                "SELECT created_at, updated_at FROM budgets WHERE month = ?1",
                params![month.to_string()],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;
        let Some((created_at, updated_at)) = stamps else {
            return Ok(None);
        };

        let mut stmt = self.conn.prepare(
            "SELECT category, limit_amount FROM budget_limits WHERE month = ?1 ORDER BY category",
        )?;
        let rows = stmt.query_map(params![month.to_string()], |row| {
            let category: String = row.get(0)?;
            let limit = decimal_from_row(row, 1)?;
            Ok((category, limit))
        })?;
        let categories = rows.collect::<std::result::Result<BTreeMap<_, _>, _>>()?;

        Ok(Some(Budget {
            created_at,
            updated_at,
            ..Budget::new(month, categories)
        }))
    }

    /// Replace the budget for `month` with `categories`.
    ///
    /// Creates the month on first save. Limits not present in `categories`
    /// are dropped; the creation timestamp survives.
    pub(crate) fn save_budget(
        &mut self,
        month: MonthKey,
        categories: &BTreeMap<String, Decimal>,
    ) -> Result<Budget> {
        let now = Utc::now().to_rfc3339();
        let key = month.to_string();

        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO budgets (month, created_at, updated_at) VALUES (?1, ?2, ?2)
             ON CONFLICT(month) DO UPDATE SET updated_at = ?2",
            params![key, now],
        )?;
        tx.execute("DELETE FROM budget_limits WHERE month = ?1", params![key])?;
        for (category, limit) in categories {
            tx.execute(
                "INSERT INTO budget_limits (month, category, limit_amount) VALUES (?1, ?2, ?3)",
                params![key, category, limit.to_string()],
            )?;
        }
        tx.commit()?;
        tracing::debug!(month = %key, categories = categories.len(), "saved budget");

        self.get_budget(month)?
            .ok_or_else(|| anyhow::anyhow!("Budget for {key} missing after save"))
    }

    // ── Export ────────────────────────────────────────────────

    /// Write transactions (optionally a single month) as CSV. Returns the row count.
    pub(crate) fn export_to_csv(&self, path: &Path, month: Option<MonthKey>) -> Result<usize> {
        let txns = match month {
            Some(m) => self.get_transactions_for_month(m)?,
            None => self.get_transactions()?,
        };

        let mut wtr = csv::Writer::from_path(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        wtr.write_record(["id", "date", "description", "category", "amount"])?;
        for txn in &txns {
            wtr.write_record([
                txn.id.unwrap_or_default().to_string(),
                txn.date.format(DATE_FORMAT).to_string(),
                txn.description.clone(),
                txn.category.clone(),
                txn.amount.to_string(),
            ])?;
        }
        wtr.flush()
            .with_context(|| format!("Failed to write {}", path.display()))?;
        tracing::info!(path = %path.display(), rows = txns.len(), "exported transactions");
        Ok(txns.len())
    }
}

fn transaction_from_row(row: &Row<'_>) -> rusqlite::Result<Transaction> {
    let date_str: String = row.get(1)?;
    let date = NaiveDate::parse_from_str(&date_str, DATE_FORMAT)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(1, Type::Text, Box::new(e)))?;
    Ok(Transaction {
        id: Some(row.get(0)?),
        date,
        description: row.get(2)?,
        category: row.get(3)?,
        amount: decimal_from_row(row, 4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

fn decimal_from_row(row: &Row<'_>, idx: usize) -> rusqlite::Result<Decimal> {
    let text: String = row.get(idx)?;
    Decimal::from_str(&text)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}
