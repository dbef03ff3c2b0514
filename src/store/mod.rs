//! SQLite persistence for manuals, sections, amendments and revision records.

use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::Connection;

mod amendments;
mod db_setup;
mod manuals;
mod revisions;
#[cfg(test)]
mod tests;

pub use amendments::ReviewAction;
pub use revisions::NewTemporaryRevision;

pub const DB_SCHEMA_VERSION: &str = "0.1.0";

#[derive(Debug)]
pub struct Store {
    connection: Connection,
}

impl Store {
    pub fn open(db_path: &Path) -> Result<Self> {
        let connection = Connection::open(db_path)
            .with_context(|| format!("failed to open {}", db_path.display()))?;
        db_setup::configure_connection(&connection)?;
        db_setup::ensure_schema(&connection)?;
        Ok(Self { connection })
    }

    pub fn open_in_memory() -> Result<Self> {
        let connection =
            Connection::open_in_memory().context("failed to open in-memory database")?;
        db_setup::ensure_schema(&connection)?;
        Ok(Self { connection })
    }

    pub fn count_rows(&self, table_name: &str) -> Result<i64> {
        let sql = format!("SELECT COUNT(*) FROM {table_name}");
        let count = self
            .connection
            .query_row(&sql, [], |row| row.get(0))
            .with_context(|| format!("failed to count rows in {table_name}"))?;
        Ok(count)
    }

    pub fn schema_version(&self) -> Result<Option<String>> {
        let mut statement = self
            .connection
            .prepare("SELECT value FROM metadata WHERE key = 'db_schema_version'")?;
        let mut rows = statement.query([])?;
        match rows.next()? {
            Some(row) => Ok(Some(row.get(0)?)),
            None => Ok(None),
        }
    }
}
