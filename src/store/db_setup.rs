use anyhow::{Context, Result};
use rusqlite::Connection;

use super::DB_SCHEMA_VERSION;
use crate::util::now_utc_string;

pub(super) fn configure_connection(connection: &Connection) -> Result<()> {
    connection
        .pragma_update(None, "journal_mode", "WAL")
        .context("failed to set journal_mode=WAL")?;
    connection
        .pragma_update(None, "synchronous", "NORMAL")
        .context("failed to set synchronous=NORMAL")?;
    connection
        .pragma_update(None, "foreign_keys", "ON")
        .context("failed to enable foreign_keys")?;
    Ok(())
}

pub(super) fn ensure_schema(connection: &Connection) -> Result<()> {
    connection
        .execute_batch(
            "
        CREATE TABLE IF NOT EXISTS metadata (
          key TEXT PRIMARY KEY,
          value TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS manuals (
          manual_id TEXT PRIMARY KEY,
          title TEXT NOT NULL,
          version TEXT NOT NULL,
          source_name TEXT NOT NULL,
          source_sha256 TEXT NOT NULL,
          created_at TEXT NOT NULL,
          is_obsolete INTEGER NOT NULL DEFAULT 0
        );

        CREATE TABLE IF NOT EXISTS sections (
          section_id TEXT PRIMARY KEY,
          manual_id TEXT NOT NULL,
          parent_section_id TEXT,
          title TEXT NOT NULL,
          content TEXT NOT NULL,
          level INTEGER NOT NULL,
          order_index INTEGER NOT NULL,
          FOREIGN KEY(manual_id) REFERENCES manuals(manual_id),
          FOREIGN KEY(parent_section_id) REFERENCES sections(section_id)
        );

        CREATE TABLE IF NOT EXISTS amendments (
          amendment_id TEXT PRIMARY KEY,
          manual_id TEXT NOT NULL,
          section_id TEXT NOT NULL,
          title TEXT NOT NULL,
          content TEXT NOT NULL,
          original_content TEXT NOT NULL,
          reason TEXT NOT NULL,
          status TEXT NOT NULL,
          created_by TEXT NOT NULL,
          created_at TEXT NOT NULL,
          quality_approved_by TEXT,
          quality_approved_at TEXT,
          authority_approved_by TEXT,
          authority_approved_at TEXT,
          rejected_by TEXT,
          rejected_at TEXT,
          rejection_reason TEXT,
          FOREIGN KEY(manual_id) REFERENCES manuals(manual_id),
          FOREIGN KEY(section_id) REFERENCES sections(section_id)
        );

        CREATE TABLE IF NOT EXISTS temporary_revisions (
          revision_id TEXT PRIMARY KEY,
          manual_id TEXT NOT NULL,
          section_id TEXT NOT NULL,
          revision_number TEXT NOT NULL,
          description TEXT NOT NULL,
          date_issued TEXT NOT NULL,
          effective_date TEXT NOT NULL,
          expiry_date TEXT,
          issued_by TEXT NOT NULL,
          FOREIGN KEY(manual_id) REFERENCES manuals(manual_id),
          FOREIGN KEY(section_id) REFERENCES sections(section_id)
        );

        CREATE TABLE IF NOT EXISTS final_revisions (
          revision_id TEXT PRIMARY KEY,
          manual_id TEXT NOT NULL,
          issue_no TEXT NOT NULL,
          revision_no TEXT NOT NULL,
          revision_date TEXT NOT NULL,
          affected_pages TEXT NOT NULL,
          reason TEXT NOT NULL,
          date_inserted TEXT NOT NULL,
          inserted_by TEXT NOT NULL,
          FOREIGN KEY(manual_id) REFERENCES manuals(manual_id)
        );

        CREATE INDEX IF NOT EXISTS idx_sections_manual_order ON sections(manual_id, order_index);
        CREATE INDEX IF NOT EXISTS idx_amendments_section ON amendments(section_id, status);
        CREATE INDEX IF NOT EXISTS idx_amendments_manual ON amendments(manual_id);
        CREATE INDEX IF NOT EXISTS idx_temporary_revisions_manual ON temporary_revisions(manual_id);
        CREATE INDEX IF NOT EXISTS idx_final_revisions_manual ON final_revisions(manual_id);
        ",
        )
        .context("failed to create schema")?;

    let now = now_utc_string();
    connection.execute(
        "INSERT INTO metadata(key, value) VALUES('db_schema_version', ?1)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        [DB_SCHEMA_VERSION],
    )?;
    connection.execute(
        "INSERT INTO metadata(key, value) VALUES('db_updated_at', ?1)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        [now],
    )?;

    Ok(())
}
