use anyhow::{Context, Result};
use rusqlite::{Connection, Row, params};
use tracing::info;

use super::Store;
use crate::model::{FinalRevision, TemporaryRevision};

#[derive(Debug, Clone)]
pub struct NewTemporaryRevision {
    pub section_id: String,
    pub revision_number: String,
    pub description: String,
    pub date_issued: String,
    pub effective_date: String,
    pub expiry_date: Option<String>,
    pub issued_by: String,
}

impl Store {
    pub fn insert_temporary_revision(
        &self,
        revision: NewTemporaryRevision,
    ) -> Result<TemporaryRevision> {
        let (manual_id, _) = self.load_section(&revision.section_id)?;
        let existing = self.count_rows("temporary_revisions")?;

        let stored = TemporaryRevision {
            revision_id: format!("{manual_id}:temporary-revision:{:04}", existing + 1),
            manual_id,
            section_id: revision.section_id,
            revision_number: revision.revision_number,
            description: revision.description,
            date_issued: revision.date_issued,
            effective_date: revision.effective_date,
            expiry_date: revision.expiry_date,
            issued_by: revision.issued_by,
        };

        self.connection
            .execute(
                "
                INSERT INTO temporary_revisions(
                  revision_id, manual_id, section_id, revision_number, description,
                  date_issued, effective_date, expiry_date, issued_by
                )
                VALUES(?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                ",
                params![
                    stored.revision_id,
                    stored.manual_id,
                    stored.section_id,
                    stored.revision_number,
                    stored.description,
                    stored.date_issued,
                    stored.effective_date,
                    stored.expiry_date,
                    stored.issued_by
                ],
            )
            .with_context(|| format!("failed to insert temporary revision {}", stored.revision_id))?;

        info!(
            revision_id = %stored.revision_id,
            section_id = %stored.section_id,
            "recorded temporary revision"
        );
        Ok(stored)
    }

    pub fn list_temporary_revisions(&self, manual_id: &str) -> Result<Vec<TemporaryRevision>> {
        let mut statement = self.connection.prepare(
            "
            SELECT revision_id, manual_id, section_id, revision_number, description,
                   date_issued, effective_date, expiry_date, issued_by
            FROM temporary_revisions
            WHERE manual_id = ?1
            ORDER BY rowid
            ",
        )?;

        let revisions = statement
            .query_map([manual_id], temporary_revision_from_row)?
            .collect::<rusqlite::Result<Vec<TemporaryRevision>>>()?;
        Ok(revisions)
    }

    pub fn list_final_revisions(&self, manual_id: &str) -> Result<Vec<FinalRevision>> {
        let mut statement = self.connection.prepare(
            "
            SELECT revision_id, manual_id, issue_no, revision_no, revision_date,
                   affected_pages, reason, date_inserted, inserted_by
            FROM final_revisions
            WHERE manual_id = ?1
            ORDER BY rowid
            ",
        )?;

        let revisions = statement
            .query_map([manual_id], final_revision_from_row)?
            .collect::<rusqlite::Result<Vec<FinalRevision>>>()?;
        Ok(revisions)
    }
}

pub(super) fn insert_final_revision(connection: &Connection, revision: &FinalRevision) -> Result<()> {
    connection
        .execute(
            "
            INSERT INTO final_revisions(
              revision_id, manual_id, issue_no, revision_no, revision_date,
              affected_pages, reason, date_inserted, inserted_by
            )
            VALUES(?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            ",
            params![
                revision.revision_id,
                revision.manual_id,
                revision.issue_no,
                revision.revision_no,
                revision.revision_date,
                revision.affected_pages,
                revision.reason,
                revision.date_inserted,
                revision.inserted_by
            ],
        )
        .with_context(|| format!("failed to insert final revision {}", revision.revision_id))?;
    Ok(())
}

fn temporary_revision_from_row(row: &Row<'_>) -> rusqlite::Result<TemporaryRevision> {
    Ok(TemporaryRevision {
        revision_id: row.get(0)?,
        manual_id: row.get(1)?,
        section_id: row.get(2)?,
        revision_number: row.get(3)?,
        description: row.get(4)?,
        date_issued: row.get(5)?,
        effective_date: row.get(6)?,
        expiry_date: row.get(7)?,
        issued_by: row.get(8)?,
    })
}

fn final_revision_from_row(row: &Row<'_>) -> rusqlite::Result<FinalRevision> {
    Ok(FinalRevision {
        revision_id: row.get(0)?,
        manual_id: row.get(1)?,
        issue_no: row.get(2)?,
        revision_no: row.get(3)?,
        revision_date: row.get(4)?,
        affected_pages: row.get(5)?,
        reason: row.get(6)?,
        date_inserted: row.get(7)?,
        inserted_by: row.get(8)?,
    })
}
