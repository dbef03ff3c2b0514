use std::collections::HashMap;

use anyhow::{Context, Result, bail};
use rusqlite::{OptionalExtension, Row, params};
use tracing::info;

use super::Store;
use super::revisions::insert_final_revision;
use crate::model::{Amendment, AmendmentStatus, FinalRevision};
use crate::structure::section_number_map;
use crate::util::now_utc_string;

const AMENDMENT_COLUMNS: &str = "
    amendment_id, manual_id, section_id, title, content, original_content, reason, status,
    created_by, created_at, quality_approved_by, quality_approved_at, authority_approved_by,
    authority_approved_at, rejected_by, rejected_at, rejection_reason
";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewAction {
    Quality,
    Authority,
    Reject { reason: String },
}

impl ReviewAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Quality => "quality",
            Self::Authority => "authority",
            Self::Reject { .. } => "reject",
        }
    }
}

impl Store {
    /// Opens a pending amendment against a section. The section's current
    /// effective content is captured as the amendment's original content.
    pub fn propose_amendment(
        &self,
        section_id: &str,
        content: &str,
        reason: &str,
        created_by: &str,
    ) -> Result<Amendment> {
        let (manual_id, section) = self.load_section(section_id)?;

        let latest = self.latest_amendment(section_id)?;
        if let Some(open) = latest.as_ref().filter(|amendment| {
            matches!(
                amendment.status,
                AmendmentStatus::Pending | AmendmentStatus::Quality
            )
        }) {
            bail!(
                "section {section_id} already has an open amendment {} ({})",
                open.amendment_id,
                open.status.as_str()
            );
        }

        let original_content = latest
            .filter(|amendment| amendment.status == AmendmentStatus::Approved)
            .map(|amendment| amendment.content)
            .unwrap_or(section.content);

        let existing: i64 = self.connection.query_row(
            "SELECT COUNT(*) FROM amendments WHERE section_id = ?1",
            [section_id],
            |row| row.get(0),
        )?;

        let amendment = Amendment {
            amendment_id: format!("{section_id}:amendment:{:03}", existing + 1),
            manual_id,
            section_id: section_id.to_string(),
            title: section.title,
            content: content.to_string(),
            original_content,
            reason: reason.to_string(),
            status: AmendmentStatus::Pending,
            created_by: created_by.to_string(),
            created_at: now_utc_string(),
            quality_approved_by: None,
            quality_approved_at: None,
            authority_approved_by: None,
            authority_approved_at: None,
            rejected_by: None,
            rejected_at: None,
            rejection_reason: None,
        };

        self.connection
            .execute(
                "
                INSERT INTO amendments(
                  amendment_id, manual_id, section_id, title, content, original_content, reason,
                  status, created_by, created_at
                )
                VALUES(?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
                ",
                params![
                    amendment.amendment_id,
                    amendment.manual_id,
                    amendment.section_id,
                    amendment.title,
                    amendment.content,
                    amendment.original_content,
                    amendment.reason,
                    amendment.status.as_str(),
                    amendment.created_by,
                    amendment.created_at
                ],
            )
            .with_context(|| format!("failed to insert amendment {}", amendment.amendment_id))?;

        info!(
            amendment_id = %amendment.amendment_id,
            section_id = %amendment.section_id,
            "proposed amendment"
        );
        Ok(amendment)
    }

    pub fn review_amendment(
        &mut self,
        amendment_id: &str,
        action: &ReviewAction,
        by: &str,
    ) -> Result<Amendment> {
        match action {
            ReviewAction::Quality => self.approve_quality(amendment_id, by),
            ReviewAction::Authority => self.approve_authority(amendment_id, by),
            ReviewAction::Reject { reason } => self.reject(amendment_id, by, reason),
        }
    }

    pub fn approve_quality(&self, amendment_id: &str, by: &str) -> Result<Amendment> {
        let amendment = self.load_amendment(amendment_id)?;
        if amendment.status != AmendmentStatus::Pending {
            bail!(
                "amendment {amendment_id} cannot be quality approved from status {}",
                amendment.status.as_str()
            );
        }

        self.connection.execute(
            "
            UPDATE amendments
            SET status = ?2, quality_approved_by = ?3, quality_approved_at = ?4
            WHERE amendment_id = ?1
            ",
            params![
                amendment_id,
                AmendmentStatus::Quality.as_str(),
                by,
                now_utc_string()
            ],
        )?;

        info!(amendment_id, by, "quality approved amendment");
        self.load_amendment(amendment_id)
    }

    /// Final approval. Records a revision entry for the amended section in the
    /// same transaction as the status change.
    pub fn approve_authority(&mut self, amendment_id: &str, by: &str) -> Result<Amendment> {
        let amendment = self.load_amendment(amendment_id)?;
        if amendment.status != AmendmentStatus::Quality {
            bail!(
                "amendment {amendment_id} cannot be authority approved from status {}",
                amendment.status.as_str()
            );
        }

        let manual = self.load_manual(&amendment.manual_id)?;
        let sections = self.load_sections(&amendment.manual_id)?;
        let affected_pages = section_number_map(&sections)
            .remove(&amendment.section_id)
            .unwrap_or_else(|| amendment.section_id.clone());
        let revision_count: i64 = self.connection.query_row(
            "SELECT COUNT(*) FROM final_revisions WHERE manual_id = ?1",
            [&amendment.manual_id],
            |row| row.get(0),
        )?;

        let now = now_utc_string();
        let revision = FinalRevision {
            revision_id: format!("{}:revision:{:04}", amendment.manual_id, revision_count + 1),
            manual_id: amendment.manual_id.clone(),
            issue_no: manual.version,
            revision_no: (revision_count + 1).to_string(),
            revision_date: now.clone(),
            affected_pages,
            reason: amendment.reason.clone(),
            date_inserted: now.clone(),
            inserted_by: by.to_string(),
        };

        let tx = self.connection.transaction()?;
        tx.execute(
            "
            UPDATE amendments
            SET status = ?2, authority_approved_by = ?3, authority_approved_at = ?4
            WHERE amendment_id = ?1
            ",
            params![amendment_id, AmendmentStatus::Approved.as_str(), by, now],
        )?;
        insert_final_revision(&tx, &revision)?;
        tx.commit()?;

        info!(
            amendment_id,
            by,
            revision_no = %revision.revision_no,
            "authority approved amendment"
        );
        self.load_amendment(amendment_id)
    }

    pub fn reject(&self, amendment_id: &str, by: &str, reason: &str) -> Result<Amendment> {
        let amendment = self.load_amendment(amendment_id)?;
        if !matches!(
            amendment.status,
            AmendmentStatus::Pending | AmendmentStatus::Quality
        ) {
            bail!(
                "amendment {amendment_id} cannot be rejected from status {}",
                amendment.status.as_str()
            );
        }

        self.connection.execute(
            "
            UPDATE amendments
            SET status = ?2, rejected_by = ?3, rejected_at = ?4, rejection_reason = ?5
            WHERE amendment_id = ?1
            ",
            params![
                amendment_id,
                AmendmentStatus::Rejected.as_str(),
                by,
                now_utc_string(),
                reason
            ],
        )?;

        info!(amendment_id, by, "rejected amendment");
        self.load_amendment(amendment_id)
    }

    pub fn load_amendment(&self, amendment_id: &str) -> Result<Amendment> {
        let sql = format!("SELECT {AMENDMENT_COLUMNS} FROM amendments WHERE amendment_id = ?1");
        let amendment = self
            .connection
            .query_row(&sql, [amendment_id], amendment_from_row)
            .optional()?;

        match amendment {
            Some(amendment) => Ok(amendment),
            None => bail!("amendment not found: {amendment_id}"),
        }
    }

    pub fn list_amendments(&self, manual_id: &str) -> Result<Vec<Amendment>> {
        let sql = format!(
            "SELECT {AMENDMENT_COLUMNS} FROM amendments WHERE manual_id = ?1 ORDER BY rowid"
        );
        let mut statement = self.connection.prepare(&sql)?;
        let amendments = statement
            .query_map([manual_id], amendment_from_row)?
            .collect::<rusqlite::Result<Vec<Amendment>>>()
            .with_context(|| format!("failed to load amendments for {manual_id}"))?;
        Ok(amendments)
    }

    /// Latest non-rejected amendment per section id.
    pub fn effective_amendments(&self, manual_id: &str) -> Result<HashMap<String, Amendment>> {
        let mut effective = HashMap::<String, Amendment>::new();
        for amendment in self.list_amendments(manual_id)? {
            if amendment.status == AmendmentStatus::Rejected {
                continue;
            }
            effective.insert(amendment.section_id.clone(), amendment);
        }
        Ok(effective)
    }

    fn latest_amendment(&self, section_id: &str) -> Result<Option<Amendment>> {
        let sql = format!(
            "
            SELECT {AMENDMENT_COLUMNS}
            FROM amendments
            WHERE section_id = ?1 AND status != 'rejected'
            ORDER BY rowid DESC
            LIMIT 1
            "
        );
        let amendment = self
            .connection
            .query_row(&sql, [section_id], amendment_from_row)
            .optional()?;
        Ok(amendment)
    }
}

fn amendment_from_row(row: &Row<'_>) -> rusqlite::Result<Amendment> {
    let status: String = row.get(7)?;
    let status = AmendmentStatus::parse(&status).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            7,
            rusqlite::types::Type::Text,
            format!("unknown amendment status: {status}").into(),
        )
    })?;

    Ok(Amendment {
        amendment_id: row.get(0)?,
        manual_id: row.get(1)?,
        section_id: row.get(2)?,
        title: row.get(3)?,
        content: row.get(4)?,
        original_content: row.get(5)?,
        reason: row.get(6)?,
        status,
        created_by: row.get(8)?,
        created_at: row.get(9)?,
        quality_approved_by: row.get(10)?,
        quality_approved_at: row.get(11)?,
        authority_approved_by: row.get(12)?,
        authority_approved_at: row.get(13)?,
        rejected_by: row.get(14)?,
        rejected_at: row.get(15)?,
        rejection_reason: row.get(16)?,
    })
}
