use anyhow::{Context, Result, bail};
use rusqlite::{OptionalExtension, Row, params};

use super::Store;
use crate::model::{Manual, Section, SectionDraft};
use crate::structure::link_sections;
use crate::util::now_utc_string;

impl Store {
    /// Stores a manual and its parsed sections in one transaction and returns
    /// the new manual id. A superseded manual is marked obsolete in the same
    /// transaction; nothing is stored when it does not exist.
    pub fn insert_manual(
        &mut self,
        title: &str,
        version: &str,
        source_name: &str,
        source_sha256: &str,
        drafts: &[SectionDraft],
        supersedes: Option<&str>,
    ) -> Result<String> {
        let manual_count = self.count_rows("manuals")?;
        let hash_prefix = source_sha256.get(..8).unwrap_or(source_sha256);
        let manual_id = format!("manual-{:04}-{}", manual_count + 1, hash_prefix);
        let sections = link_sections(&manual_id, drafts);
        let created_at = now_utc_string();

        let tx = self.connection.transaction()?;
        tx.execute(
            "
            INSERT INTO manuals(manual_id, title, version, source_name, source_sha256, created_at, is_obsolete)
            VALUES(?1, ?2, ?3, ?4, ?5, ?6, 0)
            ",
            params![manual_id, title, version, source_name, source_sha256, created_at],
        )
        .with_context(|| format!("failed to insert manual {manual_id}"))?;

        {
            let mut statement = tx.prepare(
                "
                INSERT INTO sections(section_id, manual_id, parent_section_id, title, content, level, order_index)
                VALUES(?1, ?2, ?3, ?4, ?5, ?6, ?7)
                ",
            )?;

            for section in &sections {
                statement
                    .execute(params![
                        section.id,
                        manual_id,
                        section.parent_id,
                        section.title,
                        section.content,
                        section.level,
                        section.order
                    ])
                    .with_context(|| format!("failed to insert section {}", section.id))?;
            }
        }

        if let Some(previous) = supersedes {
            let updated = tx.execute(
                "UPDATE manuals SET is_obsolete = 1 WHERE manual_id = ?1",
                [previous],
            )?;
            if updated == 0 {
                bail!("superseded manual not found: {previous}");
            }
        }

        tx.commit()?;
        Ok(manual_id)
    }

    pub fn list_manuals(&self) -> Result<Vec<Manual>> {
        let mut statement = self.connection.prepare(
            "
            SELECT manual_id, title, version, source_name, source_sha256, created_at, is_obsolete
            FROM manuals
            ORDER BY created_at, manual_id
            ",
        )?;

        let manuals = statement
            .query_map([], manual_from_row)?
            .collect::<rusqlite::Result<Vec<Manual>>>()?;
        Ok(manuals)
    }

    pub fn load_manual(&self, manual_id: &str) -> Result<Manual> {
        let manual = self
            .connection
            .query_row(
                "
                SELECT manual_id, title, version, source_name, source_sha256, created_at, is_obsolete
                FROM manuals
                WHERE manual_id = ?1
                ",
                [manual_id],
                manual_from_row,
            )
            .optional()?;

        match manual {
            Some(manual) => Ok(manual),
            None => bail!("manual not found: {manual_id}"),
        }
    }

    /// Sections of a manual in document order.
    pub fn load_sections(&self, manual_id: &str) -> Result<Vec<Section>> {
        let mut statement = self.connection.prepare(
            "
            SELECT section_id, title, content, level, order_index, parent_section_id
            FROM sections
            WHERE manual_id = ?1
            ORDER BY order_index
            ",
        )?;

        let sections = statement
            .query_map([manual_id], section_from_row)?
            .collect::<rusqlite::Result<Vec<Section>>>()
            .with_context(|| format!("failed to load sections for {manual_id}"))?;
        Ok(sections)
    }

    pub fn load_section(&self, section_id: &str) -> Result<(String, Section)> {
        let section = self
            .connection
            .query_row(
                "
                SELECT manual_id, section_id, title, content, level, order_index, parent_section_id
                FROM sections
                WHERE section_id = ?1
                ",
                [section_id],
                |row| {
                    let manual_id: String = row.get(0)?;
                    Ok((
                        manual_id,
                        Section {
                            id: row.get(1)?,
                            title: row.get(2)?,
                            content: row.get(3)?,
                            level: row.get(4)?,
                            order: row.get(5)?,
                            parent_id: row.get(6)?,
                        },
                    ))
                },
            )
            .optional()?;

        match section {
            Some(section) => Ok(section),
            None => bail!("section not found: {section_id}"),
        }
    }
}

fn manual_from_row(row: &Row<'_>) -> rusqlite::Result<Manual> {
    let is_obsolete: i64 = row.get(6)?;
    Ok(Manual {
        manual_id: row.get(0)?,
        title: row.get(1)?,
        version: row.get(2)?,
        source_name: row.get(3)?,
        source_sha256: row.get(4)?,
        created_at: row.get(5)?,
        is_obsolete: is_obsolete != 0,
    })
}

fn section_from_row(row: &Row<'_>) -> rusqlite::Result<Section> {
    Ok(Section {
        id: row.get(0)?,
        title: row.get(1)?,
        content: row.get(2)?,
        level: row.get(3)?,
        order: row.get(4)?,
        parent_id: row.get(5)?,
    })
}
