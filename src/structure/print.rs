use std::collections::{HashMap, HashSet};

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};

use super::assemble::ManualAssembler;
use crate::model::{
    Amendment, AmendmentStatus, FinalRevision, Section, SectionRendering, TableGrid,
    TableVariant, TemporaryRevision,
};

const PAGE_SIZE: &str = "A4";
const UNCONTROLLED_FOOTER: &str = "NOT CONTROLLED ONCE PRINTED";
const RECORD_OF_REVISION_TITLES: [&str; 2] = ["Record of Revision", "Record of Revisions"];
const RECORD_OF_TEMPORARY_REVISION_TITLES: [&str; 2] = [
    "Record of Temporary Revision",
    "Record of Temporary Revisions",
];
const REVISION_RECORD_PREAMBLE: &str = "Retain this record in front of this manual. On receipt of revisions, insert the revised pages in the manual and enter the revision number, date, insertion date and name of the person incorporating the revision in the appropriate block.";
const TEMPORARY_REVISION_PREAMBLE: &str =
    "The following temporary revisions have been incorporated in this manual:";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrintHeader {
    pub company_name: String,
    pub document_title: String,
    pub doc_number: String,
    pub doc_name: String,
    pub issue_no: String,
    pub revision_no: String,
    pub date: String,
}

#[derive(Debug, Clone, Default)]
pub struct RevisionRecords {
    pub temporary: Vec<TemporaryRevision>,
    pub final_revisions: Vec<FinalRevision>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PrintEntryBody {
    Content {
        rendering: SectionRendering,
    },
    RevisionRecord {
        preamble: String,
        table: TableGrid,
    },
    TemporaryRevisionRecord {
        preamble: String,
        table: TableGrid,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct PrintEntry {
    pub section_id: String,
    pub number: String,
    pub heading: String,
    pub level: u32,
    pub highlighted: bool,
    pub body: PrintEntryBody,
}

#[derive(Debug, Clone, Serialize)]
pub struct PrintDocument {
    pub page_size: String,
    pub header: PrintHeader,
    pub entries: Vec<PrintEntry>,
    pub footer: String,
}

#[derive(Debug, Clone)]
pub struct PrintAssembler {
    header: PrintHeader,
}

impl PrintAssembler {
    pub fn new(header: PrintHeader) -> Self {
        Self { header }
    }

    pub fn build(
        &self,
        assembler: &mut ManualAssembler,
        sections: &[Section],
        amendments: &HashMap<String, Amendment>,
        records: &RevisionRecords,
    ) -> PrintDocument {
        let view = assembler.assemble(sections, amendments);
        let highlighted = highlighted_section_ids(sections, amendments, &records.temporary);

        let entries = view
            .sections
            .into_iter()
            .map(|section| {
                let heading = if section.level == 1 {
                    format!("{} {}", section.number, section.title.to_uppercase())
                } else {
                    format!("{} {}", section.number, section.title)
                };

                let body = if RECORD_OF_TEMPORARY_REVISION_TITLES.contains(&section.title.as_str())
                {
                    PrintEntryBody::TemporaryRevisionRecord {
                        preamble: TEMPORARY_REVISION_PREAMBLE.to_string(),
                        table: temporary_revision_table(&records.temporary, sections),
                    }
                } else if RECORD_OF_REVISION_TITLES.contains(&section.title.as_str()) {
                    PrintEntryBody::RevisionRecord {
                        preamble: REVISION_RECORD_PREAMBLE.to_string(),
                        table: final_revision_table(&records.final_revisions),
                    }
                } else {
                    PrintEntryBody::Content {
                        rendering: section.rendering,
                    }
                };

                PrintEntry {
                    highlighted: highlighted.contains(section.id.as_str()),
                    section_id: section.id,
                    number: section.number,
                    heading,
                    level: section.level,
                    body,
                }
            })
            .collect();

        PrintDocument {
            page_size: PAGE_SIZE.to_string(),
            header: self.header.clone(),
            entries,
            footer: UNCONTROLLED_FOOTER.to_string(),
        }
    }
}

/// Sections carrying a temporary revision whose amendment is not yet approved.
fn highlighted_section_ids<'a>(
    sections: &'a [Section],
    amendments: &HashMap<String, Amendment>,
    temporary: &[TemporaryRevision],
) -> HashSet<&'a str> {
    sections
        .iter()
        .filter(|section| {
            temporary
                .iter()
                .any(|revision| revision.section_id == section.id)
        })
        .filter(|section| {
            amendments
                .get(&section.id)
                .map(|amendment| amendment.status != AmendmentStatus::Approved)
                .unwrap_or(true)
        })
        .map(|section| section.id.as_str())
        .collect()
}

fn temporary_revision_table(temporary: &[TemporaryRevision], sections: &[Section]) -> TableGrid {
    let rows = temporary
        .iter()
        .map(|revision| {
            let section_title = sections
                .iter()
                .find(|section| section.id == revision.section_id)
                .map(|section| section.title.clone())
                .unwrap_or_else(|| "Unknown Section".to_string());

            vec![
                revision.revision_number.clone(),
                section_title,
                revision.description.clone(),
                display_date(&revision.date_issued),
                display_date(&revision.effective_date),
                revision
                    .expiry_date
                    .as_deref()
                    .map(display_date)
                    .unwrap_or_default(),
                revision.issued_by.clone(),
            ]
        })
        .collect();

    TableGrid {
        variant: TableVariant::Generic,
        header: Some(
            [
                "Rev #",
                "Section",
                "Description",
                "Issued",
                "Effective",
                "Expiry",
                "By",
            ]
            .map(str::to_string)
            .to_vec(),
        ),
        rows,
    }
}

fn final_revision_table(final_revisions: &[FinalRevision]) -> TableGrid {
    let rows = final_revisions
        .iter()
        .map(|revision| {
            vec![
                revision.issue_no.clone(),
                revision.revision_no.clone(),
                display_date(&revision.revision_date),
                revision.affected_pages.clone(),
                revision.reason.clone(),
                display_date(&revision.date_inserted),
                revision.inserted_by.clone(),
            ]
        })
        .collect();

    TableGrid {
        variant: TableVariant::Generic,
        header: Some(
            [
                "Issue No.",
                "Revision No.",
                "Revision Date",
                "Affected Pages",
                "Reason",
                "Date Inserted",
                "Inserted By",
            ]
            .map(str::to_string)
            .to_vec(),
        ),
        rows,
    }
}

fn display_date(value: &str) -> String {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return parsed.format("%Y-%m-%d").to_string();
    }

    if let Ok(parsed) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return parsed.format("%Y-%m-%d").to_string();
    }

    value.to_string()
}
