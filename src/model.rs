use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionDraft {
    pub level: u32,
    pub title: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub id: String,
    pub title: String,
    pub content: String,
    pub level: u32,
    pub order: i64,
    pub parent_id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListType {
    Numeric,
    Alphabetic,
    Roman,
    Star,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListItem {
    pub number: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sub_items: Vec<ListItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectedList {
    pub list_type: ListType,
    pub items: Vec<ListItem>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableVariant {
    Generic,
    Abbreviation,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableGrid {
    pub variant: TableVariant,
    pub header: Option<Vec<String>>,
    pub rows: Vec<Vec<String>>,
}

impl TableGrid {
    pub fn has_header(&self) -> bool {
        self.header.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ContentBlock {
    Paragraph { text: String },
    List(DetectedList),
    Table(TableGrid),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiffStatus {
    Added,
    Removed,
    Unchanged,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffSpan {
    pub text: String,
    pub status: DiffStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmendmentDiff {
    pub paragraph_changed: Vec<bool>,
    pub word_diff: Vec<DiffSpan>,
}

impl AmendmentDiff {
    pub fn is_paragraph_changed(&self, index: usize) -> bool {
        self.paragraph_changed.get(index).copied().unwrap_or(false)
    }

    pub fn changed_paragraph_count(&self) -> usize {
        self.paragraph_changed.iter().filter(|changed| **changed).count()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiffedParagraph {
    pub index: usize,
    pub changed: bool,
    pub blocks: Vec<ContentBlock>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SectionRendering {
    Plain {
        blocks: Vec<ContentBlock>,
    },
    Diffed {
        paragraphs: Vec<DiffedParagraph>,
        diff: AmendmentDiff,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manual {
    pub manual_id: String,
    pub title: String,
    pub version: String,
    pub source_name: String,
    pub source_sha256: String,
    pub created_at: String,
    pub is_obsolete: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmendmentStatus {
    Pending,
    Quality,
    Approved,
    Rejected,
}

impl AmendmentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            AmendmentStatus::Pending => "pending",
            AmendmentStatus::Quality => "quality",
            AmendmentStatus::Approved => "approved",
            AmendmentStatus::Rejected => "rejected",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(AmendmentStatus::Pending),
            "quality" => Some(AmendmentStatus::Quality),
            "approved" => Some(AmendmentStatus::Approved),
            "rejected" => Some(AmendmentStatus::Rejected),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Amendment {
    pub amendment_id: String,
    pub manual_id: String,
    pub section_id: String,
    pub title: String,
    pub content: String,
    pub original_content: String,
    pub reason: String,
    pub status: AmendmentStatus,
    pub created_by: String,
    pub created_at: String,
    pub quality_approved_by: Option<String>,
    pub quality_approved_at: Option<String>,
    pub authority_approved_by: Option<String>,
    pub authority_approved_at: Option<String>,
    pub rejected_by: Option<String>,
    pub rejected_at: Option<String>,
    pub rejection_reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemporaryRevision {
    pub revision_id: String,
    pub manual_id: String,
    pub section_id: String,
    pub revision_number: String,
    pub description: String,
    pub date_issued: String,
    pub effective_date: String,
    pub expiry_date: Option<String>,
    pub issued_by: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinalRevision {
    pub revision_id: String,
    pub manual_id: String,
    pub issue_no: String,
    pub revision_no: String,
    pub revision_date: String,
    pub affected_pages: String,
    pub reason: String,
    pub date_inserted: String,
    pub inserted_by: String,
}
