//! Structure recovery for extracted manual text: heading sections, display
//! numbers, list and table blocks, and amendment diffs.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

mod assemble;
mod blocks;
mod diff;
mod headings;
mod lists;
mod numbering;
mod print;
mod tables;
#[cfg(test)]
mod tests;

pub use assemble::{AssembledSection, BlockCache, ManualAssembler, ManualView, SectionTreeNode};
pub use blocks::ContentBlockParser;
pub use diff::{AmendmentDiffer, word_diff};
pub use headings::{HeadingParser, link_sections};
pub use lists::ListDetector;
pub use numbering::{MAX_SECTION_DEPTH, number_sections, section_number_map};
pub use print::{
    PrintAssembler, PrintDocument, PrintEntry, PrintEntryBody, PrintHeader, RevisionRecords,
};
pub use tables::TableDetector;

/// Tunables for the structuring heuristics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructureConfig {
    /// Phrases that switch a star list to roman labels when any item contains
    /// one of them (case-insensitive). Empty means star lists are always
    /// labeled alphabetically.
    #[serde(default)]
    pub roman_marker_phrases: Vec<String>,
}

impl StructureConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
        let config: StructureConfig = serde_json::from_slice(&raw)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        Ok(config)
    }

    pub fn has_roman_marker(&self, text: &str) -> bool {
        if self.roman_marker_phrases.is_empty() {
            return false;
        }

        let lowered = text.to_lowercase();
        self.roman_marker_phrases
            .iter()
            .map(|phrase| phrase.trim().to_lowercase())
            .filter(|phrase| !phrase.is_empty())
            .any(|phrase| lowered.contains(&phrase))
    }
}
