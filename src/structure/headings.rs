use anyhow::{Context, Result};
use regex::Regex;
use tracing::debug;

use crate::model::{Section, SectionDraft};

const INTRODUCTION_TITLE: &str = "Introduction";
const MAIN_CONTENT_TITLE: &str = "Main Content";

#[derive(Debug)]
pub struct HeadingParser {
    heading_line: Regex,
}

impl HeadingParser {
    pub fn new() -> Result<Self> {
        Ok(Self {
            heading_line: Regex::new(r"^(#{1,6})\s+(.+)$")
                .context("failed to compile heading line regex")?,
        })
    }

    pub fn detect_heading(&self, line: &str) -> Option<(u32, String)> {
        let captures = self.heading_line.captures(line.trim())?;
        let level = captures.get(1).map(|value| value.as_str().len())?;
        let title = captures
            .get(2)
            .map(|value| value.as_str().trim().to_string())
            .unwrap_or_default();
        if title.is_empty() {
            return None;
        }

        Some((level as u32, title))
    }

    pub fn parse_sections(&self, text: &str, source_name: &str) -> Vec<SectionDraft> {
        struct ActiveSection {
            level: u32,
            title: String,
            body_lines: Vec<String>,
        }

        fn finalize(active: ActiveSection) -> SectionDraft {
            SectionDraft {
                level: active.level,
                title: active.title,
                content: active.body_lines.join("\n"),
            }
        }

        if text.trim().is_empty() {
            debug!(source = %source_name, "no content found, using placeholder section");
            return vec![SectionDraft {
                level: 1,
                title: INTRODUCTION_TITLE.to_string(),
                content: format!("No content found in {}", source_name),
            }];
        }

        let lines = text.split('\n').collect::<Vec<&str>>();
        if !lines.iter().any(|line| self.detect_heading(line).is_some()) {
            debug!(source = %source_name, "no headings found, using single section");
            return vec![SectionDraft {
                level: 1,
                title: MAIN_CONTENT_TITLE.to_string(),
                content: text.to_string(),
            }];
        }

        let mut sections = Vec::<SectionDraft>::new();
        let mut current: Option<ActiveSection> = None;

        for raw_line in lines {
            if let Some((level, title)) = self.detect_heading(raw_line) {
                if let Some(active) = current.take() {
                    sections.push(finalize(active));
                }

                current = Some(ActiveSection {
                    level,
                    title,
                    body_lines: Vec::new(),
                });
                continue;
            }

            match current.as_mut() {
                Some(active) => active.body_lines.push(raw_line.to_string()),
                None if raw_line.trim().is_empty() => {}
                None => {
                    current = Some(ActiveSection {
                        level: 1,
                        title: INTRODUCTION_TITLE.to_string(),
                        body_lines: vec![raw_line.to_string()],
                    });
                }
            }
        }

        if let Some(active) = current.take() {
            sections.push(finalize(active));
        }

        debug!(
            source = %source_name,
            sections = sections.len(),
            "parsed heading sections"
        );

        sections
    }
}

/// Assigns ids, document order and parent links to parsed sections.
///
/// A section's parent is the nearest preceding section exactly one level up.
/// Sections with no such predecessor are roots.
pub fn link_sections(manual_id: &str, drafts: &[SectionDraft]) -> Vec<Section> {
    let mut sections = Vec::<Section>::with_capacity(drafts.len());

    for (index, draft) in drafts.iter().enumerate() {
        let level = draft.level.max(1);
        let parent_id = if level == 1 {
            None
        } else {
            find_parent(&sections, level)
        };

        sections.push(Section {
            id: section_id_for(manual_id, index),
            title: draft.title.clone(),
            content: draft.content.clone(),
            level,
            order: index as i64,
            parent_id,
        });
    }

    sections
}

fn find_parent(preceding: &[Section], level: u32) -> Option<String> {
    preceding
        .iter()
        .rev()
        .find(|candidate| candidate.level == level - 1)
        .map(|candidate| candidate.id.clone())
}

fn section_id_for(manual_id: &str, index: usize) -> String {
    format!("{}:section:{:04}", manual_id, index + 1)
}
