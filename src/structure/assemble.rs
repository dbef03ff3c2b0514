use std::collections::{HashMap, HashSet};

use anyhow::Result;
use serde::Serialize;
use tracing::debug;

use super::StructureConfig;
use super::blocks::ContentBlockParser;
use super::diff::AmendmentDiffer;
use super::numbering::section_number_map;
use crate::model::{
    Amendment, AmendmentStatus, ContentBlock, DiffedParagraph, Section, SectionRendering,
};
use crate::util::sha256_text;

const EMPTY_SECTION_PLACEHOLDER: &str = "No content available for this section.";

/// Parsed blocks keyed by (section id, content hash).
#[derive(Debug, Default)]
pub struct BlockCache {
    entries: HashMap<(String, String), Vec<ContentBlock>>,
    hits: usize,
    misses: usize,
}

impl BlockCache {
    pub fn get_or_parse(
        &mut self,
        section_id: &str,
        content: &str,
        parser: &ContentBlockParser,
    ) -> Vec<ContentBlock> {
        let key = (section_id.to_string(), sha256_text(content));
        if let Some(blocks) = self.entries.get(&key) {
            self.hits += 1;
            return blocks.clone();
        }

        self.misses += 1;
        let blocks = parser.parse(content);
        self.entries.insert(key, blocks.clone());
        blocks
    }

    pub fn hits(&self) -> usize {
        self.hits
    }

    pub fn misses(&self) -> usize {
        self.misses
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AssembledSection {
    pub id: String,
    pub number: String,
    pub title: String,
    pub level: u32,
    pub order: i64,
    pub parent_id: Option<String>,
    pub amendment_status: Option<AmendmentStatus>,
    pub rendering: SectionRendering,
}

#[derive(Debug, Clone, Serialize)]
pub struct SectionTreeNode {
    pub section_id: String,
    pub number: String,
    pub title: String,
    pub level: u32,
    pub children: Vec<SectionTreeNode>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ManualView {
    pub sections: Vec<AssembledSection>,
    pub tree: Vec<SectionTreeNode>,
}

#[derive(Debug)]
pub struct ManualAssembler {
    blocks: ContentBlockParser,
    differ: AmendmentDiffer,
    cache: BlockCache,
}

impl ManualAssembler {
    pub fn new(config: StructureConfig) -> Result<Self> {
        Ok(Self {
            blocks: ContentBlockParser::new(config)?,
            differ: AmendmentDiffer::new()?,
            cache: BlockCache::default(),
        })
    }

    pub fn cache(&self) -> &BlockCache {
        &self.cache
    }

    /// Builds the numbered, rendered view of a manual. `amendments` maps a
    /// section id to the amendment overriding its content.
    pub fn assemble(
        &mut self,
        sections: &[Section],
        amendments: &HashMap<String, Amendment>,
    ) -> ManualView {
        let numbers = section_number_map(sections);

        let assembled = sections
            .iter()
            .map(|section| {
                let amendment = amendments.get(&section.id);
                let rendering = match amendment {
                    Some(amendment) => self.render_section(
                        &section.id,
                        &amendment.content,
                        Some(amendment.original_content.as_str()),
                    ),
                    None => self.render_section(&section.id, &section.content, None),
                };

                AssembledSection {
                    id: section.id.clone(),
                    number: numbers.get(&section.id).cloned().unwrap_or_default(),
                    title: section.title.clone(),
                    level: section.level,
                    order: section.order,
                    parent_id: section.parent_id.clone(),
                    amendment_status: amendment.map(|value| value.status),
                    rendering,
                }
            })
            .collect::<Vec<AssembledSection>>();

        let tree = build_section_tree(&assembled);

        debug!(
            sections = assembled.len(),
            amended = amendments.len(),
            cache_hits = self.cache.hits(),
            cache_misses = self.cache.misses(),
            "assembled manual view"
        );

        ManualView {
            sections: assembled,
            tree,
        }
    }

    /// Renders section content, overlaying paragraph change flags when the
    /// original content of an amendment is supplied.
    pub fn render_section(
        &mut self,
        section_id: &str,
        content: &str,
        original_content: Option<&str>,
    ) -> SectionRendering {
        let content = if content.trim().is_empty() {
            EMPTY_SECTION_PLACEHOLDER
        } else {
            content
        };

        let Some(original) = original_content.filter(|value| !value.trim().is_empty()) else {
            return SectionRendering::Plain {
                blocks: self.cache.get_or_parse(section_id, content, &self.blocks),
            };
        };

        let diff = self.differ.diff(original, content);
        let paragraphs = self
            .differ
            .split_paragraphs(content)
            .into_iter()
            .enumerate()
            .map(|(index, paragraph)| DiffedParagraph {
                index,
                changed: diff.is_paragraph_changed(index),
                blocks: self.cache.get_or_parse(section_id, paragraph, &self.blocks),
            })
            .collect::<Vec<DiffedParagraph>>();

        SectionRendering::Diffed { paragraphs, diff }
    }
}

fn build_section_tree(sections: &[AssembledSection]) -> Vec<SectionTreeNode> {
    let known_ids = sections
        .iter()
        .map(|section| section.id.as_str())
        .collect::<HashSet<&str>>();

    let mut children_of = HashMap::<&str, Vec<usize>>::new();
    let mut roots = Vec::<usize>::new();
    for (index, section) in sections.iter().enumerate() {
        match section.parent_id.as_deref() {
            Some(parent) if known_ids.contains(parent) => {
                children_of.entry(parent).or_default().push(index)
            }
            _ => roots.push(index),
        }
    }

    fn build(
        index: usize,
        sections: &[AssembledSection],
        children_of: &HashMap<&str, Vec<usize>>,
    ) -> SectionTreeNode {
        let section = &sections[index];
        let children = children_of
            .get(section.id.as_str())
            .map(|indices| {
                indices
                    .iter()
                    .map(|child| build(*child, sections, children_of))
                    .collect()
            })
            .unwrap_or_default();

        SectionTreeNode {
            section_id: section.id.clone(),
            number: section.number.clone(),
            title: section.title.clone(),
            level: section.level,
            children,
        }
    }

    roots
        .into_iter()
        .map(|index| build(index, sections, &children_of))
        .collect()
}
