use anyhow::{Context, Result};
use regex::Regex;
use similar::{Algorithm, ChangeTag, TextDiff};

use crate::model::{AmendmentDiff, DiffSpan, DiffStatus};

#[derive(Debug)]
pub struct AmendmentDiffer {
    paragraph_break: Regex,
}

impl AmendmentDiffer {
    pub fn new() -> Result<Self> {
        Ok(Self {
            paragraph_break: Regex::new(r"\n\s*\n")
                .context("failed to compile paragraph break regex")?,
        })
    }

    pub fn split_paragraphs<'a>(&self, text: &'a str) -> Vec<&'a str> {
        self.paragraph_break.split(text).collect()
    }

    pub fn paragraph_changes(&self, original: &str, proposed: &str) -> Vec<bool> {
        let original_paragraphs = self.split_paragraphs(original);
        let proposed_paragraphs = self.split_paragraphs(proposed);
        let count = original_paragraphs.len().max(proposed_paragraphs.len());

        (0..count)
            .map(|index| {
                match (
                    original_paragraphs.get(index),
                    proposed_paragraphs.get(index),
                ) {
                    (Some(before), Some(after)) => before.trim() != after.trim(),
                    _ => true,
                }
            })
            .collect()
    }

    /// Paragraph change flags and inline word spans for an amendment. Either
    /// side being empty yields an empty diff.
    pub fn diff(&self, original: &str, proposed: &str) -> AmendmentDiff {
        if original.trim().is_empty() || proposed.trim().is_empty() {
            return AmendmentDiff::default();
        }

        AmendmentDiff {
            paragraph_changed: self.paragraph_changes(original, proposed),
            word_diff: word_diff(original, proposed),
        }
    }
}

/// Word-level spans in reading order of the proposed text. Removed words sit
/// at their original position, ahead of the words that replaced them.
pub fn word_diff(original: &str, proposed: &str) -> Vec<DiffSpan> {
    let diff = TextDiff::configure()
        .algorithm(Algorithm::Lcs)
        .diff_words(original, proposed);

    let mut spans = Vec::<DiffSpan>::new();
    for change in diff.iter_all_changes() {
        let status = match change.tag() {
            ChangeTag::Equal => DiffStatus::Unchanged,
            ChangeTag::Delete => DiffStatus::Removed,
            ChangeTag::Insert => DiffStatus::Added,
        };

        match spans.last_mut() {
            Some(previous) if previous.status == status => previous.text.push_str(change.value()),
            _ => spans.push(DiffSpan {
                text: change.value().to_string(),
                status,
            }),
        }
    }

    spans
}
