use anyhow::{Context, Result};
use regex::Regex;

use super::StructureConfig;
use crate::model::{DetectedList, ListItem, ListType};

/// The list shapes recognized for a run of list-item lines, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListShape {
    Star,
    NumericWithStarSubItems,
    DegenerateNumeric,
    Numeric,
    Alphabetic,
    Roman,
}

#[derive(Debug)]
pub struct ListDetector {
    config: StructureConfig,
    list_line: Regex,
    star_item: Regex,
    numeric_item: Regex,
    degenerate_item: Regex,
    alpha_item: Regex,
    roman_item: Regex,
}

impl ListDetector {
    pub fn new(config: StructureConfig) -> Result<Self> {
        Ok(Self {
            config,
            list_line: Regex::new(r"(?i)^(?:\d+|[a-z]|[ivxlcdm]+|\*)\.?\s+.+$")
                .context("failed to compile list line regex")?,
            star_item: Regex::new(r"^\*\s+(.*)$").context("failed to compile star item regex")?,
            numeric_item: Regex::new(r"^(\d+)\.(.*)$")
                .context("failed to compile numeric item regex")?,
            degenerate_item: Regex::new(r"^1\.(.*)$")
                .context("failed to compile degenerate numeric item regex")?,
            alpha_item: Regex::new(r"(?i)^([a-z])\.(.*)$")
                .context("failed to compile alphabetic item regex")?,
            roman_item: Regex::new(r"(?i)^([ivxlcdm]+)\.(.*)$")
                .context("failed to compile roman item regex")?,
        })
    }

    /// Whether a trimmed line has the shape of a list item at all.
    pub fn is_list_line(&self, line: &str) -> bool {
        self.list_line.is_match(line)
    }

    pub fn detect(&self, lines: &[&str]) -> Option<DetectedList> {
        if lines.len() < 2 {
            return None;
        }

        let shape = self.classify(lines)?;
        Some(self.build(shape, lines))
    }

    fn classify(&self, lines: &[&str]) -> Option<ListShape> {
        if lines.iter().all(|line| self.is_star_line(line)) {
            return Some(ListShape::Star);
        }

        if self.is_mixed_numeric(lines) {
            return Some(ListShape::NumericWithStarSubItems);
        }

        if lines.iter().all(|line| self.degenerate_item.is_match(line)) {
            return Some(ListShape::DegenerateNumeric);
        }

        if lines.iter().all(|line| self.numeric_item.is_match(line)) {
            return Some(ListShape::Numeric);
        }

        if lines.iter().all(|line| self.alpha_item.is_match(line)) {
            return Some(ListShape::Alphabetic);
        }

        if lines.iter().all(|line| self.roman_item.is_match(line)) {
            return Some(ListShape::Roman);
        }

        None
    }

    fn build(&self, shape: ListShape, lines: &[&str]) -> DetectedList {
        match shape {
            ListShape::Star => DetectedList {
                list_type: ListType::Star,
                items: self.star_items(lines),
            },
            ListShape::NumericWithStarSubItems => DetectedList {
                list_type: ListType::Numeric,
                items: self.numeric_items_with_sub_items(lines),
            },
            ListShape::DegenerateNumeric => DetectedList {
                list_type: ListType::Numeric,
                items: lines
                    .iter()
                    .enumerate()
                    .map(|(index, line)| ListItem {
                        number: (index + 1).to_string(),
                        content: marker_body(&self.degenerate_item, line, 1),
                        sub_items: Vec::new(),
                    })
                    .collect(),
            },
            ListShape::Numeric => DetectedList {
                list_type: ListType::Numeric,
                items: self.marked_items(&self.numeric_item, lines),
            },
            ListShape::Alphabetic => DetectedList {
                list_type: ListType::Alphabetic,
                items: self.marked_items(&self.alpha_item, lines),
            },
            ListShape::Roman => DetectedList {
                list_type: ListType::Roman,
                items: self.marked_items(&self.roman_item, lines),
            },
        }
    }

    fn is_star_line(&self, line: &str) -> bool {
        self.star_item.is_match(line)
    }

    /// At least one `digits.` item alongside lines that are not.
    fn is_mixed_numeric(&self, lines: &[&str]) -> bool {
        lines.iter().any(|line| self.numeric_item.is_match(line))
            && !lines.iter().all(|line| self.numeric_item.is_match(line))
    }

    /// Star items are relabeled: roman when any item carries a marker phrase,
    /// alphabetic otherwise.
    fn star_items(&self, lines: &[&str]) -> Vec<ListItem> {
        let use_roman = lines.iter().any(|line| self.config.has_roman_marker(line));

        lines
            .iter()
            .enumerate()
            .map(|(index, line)| ListItem {
                number: if use_roman {
                    roman_label(index + 1)
                } else {
                    alphabetic_label(index)
                },
                content: marker_body(&self.star_item, line, 1),
                sub_items: Vec::new(),
            })
            .collect()
    }

    fn numeric_items_with_sub_items(&self, lines: &[&str]) -> Vec<ListItem> {
        let mut items = Vec::<ListItem>::new();
        let mut current: Option<ListItem> = None;
        let mut sub_item_lines = Vec::<&str>::new();

        for line in lines {
            if let Some(captures) = self.numeric_item.captures(line) {
                if let Some(mut item) = current.take() {
                    item.sub_items = self.sub_items(&sub_item_lines);
                    items.push(item);
                }
                sub_item_lines.clear();

                current = Some(ListItem {
                    number: captures
                        .get(1)
                        .map(|value| value.as_str().to_string())
                        .unwrap_or_default(),
                    content: captures
                        .get(2)
                        .map(|value| value.as_str().trim().to_string())
                        .unwrap_or_default(),
                    sub_items: Vec::new(),
                });
                continue;
            }

            if current.is_some() && self.is_star_line(line) {
                sub_item_lines.push(line);
                continue;
            }

            if let Some(mut item) = current.take() {
                item.sub_items = self.sub_items(&sub_item_lines);
                items.push(item);
            }
            sub_item_lines.clear();

            items.push(ListItem {
                number: (items.len() + 1).to_string(),
                content: line.trim().to_string(),
                sub_items: Vec::new(),
            });
        }

        if let Some(mut item) = current.take() {
            item.sub_items = self.sub_items(&sub_item_lines);
            items.push(item);
        }

        items
    }

    /// Star lines under a numeric item go through the same cascade; a group
    /// that is not a list contributes nothing.
    fn sub_items(&self, lines: &[&str]) -> Vec<ListItem> {
        self.detect(lines)
            .map(|list| list.items)
            .unwrap_or_default()
    }

    fn marked_items(&self, pattern: &Regex, lines: &[&str]) -> Vec<ListItem> {
        lines
            .iter()
            .map(|line| {
                let captures = pattern.captures(line);
                ListItem {
                    number: captures
                        .as_ref()
                        .and_then(|value| value.get(1))
                        .map(|value| value.as_str().to_string())
                        .unwrap_or_default(),
                    content: captures
                        .as_ref()
                        .and_then(|value| value.get(2))
                        .map(|value| value.as_str().trim().to_string())
                        .unwrap_or_else(|| line.trim().to_string()),
                    sub_items: Vec::new(),
                }
            })
            .collect()
    }
}

fn marker_body(pattern: &Regex, line: &str, group: usize) -> String {
    pattern
        .captures(line)
        .and_then(|captures| captures.get(group))
        .map(|value| value.as_str().trim().to_string())
        .unwrap_or_else(|| line.trim().to_string())
}

/// `a`..`z`, then `aa`, `ab`, ... for longer lists.
fn alphabetic_label(index: usize) -> String {
    let mut label = Vec::<u8>::new();
    let mut remaining = index + 1;

    while remaining > 0 {
        let offset = (remaining - 1) % 26;
        label.push(b'a' + offset as u8);
        remaining = (remaining - 1) / 26;
    }

    label.reverse();
    String::from_utf8_lossy(&label).into_owned()
}

fn roman_label(value: usize) -> String {
    const NUMERALS: [(usize, &str); 13] = [
        (1000, "m"),
        (900, "cm"),
        (500, "d"),
        (400, "cd"),
        (100, "c"),
        (90, "xc"),
        (50, "l"),
        (40, "xl"),
        (10, "x"),
        (9, "ix"),
        (5, "v"),
        (4, "iv"),
        (1, "i"),
    ];

    let mut remaining = value;
    let mut label = String::new();
    for (amount, numeral) in NUMERALS {
        while remaining >= amount {
            label.push_str(numeral);
            remaining -= amount;
        }
    }

    label
}
