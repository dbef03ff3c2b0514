use anyhow::{Context, Result};
use regex::Regex;

use crate::model::{TableGrid, TableVariant};

const ABBREVIATION_LINE_RATIO: f64 = 0.7;
const SHORT_HEADER_CELL_CHARS: usize = 20;

#[derive(Debug)]
pub struct TableDetector {
    abbreviation_prefix: Regex,
    abbreviation_row: Regex,
    abbreviation_anywhere: Regex,
    uppercase_cell: Regex,
    alignment_cell: Regex,
}

impl TableDetector {
    pub fn new() -> Result<Self> {
        Ok(Self {
            abbreviation_prefix: Regex::new(r"^[A-Z]{3,5}\s+")
                .context("failed to compile abbreviation prefix regex")?,
            abbreviation_row: Regex::new(r"^([A-Z]{3,5})\s+(.+)$")
                .context("failed to compile abbreviation row regex")?,
            abbreviation_anywhere: Regex::new(r"[A-Z]{3,5}")
                .context("failed to compile abbreviation search regex")?,
            uppercase_cell: Regex::new(r"^[A-Z\s]+$")
                .context("failed to compile uppercase header cell regex")?,
            alignment_cell: Regex::new(r"^:?-{3,}:?$")
                .context("failed to compile alignment cell regex")?,
        })
    }

    /// Detects and materializes a table from a run of lines. Abbreviation
    /// glossaries are recognized before separator-based tables.
    pub fn detect(&self, text: &str) -> Option<TableGrid> {
        let lines = text.trim().split('\n').collect::<Vec<&str>>();
        self.detect_lines(&lines)
    }

    pub fn detect_lines(&self, lines: &[&str]) -> Option<TableGrid> {
        if self.is_abbreviation_table(lines) {
            return self.render_abbreviation_table(lines);
        }

        if is_tabular(lines) {
            return self.render_generic_table(lines);
        }

        None
    }

    pub fn is_abbreviation_table(&self, lines: &[&str]) -> bool {
        if lines.len() < 2 {
            return false;
        }

        let non_blank = lines
            .iter()
            .filter(|line| !line.trim().is_empty())
            .collect::<Vec<&&str>>();
        if non_blank.is_empty() {
            return false;
        }

        let matching = non_blank
            .iter()
            .filter(|line| self.abbreviation_prefix.is_match(line.trim_start()))
            .count();

        matching as f64 >= non_blank.len() as f64 * ABBREVIATION_LINE_RATIO
    }

    pub fn render_abbreviation_table(&self, lines: &[&str]) -> Option<TableGrid> {
        let rows = lines
            .iter()
            .map(|line| self.split_abbreviation_row(line.trim()))
            .filter(|row| !row[0].trim().is_empty())
            .collect::<Vec<Vec<String>>>();

        if rows.is_empty() {
            return None;
        }

        Some(TableGrid {
            variant: TableVariant::Abbreviation,
            header: Some(vec!["Abbreviation".to_string(), "Definition".to_string()]),
            rows,
        })
    }

    fn split_abbreviation_row(&self, line: &str) -> Vec<String> {
        if let Some(captures) = self.abbreviation_row.captures(line) {
            let abbreviation = captures
                .get(1)
                .map(|value| value.as_str().to_string())
                .unwrap_or_default();
            let definition = captures
                .get(2)
                .map(|value| trim_definition(value.as_str()))
                .unwrap_or_default();
            return vec![abbreviation, definition];
        }

        if let Some(found) = self.abbreviation_anywhere.find(line) {
            let definition = trim_definition(&line[found.end()..]);
            return vec![found.as_str().to_string(), definition];
        }

        vec![line.to_string(), String::new()]
    }

    pub fn render_generic_table(&self, lines: &[&str]) -> Option<TableGrid> {
        let separator = if lines.iter().any(|line| line.contains('|')) {
            '|'
        } else {
            '\t'
        };

        let mut rows = lines
            .iter()
            .map(|line| split_row(line, separator))
            .filter(|cells| cells.iter().any(|cell| !cell.is_empty()))
            .filter(|cells| !self.is_alignment_row(cells))
            .collect::<Vec<Vec<String>>>();

        let column_count = rows.first()?.len();
        for row in &mut rows {
            row.resize(column_count, String::new());
        }

        let has_header = rows.len() > 1 && self.is_header_row(&rows[0]);
        let header = if has_header {
            Some(rows.remove(0))
        } else {
            None
        };

        Some(TableGrid {
            variant: TableVariant::Generic,
            header,
            rows,
        })
    }

    fn is_header_row(&self, cells: &[String]) -> bool {
        cells.iter().all(|cell| !cell.is_empty())
            && cells.iter().all(|cell| {
                self.uppercase_cell.is_match(cell)
                    || cell.chars().count() < SHORT_HEADER_CELL_CHARS
            })
    }

    fn is_alignment_row(&self, cells: &[String]) -> bool {
        cells
            .iter()
            .filter(|cell| !cell.is_empty())
            .all(|cell| self.alignment_cell.is_match(cell))
    }
}

pub fn is_table_row_line(line: &str) -> bool {
    line.contains('|') || line.contains('\t')
}

/// At least two consecutive lines carry a pipe or tab separator.
pub fn is_tabular(lines: &[&str]) -> bool {
    lines
        .windows(2)
        .any(|pair| is_table_row_line(pair[0]) && is_table_row_line(pair[1]))
}

fn trim_definition(value: &str) -> String {
    value
        .trim_matches(|ch: char| ch == '|' || ch.is_whitespace())
        .to_string()
}

fn split_row(line: &str, separator: char) -> Vec<String> {
    let mut row = line.trim_end_matches('\r');
    if separator == '|' {
        row = row.trim();
        row = row.strip_prefix('|').unwrap_or(row);
        row = row.strip_suffix('|').unwrap_or(row);
    }

    row
        .split(separator)
        .map(|cell| cell.trim().to_string())
        .collect()
}
