use anyhow::Result;

use super::StructureConfig;
use super::lists::ListDetector;
use super::tables::{TableDetector, is_table_row_line};
use crate::model::ContentBlock;

#[derive(Debug)]
pub struct ContentBlockParser {
    lists: ListDetector,
    tables: TableDetector,
}

impl ContentBlockParser {
    pub fn new(config: StructureConfig) -> Result<Self> {
        Ok(Self {
            lists: ListDetector::new(config)?,
            tables: TableDetector::new()?,
        })
    }

    pub fn parse(&self, content: &str) -> Vec<ContentBlock> {
        let mut blocks = Vec::<ContentBlock>::new();
        let mut run = Vec::<&str>::new();
        let mut run_is_table = false;

        for line in content.split('\n') {
            let line_is_table = is_table_row_line(line);
            if !run.is_empty() && line_is_table != run_is_table {
                self.push_run(&run, run_is_table, &mut blocks);
                run.clear();
            }

            run_is_table = line_is_table;
            run.push(line);
        }

        if !run.is_empty() {
            self.push_run(&run, run_is_table, &mut blocks);
        }

        blocks
    }

    fn push_run(&self, run: &[&str], run_is_table: bool, blocks: &mut Vec<ContentBlock>) {
        if run_is_table && let Some(grid) = self.tables.detect_lines(run) {
            blocks.push(ContentBlock::Table(grid));
            return;
        }

        self.push_text_run(run, blocks);
    }

    fn push_text_run(&self, run: &[&str], blocks: &mut Vec<ContentBlock>) {
        let mut list_lines = Vec::<&str>::new();

        for raw_line in run {
            let line = raw_line.trim();
            if line.is_empty() {
                self.flush_list_lines(&mut list_lines, blocks);
                continue;
            }

            if self.lists.is_list_line(line) {
                list_lines.push(line);
                continue;
            }

            self.flush_list_lines(&mut list_lines, blocks);
            blocks.push(ContentBlock::Paragraph {
                text: line.to_string(),
            });
        }

        self.flush_list_lines(&mut list_lines, blocks);
    }

    fn flush_list_lines(&self, list_lines: &mut Vec<&str>, blocks: &mut Vec<ContentBlock>) {
        if list_lines.is_empty() {
            return;
        }

        match self.lists.detect(list_lines) {
            Some(list) => blocks.push(ContentBlock::List(list)),
            None => blocks.extend(list_lines.iter().map(|line| ContentBlock::Paragraph {
                text: line.to_string(),
            })),
        }

        list_lines.clear();
    }
}
