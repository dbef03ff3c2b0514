use anyhow::Result;
use serde::Serialize;
use tracing::info;

use super::open_store;
use crate::cli::OutlineArgs;
use amendtrack::structure::section_number_map;
use amendtrack::util::print_json;

#[derive(Debug, Serialize)]
struct OutlineEntry {
    section_id: String,
    number: String,
    title: String,
    level: u32,
    parent_id: Option<String>,
}

pub fn run(args: OutlineArgs) -> Result<()> {
    let store = open_store(&args.data)?;
    let manual = store.load_manual(&args.manual_id)?;
    let sections = store.load_sections(&manual.manual_id)?;
    let mut numbers = section_number_map(&sections);

    let outline = sections
        .into_iter()
        .map(|section| OutlineEntry {
            number: numbers.remove(&section.id).unwrap_or_default(),
            section_id: section.id,
            title: section.title,
            level: section.level,
            parent_id: section.parent_id,
        })
        .collect::<Vec<OutlineEntry>>();

    info!(
        manual_id = %manual.manual_id,
        sections = outline.len(),
        "built outline"
    );
    print_json(&outline)
}
