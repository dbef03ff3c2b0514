use std::collections::HashMap;

use anyhow::{Result, bail};
use tracing::info;

use super::{load_structure_config, open_store};
use crate::cli::RenderArgs;
use amendtrack::structure::ManualAssembler;
use amendtrack::util::print_json;

pub fn run(args: RenderArgs) -> Result<()> {
    let store = open_store(&args.data)?;
    let config = load_structure_config(&args.data)?;
    let manual = store.load_manual(&args.manual_id)?;
    let sections = store.load_sections(&manual.manual_id)?;
    let amendments = if args.ignore_amendments {
        HashMap::new()
    } else {
        store.effective_amendments(&manual.manual_id)?
    };

    let mut assembler = ManualAssembler::new(config)?;
    let view = assembler.assemble(&sections, &amendments);

    info!(
        manual_id = %manual.manual_id,
        sections = view.sections.len(),
        amended = amendments.len(),
        cache_hits = assembler.cache().hits(),
        cache_misses = assembler.cache().misses(),
        "rendered manual"
    );

    match args.section_id.as_deref() {
        Some(section_id) => {
            let Some(section) = view
                .sections
                .iter()
                .find(|section| section.id == section_id)
            else {
                bail!("section {section_id} not found in {}", manual.manual_id);
            };
            print_json(section)
        }
        None => print_json(&view),
    }
}
