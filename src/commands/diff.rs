use anyhow::Result;
use tracing::info;

use crate::cli::DiffArgs;
use amendtrack::structure::AmendmentDiffer;
use amendtrack::util::{print_json, read_text_file};

pub fn run(args: DiffArgs) -> Result<()> {
    let original = read_text_file(&args.original)?;
    let proposed = read_text_file(&args.proposed)?;

    let differ = AmendmentDiffer::new()?;
    let diff = differ.diff(&original, &proposed);

    info!(
        paragraphs = diff.paragraph_changed.len(),
        changed = diff.changed_paragraph_count(),
        spans = diff.word_diff.len(),
        "computed amendment diff"
    );
    print_json(&diff)
}
