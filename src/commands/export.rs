use anyhow::Result;
use chrono::Utc;
use tracing::info;

use super::{load_structure_config, open_store};
use crate::cli::ExportArgs;
use amendtrack::structure::{ManualAssembler, PrintAssembler, PrintHeader, RevisionRecords};
use amendtrack::util::{utc_compact_string, write_json_pretty};

pub fn run(args: ExportArgs) -> Result<()> {
    let store = open_store(&args.data)?;
    let config = load_structure_config(&args.data)?;
    let manual = store.load_manual(&args.manual_id)?;
    let sections = store.load_sections(&manual.manual_id)?;
    let amendments = store.effective_amendments(&manual.manual_id)?;
    let records = RevisionRecords {
        temporary: store.list_temporary_revisions(&manual.manual_id)?,
        final_revisions: store.list_final_revisions(&manual.manual_id)?,
    };

    let now = Utc::now();
    let header = PrintHeader {
        company_name: args.company_name,
        document_title: args.document_title.unwrap_or_else(|| manual.title.clone()),
        doc_number: args.doc_number,
        doc_name: args.doc_name.unwrap_or_else(|| manual.title.clone()),
        issue_no: args.issue_no.unwrap_or_else(|| manual.version.clone()),
        revision_no: args.revision_no,
        date: now.format("%Y-%m-%d").to_string(),
    };

    let mut assembler = ManualAssembler::new(config)?;
    let document = PrintAssembler::new(header).build(&mut assembler, &sections, &amendments, &records);

    let output_path = args.output.unwrap_or_else(|| {
        args.data.data_root.join("exports").join(format!(
            "{}-{}.json",
            manual.manual_id,
            utc_compact_string(now)
        ))
    });
    write_json_pretty(&output_path, &document)?;

    let highlighted = document
        .entries
        .iter()
        .filter(|entry| entry.highlighted)
        .count();
    info!(
        manual_id = %manual.manual_id,
        entries = document.entries.len(),
        highlighted,
        path = %output_path.display(),
        "wrote print document"
    );

    Ok(())
}
