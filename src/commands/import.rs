use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use super::open_store;
use crate::cli::ImportArgs;
use amendtrack::model::SectionDraft;
use amendtrack::structure::{HeadingParser, number_sections};
use amendtrack::util::{print_json, read_text_file, sha256_file};

#[derive(Debug, Serialize)]
struct ImportSummary {
    manual_id: Option<String>,
    title: String,
    version: String,
    source_name: String,
    source_sha256: String,
    sections: Vec<ImportedSection>,
}

#[derive(Debug, Serialize)]
struct ImportedSection {
    number: String,
    level: u32,
    title: String,
}

pub fn run(args: ImportArgs) -> Result<()> {
    let text = read_text_file(&args.input)?;
    let source_name = args
        .input
        .file_name()
        .and_then(|name| name.to_str())
        .map(ToOwned::to_owned)
        .with_context(|| format!("invalid UTF-8 filename: {}", args.input.display()))?;
    let title = args.title.clone().unwrap_or_else(|| {
        args.input
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or(source_name.as_str())
            .to_string()
    });
    let source_sha256 = sha256_file(&args.input)?;

    let parser = HeadingParser::new()?;
    let drafts = parser.parse_sections(&text, &source_name);
    info!(
        source = %source_name,
        sections = drafts.len(),
        "parsed manual sections"
    );

    let manual_id = if args.dry_run {
        info!("dry-run: manual not stored");
        None
    } else {
        let mut store = open_store(&args.data)?;
        let manual_id = store.insert_manual(
            &title,
            &args.version,
            &source_name,
            &source_sha256,
            &drafts,
            args.supersedes.as_deref(),
        )?;
        info!(manual_id = %manual_id, "imported manual");

        if let Some(previous) = args.supersedes.as_deref() {
            info!(manual_id = %previous, "marked manual obsolete");
        }
        Some(manual_id)
    };

    print_json(&ImportSummary {
        manual_id,
        title,
        version: args.version,
        source_name,
        source_sha256,
        sections: summarize(&drafts),
    })
}

fn summarize(drafts: &[SectionDraft]) -> Vec<ImportedSection> {
    let levels = drafts.iter().map(|draft| draft.level).collect::<Vec<u32>>();

    drafts
        .iter()
        .zip(number_sections(&levels))
        .map(|(draft, number)| ImportedSection {
            number,
            level: draft.level,
            title: draft.title.clone(),
        })
        .collect()
}
