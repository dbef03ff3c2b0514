use anyhow::{Result, bail};

use super::open_store;
use crate::cli::AmendArgs;
use amendtrack::util::{print_json, read_text_file};

pub fn run(args: AmendArgs) -> Result<()> {
    let content = read_text_file(&args.content_file)?;
    if content.trim().is_empty() {
        bail!("amendment content is empty: {}", args.content_file.display());
    }

    let store = open_store(&args.data)?;
    let amendment = store.propose_amendment(&args.section_id, &content, &args.reason, &args.by)?;
    print_json(&amendment)
}
