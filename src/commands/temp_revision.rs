use anyhow::Result;

use super::open_store;
use crate::cli::TempRevisionArgs;
use amendtrack::store::NewTemporaryRevision;
use amendtrack::util::{now_utc_string, print_json};

pub fn run(args: TempRevisionArgs) -> Result<()> {
    let store = open_store(&args.data)?;
    let date_issued = args.date_issued.unwrap_or_else(now_utc_string);
    let effective_date = args.effective_date.unwrap_or_else(|| date_issued.clone());

    let revision = store.insert_temporary_revision(NewTemporaryRevision {
        section_id: args.section_id,
        revision_number: args.revision_number,
        description: args.description,
        date_issued,
        effective_date,
        expiry_date: args.expiry_date,
        issued_by: args.issued_by,
    })?;

    print_json(&revision)
}
