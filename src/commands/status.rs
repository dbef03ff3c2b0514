use anyhow::Result;
use tracing::{info, warn};

use super::open_store;
use crate::cli::StatusArgs;
use amendtrack::model::AmendmentStatus;

const COUNTED_TABLES: [&str; 5] = [
    "manuals",
    "sections",
    "amendments",
    "temporary_revisions",
    "final_revisions",
];

pub fn run(args: StatusArgs) -> Result<()> {
    let db_path = args.data.resolved_db_path();
    info!(data_root = %args.data.data_root.display(), "status requested");

    if !db_path.exists() {
        warn!(path = %db_path.display(), "database file missing");
        return Ok(());
    }

    let store = open_store(&args.data)?;
    info!(
        path = %db_path.display(),
        schema_version = %store.schema_version()?.unwrap_or_default(),
        "database status"
    );

    for table in COUNTED_TABLES {
        let rows = store.count_rows(table).unwrap_or(0);
        info!(table, rows, "table rows");
    }

    for manual in store.list_manuals()? {
        let amendments = store.list_amendments(&manual.manual_id)?;
        let open = amendments
            .iter()
            .filter(|amendment| {
                matches!(
                    amendment.status,
                    AmendmentStatus::Pending | AmendmentStatus::Quality
                )
            })
            .count();

        info!(
            manual_id = %manual.manual_id,
            title = %manual.title,
            version = %manual.version,
            obsolete = manual.is_obsolete,
            amendments = amendments.len(),
            open_amendments = open,
            "manual"
        );
    }

    Ok(())
}
