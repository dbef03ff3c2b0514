pub mod amend;
pub mod diff;
pub mod export;
pub mod import;
pub mod outline;
pub mod render;
pub mod review;
pub mod status;
pub mod temp_revision;

use anyhow::Result;
use tracing::info;

use crate::cli::DataArgs;
use amendtrack::store::Store;
use amendtrack::structure::StructureConfig;
use amendtrack::util::ensure_directory;

pub(crate) fn open_store(data: &DataArgs) -> Result<Store> {
    let db_path = data.resolved_db_path();
    if let Some(parent) = db_path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        ensure_directory(parent)?;
    }

    Store::open(&db_path)
}

pub(crate) fn load_structure_config(data: &DataArgs) -> Result<StructureConfig> {
    match data.resolved_structure_config() {
        Some(path) => {
            let config = StructureConfig::load(&path)?;
            info!(
                path = %path.display(),
                roman_marker_phrases = config.roman_marker_phrases.len(),
                "loaded structure config"
            );
            Ok(config)
        }
        None => Ok(StructureConfig::default()),
    }
}
