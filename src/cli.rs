use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

pub const DEFAULT_DATA_ROOT: &str = ".cache/amendtrack";
const DB_FILE_NAME: &str = "amendtrack.sqlite";
const STRUCTURE_CONFIG_FILE_NAME: &str = "structure_config.json";

#[derive(Parser, Debug)]
#[command(
    name = "amendtrack",
    version,
    about = "Manual structuring and amendment tracking"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Import(ImportArgs),
    Outline(OutlineArgs),
    Render(RenderArgs),
    Diff(DiffArgs),
    Amend(AmendArgs),
    Review(ReviewArgs),
    TempRevision(TempRevisionArgs),
    Export(ExportArgs),
    Status(StatusArgs),
}

#[derive(Args, Debug, Clone)]
pub struct DataArgs {
    #[arg(long, default_value = DEFAULT_DATA_ROOT)]
    pub data_root: PathBuf,

    #[arg(long)]
    pub db_path: Option<PathBuf>,

    #[arg(long)]
    pub structure_config: Option<PathBuf>,
}

impl DataArgs {
    pub fn resolved_db_path(&self) -> PathBuf {
        self.db_path
            .clone()
            .unwrap_or_else(|| self.data_root.join(DB_FILE_NAME))
    }

    /// Explicit config path, else the data-root default when that file exists.
    pub fn resolved_structure_config(&self) -> Option<PathBuf> {
        if let Some(path) = &self.structure_config {
            return Some(path.clone());
        }

        let default_path = self.data_root.join(STRUCTURE_CONFIG_FILE_NAME);
        default_path.exists().then_some(default_path)
    }
}

#[derive(Args, Debug, Clone)]
pub struct ImportArgs {
    #[command(flatten)]
    pub data: DataArgs,

    #[arg(long)]
    pub input: PathBuf,

    #[arg(long)]
    pub title: Option<String>,

    #[arg(long, default_value = "1")]
    pub version: String,

    /// Manual id marked obsolete together with the import.
    #[arg(long)]
    pub supersedes: Option<String>,

    #[arg(long, default_value_t = false)]
    pub dry_run: bool,
}

#[derive(Args, Debug, Clone)]
pub struct OutlineArgs {
    #[command(flatten)]
    pub data: DataArgs,

    #[arg(long)]
    pub manual_id: String,
}

#[derive(Args, Debug, Clone)]
pub struct RenderArgs {
    #[command(flatten)]
    pub data: DataArgs,

    #[arg(long)]
    pub manual_id: String,

    #[arg(long)]
    pub section_id: Option<String>,

    #[arg(long, default_value_t = false)]
    pub ignore_amendments: bool,
}

#[derive(Args, Debug, Clone)]
pub struct DiffArgs {
    #[arg(long)]
    pub original: PathBuf,

    #[arg(long)]
    pub proposed: PathBuf,
}

#[derive(Args, Debug, Clone)]
pub struct AmendArgs {
    #[command(flatten)]
    pub data: DataArgs,

    #[arg(long)]
    pub section_id: String,

    #[arg(long)]
    pub content_file: PathBuf,

    #[arg(long)]
    pub reason: String,

    #[arg(long)]
    pub by: String,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum ReviewDecision {
    Quality,
    Authority,
    Reject,
}

#[derive(Args, Debug, Clone)]
pub struct ReviewArgs {
    #[command(flatten)]
    pub data: DataArgs,

    #[arg(long)]
    pub amendment_id: String,

    #[arg(long, value_enum)]
    pub action: ReviewDecision,

    #[arg(long)]
    pub by: String,

    #[arg(long)]
    pub reason: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct TempRevisionArgs {
    #[command(flatten)]
    pub data: DataArgs,

    #[arg(long)]
    pub section_id: String,

    #[arg(long)]
    pub revision_number: String,

    #[arg(long)]
    pub description: String,

    #[arg(long)]
    pub date_issued: Option<String>,

    #[arg(long)]
    pub effective_date: Option<String>,

    #[arg(long)]
    pub expiry_date: Option<String>,

    #[arg(long)]
    pub issued_by: String,
}

#[derive(Args, Debug, Clone)]
pub struct ExportArgs {
    #[command(flatten)]
    pub data: DataArgs,

    #[arg(long)]
    pub manual_id: String,

    #[arg(long)]
    pub output: Option<PathBuf>,

    #[arg(long, default_value = "")]
    pub company_name: String,

    #[arg(long)]
    pub document_title: Option<String>,

    #[arg(long, default_value = "")]
    pub doc_number: String,

    #[arg(long)]
    pub doc_name: Option<String>,

    #[arg(long)]
    pub issue_no: Option<String>,

    #[arg(long, default_value = "0")]
    pub revision_no: String,
}

#[derive(Args, Debug, Clone)]
pub struct StatusArgs {
    #[command(flatten)]
    pub data: DataArgs,
}
