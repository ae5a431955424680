use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

pub const BASE_DIR_ENV: &str = "KIRA_RUNINDEX_BASE_DIR";

#[derive(Parser)]
#[command(
    name = "kira-runindex",
    version,
    about = "HTML index of the reports available for a sequencing run"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render the index page of one run.
    Render(RenderArgs),
    /// Render index pages for several runs into a directory.
    Batch(BatchArgs),
}

#[derive(Parser)]
pub struct RenderArgs {
    #[arg(long)]
    pub run_id: String,

    /// Write the page here instead of stdout.
    #[arg(long)]
    pub out: Option<PathBuf>,

    #[command(flatten)]
    pub page: PageArgs,
}

#[derive(Parser)]
pub struct BatchArgs {
    #[arg(required = true)]
    pub run_ids: Vec<String>,

    /// Pages are written as index_<run_id>.html.
    #[arg(long)]
    pub out_dir: PathBuf,

    #[arg(long, default_value_t = num_cpus::get())]
    pub threads: usize,

    #[command(flatten)]
    pub page: PageArgs,
}

#[derive(Args)]
pub struct PageArgs {
    /// Directory holding the run report directories.
    #[arg(long, env = BASE_DIR_ENV, default_value = ".")]
    pub base_dir: PathBuf,

    #[arg(
        long,
        value_enum,
        value_delimiter = ',',
        default_values_t = [SectionArg::Hiseq, SectionArg::Demux, SectionArg::Qc]
    )]
    pub sections: Vec<SectionArg>,

    /// Template with START_SECTION/END_SECTION blocks and ${RUN_ID} placeholders.
    #[arg(long)]
    pub template: Option<PathBuf>,

    #[arg(long, default_value = "logo.png")]
    pub logo: String,

    /// Drop links whose target file is missing.
    #[arg(long, default_value_t = false)]
    pub prune_missing: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum SectionArg {
    #[value(name = "hiseq")]
    Hiseq,
    #[value(name = "demux")]
    Demux,
    #[value(name = "qc")]
    Qc,
}
