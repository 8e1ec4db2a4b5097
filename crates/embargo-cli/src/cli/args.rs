use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "embargo",
    version,
    about = "Split sidestream archives into public and embargoed archives"
)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Split every sidestream archive of the source bucket
    Run(RunArgs),
    /// Copy objects missing from the destination bucket
    Sync(SyncArgs),
    /// Delete every object under a prefix
    Rm(RmArgs),
    Version,
}

#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// YAML config file; flags below override its values
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Source store URL (e.g. gs://scraper-mlab-oti, file:///data/in)
    #[arg(long, env = "EMBARGO_SOURCE_URL")]
    pub source: Option<String>,

    /// Destination store URL for public/ and private/ outputs
    #[arg(long, env = "EMBARGO_DEST_URL")]
    pub destination: Option<String>,

    /// Embargo cutoff date, YYYYMMDD
    #[arg(long)]
    pub cutoff: Option<String>,

    /// Read the whitelist from a local file
    #[arg(long, conflicts_with = "whitelist_object")]
    pub whitelist_file: Option<PathBuf>,

    /// Read the whitelist from this object in the source bucket
    #[arg(long)]
    pub whitelist_object: Option<String>,

    /// Record failed archives and keep going
    #[arg(long)]
    pub continue_on_error: bool,

    /// Cap on the decompressed size of one archive
    #[arg(long)]
    pub max_decode_bytes: Option<u64>,
}

#[derive(Args, Debug, Clone)]
pub struct SyncArgs {
    /// Store URL to copy from
    #[arg(long, env = "EMBARGO_SOURCE_URL")]
    pub source: String,

    /// Store URL to copy into
    #[arg(long, env = "EMBARGO_DEST_URL")]
    pub destination: String,

    /// Only objects whose name starts with this
    #[arg(long)]
    pub prefix: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct RmArgs {
    /// Store URL of the bucket to delete from
    #[arg(long)]
    pub store: String,

    /// Only objects whose name starts with this
    #[arg(long)]
    pub prefix: Option<String>,

    /// Required when no prefix is given
    #[arg(long)]
    pub all: bool,
}
