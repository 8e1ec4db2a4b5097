//! `embargo sync` - copy objects the destination does not have yet.

use anyhow::Result;
use embargo_core::{sync_buckets, EmbargoError, SyncReport};

use super::stores;
use crate::cli::args::SyncArgs;
use crate::exit_codes::SUCCESS;

pub async fn run(args: SyncArgs) -> Result<i32> {
    match execute(&args).await {
        Ok(report) => {
            eprintln!(
                "{} copied, {} already present",
                report.copied.len(),
                report.skipped.len()
            );
            Ok(SUCCESS)
        }
        Err(e) => Ok(stores::fail(&e)),
    }
}

async fn execute(args: &SyncArgs) -> Result<SyncReport, EmbargoError> {
    let src = stores::open(&args.source)?;
    let dst = stores::open(&args.destination)?;
    sync_buckets(src.as_ref(), dst.as_ref(), args.prefix.as_deref()).await
}
