//! `embargo rm` - delete objects under a prefix.

use anyhow::{bail, Result};
use embargo_core::{delete_prefix, EmbargoError};

use super::stores;
use crate::cli::args::RmArgs;
use crate::exit_codes::SUCCESS;

pub async fn run(args: RmArgs) -> Result<i32> {
    if args.prefix.is_none() && !args.all {
        bail!("refusing to empty {} without --prefix or --all", args.store);
    }

    match execute(&args).await {
        Ok(count) => {
            eprintln!("deleted {} objects", count);
            Ok(SUCCESS)
        }
        Err(e) => Ok(stores::fail(&e)),
    }
}

async fn execute(args: &RmArgs) -> Result<usize, EmbargoError> {
    let bucket = stores::open(&args.store)?;
    delete_prefix(bucket.as_ref(), args.prefix.as_deref()).await
}
