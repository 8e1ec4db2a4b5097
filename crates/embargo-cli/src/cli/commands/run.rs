//! `embargo run` - split every sidestream archive of a bucket.

use std::sync::Arc;

use anyhow::Result;
use embargo_core::archive::SplitLimitsOverrides;
use embargo_core::{
    load_config, EmbargoConfig, EmbargoError, EmbargoPolicy, EmbargoRun, FailureMode, RunReport,
    WhitelistSource,
};

use super::stores;
use crate::cli::args::RunArgs;
use crate::exit_codes::{RUN_FAILED, SUCCESS};

pub async fn run(args: RunArgs) -> Result<i32> {
    match execute(args).await {
        Ok(report) => {
            print_summary(&report);
            Ok(if report.is_success() {
                SUCCESS
            } else {
                RUN_FAILED
            })
        }
        Err(e) => Ok(stores::fail(&e)),
    }
}

/// Merge the config file (if any) with command-line overrides.
pub(crate) fn resolve_config(args: RunArgs) -> Result<EmbargoConfig, EmbargoError> {
    let mut cfg = match &args.config {
        Some(path) => load_config(path)?,
        None => EmbargoConfig::default(),
    };

    if let Some(source) = args.source {
        cfg.source = Some(source);
    }
    if let Some(destination) = args.destination {
        cfg.destination = Some(destination);
    }
    if let Some(cutoff) = args.cutoff {
        cfg.cutoff = cutoff;
    }
    if let Some(path) = args.whitelist_file {
        cfg.whitelist = WhitelistSource::Local(path);
    } else if let Some(name) = args.whitelist_object {
        cfg.whitelist = WhitelistSource::Object(name);
    }
    if args.continue_on_error {
        cfg.on_error = FailureMode::Continue;
    }
    if args.max_decode_bytes.is_some() {
        cfg.limits = SplitLimitsOverrides {
            max_decode_bytes: args.max_decode_bytes,
        };
    }

    // Flags may have replaced a valid cutoff with a bad one.
    cfg.cutoff()?;
    Ok(cfg)
}

async fn execute(args: RunArgs) -> Result<RunReport, EmbargoError> {
    let cfg = resolve_config(args)?;

    let source = stores::open(cfg.source_url()?)?;
    let destination = stores::open(cfg.destination_url()?)?;

    let whitelist = cfg.whitelist.load(source.as_ref()).await?;
    let policy = EmbargoPolicy::new(cfg.cutoff()?, whitelist);

    EmbargoRun::new(source, destination, Arc::new(policy))
        .with_filter(cfg.filter())
        .with_failure_mode(cfg.on_error)
        .with_limits(cfg.limits())
        .run()
        .await
}

fn print_summary(report: &RunReport) {
    for outcome in &report.processed {
        println!(
            "{}: {} public, {} private",
            outcome.archive, outcome.public_entries, outcome.private_entries
        );
    }
    for failure in &report.failures {
        eprintln!("FAILED {}: {}", failure.archive, failure.error);
    }
    eprintln!(
        "{} processed, {} skipped, {} failed",
        report.processed.len(),
        report.skipped.len(),
        report.failures.len()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_flags_override_config() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "source: memory://a\ndestination: memory://b\ncutoff: \"20170101\"\non_error: fail_fast"
        )
        .unwrap();

        let cfg = resolve_config(RunArgs {
            config: Some(file.path().to_path_buf()),
            destination: Some("memory://c".into()),
            whitelist_object: Some("sidestream/whitelist".into()),
            continue_on_error: true,
            ..RunArgs::default()
        })
        .unwrap();

        assert_eq!(cfg.source.as_deref(), Some("memory://a"));
        assert_eq!(cfg.destination.as_deref(), Some("memory://c"));
        assert_eq!(cfg.cutoff, "20170101");
        assert_eq!(
            cfg.whitelist,
            WhitelistSource::Object("sidestream/whitelist".into())
        );
        assert_eq!(cfg.on_error, FailureMode::Continue);
    }

    #[test]
    fn test_bad_cutoff_flag_is_config_error() {
        let err = resolve_config(RunArgs {
            cutoff: Some("2016-03-05".into()),
            ..RunArgs::default()
        })
        .unwrap_err();
        assert!(matches!(err, EmbargoError::Config(_)));
        assert_eq!(err.exit_code(), crate::exit_codes::CONFIG_ERROR);
    }
}
