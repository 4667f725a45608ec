// Copyright (C) 2026 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.
mod args;

use anyhow::{Context, Result};
use clap::Parser;
use rayon::prelude::*;
use std::fs::File;
use std::path::Path;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use args::Args;
use shlib_policy::package::{ManifestPackage, Package};
use shlib_policy::policy::{LegacyExceptions, LibraryPolicy, Verdict};
use shlib_policy::report::{
    explain_rule, summarize_report, validate_report, PackageReport, Report,
};

/// Extension of package manifests.
const MANIFEST_EXTENSION: &str = "json";

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level);

    if let Some(rule) = args.explain {
        explain_rule(rule);
        return Ok(());
    }

    let policy = LibraryPolicy::new(create_exceptions(&args)?);
    let packages = args
        .packages
        .par_iter()
        .map(|path| {
            check_package(&policy, path).map(|verdict| PackageReport::new(path.clone(), verdict))
        })
        .collect::<Result<Vec<_>>>()?;

    let report = Report::new(packages);
    if let Some(dest) = &args.report {
        write_report_to_file(&report, dest)?;
    }
    summarize_report(&report);
    validate_report(&report, args.strict)
}

fn init_logging(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn create_exceptions(args: &Args) -> Result<LegacyExceptions> {
    let exceptions = if args.no_builtin_exceptions {
        LegacyExceptions::empty()
    } else {
        LegacyExceptions::builtin()
    };
    match &args.legacy_exceptions {
        Some(path) => exceptions
            .extend_from_file(path)
            .with_context(|| "Failed to read legacy exceptions file"),
        None => Ok(exceptions),
    }
}

/// Load a package file or manifest and check it.
///
/// # Errors
/// Returns an error if the package cannot be extracted or the manifest cannot be read.
fn check_package(policy: &LibraryPolicy, path: &Path) -> Result<Verdict> {
    if path.extension().and_then(|ext| ext.to_str()) == Some(MANIFEST_EXTENSION) {
        let package = ManifestPackage::from_file(path)
            .with_context(|| format!("Failed to load manifest: {}", path.display()))?;
        return Ok(policy.check(&package));
    }

    info!(package = %path.display(), "Extracting package");
    let package = Package::new(path.to_path_buf())
        .with_context(|| format!("Failed to extract package: {}", path.display()))?;
    let verdict = policy.check(&package);
    if let Err(e) = package.close() {
        warn!(package = %path.display(), error = %e, "Failed to remove extraction directory");
    }
    Ok(verdict)
}

/// Write the report to a file.
///
/// # Errors
/// Returns an error if the report cannot be serialized to JSON or if the file cannot be created.
fn write_report_to_file(report: &Report, dest: &Path) -> Result<()> {
    info!(file = %dest.display(), "Writing report to file");
    let file = File::create(dest)
        .with_context(|| format!("Failed to create JSON output file: {}", dest.display()))?;
    serde_json::to_writer_pretty(file, report)
        .with_context(|| format!("Failed to serialize report to JSON: {}", dest.display()))?;
    Ok(())
}
