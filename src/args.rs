// Copyright (C) 2026 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.
use clap::Parser;
use shlib_policy::policy::Rule;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "shlib_policy")]
#[command(version)]
#[command(about = "Checks deb/rpm packages against the shared library packaging policy")]
pub(crate) struct Args {
    /// Package files (deb or rpm) or JSON package manifests to check.
    #[arg(required_unless_present = "explain")]
    pub packages: Vec<PathBuf>,

    /// Path to the file to write the check results in JSON format.
    #[arg(long)]
    pub report: Option<PathBuf>,

    #[arg(
        long,
        long_help = "Path to a text file of additional legacy library names.\n\
                Each line contains an exact derived library name, e.g. libfoo1.\n\
                Empty lines and lines starting with # are ignored."
    )]
    pub legacy_exceptions: Option<PathBuf>,

    /// Do not use the built-in legacy exception list.
    #[arg(long)]
    pub no_builtin_exceptions: bool,

    /// Fail on warnings as well as errors.
    #[arg(long)]
    pub strict: bool,

    /// Print the description of a rule and exit.
    #[arg(long, value_name = "RULE")]
    pub explain: Option<Rule>,

    /// Log filter used when RUST_LOG is not set.
    #[arg(long, value_name = "FILTER", default_value = "warn")]
    pub log_level: String,
}
