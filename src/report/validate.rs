// Copyright (C) 2026 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.

//! Validates reports and returns errors for policy violations.

use super::Report;
use crate::policy::Severity;
use anyhow::Result;

/// Validate the report.
///
/// Warnings only fail the validation in strict mode.
///
/// # Errors
/// Returns an error if error findings, or in strict mode any findings, are present.
pub fn validate_report(report: &Report, strict: bool) -> Result<()> {
    let failing = |severity: Severity| severity == Severity::Error || strict;

    let mut failures = 0;
    for package in report.packages() {
        let verdict = package.verdict();
        for diagnostic in verdict.diagnostics() {
            if failing(diagnostic.severity()) {
                failures += 1;
                eprintln!(
                    "{}: {}: {}: {}",
                    diagnostic.severity().to_string().to_uppercase(),
                    package.path().display(),
                    verdict.package(),
                    diagnostic.rule()
                );
            }
        }
    }

    if failures > 0 {
        return Err(anyhow::anyhow!(
            "Shared library policy violations found in the report: {failures} finding(s)"
        ));
    }
    Ok(())
}
