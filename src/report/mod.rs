// Copyright (C) 2026 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.

//! Report struct and public API for collecting policy verdicts.

mod console;
mod totals;
mod utils;
mod validate;

pub use console::{explain_rule, summarize_report};
pub use validate::validate_report;

use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::policy::Verdict;
use totals::ReportTotals;

/// The verdict for one package file.
#[derive(Debug, Clone, Serialize)]
pub struct PackageReport {
    path: PathBuf,
    #[serde(flatten)]
    verdict: Verdict,
}

impl PackageReport {
    #[must_use]
    pub fn new(path: PathBuf, verdict: Verdict) -> Self {
        Self { path, verdict }
    }

    /// Path of the checked package file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn verdict(&self) -> &Verdict {
        &self.verdict
    }
}

#[derive(Debug, Serialize)]
pub struct Report {
    totals: ReportTotals,
    packages: Vec<PackageReport>,
}

impl Report {
    /// Create a new report. Packages are ordered by path.
    #[must_use]
    pub fn new(mut packages: Vec<PackageReport>) -> Self {
        packages.sort_by(|a, b| a.path.cmp(&b.path));
        Self {
            totals: ReportTotals::calculate(&packages),
            packages,
        }
    }

    #[must_use]
    pub fn packages(&self) -> &[PackageReport] {
        &self.packages
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::package::ManifestPackage;
    use crate::policy::{LegacyExceptions, LibraryPolicy};

    #[test]
    fn test_report_json() {
        let policy = LibraryPolicy::new(LegacyExceptions::empty());
        let package = ManifestPackage::new("mypkg")
            .with_shared_object("/usr/lib/libexample.so.1", Some("libexample.so.1"));
        let report = Report::new(vec![
            PackageReport::new(PathBuf::from("b.json"), policy.check(&package)),
            PackageReport::new(
                PathBuf::from("a.json"),
                policy.check(&ManifestPackage::new("tool")),
            ),
        ]);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["totals"]["packages"], 2);
        assert_eq!(json["totals"]["errors"], 1);
        assert_eq!(json["packages"][0]["path"], "a.json");
        assert_eq!(json["packages"][0]["package"], "tool");
        assert_eq!(json["packages"][0]["classification"]["status"], "exempt");
        assert_eq!(json["packages"][1]["package"], "mypkg");
        assert_eq!(
            json["packages"][1]["diagnostics"][0]["rule"],
            "shlib-policy-name-error"
        );
        assert_eq!(json["packages"][1]["diagnostics"][0]["detail"], "libexample1");
    }
}
