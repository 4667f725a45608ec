// Copyright (C) 2026 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.

//! Statistics over the verdicts of a report.

use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;
use std::ops::Add;

use super::PackageReport;
use crate::policy::{Rule, Severity};

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct ReportTotals {
    pub(crate) packages: usize,
    pub(crate) library_packages: usize,
    pub(crate) exempt_packages: usize,
    pub(crate) errors: usize,
    pub(crate) warnings: usize,
    pub(crate) rules: BTreeMap<Rule, usize>,
}

impl ReportTotals {
    pub(crate) fn calculate(packages: &[PackageReport]) -> Self {
        packages
            .par_iter()
            .fold(ReportTotals::default, |mut totals, package| {
                let verdict = package.verdict();
                totals.packages += 1;
                if verdict.classification().is_library() {
                    totals.library_packages += 1;
                } else {
                    totals.exempt_packages += 1;
                }
                totals.errors += verdict.count(Severity::Error);
                totals.warnings += verdict.count(Severity::Warning);
                for diagnostic in verdict.diagnostics() {
                    *totals.rules.entry(diagnostic.rule()).or_default() += 1;
                }
                totals
            })
            .reduce(ReportTotals::default, |a, b| a + b)
    }
}

impl Add for ReportTotals {
    type Output = Self;

    fn add(mut self, other: Self) -> Self {
        for (rule, count) in other.rules {
            *self.rules.entry(rule).or_default() += count;
        }
        Self {
            packages: self.packages + other.packages,
            library_packages: self.library_packages + other.library_packages,
            exempt_packages: self.exempt_packages + other.exempt_packages,
            errors: self.errors + other.errors,
            warnings: self.warnings + other.warnings,
            rules: self.rules,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::package::{FileKind, ManifestPackage};
    use crate::policy::{LegacyExceptions, LibraryPolicy};
    use std::path::PathBuf;

    #[test]
    fn test_calculate() {
        let policy = LibraryPolicy::new(LegacyExceptions::from_names(["libacl1"]));
        let packages = vec![
            ManifestPackage::new("acl")
                .with_shared_object("/lib64/libacl.so.1", Some("libacl.so.1")),
            ManifestPackage::new("mypkg")
                .with_file("/usr/lib/unstable", FileKind::Directory)
                .with_shared_object("/usr/lib/libexample.so.1", Some("libexample.so.1"))
                .with_regular_file("/usr/include/example.h"),
            ManifestPackage::new("tool").with_regular_file("/usr/bin/tool"),
        ];
        let reports: Vec<_> = packages
            .iter()
            .map(|p| PackageReport::new(PathBuf::from("pkg"), policy.check(p)))
            .collect();

        let totals = ReportTotals::calculate(&reports);
        assert_eq!(totals.packages, 3);
        assert_eq!(totals.library_packages, 2);
        assert_eq!(totals.exempt_packages, 1);
        assert_eq!(totals.errors, 3);
        assert_eq!(totals.warnings, 1);
        assert_eq!(totals.rules.get(&Rule::LegacyNameError), Some(&1));
        assert_eq!(totals.rules.get(&Rule::NameError), Some(&1));
        assert_eq!(totals.rules.get(&Rule::DevelFile), Some(&1));
        assert_eq!(totals.rules.get(&Rule::NonversionedDir), Some(&1));
        assert_eq!(totals.rules.get(&Rule::MissingSuffix), None);
    }

    #[test]
    fn test_empty() {
        assert_eq!(ReportTotals::calculate(&[]), ReportTotals::default());
    }
}
