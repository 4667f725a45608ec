// Copyright (C) 2026 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.

//! Checks that a library package is named after what it ships.

use super::diagnostic::{Rule, Verdict};
use super::exceptions::LegacyExceptions;
use super::inventory::LibraryInventory;
use super::soname::library_name;

pub(crate) fn evaluate(
    package_name: &str,
    inventory: &LibraryInventory,
    exceptions: &LegacyExceptions,
    verdict: &mut Verdict,
) {
    let mut libs = inventory.libs().iter();
    match (libs.next(), libs.next()) {
        (Some(soname), None) => {
            let expected = library_name(soname);
            if expected.starts_with("lib") && expected != package_name {
                let rule = if exceptions.contains(&expected) {
                    Rule::LegacyNameError
                } else {
                    Rule::NameError
                };
                verdict.report(rule, Some(expected));
            }
        }
        (Some(_), Some(_)) => {
            // Several libraries: the name must carry a version to allow parallel installs.
            if !package_name.ends_with(|c: char| c.is_ascii_digit()) {
                verdict.report(Rule::MissingSuffix, None);
            }
        }
        (None, _) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::package::ManifestPackage;
    use crate::policy::classify::Classification;
    use crate::policy::PackageView;

    fn naming_verdict(package: &ManifestPackage, exceptions: &LegacyExceptions) -> Verdict {
        let inventory = LibraryInventory::build(package);
        let mut verdict = Verdict::new(package.name(), Classification::Library);
        evaluate(package.name(), &inventory, exceptions, &mut verdict);
        verdict
    }

    fn single_library(name: &str, soname: &str) -> ManifestPackage {
        ManifestPackage::new(name).with_shared_object(&format!("/usr/lib/{soname}"), Some(soname))
    }

    #[test]
    fn test_matching_name() {
        let verdict = naming_verdict(
            &single_library("libexample1", "libexample.so.1"),
            &LegacyExceptions::empty(),
        );
        assert!(verdict.is_clean());
    }

    #[test]
    fn test_mismatching_name() {
        let verdict = naming_verdict(
            &single_library("mypkg", "libexample.so.1"),
            &LegacyExceptions::empty(),
        );
        assert_eq!(verdict.diagnostics().len(), 1);
        assert!(verdict.has(Rule::NameError, Some("libexample1")));
    }

    #[test]
    fn test_legacy_exception_downgrades_to_warning() {
        let exceptions = LegacyExceptions::from_names(["libexample1"]);
        let verdict = naming_verdict(&single_library("mypkg", "libexample.so.1"), &exceptions);
        assert_eq!(verdict.diagnostics().len(), 1);
        assert!(verdict.has(Rule::LegacyNameError, Some("libexample1")));
        assert!(!verdict.has(Rule::NameError, Some("libexample1")));
    }

    #[test]
    fn test_derived_name_without_lib_prefix_is_ignored() {
        let verdict = naming_verdict(
            &single_library("python-foo", "foo.so.1"),
            &LegacyExceptions::empty(),
        );
        assert!(verdict.is_clean());
    }

    #[test]
    fn test_digit_base_name() {
        let verdict = naming_verdict(
            &single_library("libfoo2-3", "libfoo2.so.3"),
            &LegacyExceptions::empty(),
        );
        assert!(verdict.is_clean());

        let verdict = naming_verdict(
            &single_library("libfoo23", "libfoo2.so.3"),
            &LegacyExceptions::empty(),
        );
        assert!(verdict.has(Rule::NameError, Some("libfoo2-3")));
    }

    #[test]
    fn test_multiple_libraries_need_suffix() {
        let package = ManifestPackage::new("libmulti")
            .with_shared_object("/usr/lib/libone.so.1", Some("libone.so.1"))
            .with_shared_object("/usr/lib/libtwo.so.1", Some("libtwo.so.1"));
        let verdict = naming_verdict(&package, &LegacyExceptions::empty());
        assert_eq!(verdict.diagnostics().len(), 1);
        assert!(verdict.has(Rule::MissingSuffix, None));

        let package = ManifestPackage::new("libmulti2")
            .with_shared_object("/usr/lib/libone.so.1", Some("libone.so.1"))
            .with_shared_object("/usr/lib/libtwo.so.1", Some("libtwo.so.1"));
        assert!(naming_verdict(&package, &LegacyExceptions::empty()).is_clean());
    }
}
