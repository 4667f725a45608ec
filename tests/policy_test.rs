// Copyright (C) 2026 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.
use shlib_policy::package::{FileKind, ManifestPackage};
use shlib_policy::policy::{
    library_name, Classification, ExemptReason, LegacyExceptions, LibraryPolicy, Rule, Severity,
};

fn strict_policy() -> LibraryPolicy {
    LibraryPolicy::new(LegacyExceptions::empty())
}

fn single_library(name: &str) -> ManifestPackage {
    ManifestPackage::new(name)
        .with_file("/usr/lib", FileKind::Directory)
        .with_shared_object("/usr/lib/libexample.so.1", Some("libexample.so.1"))
}

#[test]
fn test_library_name_derivation() {
    assert_eq!(library_name("libfoo2.so.3"), "libfoo2-3");
    assert_eq!(library_name("libbar.so.0"), "libbar0");
    assert_eq!(library_name("libbaz.so"), "libbaz");
    assert_eq!(library_name("libfoo.so.1.2"), "libfoo1_2");

    for soname in ["libfoo2.so.3", "libbar.so.0", "libbaz.so", "libfoo.so.1.2"] {
        let derived = library_name(soname);
        assert_eq!(library_name(&derived), derived, "{soname}");
    }
}

#[test]
fn test_matching_library_package_is_clean() {
    let verdict = strict_policy().check(&single_library("libexample1"));
    assert_eq!(verdict.classification(), Classification::Library);
    assert!(verdict.is_clean());
}

#[test]
fn test_misnamed_library_package() {
    let verdict = strict_policy().check(&single_library("mypkg"));
    assert_eq!(verdict.diagnostics().len(), 1);
    let diagnostic = &verdict.diagnostics()[0];
    assert_eq!(diagnostic.rule(), Rule::NameError);
    assert_eq!(diagnostic.severity(), Severity::Error);
    assert_eq!(diagnostic.detail(), Some("libexample1"));
}

#[test]
fn test_private_library_is_exempt() {
    let package = ManifestPackage::new("program1")
        .with_regular_file("/usr/bin/program")
        .with_shared_object("/usr/lib/libprivate.so.1", Some("libprivate.so.1"))
        .with_requires(["libprivate.so.1()(64bit)", "libc.so.6()(64bit)"]);
    let verdict = strict_policy().check(&package);
    assert_eq!(
        verdict.classification(),
        Classification::Exempt(ExemptReason::PrivateLibraries)
    );
    assert!(verdict.is_clean());
}

#[test]
fn test_libraries_outside_standard_directories_are_exempt() {
    let package = ManifestPackage::new("mypkg")
        .with_shared_object("/opt/mypkg/lib/libexample.so.1", Some("libexample.so.1"))
        .with_regular_file("/usr/include/example.h");
    let verdict = strict_policy().check(&package);
    assert_eq!(
        verdict.classification(),
        Classification::Exempt(ExemptReason::NonStandardDirectories)
    );
    assert!(verdict.is_clean());
}

#[test]
fn test_multi_library_package_needs_version_suffix() {
    let package = ManifestPackage::new("libmulti")
        .with_shared_object("/usr/lib/libfoo.so.1", Some("libfoo.so.1"))
        .with_shared_object("/usr/lib/libbar.so.2", Some("libbar.so.2"));
    let verdict = strict_policy().check(&package);
    assert_eq!(verdict.diagnostics().len(), 1);
    assert!(verdict.has(Rule::MissingSuffix, None));

    let package = ManifestPackage::new("libmulti2")
        .with_shared_object("/usr/lib/libfoo.so.1", Some("libfoo.so.1"))
        .with_shared_object("/usr/lib/libbar.so.2", Some("libbar.so.2"));
    assert!(strict_policy().check(&package).is_clean());
}

#[test]
fn test_header_in_library_package() {
    let package = single_library("libexample1").with_regular_file("/usr/include/example.h");
    let verdict = strict_policy().check(&package);
    assert_eq!(verdict.diagnostics().len(), 1);
    assert!(verdict.has(Rule::DevelFile, Some("/usr/include/example.h")));
}

#[test]
fn test_link_time_artifacts_in_library_package() {
    let package = single_library("libexample1")
        .with_file(
            "/usr/lib/libexample.so",
            FileKind::Symlink("/usr/lib/libexample.so.1".into()),
        )
        .with_regular_file("/usr/lib/libexample.a")
        .with_regular_file("/usr/lib/libexample.la")
        .with_regular_file("/usr/lib/libexample.so.1.debug");
    let verdict = strict_policy().check(&package);
    assert_eq!(verdict.diagnostics().len(), 3);
    assert!(verdict.has(Rule::DevelFile, Some("/usr/lib/libexample.so")));
    assert!(verdict.has(Rule::DevelFile, Some("/usr/lib/libexample.a")));
    assert!(verdict.has(Rule::DevelFile, Some("/usr/lib/libexample.la")));
}

#[test]
fn test_nonversioned_directories() {
    let package = single_library("libexample1")
        .with_file("/usr/lib/unstable", FileKind::Directory)
        .with_file("/usr/lib/unstable/plugins", FileKind::Directory)
        .with_file("/usr/lib/2", FileKind::Directory)
        .with_file("/usr/share/doc/packages/libexample1", FileKind::Directory)
        .with_file("/usr/share/doc/packages/example", FileKind::Directory);
    let verdict = strict_policy().check(&package);
    let dirs: Vec<_> = verdict
        .diagnostics()
        .iter()
        .filter(|d| d.rule() == Rule::NonversionedDir)
        .filter_map(|d| d.detail())
        .collect();
    assert_eq!(
        dirs,
        ["/usr/lib/unstable", "/usr/share/doc/packages/example"]
    );
    assert_eq!(verdict.diagnostics().len(), 2);
}

#[test]
fn test_legacy_exception_is_a_warning() {
    let package = ManifestPackage::new("acl")
        .with_shared_object("/lib64/libacl.so.1.1.0", Some("libacl.so.1"));

    let verdict = LibraryPolicy::default().check(&package);
    assert_eq!(verdict.diagnostics().len(), 1);
    assert!(verdict.has(Rule::LegacyNameError, Some("libacl1")));
    assert!(!verdict.has(Rule::NameError, Some("libacl1")));
    assert_eq!(verdict.count(Severity::Warning), 1);
    assert_eq!(verdict.count(Severity::Error), 0);

    let verdict = strict_policy().check(&package);
    assert!(verdict.has(Rule::NameError, Some("libacl1")));
    assert_eq!(verdict.count(Severity::Warning), 0);
}

#[test]
fn test_unreadable_shared_objects_are_skipped() {
    // A file without manifest SONAME entry cannot be inspected.
    let package = single_library("libexample1").with_regular_file("/usr/lib/libbroken.so.2");
    let verdict = strict_policy().check(&package);
    assert_eq!(verdict.classification(), Classification::Library);
    assert!(verdict.is_clean());

    let package = ManifestPackage::new("mypkg")
        .with_shared_object("/usr/lib/libnosoname.so.1", None);
    let verdict = strict_policy().check(&package);
    assert_eq!(
        verdict.classification(),
        Classification::Exempt(ExemptReason::NoSharedObjects)
    );
}

#[test]
fn test_policy_is_shared_across_threads() {
    let policy = LibraryPolicy::default();
    let names = ["libexample1", "mypkg", "libexample-devel"];
    let verdicts: Vec<_> = std::thread::scope(|scope| {
        let handles: Vec<_> = names
            .iter()
            .map(|name| {
                let policy = &policy;
                scope.spawn(move || policy.check(&single_library(name)))
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    assert!(verdicts[0].is_clean());
    assert!(verdicts[1].has(Rule::NameError, Some("libexample1")));
    assert_eq!(
        verdicts[2].classification(),
        Classification::Exempt(ExemptReason::NotApplicable)
    );
}

#[test]
fn test_documentation_layouts() {
    let package = single_library("libexample1")
        .with_file("/usr/share/doc", FileKind::Directory)
        .with_file("/usr/share/doc/libexample1", FileKind::Directory);
    let verdict = strict_policy().check(&package);
    assert_eq!(verdict.diagnostics().len(), 1);
    assert!(verdict.has(Rule::NonversionedDir, Some("/usr/share/doc")));

    // The documentation root itself belongs to the base system.
    let package = single_library("libexample1")
        .with_file("/usr/share/doc/packages/libexample1", FileKind::Directory);
    assert!(strict_policy().check(&package).is_clean());
}
