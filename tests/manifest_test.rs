// Copyright (C) 2026 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.
use std::fs;
use std::path::Path;
use tempfile::TempDir;

use shlib_policy::package::ManifestPackage;
use shlib_policy::policy::{LegacyExceptions, LibraryPolicy, Rule};
use shlib_policy::report::{validate_report, PackageReport, Report};

fn write_manifest(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).expect("Should write manifest");
    path
}

#[test]
fn test_manifest_report() {
    let dir = TempDir::new().unwrap();
    let good = write_manifest(
        dir.path(),
        "libexample1.json",
        r#"{
            "name": "libexample1",
            "requires": ["libc.so.6()(64bit)"],
            "files": {
                "/usr/lib64": { "kind": "directory" },
                "/usr/lib64/libexample.so.1.0.0": { "kind": "regular", "mode": 33261, "size": 16384 },
                "/usr/lib64/libexample.so.1": { "kind": { "symlink": "/usr/lib64/libexample.so.1.0.0" } }
            },
            "sonames": { "/usr/lib64/libexample.so.1.0.0": "libexample.so.1" }
        }"#,
    );
    let bad = write_manifest(
        dir.path(),
        "libexample.json",
        r#"{
            "name": "libexample",
            "files": {
                "/usr/lib64/libfoo.so.1": { "kind": "regular" },
                "/usr/lib64/libbar.so.2": { "kind": "regular" },
                "/usr/lib64/libbar.a": { "kind": "regular" },
                "/usr/share/example": { "kind": "directory" }
            },
            "sonames": {
                "/usr/lib64/libfoo.so.1": "libfoo.so.1",
                "/usr/lib64/libbar.so.2": "libbar.so.2"
            }
        }"#,
    );

    let policy = LibraryPolicy::new(LegacyExceptions::empty());
    let packages: Vec<_> = [good, bad]
        .into_iter()
        .map(|path| {
            let package = ManifestPackage::from_file(&path).expect("Should load manifest");
            PackageReport::new(path, policy.check(&package))
        })
        .collect();
    let report = Report::new(packages);

    // Ordered by path: libexample.json < libexample1.json
    let bad_verdict = report.packages()[0].verdict();
    assert_eq!(bad_verdict.package(), "libexample");
    assert!(bad_verdict.has(Rule::MissingSuffix, None));
    assert!(bad_verdict.has(Rule::DevelFile, Some("/usr/lib64/libbar.a")));
    assert!(bad_verdict.has(Rule::NonversionedDir, Some("/usr/share/example")));
    assert_eq!(bad_verdict.diagnostics().len(), 3);
    assert!(report.packages()[1].verdict().is_clean());

    assert!(validate_report(&report, false).is_err());

    let report_path = dir.path().join("report.json");
    serde_json::to_writer_pretty(fs::File::create(&report_path).unwrap(), &report).unwrap();
    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&report_path).unwrap()).unwrap();
    assert_eq!(json["totals"]["packages"], 2);
    assert_eq!(json["totals"]["errors"], 3);
    assert_eq!(json["totals"]["rules"]["shlib-policy-devel-file"], 1);
    assert_eq!(json["packages"][1]["classification"]["status"], "library");
}

#[test]
fn test_legacy_exceptions_file() {
    let dir = TempDir::new().unwrap();
    let exceptions = write_manifest(dir.path(), "exceptions.txt", "# site list\nlibexample1\n");
    let manifest = write_manifest(
        dir.path(),
        "example.json",
        r#"{
            "name": "example",
            "files": { "/usr/lib/libexample.so.1": { "kind": "regular" } },
            "sonames": { "/usr/lib/libexample.so.1": "libexample.so.1" }
        }"#,
    );

    let policy = LibraryPolicy::new(
        LegacyExceptions::empty()
            .extend_from_file(&exceptions)
            .expect("Should read exceptions"),
    );
    let package = ManifestPackage::from_file(&manifest).unwrap();
    let report = Report::new(vec![PackageReport::new(manifest, policy.check(&package))]);

    assert!(report.packages()[0]
        .verdict()
        .has(Rule::LegacyNameError, Some("libexample1")));
    assert!(validate_report(&report, false).is_ok());
    assert!(validate_report(&report, true).is_err());
}
