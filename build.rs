// Copyright (C) 2026 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.

//! Build script to generate test fixtures for the `shlib_policy` crate.
//!
//! This script attempts to generate all required test fixtures including:
//! - Simple non-ELF and broken ELF test files (always generated)
//! - A shared library and an executable with a SONAME (requires gcc)
//! - DEB packages (requires gcc + fakeroot + dpkg-deb)
//! - RPM packages (requires gcc + rpmbuild)
//!
//! If required tools are not available, the script will skip those fixtures
//! and emit warnings. Tests will gracefully skip when fixtures are missing.

use std::env;
use std::fs;
use std::os::unix::fs::symlink;
use std::path::{Path, PathBuf};
use std::process::Command;

/// File name of the fixture library.
const LIBRARY_FILE: &str = "libfixture.so.1.0.0";
const LIBRARY_SONAME: &str = "libfixture.so.1";

/// Check if a command is available in PATH.
fn command_exists(cmd: &str) -> bool {
    Command::new("which")
        .arg(cmd)
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// Available tools for fixture generation.
#[allow(clippy::struct_excessive_bools)]
struct AvailableTools {
    gcc: bool,
    fakeroot: bool,
    dpkg_deb: bool,
    rpmbuild: bool,
    rpmdb: bool,
}

impl AvailableTools {
    fn detect() -> Self {
        Self {
            gcc: command_exists("gcc"),
            fakeroot: command_exists("fakeroot"),
            dpkg_deb: command_exists("dpkg-deb"),
            rpmbuild: command_exists("rpmbuild"),
            rpmdb: command_exists("rpmdb"),
        }
    }

    fn can_build_deb(&self) -> bool {
        self.gcc && self.fakeroot && self.dpkg_deb
    }

    fn can_build_rpm(&self) -> bool {
        self.gcc && self.rpmbuild && self.rpmdb
    }

    fn report_missing(&self) {
        let missing: Vec<&str> = [
            ("gcc", self.gcc),
            ("fakeroot", self.fakeroot),
            ("dpkg-deb", self.dpkg_deb),
            ("rpmbuild", self.rpmbuild),
            ("rpmdb", self.rpmdb),
        ]
        .into_iter()
        .filter(|(_, available)| !available)
        .map(|(tool, _)| tool)
        .collect();

        if !missing.is_empty() {
            println!(
                "cargo:warning=Some fixture generation tools are missing: {}. Some test fixtures will not be generated.",
                missing.join(", ")
            );
        }
    }
}

/// Files of a fixture package besides the shared library in `/usr/lib`.
struct FixturePackage {
    name: &'static str,
    /// Symlinks in `/usr/lib` pointing to the library.
    links: &'static [&'static str],
    /// Additional regular files and their content.
    extra_files: &'static [(&'static str, &'static str)],
}

/// A package following the shared library policy.
const GOOD_PACKAGE: FixturePackage = FixturePackage {
    name: "libfixture1",
    links: &[LIBRARY_SONAME],
    extra_files: &[],
};

/// A package breaking the naming, content and directory rules.
const BAD_PACKAGE: FixturePackage = FixturePackage {
    name: "fixture-tools",
    links: &[LIBRARY_SONAME, "libfixture.so"],
    extra_files: &[
        ("usr/include/fixture.h", "void fixture_hello(void);\n"),
        ("usr/share/fixture/README", "Fixture data\n"),
    ],
};

fn main() {
    let manifest_dir = env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR not set");
    let fixtures_dir = Path::new(&manifest_dir).join("fixtures");

    // Create fixtures directory if it doesn't exist
    fs::create_dir_all(&fixtures_dir).expect("Failed to create fixtures directory");

    // Detect available tools
    let tools = AvailableTools::detect();
    tools.report_missing();

    // Generate simple test fixtures (no external tools required)
    generate_simple_fixtures(&fixtures_dir);

    // Generate an executable carrying a SONAME (requires gcc)
    if tools.gcc {
        generate_soname_executable(&fixtures_dir);
    }

    // Generate the shared library (requires gcc)
    let library = if tools.gcc {
        generate_library(&fixtures_dir)
    } else {
        None
    };

    if let Some(library) = library {
        if tools.can_build_deb() {
            generate_deb_package(&fixtures_dir, &library, &GOOD_PACKAGE);
            generate_deb_package(&fixtures_dir, &library, &BAD_PACKAGE);
        }
        if tools.can_build_rpm() {
            generate_rpm_package(&fixtures_dir, &library, &GOOD_PACKAGE);
        }
    }

    // Re-run build script if fixtures directory changes
    println!("cargo:rerun-if-changed=fixtures/");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Generate simple test fixtures that don't require external tools.
fn generate_simple_fixtures(fixtures_dir: &Path) {
    // File too small to be an ELF (< 64 bytes)
    let too_small_path = fixtures_dir.join("test-elf-file-too-small");
    if !too_small_path.exists() {
        fs::write(&too_small_path, "not an elf file")
            .expect("Failed to write test-elf-file-too-small");
    }

    // File that's large enough but not an ELF (wrong magic bytes)
    let not_elf_path = fixtures_dir.join("test-elf-not-elf-file");
    if !not_elf_path.exists() {
        let content = "This is not an ELF file. It's just a text file for testing. \
                       Adding more content to ensure it's longer than 64 bytes which is \
                       the minimum size for a valid ELF file header.";
        fs::write(&not_elf_path, content).expect("Failed to write test-elf-not-elf-file");
    }

    // ELF magic followed by garbage: passes the magic check, fails parsing
    let truncated_path = fixtures_dir.join("test-elf-truncated.so.1");
    if !truncated_path.exists() {
        let mut content = b"\x7fELF".to_vec();
        content.resize(128, 0xFF);
        fs::write(&truncated_path, content).expect("Failed to write test-elf-truncated.so.1");
    }
}

/// Compile a non-PIE executable with a `DT_SONAME` entry.
fn generate_soname_executable(fixtures_dir: &Path) {
    let dest_path = fixtures_dir.join("test-elf-executable-soname.so.1");
    if dest_path.exists() {
        return;
    }

    let temp_dir = env::temp_dir().join("shlib_policy_build_exe");
    let _ = fs::remove_dir_all(&temp_dir);
    fs::create_dir_all(&temp_dir).expect("Failed to create temp directory");

    let source_path = temp_dir.join("tool.c");
    let source_code = r#"#include <stdio.h>
int main() {
    printf("Test binary\n");
    return 0;
}
"#;
    fs::write(&source_path, source_code).expect("Failed to write tool.c");

    let status = Command::new("gcc")
        .arg("-no-pie")
        .arg("-Wl,-soname,libtool.so.1")
        .arg("-o")
        .arg(&dest_path)
        .arg(&source_path)
        .status();

    let _ = fs::remove_dir_all(&temp_dir);
    if status.map(|s| !s.success()).unwrap_or(true) {
        println!("cargo:warning=Failed to compile executable with SONAME, skipping fixture");
        let _ = fs::remove_file(&dest_path);
    }
}

/// Compile the fixture shared library. Returns its path on success.
fn generate_library(fixtures_dir: &Path) -> Option<PathBuf> {
    let library_path = fixtures_dir.join(LIBRARY_FILE);
    if library_path.exists() {
        return Some(library_path);
    }

    let temp_dir = env::temp_dir().join("shlib_policy_build");
    let _ = fs::remove_dir_all(&temp_dir);
    fs::create_dir_all(&temp_dir).expect("Failed to create temp directory");

    let source_path = temp_dir.join("fixture.c");
    let source_code = r#"#include <stdio.h>

void fixture_hello(void) {
    printf("Hello from shared library!\n");
}
"#;
    fs::write(&source_path, source_code).expect("Failed to write fixture.c");

    let status = Command::new("gcc")
        .arg("-shared")
        .arg("-fPIC")
        .arg(format!("-Wl,-soname,{LIBRARY_SONAME}"))
        .arg("-o")
        .arg(&library_path)
        .arg(&source_path)
        .status();

    let _ = fs::remove_dir_all(&temp_dir);
    if status.map(|s| s.success()).unwrap_or(false) {
        Some(library_path)
    } else {
        println!("cargo:warning=Failed to compile {LIBRARY_FILE}, skipping package fixtures");
        let _ = fs::remove_file(&library_path);
        None
    }
}

/// Lay out the package files below `root`.
fn populate_root(root: &Path, library: &Path, package: &FixturePackage) {
    let lib_dir = root.join("usr/lib");
    fs::create_dir_all(&lib_dir).expect("Failed to create lib directory");
    fs::copy(library, lib_dir.join(LIBRARY_FILE)).expect("Failed to copy library");
    for link in package.links {
        symlink(LIBRARY_FILE, lib_dir.join(link)).expect("Failed to create library symlink");
    }
    for (path, content) in package.extra_files {
        let dest = root.join(path);
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent).expect("Failed to create package directory");
        }
        fs::write(dest, content).expect("Failed to write package file");
    }
}

/// Generate a DEB package.
fn generate_deb_package(fixtures_dir: &Path, library: &Path, package: &FixturePackage) {
    let deb_file = fixtures_dir.join(format!("{}.deb", package.name));
    if deb_file.exists() {
        return; // Skip if already exists
    }

    let temp_dir = env::temp_dir().join(format!("shlib_policy_deb_{}", package.name));
    let _ = fs::remove_dir_all(&temp_dir);
    let package_dir = temp_dir.join(package.name);
    let debian_dir = package_dir.join("DEBIAN");
    fs::create_dir_all(&debian_dir).expect("Failed to create DEBIAN directory");

    // Create control file
    let control_content = format!(
        "Package: {}
Version: 1.0.0
Section: libs
Priority: optional
Architecture: amd64
Maintainer: Test <test@example.com>
Description: Test package for shared library policy checks
",
        package.name
    );
    fs::write(debian_dir.join("control"), control_content).expect("Failed to write control file");
    populate_root(&package_dir, library, package);

    // Build DEB package using fakeroot + dpkg-deb
    let status = Command::new("fakeroot")
        .arg("dpkg-deb")
        .arg("--build")
        .arg(&package_dir)
        .arg(&deb_file)
        .output();

    match status {
        Ok(output) if output.status.success() => {}
        Ok(output) => {
            println!(
                "cargo:warning=Failed to build DEB package {}: {}",
                package.name,
                String::from_utf8_lossy(&output.stderr)
            );
            let _ = fs::remove_file(&deb_file);
        }
        Err(e) => println!("cargo:warning=Failed to run dpkg-deb: {e}"),
    }

    // Cleanup
    let _ = fs::remove_dir_all(&temp_dir);
}

/// Generate an RPM package.
fn generate_rpm_package(fixtures_dir: &Path, library: &Path, package: &FixturePackage) {
    let rpm_file = fixtures_dir.join(format!("{}.rpm", package.name));
    if rpm_file.exists() {
        return; // Skip if already exists
    }

    let temp_dir = env::temp_dir().join(format!("shlib_policy_rpm_{}", package.name));
    let _ = fs::remove_dir_all(&temp_dir);

    let rpmbuild_dir = temp_dir.join("rpmbuild");
    let rpmdb_dir = temp_dir.join("rpmdb");
    let spec_dir = rpmbuild_dir.join("SPECS");
    let package_buildroot = rpmbuild_dir
        .join("BUILDROOT")
        .join(format!("{}-1.0.0-1.x86_64", package.name));

    fs::create_dir_all(&spec_dir).expect("Failed to create SPECS directory");
    fs::create_dir_all(&rpmdb_dir).expect("Failed to create rpmdb directory");
    populate_root(&package_buildroot, library, package);

    // Initialize local RPM database
    let _ = Command::new("rpmdb")
        .arg("--initdb")
        .arg("--dbpath")
        .arg(&rpmdb_dir)
        .status();

    let mut files = vec![format!("/usr/lib/{LIBRARY_FILE}")];
    files.extend(package.links.iter().map(|link| format!("/usr/lib/{link}")));
    files.extend(package.extra_files.iter().map(|(path, _)| format!("/{path}")));

    // Create spec file
    let spec_content = format!(
        "Name:           {name}
Version:        1.0.0
Release:        1
Summary:        Test package for shared library policy checks
License:        MIT
BuildArch:      x86_64
AutoReqProv:    yes

%description
Test package for shared library policy checks

%files
{files}
",
        name = package.name,
        files = files.join("\n")
    );
    let spec_path = spec_dir.join(format!("{}.spec", package.name));
    fs::write(&spec_path, spec_content).expect("Failed to write spec file");

    // Build RPM package
    let status = Command::new("rpmbuild")
        .arg("--dbpath")
        .arg(&rpmdb_dir)
        .arg("--define")
        .arg(format!("_topdir {}", rpmbuild_dir.display()))
        .arg("--define")
        .arg(format!("_rpmdir {}/RPMS", rpmbuild_dir.display()))
        .arg("--define")
        .arg(format!("_srcrpmdir {}/SRPMS", rpmbuild_dir.display()))
        .arg("--buildroot")
        .arg(&package_buildroot)
        .arg("-bb")
        .arg(&spec_path)
        .output();

    match status {
        Ok(output) if output.status.success() => {
            // Move RPM to fixtures directory
            let rpm_output = rpmbuild_dir.join(format!(
                "RPMS/x86_64/{}-1.0.0-1.x86_64.rpm",
                package.name
            ));
            if let Err(e) = fs::copy(&rpm_output, &rpm_file) {
                println!("cargo:warning=Failed to copy RPM to fixtures: {e}");
            }
        }
        Ok(output) => {
            let stderr = String::from_utf8_lossy(&output.stderr);
            // Filter common non-error messages
            if !stderr.contains("Unable to open sqlite database")
                && !stderr.contains("cannot open Packages database")
            {
                println!("cargo:warning=rpmbuild failed: {stderr}");
            }
        }
        Err(e) => {
            println!("cargo:warning=Failed to run rpmbuild: {e}");
        }
    }

    // Cleanup
    let _ = fs::remove_dir_all(&temp_dir);
}
