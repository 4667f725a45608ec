// Copyright (C) 2026 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.

//! Implements RPM package extraction using `rpm2cpio` and `cpio`, and header queries using `rpm`.

use std::collections::HashSet;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::Instant;
use tempfile::TempDir;

use super::extractor::{
    query, spawn, wait_with_timeout, PackageError, PackageExtractor, PackageMetadata,
    PackageResult, DEFAULT_EXTRACTION_TIMEOUT,
};
use super::PackageFiles;

/// `SOURCERPM` tag value of source packages.
const NO_SOURCE_RPM: &str = "(none)";

pub(crate) struct RpmExtractor;

impl RpmExtractor {
    /// Run `rpm -qp --queryformat <format>` against the package.
    fn query_format(package: &Path, format: &str) -> PackageResult<String> {
        query(
            "rpm",
            [
                OsStr::new("-qp"),
                OsStr::new("--queryformat"),
                OsStr::new(format),
                package.as_os_str(),
            ],
            package,
        )
    }

    /// Paths listed in the package header.
    ///
    /// `cpio -d` creates every parent directory, but the package only owns the
    /// directories its header lists.
    fn owned_paths(package: &Path) -> PackageResult<HashSet<PathBuf>> {
        Ok(Self::query_format(package, r"[%{FILENAMES}\n]")?
            .lines()
            .filter(|line| !line.is_empty())
            .map(PathBuf::from)
            .collect())
    }
}

impl PackageExtractor for RpmExtractor {
    const EXTENSION: &'static str = "rpm";

    /// Extract an RPM package into a temporary directory.
    ///
    /// # Errors
    /// Returns an error if the package cannot be extracted.
    ///
    /// # Timeout
    /// This function enforces a total timeout of 30 seconds for the `rpm2cpio` and
    /// `cpio` pipeline. If extraction takes longer, the processes will be killed and
    /// a `CommandTimeout` error will be returned.
    fn extract(package: &Path, dest: &TempDir) -> PackageResult<PackageFiles> {
        let start = Instant::now();

        // Use system commands for maximum performance: rpm2cpio | cpio -id
        let mut rpm2cpio_child = spawn(
            Command::new("rpm2cpio")
                .arg(package)
                .stdout(Stdio::piped()),
            "rpm2cpio",
            package,
        )?;

        let Some(rpm2cpio_stdout) = rpm2cpio_child.stdout.take() else {
            let _ = rpm2cpio_child.kill();
            let _ = rpm2cpio_child.wait();
            return Err(PackageError::ExtractionFailed {
                path: package.to_path_buf(),
                reason: "Failed to get stdout from rpm2cpio".to_string(),
            });
        };

        let mut cpio_child = match spawn(
            Command::new("cpio")
                .arg("-id")
                .arg("--quiet")
                .current_dir(dest.path())
                .stdin(rpm2cpio_stdout),
            "cpio",
            package,
        ) {
            Ok(child) => child,
            Err(e) => {
                let _ = rpm2cpio_child.kill();
                let _ = rpm2cpio_child.wait();
                return Err(e);
            }
        };

        // Wait for cpio with the remaining timeout (subtracting time already elapsed)
        let elapsed = start.elapsed();
        let remaining_timeout = DEFAULT_EXTRACTION_TIMEOUT.saturating_sub(elapsed);
        let cpio_status = wait_with_timeout(&mut cpio_child, remaining_timeout, "cpio", package)?;

        // Clean up rpm2cpio - it should have finished by now since cpio consumed all its output
        let _ = rpm2cpio_child.wait();

        if !cpio_status.success() {
            return Err(PackageError::ExtractionFailed {
                path: package.to_path_buf(),
                reason: format!(
                    "cpio exited with non-zero status: {}",
                    cpio_status.code().unwrap_or(-1)
                ),
            });
        }

        let mut files = Self::process(dest, package)?;
        let owned = Self::owned_paths(package)?;
        files.retain(|path, file| !file.is_dir() || owned.contains(path));
        Ok(files)
    }

    fn metadata(
        package: &Path,
        _dest: &TempDir,
        _files: &PackageFiles,
    ) -> PackageResult<PackageMetadata> {
        let header = Self::query_format(package, r"%{NAME}\n%{SOURCERPM}\n")?;
        let mut lines = header.lines();
        let name = lines.next().unwrap_or_default().trim().to_string();
        if name.is_empty() {
            return Err(PackageError::QueryFailed {
                path: package.to_path_buf(),
                reason: "header has no NAME tag".to_string(),
            });
        }
        let source_rpm = lines.next().unwrap_or(NO_SOURCE_RPM).trim();
        let file_name = package
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default();
        let source = source_rpm == NO_SOURCE_RPM
            || file_name.ends_with(".src.rpm")
            || file_name.ends_with(".nosrc.rpm");

        let requires = Self::query_format(package, r"[%{REQUIRENAME}\n]")?
            .lines()
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();

        Ok(PackageMetadata {
            name,
            source,
            requires,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::package::Package;
    use crate::policy::PackageView;
    use std::path::PathBuf;

    fn get_fixtures_dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures")
    }

    #[test]
    fn test_rpm_package_extract() {
        let rpm_path = get_fixtures_dir().join("libfixture1.rpm");
        if !rpm_path.exists() {
            eprintln!(
                "Skipping test: RPM test file not found at {}. Install gcc and rpmbuild to generate it.",
                rpm_path.display()
            );
            return;
        }

        let package = Package::new(rpm_path).expect("Should extract RPM package");
        assert_eq!(package.name(), "libfixture1");
        assert!(!package.is_source());

        let files = package.files();
        assert!(files
            .get(&PathBuf::from("/usr/lib/libfixture.so.1.0.0"))
            .is_some_and(|file| file.is_regular()));
        // Parent directories created by cpio are not owned by the package.
        assert!(!files.contains_key(&PathBuf::from("/usr")));

        assert_eq!(
            package
                .soname(&PathBuf::from("/usr/lib/libfixture.so.1.0.0"))
                .unwrap(),
            Some("libfixture.so.1".to_string())
        );
        package.close().expect("Should remove the extraction directory");
    }
}
