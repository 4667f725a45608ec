// Copyright (C) 2026 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.

//! Implements DEB package extraction and metadata queries using `dpkg-deb`.

use std::collections::BTreeSet;
use std::ffi::OsStr;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;
use tracing::debug;

use super::elf::Elf;
use super::extractor::{
    query, spawn, wait_with_timeout, PackageError, PackageExtractor, PackageMetadata,
    PackageResult, DEFAULT_EXTRACTION_TIMEOUT,
};
use super::PackageFiles;

pub(crate) struct DebExtractor;

impl PackageExtractor for DebExtractor {
    const EXTENSION: &'static str = "deb";

    /// Extract a DEB package into a temporary directory.
    ///
    /// # Errors
    /// Returns an error if the package cannot be extracted.
    ///
    /// # Timeout
    /// This function enforces a timeout of 30 seconds for the `dpkg-deb` subprocess.
    /// If extraction takes longer, the process will be killed and a `CommandTimeout`
    /// error will be returned.
    fn extract(package: &Path, dest: &TempDir) -> PackageResult<PackageFiles> {
        let mut child = spawn(
            Command::new("dpkg-deb")
                .arg("-x")
                .arg(package)
                .arg(dest.path()),
            "dpkg-deb",
            package,
        )?;

        let exit_status =
            wait_with_timeout(&mut child, DEFAULT_EXTRACTION_TIMEOUT, "dpkg-deb", package)?;

        if exit_status.success() {
            Self::process(dest, package)
        } else {
            Err(PackageError::ExtractionFailed {
                path: package.to_path_buf(),
                reason: format!(
                    "dpkg-deb exited with non-zero status: {}",
                    exit_status.code().unwrap_or(-1)
                ),
            })
        }
    }

    /// Read the package name from the control file.
    ///
    /// Debian control files declare package relationships rather than SONAMEs, so
    /// the shared library requirements are taken from the `DT_NEEDED` entries of
    /// the packaged ELF files, which is what `dpkg-shlibdeps` derives them from.
    fn metadata(
        package: &Path,
        dest: &TempDir,
        files: &PackageFiles,
    ) -> PackageResult<PackageMetadata> {
        let name = query(
            "dpkg-deb",
            [OsStr::new("-f"), package.as_os_str(), OsStr::new("Package")],
            package,
        )?
        .trim()
        .to_string();
        if name.is_empty() {
            return Err(PackageError::QueryFailed {
                path: package.to_path_buf(),
                reason: "control file has no Package field".to_string(),
            });
        }

        let mut requires = BTreeSet::new();
        for (path, file) in files {
            if !file.is_regular() || Elf::is_invalid_extension(path) {
                continue;
            }
            let on_disk = dest.path().join(path.strip_prefix("/").unwrap_or(path));
            match Elf::from_path(&on_disk) {
                Ok(elf) => requires.extend(elf.dependencies().iter().cloned()),
                Err(e) if e.is_not_elf() => {}
                Err(e) => {
                    debug!(path = %path.display(), error = %e, "Skipping unreadable ELF file");
                }
            }
        }

        Ok(PackageMetadata {
            name,
            // Debian has no binary form of source packages.
            source: false,
            requires: requires.into_iter().collect(),
        })
    }
}
