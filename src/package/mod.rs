// Copyright (C) 2026 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.

//! Manages package lifecycle including extraction directory. Provides the package view the policy inspects.

mod deb;
mod elf;
mod extractor;
mod files;
mod manifest;
mod rpm;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::info;

use deb::DebExtractor;
pub use elf::{Elf, ElfError, ElfType};
use extractor::{PackageExtractor, PackageMetadata};
pub use extractor::{PackageError, PackageResult};
pub use files::{FileKind, PackageFile};
pub use manifest::{ManifestError, ManifestPackage};
use rpm::RpmExtractor;

use crate::policy::PackageView;

/// Collection of files in a package, keyed by their absolute path.
pub type PackageFiles = BTreeMap<PathBuf, PackageFile>;

/// An extracted package file (deb or rpm).
///
/// The extraction directory lives as long as the package, so packaged binaries
/// can be inspected on demand.
pub struct Package {
    path: PathBuf,
    root: TempDir,
    metadata: PackageMetadata,
    files: PackageFiles,
}

impl Package {
    /// Extract a package from a filepath.
    ///
    /// # Errors
    /// Returns an error if the package type cannot be determined or is unsupported,
    /// or if extraction or the metadata query fails.
    pub fn new(path: PathBuf) -> PackageResult<Self> {
        let root = TempDir::new().map_err(|e| PackageError::TempDirFailed { source: e })?;

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .ok_or_else(|| PackageError::UnsupportedPackageType {
                extension: "unknown".to_string(),
            })?;

        let (metadata, files) = match extension {
            DebExtractor::EXTENSION => Self::load::<DebExtractor>(&path, &root)?,
            RpmExtractor::EXTENSION => Self::load::<RpmExtractor>(&path, &root)?,
            _ => {
                return Err(PackageError::UnsupportedPackageType {
                    extension: extension.to_string(),
                })
            }
        };
        info!(
            package = %path.display(),
            name = %metadata.name,
            files = files.len(),
            requires = metadata.requires.len(),
            "Extraction completed"
        );

        Ok(Self {
            path,
            root,
            metadata,
            files,
        })
    }

    fn load<E: PackageExtractor>(
        path: &Path,
        root: &TempDir,
    ) -> PackageResult<(PackageMetadata, PackageFiles)> {
        let files = E::extract(path, root)?;
        let metadata = E::metadata(path, root, &files)?;
        Ok((metadata, files))
    }

    /// Get the path to the package.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Remove the extraction directory.
    ///
    /// Dropping the package removes it as well, but silently ignores errors.
    ///
    /// # Errors
    /// Returns an error if the directory cannot be removed.
    pub fn close(self) -> PackageResult<()> {
        self.root
            .close()
            .map_err(|e| PackageError::TempDirFailed { source: e })
    }
}

impl PackageView for Package {
    fn name(&self) -> &str {
        &self.metadata.name
    }

    fn is_source(&self) -> bool {
        self.metadata.source
    }

    fn files(&self) -> &PackageFiles {
        &self.files
    }

    fn requires(&self) -> &[String] {
        &self.metadata.requires
    }

    fn soname(&self, path: &Path) -> Result<Option<String>, ElfError> {
        let on_disk = self.root.path().join(path.strip_prefix("/").unwrap_or(path));
        elf::read_soname(&on_disk)
    }
}
