// Copyright (C) 2026 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.

//! Defines the manifest entry of a packaged file (regular file, directory, symlink).

use path_clean::PathClean;
use serde::{Deserialize, Serialize};
use std::fs;
use std::os::unix::fs::MetadataExt;
use std::path::{Path, PathBuf};

use super::extractor::{ExtractedFile, PackageError, PackageResult};
use super::PackageFiles;

/// Maximum number of symlinks followed when resolving a packaged path.
const MAX_SYMLINK_DEPTH: usize = 40;

/// Kind of a packaged file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Regular,
    Directory,
    Symlink(PathBuf), // Stores the normalized target path of the symlink.
}

/// Represents a file in a package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageFile {
    kind: FileKind,
    #[serde(default)]
    mode: u32,
    #[serde(default)]
    size: u64,
}

impl PackageFile {
    #[must_use]
    pub fn new(kind: FileKind, mode: u32, size: u64) -> Self {
        Self { kind, mode, size }
    }

    /// Create a package file from an extracted file.
    ///
    /// # Errors
    /// Returns an error if the file metadata or symlink target cannot be read.
    pub(crate) fn from_extracted(extracted_file: &ExtractedFile) -> PackageResult<Self> {
        let path = extracted_file.path();
        let metadata = fs::symlink_metadata(path).map_err(|e| PackageError::ReadMetadataFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

        let kind = if metadata.file_type().is_symlink() {
            let target = fs::read_link(path).map_err(|e| PackageError::ReadSymlinkFailed {
                path: path.to_path_buf(),
                source: e,
            })?;
            // Resolve relative targets relative to the symlink's parent directory
            let resolved_target = if target.is_absolute() {
                target
            } else {
                // The target path should be relative within the package not the extraction directory.
                extracted_file
                    .package_path()
                    .parent()
                    .unwrap_or_else(|| Path::new("/"))
                    .join(&target)
            };
            FileKind::Symlink(resolved_target.clean())
        } else if metadata.is_dir() {
            FileKind::Directory
        } else {
            FileKind::Regular
        };

        Ok(Self::new(kind, metadata.mode(), metadata.len()))
    }

    #[must_use]
    pub fn kind(&self) -> &FileKind {
        &self.kind
    }

    /// Permission and file type bits.
    #[must_use]
    pub fn mode(&self) -> u32 {
        self.mode
    }

    #[must_use]
    pub fn size(&self) -> u64 {
        self.size
    }

    #[must_use]
    pub fn is_regular(&self) -> bool {
        self.kind == FileKind::Regular
    }

    #[must_use]
    pub fn is_dir(&self) -> bool {
        self.kind == FileKind::Directory
    }

    /// True for directories and for symlinks resolving to a directory of the package.
    ///
    /// Symlink targets are package paths. Dangling links, links leaving the
    /// package and link cycles do not resolve.
    #[must_use]
    pub fn resolves_to_dir(&self, files: &PackageFiles) -> bool {
        let mut file = self;
        for _ in 0..MAX_SYMLINK_DEPTH {
            match &file.kind {
                FileKind::Directory => return true,
                FileKind::Regular => return false,
                FileKind::Symlink(target) => match files.get(target) {
                    Some(next) => file = next,
                    None => return false,
                },
            }
        }
        false
    }
}
