// Copyright (C) 2026 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.

//! Packages described by a JSON manifest instead of a package file.
//!
//! A manifest records what package inspection would otherwise extract:
//!
//! ```json
//! {
//!   "name": "libexample1",
//!   "requires": ["libc.so.6()(64bit)"],
//!   "files": {
//!     "/usr/lib": { "kind": "directory" },
//!     "/usr/lib/libexample.so.1": { "kind": "regular", "mode": 33261, "size": 16384 }
//!   },
//!   "sonames": { "/usr/lib/libexample.so.1": "libexample.so.1" }
//! }
//! ```
//!
//! A `null` SONAME marks a shared object without SONAME. Files missing from
//! `sonames` cannot be inspected.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::elf::ElfError;
use super::files::{FileKind, PackageFile};
use super::PackageFiles;
use crate::policy::PackageView;

/// Errors that can occur when loading a manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("Failed to open manifest: {path:?}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse manifest: {path:?}")]
    ParseFailed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// A package described by its manifest.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ManifestPackage {
    name: String,
    #[serde(default)]
    source: bool,
    #[serde(default)]
    requires: Vec<String>,
    #[serde(default)]
    files: PackageFiles,
    #[serde(default)]
    sonames: BTreeMap<PathBuf, Option<String>>,
}

impl ManifestPackage {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    /// Load a manifest from a JSON file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or is not a valid manifest.
    pub fn from_file(path: &Path) -> Result<Self, ManifestError> {
        let file = File::open(path).map_err(|e| ManifestError::OpenFailed {
            path: path.to_path_buf(),
            source: e,
        })?;
        serde_json::from_reader(BufReader::new(file)).map_err(|e| ManifestError::ParseFailed {
            path: path.to_path_buf(),
            source: e,
        })
    }

    #[must_use]
    pub fn with_source(mut self, source: bool) -> Self {
        self.source = source;
        self
    }

    #[must_use]
    pub fn with_requires<I, S>(mut self, requires: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.requires.extend(requires.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn with_file(mut self, path: impl Into<PathBuf>, kind: FileKind) -> Self {
        let mode = match kind {
            FileKind::Regular => 0o100_644,
            FileKind::Directory => 0o040_755,
            FileKind::Symlink(_) => 0o120_777,
        };
        self.files
            .insert(path.into(), PackageFile::new(kind, mode, 0));
        self
    }

    #[must_use]
    pub fn with_regular_file(self, path: impl Into<PathBuf>) -> Self {
        self.with_file(path, FileKind::Regular)
    }

    /// Add a regular file together with the SONAME inspection would find in it.
    #[must_use]
    pub fn with_shared_object(self, path: impl Into<PathBuf>, soname: Option<&str>) -> Self {
        let path = path.into();
        let mut package = self.with_file(path.clone(), FileKind::Regular);
        package.sonames.insert(path, soname.map(str::to_string));
        package
    }
}

impl PackageView for ManifestPackage {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_source(&self) -> bool {
        self.source
    }

    fn files(&self) -> &PackageFiles {
        &self.files
    }

    fn requires(&self) -> &[String] {
        &self.requires
    }

    fn soname(&self, path: &Path) -> Result<Option<String>, ElfError> {
        self.sonames
            .get(path)
            .cloned()
            .ok_or_else(|| ElfError::Unavailable {
                path: path.to_path_buf(),
            })
    }
}
