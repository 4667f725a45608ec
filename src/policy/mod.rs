// Copyright (C) 2026 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.

//! The shared library packaging policy.
//!
//! A package shipping a versioned shared library in a standard library directory
//! must be named after the library's SONAME, must not ship development files and
//! must keep its files in versioned directories. Packages that only ship libraries
//! they use themselves are exempt.

mod classify;
mod content;
mod diagnostic;
mod directories;
mod exceptions;
mod inventory;
mod naming;
mod soname;

pub use classify::{Classification, ExemptReason};
pub use diagnostic::{Diagnostic, Rule, Severity, Verdict};
pub use exceptions::LegacyExceptions;
pub use inventory::LibraryInventory;
pub use soname::{library_name, SonameShape};

use std::path::Path;
use tracing::debug;

use crate::package::{ElfError, PackageFiles};

/// Read-only view of a built package, as provided by the host.
pub trait PackageView {
    fn name(&self) -> &str;

    /// True for source (unbuilt) packages.
    fn is_source(&self) -> bool;

    fn files(&self) -> &PackageFiles;

    /// Declared runtime requirements, version constraints included.
    fn requires(&self) -> &[String];

    /// Read the SONAME of a packaged file.
    ///
    /// Returns `Ok(None)` for files that are not shared objects or carry no SONAME.
    ///
    /// # Errors
    /// Returns an error if the file cannot be inspected.
    fn soname(&self, path: &Path) -> Result<Option<String>, ElfError>;
}

/// Checks packages against the shared library policy.
#[derive(Debug, Clone)]
pub struct LibraryPolicy {
    exceptions: LegacyExceptions,
}

impl Default for LibraryPolicy {
    fn default() -> Self {
        Self::new(LegacyExceptions::builtin())
    }
}

impl LibraryPolicy {
    #[must_use]
    pub fn new(exceptions: LegacyExceptions) -> Self {
        Self { exceptions }
    }

    #[must_use]
    pub fn exceptions(&self) -> &LegacyExceptions {
        &self.exceptions
    }

    /// Check a package. Never fails: unreadable files are skipped.
    #[must_use]
    pub fn check<P: PackageView + ?Sized>(&self, package: &P) -> Verdict {
        if !LibraryInventory::in_scope(package) {
            debug!(package = package.name(), "Package is out of policy scope");
            return Verdict::new(
                package.name(),
                Classification::Exempt(ExemptReason::NotApplicable),
            );
        }

        let inventory = LibraryInventory::build(package);
        let classification = classify::classify(&inventory);
        debug!(
            package = package.name(),
            libs = ?inventory.libs(),
            %classification,
            "Classified package"
        );

        let mut verdict = Verdict::new(package.name(), classification);
        if !classification.is_library() {
            return verdict;
        }

        let std_dirs = inventory.std_dirs();
        naming::evaluate(package.name(), &inventory, &self.exceptions, &mut verdict);
        content::evaluate(package.files(), &inventory, &std_dirs, &mut verdict);
        directories::evaluate(
            package
                .files()
                .iter()
                .filter(|(_, file)| file.resolves_to_dir(package.files()))
                .filter_map(|(path, _)| path.to_str()),
            &mut verdict,
        );
        verdict
    }
}
