// Copyright (C) 2026 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.

//! Collects the shared libraries a package ships and where it ships them.

use std::collections::{BTreeSet, HashSet};
use tracing::debug;

use super::PackageView;

/// Directories the dynamic linker searches by default.
pub(crate) const STANDARD_LIBRARY_DIRS: [&str; 4] = ["/lib", "/lib64", "/usr/lib", "/usr/lib64"];

/// Package name suffixes of subpackages the policy does not apply to.
const EXCLUDED_SUFFIXES: [&str; 2] = ["-devel", "-doc"];

/// Shared libraries found in a package.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LibraryInventory {
    libs: BTreeSet<String>,
    dirs: BTreeSet<String>,
    reqlibs: BTreeSet<String>,
}

impl LibraryInventory {
    /// Check whether the policy applies to the package at all.
    ///
    /// Source packages and development or documentation subpackages are out of scope.
    #[must_use]
    pub fn in_scope<P: PackageView + ?Sized>(package: &P) -> bool {
        !package.is_source()
            && !EXCLUDED_SUFFIXES
                .iter()
                .any(|suffix| package.name().ends_with(suffix))
    }

    /// Inspect every shared object of the package.
    ///
    /// Files whose SONAME cannot be read are skipped.
    #[must_use]
    pub fn build<P: PackageView + ?Sized>(package: &P) -> Self {
        let shlib_requires: HashSet<&str> = package
            .requires()
            .iter()
            .map(|dependency| dependency.split('(').next().unwrap_or_default())
            .collect();

        let mut inventory = Self::default();
        for (file_path, file) in package.files() {
            let path = file_path.to_string_lossy();
            if !is_shared_object_path(&path) || !file.is_regular() {
                continue;
            }
            let soname = match package.soname(file_path) {
                Ok(Some(soname)) if !soname.is_empty() => soname,
                Ok(_) => {
                    debug!(%path, "Skipping shared object without SONAME");
                    continue;
                }
                Err(e) => {
                    debug!(%path, error = %e, "Skipping unreadable shared object");
                    continue;
                }
            };
            inventory.dirs.insert(parent_dir(&path).to_string());
            if shlib_requires.contains(soname.as_str()) {
                inventory.reqlibs.insert(soname.clone());
            }
            inventory.libs.insert(soname);
        }
        inventory
    }

    /// Distinct SONAMEs shipped by the package.
    #[must_use]
    pub fn libs(&self) -> &BTreeSet<String> {
        &self.libs
    }

    /// Directories containing the shipped shared objects.
    #[must_use]
    pub fn dirs(&self) -> &BTreeSet<String> {
        &self.dirs
    }

    /// Shipped SONAMEs the package also requires itself.
    #[must_use]
    pub fn reqlibs(&self) -> &BTreeSet<String> {
        &self.reqlibs
    }

    /// Shipped SONAMEs nothing in the package requires.
    #[must_use]
    pub fn unrequired(&self) -> BTreeSet<&str> {
        self.libs
            .difference(&self.reqlibs)
            .map(String::as_str)
            .collect()
    }

    /// Library directories that are standard linker search directories.
    #[must_use]
    pub fn std_dirs(&self) -> BTreeSet<&str> {
        self.dirs
            .iter()
            .map(String::as_str)
            .filter(|dir| STANDARD_LIBRARY_DIRS.contains(dir))
            .collect()
    }
}

/// Names that look like a shared object: `libfoo.so` or `libfoo.so.1`.
pub(crate) fn is_shared_object_path(path: &str) -> bool {
    path.contains(".so.") || path.ends_with(".so")
}

/// The path with its final segment stripped, without trailing slash.
pub(crate) fn parent_dir(path: &str) -> &str {
    path.rsplit_once('/').map_or("", |(dir, _)| dir)
}

/// The final segment of the path.
pub(crate) fn base_name(path: &str) -> &str {
    path.rsplit_once('/').map_or(path, |(_, name)| name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::package::{FileKind, ManifestPackage};

    fn library_package() -> ManifestPackage {
        ManifestPackage::new("libexample1")
            .with_file("/usr/lib", FileKind::Directory)
            .with_shared_object("/usr/lib/libexample.so.1.0.0", Some("libexample.so.1"))
            .with_file(
                "/usr/lib/libexample.so.1",
                FileKind::Symlink("/usr/lib/libexample.so.1.0.0".into()),
            )
            .with_file("/usr/share/doc/packages/libexample1/README", FileKind::Regular)
    }

    #[test]
    fn test_path_helpers() {
        assert!(is_shared_object_path("/usr/lib/libfoo.so"));
        assert!(is_shared_object_path("/usr/lib/libfoo.so.1"));
        assert!(!is_shared_object_path("/usr/lib/libfoo.sox"));
        assert!(!is_shared_object_path("/usr/lib/libfoo.a"));
        assert_eq!(parent_dir("/usr/lib/libfoo.so.1"), "/usr/lib");
        assert_eq!(parent_dir("/libfoo.so.1"), "");
        assert_eq!(base_name("/usr/lib/libfoo.so.1"), "libfoo.so.1");
        assert_eq!(base_name("libfoo.so.1"), "libfoo.so.1");
    }

    #[test]
    fn test_build_collects_libraries_and_dirs() {
        let inventory = LibraryInventory::build(&library_package());
        assert_eq!(
            inventory.libs().iter().collect::<Vec<_>>(),
            vec!["libexample.so.1"]
        );
        assert_eq!(inventory.dirs().iter().collect::<Vec<_>>(), vec!["/usr/lib"]);
        assert!(inventory.reqlibs().is_empty());
        assert_eq!(inventory.std_dirs(), BTreeSet::from(["/usr/lib"]));
    }

    #[test]
    fn test_symlinks_are_not_inspected() {
        let package = ManifestPackage::new("libexample1").with_file(
            "/usr/lib/libexample.so.1",
            FileKind::Symlink("/usr/lib/libexample.so.1.0.0".into()),
        );
        assert!(LibraryInventory::build(&package).libs().is_empty());
    }

    #[test]
    fn test_uninspectable_files_are_skipped() {
        let package = ManifestPackage::new("libexample1")
            // No binary information recorded: inspection fails.
            .with_file("/usr/lib/libbroken.so.1", FileKind::Regular)
            // Valid object without a SONAME.
            .with_shared_object("/usr/lib/libnosoname.so.1", None)
            .with_shared_object("/usr/lib/libempty.so.1", Some(""))
            .with_shared_object("/usr/lib/libexample.so.1", Some("libexample.so.1"));
        let inventory = LibraryInventory::build(&package);
        assert_eq!(inventory.libs().len(), 1);
        assert!(inventory.libs().contains("libexample.so.1"));
    }

    #[test]
    fn test_required_libraries() {
        let package = ManifestPackage::new("program1")
            .with_shared_object("/usr/lib/program/libprivate.so.1", Some("libprivate.so.1"))
            .with_shared_object("/usr/lib/libpublic.so.2", Some("libpublic.so.2"))
            .with_requires(["libprivate.so.1()(64bit)", "libc.so.6(GLIBC_2.2.5)(64bit)"]);
        let inventory = LibraryInventory::build(&package);
        assert_eq!(inventory.reqlibs().len(), 1);
        assert!(inventory.reqlibs().contains("libprivate.so.1"));
        assert!(inventory.reqlibs().is_subset(inventory.libs()));
        assert_eq!(inventory.unrequired(), BTreeSet::from(["libpublic.so.2"]));
        assert_eq!(inventory.std_dirs(), BTreeSet::from(["/usr/lib"]));
    }

    #[test]
    fn test_scope() {
        assert!(LibraryInventory::in_scope(&library_package()));
        assert!(!LibraryInventory::in_scope(&ManifestPackage::new("libexample-devel")));
        assert!(!LibraryInventory::in_scope(&ManifestPackage::new("libexample-doc")));
        assert!(!LibraryInventory::in_scope(
            &ManifestPackage::new("libexample").with_source(true)
        ));
    }
}
