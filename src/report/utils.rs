// Copyright (C) 2026 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.

//! Utility functions for output formatting.

use std::path::{Component, Path, PathBuf};

/// Find the deepest directory containing all given files.
///
/// Returns `None` if the slice is empty or the files share no directory.
///
/// # Examples
///
/// ```ignore
/// use std::path::{Path, PathBuf};
///
/// let paths = [Path::new("/out/libfoo1.deb"), Path::new("/out/rpm/libfoo1.rpm")];
/// assert_eq!(common_directory(&paths), Some(PathBuf::from("/out")));
/// ```
#[must_use]
pub(crate) fn common_directory(paths: &[&Path]) -> Option<PathBuf> {
    let mut dirs = paths.iter().map(|path| path.parent().unwrap_or(Path::new("")));
    let first: Vec<Component> = dirs.next()?.components().collect();
    let shared = dirs.fold(first.len(), |shared, dir| {
        first
            .iter()
            .zip(dir.components())
            .take(shared)
            .take_while(|(a, b)| *a == b)
            .count()
    });

    let common: PathBuf = first[..shared].iter().collect();
    (!common.as_os_str().is_empty()).then_some(common)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_directory_empty() {
        assert_eq!(common_directory(&[]), None);
    }

    #[test]
    fn test_common_directory_single() {
        assert_eq!(
            common_directory(&[Path::new("/out/libfoo1.deb")]),
            Some(PathBuf::from("/out"))
        );
    }

    #[test]
    fn test_common_directory_nested() {
        let paths = [
            Path::new("/out/deb/libfoo1.deb"),
            Path::new("/out/rpm/libfoo1.rpm"),
            Path::new("/out/deb/libbar2.deb"),
        ];
        assert_eq!(common_directory(&paths), Some(PathBuf::from("/out")));
    }

    #[test]
    fn test_common_directory_relative() {
        let paths = [Path::new("libfoo1.deb"), Path::new("out/libbar2.deb")];
        assert_eq!(common_directory(&paths), None);
    }
}
