// Copyright (C) 2026 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.

//! Flags development files shipped in a library package.

use std::collections::BTreeSet;

use super::diagnostic::{Rule, Verdict};
use super::inventory::{base_name, parent_dir, LibraryInventory};
use crate::package::PackageFiles;

const INCLUDE_DIR: &str = "/usr/include";

/// Extensions of link-time artifacts: unversioned shared objects, static and libtool archives.
const DEVEL_EXTENSIONS: [&str; 3] = ["so", "a", "la"];

pub(crate) fn evaluate(
    files: &PackageFiles,
    inventory: &LibraryInventory,
    std_dirs: &BTreeSet<&str>,
    verdict: &mut Verdict,
) {
    for (path, file) in files {
        if file.resolves_to_dir(files) {
            continue;
        }
        let path = path.to_string_lossy();
        let dir = parent_dir(&path);
        if dir.starts_with(INCLUDE_DIR) {
            verdict.report(Rule::DevelFile, Some(path.to_string()));
        }
        if std_dirs.contains(dir)
            && DEVEL_EXTENSIONS.contains(&extension(&path))
            && !inventory.libs().contains(base_name(&path))
        {
            verdict.report(Rule::DevelFile, Some(path.to_string()));
        }
    }
}

/// Text after the last dot of the path, or the whole path without dot.
fn extension(path: &str) -> &str {
    path.rsplit_once('.').map_or(path, |(_, ext)| ext)
}
