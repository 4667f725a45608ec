// Copyright (C) 2026 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.

//! Flags non-versioned directories below shared system paths.

use std::collections::BTreeSet;

use super::diagnostic::{Rule, Verdict};

/// System paths whose subdirectories must carry a version.
pub(crate) const VERSIONED_ROOTS: [&str; 6] = [
    "/lib",
    "/lib64",
    "/usr/lib",
    "/usr/lib64",
    "/usr/share/doc/packages",
    "/usr/share",
];

pub(crate) fn evaluate<'a, I>(dirs: I, verdict: &mut Verdict)
where
    I: IntoIterator<Item = &'a str>,
{
    let violations: BTreeSet<String> = dirs
        .into_iter()
        .filter_map(top_level_subdir)
        .filter(|(_, segment)| !segment.ends_with(|c: char| c.is_ascii_digit()))
        .map(|(root, segment)| format!("{root}/{segment}"))
        .collect();

    for dir in violations {
        verdict.report(Rule::NonversionedDir, Some(dir));
    }
}

/// Assign the directory to its most specific root and return the first segment below it.
fn top_level_subdir(dir: &str) -> Option<(&'static str, &str)> {
    let (root, rest) = VERSIONED_ROOTS
        .iter()
        .filter_map(|root| {
            dir.strip_prefix(root)
                .and_then(|rest| rest.strip_prefix('/'))
                .map(|rest| (*root, rest))
        })
        .max_by_key(|(root, _)| root.len())?;
    let segment = rest.split('/').next().unwrap_or_default();
    (!segment.is_empty()).then_some((root, segment))
}
