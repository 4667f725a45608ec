// Copyright (C) 2026 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.

//! Derives the expected package name of a shared library from its SONAME.

/// Separator between the library base name and its ABI version.
const VERSION_INFIX: &str = ".so.";
const UNVERSIONED_SUFFIX: &str = ".so";

/// The structure of a SONAME as far as package naming is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SonameShape<'a> {
    /// No `.so.` infix, e.g. `libbaz.so`.
    Unversioned { stem: &'a str },
    /// Exactly one `.so.` infix, e.g. `libfoo.so.2`.
    Versioned { base: &'a str, version: &'a str },
    /// More than one `.so.` infix, e.g. `libfoo.so.1.so.2`.
    /// Split on the first infix; the rest is treated as the version.
    MultiplyVersioned { base: &'a str, version: &'a str },
}

impl<'a> SonameShape<'a> {
    #[must_use]
    pub fn parse(soname: &'a str) -> Self {
        match soname.split_once(VERSION_INFIX) {
            Some((base, version)) if version.contains(VERSION_INFIX) => {
                Self::MultiplyVersioned { base, version }
            }
            Some((base, version)) => Self::Versioned { base, version },
            None => Self::Unversioned {
                stem: soname.strip_suffix(UNVERSIONED_SUFFIX).unwrap_or(soname),
            },
        }
    }
}

/// Canonical package name for a library with the given SONAME.
///
/// A digit between base and version would be ambiguous (`libfoo2` + `3`), so a
/// hyphen is inserted in that case. Dots are not allowed in package names and
/// become underscores.
///
/// ```
/// use shlib_policy::policy::library_name;
///
/// assert_eq!(library_name("libfoo2.so.3"), "libfoo2-3");
/// assert_eq!(library_name("libbar.so.0"), "libbar0");
/// assert_eq!(library_name("libbaz.so"), "libbaz");
/// ```
#[must_use]
pub fn library_name(soname: &str) -> String {
    let name = match SonameShape::parse(soname) {
        SonameShape::Unversioned { stem } => stem.to_string(),
        SonameShape::Versioned { base, version }
        | SonameShape::MultiplyVersioned { base, version } => {
            if base.ends_with(|c: char| c.is_ascii_digit()) {
                format!("{base}-{version}")
            } else {
                format!("{base}{version}")
            }
        }
    };
    name.replace('.', "_")
}
