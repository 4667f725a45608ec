// Copyright (C) 2026 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.

//! Decides whether a package is a library package the policy applies to.

use serde::Serialize;
use std::fmt;

use super::inventory::LibraryInventory;

/// Why a package is exempt from the policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExemptReason {
    /// Source, `-devel` or `-doc` package.
    NotApplicable,
    NoSharedObjects,
    /// Every shipped library is required by the package itself.
    PrivateLibraries,
    /// Libraries exist, but none in a standard library directory.
    NonStandardDirectories,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case", tag = "status", content = "reason")]
pub enum Classification {
    Library,
    Exempt(ExemptReason),
}

impl Classification {
    #[must_use]
    pub fn is_library(self) -> bool {
        self == Self::Library
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Library => f.write_str("library package"),
            Self::Exempt(ExemptReason::NotApplicable) => f.write_str("exempt (not applicable)"),
            Self::Exempt(ExemptReason::NoSharedObjects) => {
                f.write_str("exempt (no shared objects)")
            }
            Self::Exempt(ExemptReason::PrivateLibraries) => {
                f.write_str("exempt (private libraries)")
            }
            Self::Exempt(ExemptReason::NonStandardDirectories) => {
                f.write_str("exempt (non-standard directories)")
            }
        }
    }
}

pub(crate) fn classify(inventory: &LibraryInventory) -> Classification {
    if inventory.libs().is_empty() {
        Classification::Exempt(ExemptReason::NoSharedObjects)
    } else if inventory.unrequired().is_empty() {
        // A program shipping libraries only it uses.
        Classification::Exempt(ExemptReason::PrivateLibraries)
    } else if inventory.std_dirs().is_empty() {
        Classification::Exempt(ExemptReason::NonStandardDirectories)
    } else {
        Classification::Library
    }
}
