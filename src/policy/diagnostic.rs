// Copyright (C) 2026 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.

//! Rule identifiers, severities and the per-package verdict.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use super::classify::Classification;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Warning => f.write_str("warning"),
            Self::Error => f.write_str("error"),
        }
    }
}

/// The findings the shared library policy can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Rule {
    #[serde(rename = "shlib-policy-name-error")]
    NameError,
    #[serde(rename = "shlib-legacy-policy-name-error")]
    LegacyNameError,
    #[serde(rename = "shlib-policy-missing-suffix")]
    MissingSuffix,
    #[serde(rename = "shlib-policy-devel-file")]
    DevelFile,
    #[serde(rename = "shlib-policy-nonversioned-dir")]
    NonversionedDir,
}

impl Rule {
    pub const ALL: [Rule; 5] = [
        Rule::NameError,
        Rule::LegacyNameError,
        Rule::MissingSuffix,
        Rule::DevelFile,
        Rule::NonversionedDir,
    ];

    #[must_use]
    pub fn id(self) -> &'static str {
        match self {
            Self::NameError => "shlib-policy-name-error",
            Self::LegacyNameError => "shlib-legacy-policy-name-error",
            Self::MissingSuffix => "shlib-policy-missing-suffix",
            Self::DevelFile => "shlib-policy-devel-file",
            Self::NonversionedDir => "shlib-policy-nonversioned-dir",
        }
    }

    #[must_use]
    pub fn severity(self) -> Severity {
        match self {
            Self::LegacyNameError => Severity::Warning,
            _ => Severity::Error,
        }
    }

    /// User-facing explanation of the rule.
    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            Self::NameError => {
                "Your package contains a single shared library but is not named after its SONAME."
            }
            Self::LegacyNameError => {
                "Your package contains a single shared library but is not named after its SONAME. \
                 The library is on the legacy exception list, so this is only a warning."
            }
            Self::MissingSuffix => {
                "Your package containing shared libraries does not end in a digit and \
                 should probably be split."
            }
            Self::DevelFile => {
                "Your shared library package contains development files. Split them into \
                 a -devel subpackage."
            }
            Self::NonversionedDir => {
                "Your shared library package contains non-versioned directories. Those will not \
                 allow to install multiple versions of the package in parallel."
            }
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Rule {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|rule| rule.id() == s)
            .ok_or_else(|| format!("unknown rule: {s}"))
    }
}

/// A single policy finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    rule: Rule,
    severity: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<String>,
}

impl Diagnostic {
    #[must_use]
    pub fn new(rule: Rule, detail: Option<String>) -> Self {
        Self {
            rule,
            severity: rule.severity(),
            detail,
        }
    }

    #[must_use]
    pub fn rule(&self) -> Rule {
        self.rule
    }

    #[must_use]
    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// Derived name, file path or directory path the finding refers to.
    #[must_use]
    pub fn detail(&self) -> Option<&str> {
        self.detail.as_deref()
    }
}

/// Outcome of checking one package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Verdict {
    package: String,
    classification: Classification,
    diagnostics: Vec<Diagnostic>,
}

impl Verdict {
    #[must_use]
    pub(crate) fn new(package: &str, classification: Classification) -> Self {
        Self {
            package: package.to_string(),
            classification,
            diagnostics: Vec::new(),
        }
    }

    pub(crate) fn report(&mut self, rule: Rule, detail: Option<String>) {
        self.diagnostics.push(Diagnostic::new(rule, detail));
    }

    /// Name of the checked package.
    #[must_use]
    pub fn package(&self) -> &str {
        &self.package
    }

    #[must_use]
    pub fn classification(&self) -> Classification {
        self.classification
    }

    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    #[must_use]
    pub fn count(&self, severity: Severity) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }

    /// True if no finding was reported.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Check whether a finding with the given rule and detail was reported.
    #[must_use]
    pub fn has(&self, rule: Rule, detail: Option<&str>) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.rule == rule && d.detail() == detail)
    }
}
