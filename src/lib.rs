// Copyright (C) 2026 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.

//! A tool for checking DEB and RPM packages against the shared library packaging policy.
//!
//! This crate provides functionality to:
//! - Extract DEB and RPM packages, or load JSON package manifests
//! - Read SONAMEs and dependencies of packaged ELF files
//! - Classify library packages and report policy violations
//! - Generate reports over many packages

pub mod package;
pub mod policy;
pub mod report;

// Re-export key types for convenience
pub use package::{ManifestPackage, Package, PackageFile};
pub use policy::{LibraryPolicy, PackageView, Verdict};
pub use report::Report;
