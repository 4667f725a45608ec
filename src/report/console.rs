// Copyright (C) 2026 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.

//! Formats and prints report summaries to the console.

use comfy_table::{Cell, Color, Table};
use std::path::Path;

use super::utils::common_directory;
use super::Report;
use crate::policy::{Rule, Severity};

/// Summarize the report to the console.
///
/// Prints package and finding statistics followed by every finding.
pub fn summarize_report(report: &Report) {
    println!("Checked packages: {}\n", report.totals.packages);

    println!("{}\n", package_table(report));
    println!("{}\n", rule_table(report));

    let findings = findings_table(report);
    if findings.row_count() > 0 {
        println!("{findings}");
        println!(
            "\nTotal: {} error(s), {} warning(s)",
            report.totals.errors, report.totals.warnings
        );
    }
}

/// Print the description of a rule.
pub fn explain_rule(rule: Rule) {
    println!("{rule} ({}):", rule.severity());
    println!("  {}", rule.description());
}

/// Create a table with the default preset styling.
fn default_table_preset() -> Table {
    let mut table = Table::new();
    table
        .load_preset(comfy_table::presets::UTF8_FULL_CONDENSED)
        .apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS)
        .set_content_arrangement(comfy_table::ContentArrangement::Dynamic);
    table
}

/// Create a table showing how the packages were classified.
fn package_table(report: &Report) -> Table {
    let mut table = default_table_preset();
    table
        .set_header(vec![
            Cell::new("Packages").add_attribute(comfy_table::Attribute::Bold),
            Cell::new("Count").add_attribute(comfy_table::Attribute::Bold),
        ])
        .add_row(vec![
            Cell::new("Library packages"),
            Cell::new(report.totals.library_packages),
        ])
        .add_row(vec![
            Cell::new("Exempt"),
            Cell::new(report.totals.exempt_packages),
        ])
        .add_row(vec![
            Cell::new("Total").add_attribute(comfy_table::Attribute::Bold),
            Cell::new(report.totals.packages).add_attribute(comfy_table::Attribute::Bold),
        ]);
    table
}

/// Create a table showing how often each rule was reported.
fn rule_table(report: &Report) -> Table {
    let mut table = default_table_preset();
    table.set_header(vec![
        Cell::new("Rule").add_attribute(comfy_table::Attribute::Bold),
        Cell::new("Severity").add_attribute(comfy_table::Attribute::Bold),
        Cell::new("Count").add_attribute(comfy_table::Attribute::Bold),
    ]);
    for rule in Rule::ALL {
        table.add_row(vec![
            Cell::new(rule),
            Cell::new(rule.severity()),
            Cell::new(report.totals.rules.get(&rule).copied().unwrap_or_default()),
        ]);
    }
    table.add_row(vec![
        Cell::new("Total").add_attribute(comfy_table::Attribute::Bold),
        Cell::new(""),
        Cell::new(report.totals.errors + report.totals.warnings)
            .add_attribute(comfy_table::Attribute::Bold),
    ]);
    table
}

/// Create a table listing every finding.
///
/// Package paths are shown relative to their common directory.
fn findings_table(report: &Report) -> Table {
    let paths: Vec<&Path> = report.packages.iter().map(|p| p.path()).collect();
    let common_prefix = common_directory(&paths);

    let mut table = default_table_preset();
    table.set_header(vec![
        Cell::new("Package").add_attribute(comfy_table::Attribute::Bold),
        Cell::new("Name").add_attribute(comfy_table::Attribute::Bold),
        Cell::new("Severity").add_attribute(comfy_table::Attribute::Bold),
        Cell::new("Rule").add_attribute(comfy_table::Attribute::Bold),
        Cell::new("Detail").add_attribute(comfy_table::Attribute::Bold),
    ]);

    for package in &report.packages {
        let display_path = common_prefix
            .as_deref()
            .and_then(|prefix| package.path().strip_prefix(prefix).ok())
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(package.path());
        let verdict = package.verdict();
        for diagnostic in verdict.diagnostics() {
            let color = match diagnostic.severity() {
                Severity::Error => Color::Red,
                Severity::Warning => Color::Yellow,
            };
            table.add_row(vec![
                Cell::new(display_path.display()),
                Cell::new(verdict.package()),
                Cell::new(diagnostic.severity()).fg(color),
                Cell::new(diagnostic.rule()),
                Cell::new(diagnostic.detail().unwrap_or("-")),
            ]);
        }
    }
    table
}
