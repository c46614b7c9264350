use std::path::Path;

use anyhow::Result;
use colored::*;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};

use crate::models::{DependencyLicenses, LicenseSource};

/// Render a colored terminal report.
pub fn render(deps: &[DependencyLicenses], path: &Path, verbose: bool, quiet: bool) -> Result<()> {
    let total = deps.len();
    let declared = deps
        .iter()
        .filter(|d| d.source() == Some(LicenseSource::Host))
        .count();
    let unlicensed = deps.iter().filter(|d| d.is_unlicensed()).count();
    let recovered = total - declared - unlicensed;

    if quiet {
        println!(
            "Total: {}  Declared: {}  Recovered: {}  Missing: {}",
            total,
            declared.to_string().green(),
            recovered.to_string().cyan(),
            unlicensed.to_string().red(),
        );
        return Ok(());
    }

    println!(
        "\n {} v{}",
        "osgi-licenses".bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!(" Scanning: {}\n", path.display());

    println!(" ┌────────────────────────────────────────────────────┐");
    println!(" │  {:<48} │", "SUMMARY".bold());
    println!(" │  {:<48} │", format!("Total dependencies : {}", total));
    println!(
        " │  {:<48} │",
        format!("{}  Declared in POM  : {:>4}", "✓".green(), declared)
    );
    println!(
        " │  {:<48} │",
        format!(
            "{}  Recovered        : {:>4}  {}",
            "↺".cyan(),
            recovered,
            summarize_sources(deps)
        )
    );
    println!(
        " │  {:<48} │",
        format!("{}  Missing          : {:>4}", "✗".red(), unlicensed)
    );
    println!(" └────────────────────────────────────────────────────┘\n");

    if unlicensed > 0 {
        println!(" {} No license information found:\n", "[MISSING]".red().bold());
        render_table(deps.iter().filter(|d| d.is_unlicensed()));
        println!();
    }

    if recovered > 0 {
        println!(" {} Recovered from bundle contents:\n", "[RECOVERED]".cyan().bold());
        render_table(
            deps.iter()
                .filter(|d| !d.is_unlicensed() && d.source() != Some(LicenseSource::Host)),
        );
        println!();
    }

    if verbose && declared > 0 {
        println!(" {} Declared in POM:\n", "[DECLARED]".green().bold());
        render_table(deps.iter().filter(|d| d.source() == Some(LicenseSource::Host)));
        println!();
    }

    Ok(())
}

fn render_table<'a>(deps: impl Iterator<Item = &'a DependencyLicenses>) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Dependency").add_attribute(Attribute::Bold),
            Cell::new("Version").add_attribute(Attribute::Bold),
            Cell::new("Source").add_attribute(Attribute::Bold),
            Cell::new("License").add_attribute(Attribute::Bold),
            Cell::new("Location").add_attribute(Attribute::Bold),
        ]);

    for dep in deps {
        let name = dep.coordinates.key();
        let name = name.trim_start_matches(':');

        if dep.licenses.is_empty() {
            table.add_row(vec![
                Cell::new(name),
                Cell::new(&dep.coordinates.version),
                Cell::new("-").fg(Color::DarkGrey),
                Cell::new("unknown").fg(Color::Red),
                Cell::new(""),
            ]);
            continue;
        }

        for (i, license) in dep.licenses.iter().enumerate() {
            let source_color = match license.source {
                LicenseSource::Host => Color::Green,
                LicenseSource::Manifest | LicenseSource::Descriptor => Color::Cyan,
                LicenseSource::Notice => Color::Yellow,
            };
            let location_color = match &license.location {
                Some(location) if location.is_embedded() => Color::Yellow,
                Some(_) => Color::Reset,
                None => Color::DarkGrey,
            };
            let (name, version) = if i == 0 {
                (name, dep.coordinates.version.as_str())
            } else {
                ("", "")
            };

            table.add_row(vec![
                Cell::new(name),
                Cell::new(version),
                Cell::new(license.source.to_string()).fg(source_color),
                Cell::new(&license.name),
                Cell::new(license.location_string()).fg(location_color),
            ]);
        }
    }

    println!("{}", table);
}

/// Top recovery strategies, e.g. `[manifest (4), about.html (2)]`.
fn summarize_sources(deps: &[DependencyLicenses]) -> String {
    let mut counts: Vec<(LicenseSource, usize)> = Vec::new();
    for source in deps.iter().filter_map(DependencyLicenses::source) {
        if source == LicenseSource::Host {
            continue;
        }
        match counts.iter_mut().find(|(s, _)| *s == source) {
            Some((_, count)) => *count += 1,
            None => counts.push((source, 1)),
        }
    }

    counts.sort_by(|a, b| b.1.cmp(&a.1));

    let summary: Vec<String> = counts
        .iter()
        .map(|(source, count)| format!("{} ({})", source, count))
        .collect();

    if summary.is_empty() {
        String::new()
    } else {
        format!("[{}]", summary.join(", "))
    }
}
