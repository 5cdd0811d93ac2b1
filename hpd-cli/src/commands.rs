//! Subcommand implementations

use std::fmt::Write as _;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use hpd_catalog::Catalog;
use hpd_format::{SystemGroups, UnidenFile};

use crate::settings::Settings;

/// Outcome of a subcommand
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failure,
}

fn read_file(path: &Path) -> anyhow::Result<(String, UnidenFile)> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let file = text
        .parse::<UnidenFile>()
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    Ok((text, file))
}

/// Print a per-system outline
pub fn summary(path: &Path) -> anyhow::Result<Outcome> {
    let (_, file) = read_file(path)?;
    print!("{}", render_summary(&file));
    Ok(Outcome::Success)
}

pub fn render_summary(file: &UnidenFile) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} (format {}), {} systems",
        file.target_model,
        file.format_version,
        file.systems.len()
    );
    for system in &file.systems {
        let name = system.value.split('\t').next().unwrap_or_default();
        let _ = writeln!(out, "  [{}] {}", system.kind().name(), name);
        let _ = writeln!(
            out,
            "    radios: {}, sites: {}, groups: {}, channels: {}",
            system.radios.len(),
            system.sites.len(),
            system.groups_len(),
            system.channel_count()
        );
        match &system.groups {
            SystemGroups::Trunked(groups) => {
                for group in groups {
                    let _ = writeln!(out, "    {}", group);
                }
            }
            SystemGroups::Conventional(groups) => {
                for group in groups {
                    let _ = writeln!(out, "    {}", group);
                }
            }
        }
    }
    out
}

/// First differing line as (1-based line number, expected, actual)
pub fn first_difference<'a>(
    expected: &'a str,
    actual: &'a str,
) -> Option<(usize, Option<&'a str>, Option<&'a str>)> {
    let mut left = expected.split_inclusive('\n');
    let mut right = actual.split_inclusive('\n');
    let mut number = 1;
    loop {
        match (left.next(), right.next()) {
            (None, None) => return None,
            (l, r) if l != r => return Some((number, l, r)),
            _ => number += 1,
        }
    }
}

/// Print the parsed record tree as JSON
pub fn dump(path: &Path) -> anyhow::Result<Outcome> {
    let (_, file) = read_file(path)?;
    println!("{}", serde_json::to_string_pretty(&file)?);
    Ok(Outcome::Success)
}

/// Verify that export reproduces the input byte for byte
pub fn check(path: &Path) -> anyhow::Result<Outcome> {
    let (text, file) = read_file(path)?;
    let exported = file.export();
    match first_difference(&text, &exported) {
        None => {
            tracing::info!("{}: round trip OK", path.display());
            println!("{}: OK", path.display());
            Ok(Outcome::Success)
        }
        Some((line, expected, actual)) => {
            println!("{}: round trip differs at line {}", path.display(), line);
            println!("  input:  {:?}", expected.unwrap_or("<end of file>"));
            println!("  output: {:?}", actual.unwrap_or("<end of file>"));
            Ok(Outcome::Failure)
        }
    }
}

/// Make sure the export of `file` reproduces `input`, the text it was
/// parsed from, and parses back to the same tree
///
/// Fails when parsing stopped early and dropped part of the input.
pub fn verify_export(input: &str, file: &UnidenFile) -> anyhow::Result<String> {
    let exported = file.export();
    if let Some((line, expected, _)) = first_difference(input, &exported) {
        bail!(
            "Export differs from the input at line {}: {:?}",
            line,
            expected.unwrap_or("<end of file>")
        );
    }
    let reparsed = exported
        .parse::<UnidenFile>()
        .context("Exported text does not parse")?;
    if reparsed != *file || reparsed.export() != exported {
        bail!("Exported text does not reproduce the parsed file");
    }
    Ok(exported)
}

/// Parse and rewrite a file
pub fn export(input: &Path, output: &Path, settings: &Settings) -> anyhow::Result<Outcome> {
    let (text, file) = read_file(input)?;
    if settings.verify_round_trip {
        verify_export(&text, &file)?;
        tracing::debug!("Verified export of {}", input.display());
    }

    let out = File::create(output)
        .with_context(|| format!("Failed to create {}", output.display()))?;
    file.write_to(BufWriter::new(out))
        .with_context(|| format!("Failed to write {}", output.display()))?;
    tracing::info!(
        "Exported {} systems to {}",
        file.systems.len(),
        output.display()
    );
    Ok(Outcome::Success)
}

/// Cross-reference trunked channels against a talkgroup catalog
pub fn xref(path: &Path, catalog: Option<PathBuf>, settings: &Settings) -> anyhow::Result<Outcome> {
    let Some(catalog_path) = catalog.or_else(|| settings.catalog.clone()) else {
        bail!("No catalog given and none configured in settings");
    };
    let (_, file) = read_file(path)?;
    let catalog = Catalog::from_path(&catalog_path)
        .with_context(|| format!("Failed to load catalog {}", catalog_path.display()))?;
    print!("{}", render_xref(&catalog, &file));
    Ok(Outcome::Success)
}

pub fn render_xref(catalog: &Catalog, file: &UnidenFile) -> String {
    let mut out = String::new();
    for annotation in catalog.annotate(file) {
        if let Some(entry) = annotation.entry {
            let _ = writeln!(
                out,
                "{:>8} {:<20} {:<20} {} [{}]",
                annotation.channel.tgid,
                annotation.channel.name,
                annotation.group.name,
                entry.alpha_tag,
                entry.category
            );
        }
    }

    let missing = catalog.missing_from(file);
    if !missing.is_empty() {
        let ids: Vec<String> = missing.iter().map(u32::to_string).collect();
        let _ = writeln!(out, "Missing from catalog: {}", ids.join(", "));
    }
    out
}

/// Show or save the effective settings
pub fn config(settings: &Settings, save: bool) -> anyhow::Result<Outcome> {
    if save {
        let path = settings.save()?;
        println!("Saved {}", path.display());
    } else {
        match Settings::settings_path() {
            Some(path) => println!("# {}", path.display()),
            None => println!("# no settings path"),
        }
        println!("{}", serde_json::to_string_pretty(settings)?);
    }
    Ok(Outcome::Success)
}
