//! Zip packaging for skill downloads.
//!
//! Every builder owns its `ZipWriter` for the whole call and returns bytes
//! only after `finish()`; inputs are checked before a writer is created.

use crate::infrastructure::scanner::{scan_units, ScanRule};
use anyhow::{Context, Result};
use std::fs::File;
use std::io::{Cursor, Write};
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

pub const BUNDLE_ARCHIVE_NAME: &str = "all-skills.zip";
const ARCHIVE_EXTENSION: &str = "zip";

fn entry_options() -> SimpleFileOptions {
    SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .compression_level(Some(9))
        .unix_permissions(0o644)
}

fn directory_options() -> SimpleFileOptions {
    SimpleFileOptions::default().unix_permissions(0o755)
}

/// Zip `source_dir` with all of its contents placed under `<root_name>/`.
pub fn build_directory_archive(source_dir: &Path, root_name: &str) -> Result<Vec<u8>> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    writer
        .add_directory(format!("{root_name}/"), directory_options())
        .context("failed to add archive root")?;

    for entry in WalkDir::new(source_dir).min_depth(1).sort_by_file_name() {
        let entry = entry
            .with_context(|| format!("failed to walk skill dir: {}", source_dir.display()))?;
        let Some(relative) = archive_relative_path(source_dir, entry.path()) else {
            continue;
        };
        let name = format!("{root_name}/{relative}");

        if entry.file_type().is_dir() {
            writer
                .add_directory(format!("{name}/"), directory_options())
                .with_context(|| format!("failed to add archive dir: {name}"))?;
        } else if entry.file_type().is_file() {
            writer
                .start_file(name.as_str(), entry_options())
                .with_context(|| format!("failed to start archive entry: {name}"))?;
            let mut file = File::open(entry.path())
                .with_context(|| format!("failed to open: {}", entry.path().display()))?;
            std::io::copy(&mut file, &mut writer)
                .with_context(|| format!("failed to compress: {}", entry.path().display()))?;
        }
    }

    let cursor = writer.finish().context("failed to finalize archive")?;
    Ok(cursor.into_inner())
}

fn archive_relative_path(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let segments: Vec<String> = relative
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy().to_string()),
            _ => None,
        })
        .collect();
    (!segments.is_empty()).then(|| segments.join("/"))
}

/// Prebuilt per-skill archives in `archives_dir`, sorted by file name.
/// The bundle itself is never part of the list.
pub fn list_prebuilt_archives(archives_dir: &Path) -> Result<Vec<PathBuf>> {
    if !archives_dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut archives = Vec::new();
    for entry in std::fs::read_dir(archives_dir)
        .with_context(|| format!("failed to read archives dir: {}", archives_dir.display()))?
    {
        let path = entry?.path();
        let is_zip = path.extension().and_then(|ext| ext.to_str()) == Some(ARCHIVE_EXTENSION);
        let is_bundle = path.file_name().and_then(|name| name.to_str()) == Some(BUNDLE_ARCHIVE_NAME);
        if path.is_file() && is_zip && !is_bundle {
            archives.push(path);
        }
    }
    archives.sort();
    Ok(archives)
}

/// Zip every prebuilt archive into one outer archive. `None` when there is
/// nothing to bundle.
pub fn build_bundle_archive(archives_dir: &Path) -> Result<Option<Vec<u8>>> {
    let archives = list_prebuilt_archives(archives_dir)?;
    if archives.is_empty() {
        return Ok(None);
    }

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for path in &archives {
        let Some(name) = path.file_name().map(|name| name.to_string_lossy().to_string()) else {
            continue;
        };
        let bytes = std::fs::read(path)
            .with_context(|| format!("failed to read archive: {}", path.display()))?;
        writer
            .start_file(name.as_str(), entry_options())
            .with_context(|| format!("failed to start bundle entry: {name}"))?;
        writer
            .write_all(&bytes)
            .with_context(|| format!("failed to write bundle entry: {name}"))?;
    }

    let cursor = writer.finish().context("failed to finalize bundle archive")?;
    Ok(Some(cursor.into_inner()))
}

/// Write `<out_dir>/<slug>.zip` for every skill under `skills_dir`.
pub fn prebuild_skill_archives(skills_dir: &Path, out_dir: &Path) -> Result<Vec<PathBuf>> {
    let skills = scan_units(skills_dir, &ScanRule::skills())?;
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("failed to create archives dir: {}", out_dir.display()))?;

    let mut written = Vec::with_capacity(skills.len());
    for skill in skills {
        let bytes = build_directory_archive(&skills_dir.join(&skill.slug), &skill.slug)?;
        let target = out_dir.join(format!("{}.{ARCHIVE_EXTENSION}", skill.slug));
        std::fs::write(&target, bytes)
            .with_context(|| format!("failed to write archive: {}", target.display()))?;
        tracing::info!(slug = %skill.slug, path = %target.display(), "built skill archive");
        written.push(target);
    }
    Ok(written)
}
