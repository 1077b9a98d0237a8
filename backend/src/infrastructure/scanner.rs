use crate::domain::content::{ReferenceFile, UnitId};
use anyhow::{Context, Result};
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

pub const SKILL_ENTRY_FILE: &str = "SKILL.md";
pub const REFERENCES_DIR: &str = "references";
const PROMPT_EXTENSION: &str = "mdx";
const PROMPT_INDEX_FILE: &str = "index.mdx";
const REFERENCE_EXTENSION: &str = "md";

/// How a collection root is turned into content units.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScanRule {
    /// `<root>/<slug>/<entry_file>`; flat, no categories.
    Directory { entry_file: String },
    /// Any `<root>/**/<slug>.<extension>`; the directories above the file
    /// form the category.
    Files {
        extension: String,
        excluded_files: Vec<String>,
        excluded_dirs: Vec<String>,
    },
}

impl ScanRule {
    pub fn skills() -> Self {
        Self::Directory {
            entry_file: SKILL_ENTRY_FILE.to_string(),
        }
    }

    pub fn prompts(excluded_dir: impl Into<String>) -> Self {
        Self::Files {
            extension: PROMPT_EXTENSION.to_string(),
            excluded_files: vec![PROMPT_INDEX_FILE.to_string()],
            excluded_dirs: vec![excluded_dir.into()],
        }
    }

    /// Where the entry file for `id` lives, or `None` when the rule could
    /// never have produced `id` from a scan.
    pub fn entry_path(&self, root: &Path, id: &UnitId) -> Option<PathBuf> {
        match self {
            Self::Directory { entry_file } => {
                if !id.category.is_empty() || !is_plain_segment(&id.slug) {
                    return None;
                }
                Some(root.join(&id.slug).join(entry_file))
            }
            Self::Files {
                extension,
                excluded_files,
                excluded_dirs,
            } => {
                let file_name = format!("{}.{extension}", id.slug);
                if !is_plain_segment(&id.slug) || excluded_files.contains(&file_name) {
                    return None;
                }
                let mut path = root.to_path_buf();
                if !id.category.is_empty() {
                    for segment in id.category.split('/') {
                        if !is_plain_segment(segment)
                            || excluded_dirs.iter().any(|dir| dir == segment)
                        {
                            return None;
                        }
                        path.push(segment);
                    }
                }
                path.push(file_name);
                Some(path)
            }
        }
    }
}

fn is_plain_segment(segment: &str) -> bool {
    let mut components = Path::new(segment).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    ) && !segment.contains(['/', '\\'])
}

/// Discover all units under `root`. A missing root yields an empty list.
pub fn scan_units(root: &Path, rule: &ScanRule) -> Result<Vec<UnitId>> {
    if !root.is_dir() {
        return Ok(Vec::new());
    }

    let mut units = match rule {
        ScanRule::Directory { entry_file } => scan_directories(root, entry_file)?,
        ScanRule::Files {
            extension,
            excluded_files,
            excluded_dirs,
        } => scan_files(root, extension, excluded_files, excluded_dirs)?,
    };
    units.sort();
    units.dedup();
    Ok(units)
}

fn scan_directories(root: &Path, entry_file: &str) -> Result<Vec<UnitId>> {
    let mut units = Vec::new();
    for entry in std::fs::read_dir(root)
        .with_context(|| format!("failed to read content dir: {}", root.display()))?
    {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() && path.join(entry_file).is_file() {
            units.push(UnitId::flat(entry.file_name().to_string_lossy()));
        }
    }
    Ok(units)
}

fn scan_files(
    root: &Path,
    extension: &str,
    excluded_files: &[String],
    excluded_dirs: &[String],
) -> Result<Vec<UnitId>> {
    let mut units = Vec::new();
    let walker = WalkDir::new(root).min_depth(1).into_iter().filter_entry(|entry| {
        !(entry.file_type().is_dir()
            && excluded_dirs
                .iter()
                .any(|dir| entry.file_name().to_string_lossy() == dir.as_str()))
    });

    for entry in walker {
        let entry =
            entry.with_context(|| format!("failed to walk content dir: {}", root.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if path.extension().and_then(|ext| ext.to_str()) != Some(extension) {
            continue;
        }
        let file_name = entry.file_name().to_string_lossy();
        if excluded_files.iter().any(|name| file_name == name.as_str()) {
            continue;
        }

        let Some(segments) = relative_segments(root, path) else {
            continue;
        };
        let Some((leaf, parents)) = segments.split_last() else {
            continue;
        };
        let slug = leaf
            .strip_suffix(&format!(".{extension}"))
            .unwrap_or(leaf)
            .to_string();
        units.push(UnitId::new(parents.join("/"), slug));
    }
    Ok(units)
}

/// Path components of `path` below `root`, independent of the host separator.
fn relative_segments(root: &Path, path: &Path) -> Option<Vec<String>> {
    let relative = path.strip_prefix(root).ok()?;
    let segments: Vec<String> = relative
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy().to_string()),
            _ => None,
        })
        .collect();
    (!segments.is_empty()).then_some(segments)
}

/// Every `*.md` file below `dir`, sorted by `/`-joined relative path.
/// A missing directory yields an empty list.
pub fn collect_references(dir: &Path) -> Result<Vec<ReferenceFile>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut references = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1) {
        let entry =
            entry.with_context(|| format!("failed to walk references: {}", dir.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if path.extension().and_then(|ext| ext.to_str()) != Some(REFERENCE_EXTENSION) {
            continue;
        }
        let Some(segments) = relative_segments(dir, path) else {
            continue;
        };
        let bytes = std::fs::read(path)
            .with_context(|| format!("failed to read reference file: {}", path.display()))?;
        references.push(ReferenceFile::new(
            segments.join("/"),
            decode_text(bytes, path),
        ));
    }

    references.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
    Ok(references)
}

/// Content files are UTF-8 by convention; anything else is decoded lossily
/// so one bad file never takes down a listing.
pub fn decode_text(bytes: Vec<u8>, path: &Path) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(error) => {
            tracing::warn!(path = %path.display(), "content file is not valid utf-8; decoding lossily");
            String::from_utf8_lossy(error.as_bytes()).into_owned()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write(path: &Path, content: &str) {
        std::fs::create_dir_all(path.parent().expect("parent")).expect("create dirs");
        std::fs::write(path, content).expect("write file");
    }

    #[test]
    fn missing_root_is_empty() {
        let temp = tempdir().expect("tempdir");
        let missing = temp.path().join("nope");
        assert!(scan_units(&missing, &ScanRule::skills()).expect("scan").is_empty());
        assert!(scan_units(&missing, &ScanRule::prompts("skills"))
            .expect("scan")
            .is_empty());
        assert!(collect_references(&missing).expect("collect").is_empty());
    }

    #[test]
    fn directory_mode_requires_entry_file() {
        let temp = tempdir().expect("tempdir");
        let root = temp.path();
        write(&root.join("zeta/SKILL.md"), "z");
        write(&root.join("alpha/SKILL.md"), "a");
        write(&root.join("incomplete/README.md"), "no entry");
        write(&root.join("loose.md"), "file, not dir");

        let units = scan_units(root, &ScanRule::skills()).expect("scan");
        assert_eq!(units, vec![UnitId::flat("alpha"), UnitId::flat("zeta")]);
    }

    #[test]
    fn file_mode_derives_category_and_skips_reserved() {
        let temp = tempdir().expect("tempdir");
        let root = temp.path();
        write(&root.join("review/pr-review.mdx"), "# PR Review");
        write(&root.join("review/index.mdx"), "index");
        write(&root.join("index.mdx"), "root index");
        write(&root.join("a/b/deep.mdx"), "deep");
        write(&root.join("top.mdx"), "flat");
        write(&root.join("skills/hidden.mdx"), "excluded");
        write(&root.join("review/notes.md"), "wrong extension");

        let units = scan_units(root, &ScanRule::prompts("skills")).expect("scan");
        assert_eq!(
            units,
            vec![
                UnitId::new("", "top"),
                UnitId::new("a/b", "deep"),
                UnitId::new("review", "pr-review"),
            ]
        );
    }

    #[test]
    fn references_are_sorted_by_relative_path() {
        let temp = tempdir().expect("tempdir");
        let dir = temp.path().join("references");
        write(&dir.join("b/c.md"), "World");
        write(&dir.join("a.md"), "Hello");
        write(&dir.join("b.md"), "Between");
        write(&dir.join("image.png"), "binary");

        let references = collect_references(&dir).expect("collect");
        let paths: Vec<&str> = references
            .iter()
            .map(|reference| reference.relative_path.as_str())
            .collect();
        assert_eq!(paths, vec!["a.md", "b.md", "b/c.md"]);
        assert_eq!(references[2].content, "World");
    }

    #[test]
    fn non_utf8_reference_is_decoded_lossily() {
        let temp = tempdir().expect("tempdir");
        let dir = temp.path().join("references");
        std::fs::create_dir_all(&dir).expect("create dir");
        std::fs::write(dir.join("caf.md"), b"caf\xe9").expect("write latin-1");

        let references = collect_references(&dir).expect("collect");
        assert_eq!(references.len(), 1);
        assert_eq!(references[0].content, "caf\u{FFFD}");
    }

    #[test]
    fn entry_path_rejects_ids_outside_the_rule() {
        let root = Path::new("/content");
        let skills = ScanRule::skills();
        assert_eq!(
            skills.entry_path(root, &UnitId::flat("example")),
            Some(PathBuf::from("/content/example/SKILL.md"))
        );
        assert!(skills.entry_path(root, &UnitId::new("cat", "example")).is_none());
        assert!(skills.entry_path(root, &UnitId::flat("..")).is_none());

        let prompts = ScanRule::prompts("skills");
        assert_eq!(
            prompts.entry_path(root, &UnitId::new("review", "pr-review")),
            Some(PathBuf::from("/content/review/pr-review.mdx"))
        );
        assert!(prompts.entry_path(root, &UnitId::new("review", "index")).is_none());
        assert!(prompts.entry_path(root, &UnitId::new("skills", "hidden")).is_none());
    }
}
