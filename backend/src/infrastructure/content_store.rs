use crate::domain::content::{Collection, ReferenceFile, UnitId};
use crate::domain::ports::ContentRepository;
use crate::infrastructure::scanner::{
    collect_references, decode_text, scan_units, ScanRule, REFERENCES_DIR,
};
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::PathBuf;
use tokio::fs;

// ---------------------------------------------------------------------------
// FsContentStore: filesystem-backed collection
// ---------------------------------------------------------------------------

pub struct FsContentStore {
    root: PathBuf,
    rule: ScanRule,
    collection: Collection,
}

impl FsContentStore {
    pub fn new(root: PathBuf, rule: ScanRule, collection: Collection) -> Self {
        Self {
            root,
            rule,
            collection,
        }
    }

    /// `<root>/<slug>/SKILL.md` with optional `references/**/*.md`.
    pub fn skills(root: PathBuf) -> Self {
        Self::new(root, ScanRule::skills(), Collection::Skills)
    }

    /// `<root>/**/<category>/<slug>.mdx`, skipping `index.mdx` and `excluded_dir`.
    pub fn prompts(root: PathBuf, excluded_dir: impl Into<String>) -> Self {
        Self::new(root, ScanRule::prompts(excluded_dir), Collection::Prompts)
    }
}

#[async_trait]
impl ContentRepository for FsContentStore {
    fn collection(&self) -> Collection {
        self.collection
    }

    async fn list_units(&self) -> Result<Vec<UnitId>> {
        let units = scan_units(&self.root, &self.rule)?;
        tracing::debug!(
            root = %self.root.display(),
            count = units.len(),
            "scanned content units"
        );
        Ok(units)
    }

    async fn read_unit(&self, id: &UnitId) -> Result<Option<String>> {
        let Some(path) = self.rule.entry_path(&self.root, id) else {
            return Ok(None);
        };
        match fs::read(&path).await {
            Ok(bytes) => Ok(Some(decode_text(bytes, &path))),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(None),
            Err(error) => Err(error)
                .with_context(|| format!("failed to read entry file: {}", path.display())),
        }
    }

    async fn list_references(&self, id: &UnitId) -> Result<Vec<ReferenceFile>> {
        let ScanRule::Directory { .. } = self.rule else {
            return Ok(Vec::new());
        };
        let Some(entry) = self.rule.entry_path(&self.root, id) else {
            return Ok(Vec::new());
        };
        let Some(unit_dir) = entry.parent() else {
            return Ok(Vec::new());
        };
        collect_references(&unit_dir.join(REFERENCES_DIR))
    }
}

// ---------------------------------------------------------------------------
// InMemoryContentStore: fixture collection for tests
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, Default)]
struct StoredUnit {
    content: String,
    references: Vec<ReferenceFile>,
}

pub struct InMemoryContentStore {
    collection: Collection,
    units: BTreeMap<UnitId, StoredUnit>,
}

impl InMemoryContentStore {
    pub fn new(collection: Collection) -> Self {
        Self {
            collection,
            units: BTreeMap::new(),
        }
    }

    pub fn with_unit(mut self, id: UnitId, content: impl Into<String>) -> Self {
        self.units.entry(id).or_default().content = content.into();
        self
    }

    pub fn with_reference(
        mut self,
        id: UnitId,
        relative_path: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        let unit = self.units.entry(id).or_default();
        unit.references
            .push(ReferenceFile::new(relative_path, content));
        unit.references
            .sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
        self
    }
}

#[async_trait]
impl ContentRepository for InMemoryContentStore {
    fn collection(&self) -> Collection {
        self.collection
    }

    async fn list_units(&self) -> Result<Vec<UnitId>> {
        Ok(self.units.keys().cloned().collect())
    }

    async fn read_unit(&self, id: &UnitId) -> Result<Option<String>> {
        Ok(self.units.get(id).map(|unit| unit.content.clone()))
    }

    async fn list_references(&self, id: &UnitId) -> Result<Vec<ReferenceFile>> {
        Ok(self
            .units
            .get(id)
            .map(|unit| unit.references.clone())
            .unwrap_or_default())
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
