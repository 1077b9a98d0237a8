use crate::domain::content::{Collection, ReferenceFile, UnitId};
use anyhow::Result;
use async_trait::async_trait;

/// Read-only view over one content collection.
///
/// Missing units and missing reference directories are normal outcomes
/// (`None` / empty), never errors. Errors are reserved for I/O failures.
#[async_trait]
pub trait ContentRepository: Send + Sync {
    fn collection(&self) -> Collection;

    /// Every unit in the collection, sorted by (category, slug).
    async fn list_units(&self) -> Result<Vec<UnitId>>;

    /// Raw text of the unit's entry file.
    async fn read_unit(&self, id: &UnitId) -> Result<Option<String>>;

    /// Reference files sorted by relative path.
    async fn list_references(&self, id: &UnitId) -> Result<Vec<ReferenceFile>>;
}
