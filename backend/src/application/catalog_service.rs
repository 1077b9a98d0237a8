use crate::domain::assembly::assemble_document;
use crate::domain::content::{Collection, ContentDocument, ContentMeta, UnitId};
use crate::domain::frontmatter::{derive_heading, parse_frontmatter, Frontmatter};
use crate::domain::ports::ContentRepository;
use anyhow::Result;
use std::sync::Arc;

/// Read API over one collection. Every operation goes back to the
/// repository; nothing is cached between calls.
#[derive(Clone)]
pub struct CatalogService {
    repository: Arc<dyn ContentRepository>,
}

impl CatalogService {
    pub fn new(repository: Arc<dyn ContentRepository>) -> Self {
        Self { repository }
    }

    pub fn collection(&self) -> Collection {
        self.repository.collection()
    }

    /// Known identifiers, e.g. for precomputing static routes.
    pub async fn list_ids(&self) -> Result<Vec<UnitId>> {
        self.repository.list_units().await
    }

    /// Metadata only; reference files are not read.
    pub async fn list_metadata(&self) -> Result<Vec<ContentMeta>> {
        let ids = self.repository.list_units().await?;
        let mut listing = Vec::with_capacity(ids.len());
        for id in ids {
            let Some(raw) = self.repository.read_unit(&id).await? else {
                tracing::debug!(unit = %id, "unit vanished between scan and read; skipping");
                continue;
            };
            let frontmatter = parse_frontmatter(&raw);
            listing.push(describe(self.collection(), &id, &frontmatter));
        }
        tracing::debug!(
            collection = ?self.collection(),
            count = listing.len(),
            "listed metadata"
        );
        Ok(listing)
    }

    /// Metadata plus assembled content for every unit.
    pub async fn list_with_content(&self) -> Result<Vec<ContentDocument>> {
        let ids = self.repository.list_units().await?;
        let mut documents = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(document) = self.get(&id).await? {
                documents.push(document);
            }
        }
        tracing::debug!(
            collection = ?self.collection(),
            count = documents.len(),
            "listed assembled documents"
        );
        Ok(documents)
    }

    /// `Ok(None)` when the unit has no entry file.
    pub async fn get(&self, id: &UnitId) -> Result<Option<ContentDocument>> {
        let Some(raw) = self.repository.read_unit(id).await? else {
            return Ok(None);
        };
        let frontmatter = parse_frontmatter(&raw);
        let references = self.repository.list_references(id).await?;
        let content = assemble_document(&frontmatter.body, &references);
        Ok(Some(ContentDocument {
            meta: describe(self.collection(), id, &frontmatter),
            content,
        }))
    }
}

fn describe(collection: Collection, id: &UnitId, frontmatter: &Frontmatter) -> ContentMeta {
    let heading = derive_heading(frontmatter, &id.slug);
    ContentMeta {
        slug: id.slug.clone(),
        category: id.category.clone(),
        name: frontmatter.name.clone(),
        title: heading.title,
        description: heading.description,
        url: collection.browse_url(id),
        api_url: collection.api_url(id),
        download_url: collection.download_url(id),
        header: frontmatter.header.clone(),
    }
}

/// Sorted, de-duplicated, non-empty categories of a listing.
pub fn distinct_categories(listing: &[ContentMeta]) -> Vec<String> {
    let mut categories: Vec<String> = listing
        .iter()
        .filter(|meta| !meta.category.is_empty())
        .map(|meta| meta.category.clone())
        .collect();
    categories.sort();
    categories.dedup();
    categories
}
