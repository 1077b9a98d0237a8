use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Which content collection a unit belongs to. Drives URL derivation and
/// the wording of not-found errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    Skills,
    Prompts,
}

impl Collection {
    pub fn kind(self) -> &'static str {
        match self {
            Self::Skills => "Skill",
            Self::Prompts => "Prompt",
        }
    }

    pub fn browse_url(self, id: &UnitId) -> String {
        match self {
            Self::Skills => format!("/skills/{}", id.path()),
            Self::Prompts => format!("/docs/{}", id.path()),
        }
    }

    pub fn api_url(self, id: &UnitId) -> String {
        match self {
            Self::Skills => format!("/api/skills/{}", id.path()),
            Self::Prompts => format!("/api/prompts/{}", id.path()),
        }
    }

    /// Only skills are downloadable.
    pub fn download_url(self, id: &UnitId) -> Option<String> {
        match self {
            Self::Skills => Some(format!("/api/skills/{}/download", id.path())),
            Self::Prompts => None,
        }
    }
}

/// External key of a content unit. Ordering is (category, slug), which is
/// the listing order everywhere.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UnitId {
    /// `/`-joined directories above the leaf; empty for flat collections.
    pub category: String,
    pub slug: String,
}

impl UnitId {
    pub fn new(category: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            slug: slug.into(),
        }
    }

    pub fn flat(slug: impl Into<String>) -> Self {
        Self::new(String::new(), slug)
    }

    /// Split a `category/.../slug` path. Returns `None` for paths that could
    /// escape the collection root (empty, `.` or `..` segments, backslashes).
    pub fn from_path(path: &str) -> Option<Self> {
        let trimmed = path.trim_matches('/');
        if trimmed.is_empty() || trimmed.contains('\\') {
            return None;
        }
        let segments: Vec<&str> = trimmed.split('/').collect();
        if segments
            .iter()
            .any(|segment| segment.is_empty() || *segment == "." || *segment == "..")
        {
            return None;
        }
        let (slug, category) = segments.split_last()?;
        Some(Self::new(category.join("/"), *slug))
    }

    pub fn path(&self) -> String {
        if self.category.is_empty() {
            self.slug.clone()
        } else {
            format!("{}/{}", self.category, self.slug)
        }
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Auxiliary document bundled with a skill.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceFile {
    /// Path under `references/`, always `/`-separated.
    pub relative_path: String,
    pub content: String,
}

impl ReferenceFile {
    pub fn new(relative_path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            relative_path: relative_path.into(),
            content: content.into(),
        }
    }
}

/// Listing entry: everything derivable without reading reference files.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentMeta {
    pub slug: String,
    pub category: String,
    /// Frontmatter `name`, empty when absent.
    pub name: String,
    pub title: String,
    pub description: String,
    pub url: String,
    pub api_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<BTreeMap<String, String>>,
}

/// Metadata plus the assembled document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentDocument {
    #[serde(flatten)]
    pub meta: ContentMeta,
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_path_splits_category_and_slug() {
        let id = UnitId::from_path("review/deep/pr-review").expect("id");
        assert_eq!(id.category, "review/deep");
        assert_eq!(id.slug, "pr-review");
        assert_eq!(id.path(), "review/deep/pr-review");

        let flat = UnitId::from_path("example/").expect("flat id");
        assert_eq!(flat, UnitId::flat("example"));
    }

    #[test]
    fn from_path_rejects_traversal() {
        assert!(UnitId::from_path("").is_none());
        assert!(UnitId::from_path("../secret").is_none());
        assert!(UnitId::from_path("a//b").is_none());
        assert!(UnitId::from_path("a\\b").is_none());
        assert!(UnitId::from_path("./b").is_none());
    }

    #[test]
    fn ordering_is_category_then_slug() {
        let mut ids = vec![
            UnitId::new("b", "a"),
            UnitId::new("a", "z"),
            UnitId::new("a", "b"),
        ];
        ids.sort();
        let paths: Vec<String> = ids.iter().map(UnitId::path).collect();
        assert_eq!(paths, vec!["a/b", "a/z", "b/a"]);
    }

    #[test]
    fn urls_derive_from_collection() {
        let skill = UnitId::flat("example");
        assert_eq!(Collection::Skills.browse_url(&skill), "/skills/example");
        assert_eq!(Collection::Skills.api_url(&skill), "/api/skills/example");
        assert_eq!(
            Collection::Skills.download_url(&skill).as_deref(),
            Some("/api/skills/example/download")
        );

        let prompt = UnitId::new("review", "pr-review");
        assert_eq!(Collection::Prompts.browse_url(&prompt), "/docs/review/pr-review");
        assert_eq!(
            Collection::Prompts.api_url(&prompt),
            "/api/prompts/review/pr-review"
        );
        assert!(Collection::Prompts.download_url(&prompt).is_none());
    }
}
