use crate::domain::content::UnitId;
use crate::infrastructure::archive::{
    build_bundle_archive, build_directory_archive, BUNDLE_ARCHIVE_NAME,
};
use crate::infrastructure::scanner::ScanRule;
use anyhow::{Context, Result};
use std::path::PathBuf;

/// A finished archive ready to send.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Archive {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

#[derive(Clone)]
pub struct DownloadService {
    skills_dir: PathBuf,
    archives_dir: PathBuf,
}

impl DownloadService {
    pub fn new(skills_dir: PathBuf, archives_dir: PathBuf) -> Self {
        Self {
            skills_dir,
            archives_dir,
        }
    }

    /// Zip of one skill directory, `None` if the skill has no `SKILL.md`.
    pub async fn skill_archive(&self, slug: &str) -> Result<Option<Archive>> {
        let id = UnitId::flat(slug);
        let Some(entry) = ScanRule::skills().entry_path(&self.skills_dir, &id) else {
            return Ok(None);
        };
        if !entry.is_file() {
            return Ok(None);
        }

        let source = self.skills_dir.join(&id.slug);
        let root_name = id.slug.clone();
        let bytes = tokio::task::spawn_blocking(move || build_directory_archive(&source, &root_name))
            .await
            .context("skill archive task failed")??;

        tracing::info!(slug = %id.slug, bytes = bytes.len(), "built skill archive");
        Ok(Some(Archive {
            file_name: format!("{}.zip", id.slug),
            bytes,
        }))
    }

    /// Zip of every prebuilt per-skill archive, `None` if there are none.
    pub async fn all_skills_archive(&self) -> Result<Option<Archive>> {
        let archives_dir = self.archives_dir.clone();
        let bundle = tokio::task::spawn_blocking(move || build_bundle_archive(&archives_dir))
            .await
            .context("bundle archive task failed")??;

        let Some(bytes) = bundle else {
            tracing::warn!(
                archives_dir = %self.archives_dir.display(),
                "no prebuilt skill archives to bundle"
            );
            return Ok(None);
        };
        tracing::info!(bytes = bytes.len(), "built skills bundle");
        Ok(Some(Archive {
            file_name: BUNDLE_ARCHIVE_NAME.to_string(),
            bytes,
        }))
    }
}
