//! Build step: writes one `<slug>.zip` per skill into the archives
//! directory so the bulk download has something to bundle.

use anyhow::Result;
use promptdocs_backend::infrastructure::archive::prebuild_skill_archives;
use promptdocs_backend::infrastructure::config::AppConfig;
use promptdocs_backend::infrastructure::logging::init_logging;
use tracing::info;

const COMPONENT: &str = "archives";

fn main() -> Result<()> {
    let config = AppConfig::load()?;
    let logging_runtime = init_logging(&config, COMPONENT)?;

    info!(
        skills_dir = %config.skills_dir.display(),
        archives_dir = %config.archives_dir.display(),
        "building skill archives"
    );
    let written = prebuild_skill_archives(&config.skills_dir, &config.archives_dir)?;
    info!(count = written.len(), "skill archives written");

    drop(logging_runtime);
    Ok(())
}
