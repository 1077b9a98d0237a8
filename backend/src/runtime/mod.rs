pub mod bootstrap;

use anyhow::Result;
use std::sync::Arc;

use crate::application::{CatalogService, DownloadService};
use crate::domain::ports::ContentRepository;
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::content_store::FsContentStore;
use crate::interface::AppState;
use crate::runtime::bootstrap::inspect_content_layout;

pub fn build_app(config: &AppConfig) -> Result<AppState> {
    inspect_content_layout(config);

    let prompts: Arc<dyn ContentRepository> = Arc::new(FsContentStore::prompts(
        config.prompts_dir.clone(),
        config.excluded_dir.clone(),
    ));
    let skills: Arc<dyn ContentRepository> =
        Arc::new(FsContentStore::skills(config.skills_dir.clone()));
    let downloads = DownloadService::new(config.skills_dir.clone(), config.archives_dir.clone());

    Ok(AppState::new(
        CatalogService::new(prompts),
        CatalogService::new(skills),
        downloads,
        config.site_url.clone(),
    ))
}

pub async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("shutdown signal received");
}
