use anyhow::Result;
use promptdocs_backend::infrastructure::config::AppConfig;
use promptdocs_backend::infrastructure::logging::init_logging;
use promptdocs_backend::interface::router;
use promptdocs_backend::runtime::{build_app, shutdown_signal};
use tokio::net::TcpListener;
use tracing::info;

const COMPONENT: &str = "server";

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::load()?;

    let logging_runtime = init_logging(&config, COMPONENT)?;
    info!(
        content_root = %config.content_root.display(),
        config_file = %config.config_path.display(),
        log_dir = %config.log_dir.display(),
        log_file = %logging_runtime.log_file.display(),
        log_level = %config.log_level,
        retention_days = config.log_retention_days,
        "promptdocs logging initialized"
    );

    let state = build_app(&config)?;
    let app = router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr).await?;
    info!(address = %addr, "promptdocs server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    drop(logging_runtime);

    Ok(())
}
