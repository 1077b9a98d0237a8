use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

const DEFAULT_CONFIG_FILE_NAME: &str = "promptdocs.json";
const CONFIG_PATH_ENV: &str = "PROMPTDOCS_CONFIG";
const CONTENT_ROOT_ENV: &str = "PROMPTDOCS_CONTENT_ROOT";
const HOST_ENV: &str = "PROMPTDOCS_HOST";
const PORT_ENV: &str = "PROMPTDOCS_PORT";
const SITE_URL_ENV: &str = "PROMPTDOCS_SITE_URL";

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub content_root: PathBuf,
    pub skills_dir: PathBuf,
    pub prompts_dir: PathBuf,
    pub archives_dir: PathBuf,
    /// Directory name under the prompts root that never holds prompts.
    pub excluded_dir: String,
    /// Prefix for absolute links in the LLM corpus; empty keeps them relative.
    pub site_url: String,
    pub config_path: PathBuf,
    pub log_level: String,
    pub log_retention_days: u16,
    pub log_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        let cwd = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self::defaults_for_root(cwd)
    }
}

/// Environment values that take priority over the config file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EnvOverrides {
    pub content_root: Option<PathBuf>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub site_url: Option<String>,
}

impl EnvOverrides {
    pub fn from_env() -> Self {
        Self {
            content_root: env::var_os(CONTENT_ROOT_ENV)
                .map(PathBuf::from)
                .filter(|path| !path.as_os_str().is_empty()),
            host: env::var(HOST_ENV).ok().filter(|value| !value.is_empty()),
            port: env::var(PORT_ENV).ok().and_then(|value| value.parse().ok()),
            site_url: env::var(SITE_URL_ENV).ok(),
        }
    }
}

impl AppConfig {
    /// Defaults < `promptdocs.json` < environment.
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();
        let cwd = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        let config_path = env::var_os(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE_NAME));
        Self::from_config_file_path(&config_path, EnvOverrides::from_env(), cwd)
    }

    /// A missing file is not an error; defaults apply.
    pub fn from_config_file_path(
        path: &Path,
        overrides: EnvOverrides,
        cwd: PathBuf,
    ) -> Result<Self> {
        let config_path = resolve_path(&cwd, path.to_path_buf());
        let file_config = if config_path.exists() {
            read_config_file(&config_path)?
        } else {
            FileConfig::default()
        };
        let mut config = Self::from_inputs(file_config, overrides, cwd);
        config.config_path = config_path;
        Ok(config)
    }

    pub fn from_inputs(file_config: FileConfig, overrides: EnvOverrides, cwd: PathBuf) -> Self {
        let content_root = match overrides.content_root.or(file_config.content.root) {
            Some(root) => resolve_path(&cwd, root),
            None => cwd.clone(),
        };
        let mut config = Self::defaults_for_root(content_root);
        config.config_path = cwd.join(DEFAULT_CONFIG_FILE_NAME);

        if let Some(host) = file_config.server.host {
            config.host = host;
        }
        if let Some(port) = file_config.server.port {
            config.port = port;
        }

        let root = config.content_root.clone();
        if let Some(skills_dir) = file_config.content.skills_dir {
            config.skills_dir = resolve_path(&root, skills_dir);
        }
        if let Some(prompts_dir) = file_config.content.prompts_dir {
            config.prompts_dir = resolve_path(&root, prompts_dir);
        }
        if let Some(archives_dir) = file_config.content.archives_dir {
            config.archives_dir = resolve_path(&root, archives_dir);
        }
        if let Some(excluded_dir) = file_config.content.excluded_dir {
            config.excluded_dir = excluded_dir;
        }
        if let Some(site_url) = file_config.content.site_url {
            config.site_url = site_url;
        }

        if let Some(level) = file_config.logging.level {
            config.log_level = normalize_log_level(level);
        }
        if let Some(retention_days) = file_config.logging.retention_days {
            config.log_retention_days = retention_days.max(1);
        }
        if let Some(directory) = file_config.logging.directory {
            config.log_dir = resolve_path(&root, directory);
        }

        if let Some(host) = overrides.host {
            config.host = host;
        }
        if let Some(port) = overrides.port {
            config.port = port;
        }
        if let Some(site_url) = overrides.site_url {
            config.site_url = site_url;
        }
        config.site_url = config.site_url.trim_end_matches('/').to_string();

        config
    }

    fn defaults_for_root(content_root: PathBuf) -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            skills_dir: content_root.join("skills"),
            prompts_dir: content_root.join("content").join("docs"),
            archives_dir: content_root.join("public").join("skills"),
            excluded_dir: "skills".to_string(),
            site_url: String::new(),
            config_path: content_root.join(DEFAULT_CONFIG_FILE_NAME),
            log_level: "info".to_string(),
            log_retention_days: 7,
            log_dir: content_root.join("logs"),
            content_root,
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct FileConfig {
    pub server: ServerFileConfig,
    pub content: ContentFileConfig,
    pub logging: LoggingFileConfig,
}

#[derive(Clone, Debug, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServerFileConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
}

#[derive(Clone, Debug, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ContentFileConfig {
    pub root: Option<PathBuf>,
    pub skills_dir: Option<PathBuf>,
    pub prompts_dir: Option<PathBuf>,
    pub archives_dir: Option<PathBuf>,
    pub excluded_dir: Option<String>,
    pub site_url: Option<String>,
}

#[derive(Clone, Debug, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct LoggingFileConfig {
    pub level: Option<String>,
    pub retention_days: Option<u16>,
    pub directory: Option<PathBuf>,
}

pub fn read_config_file(path: &Path) -> Result<FileConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file: {}", path.display()))?;
    serde_json::from_str::<FileConfig>(&raw)
        .with_context(|| format!("invalid config json: {}", path.display()))
}

fn resolve_path(base: &Path, path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        path
    } else {
        base.join(path)
    }
}

fn normalize_log_level(level: String) -> String {
    match level.to_ascii_lowercase().as_str() {
        "debug" => "debug".to_string(),
        "info" => "info".to_string(),
        "warning" | "warn" => "warn".to_string(),
        "error" => "error".to_string(),
        _ => "info".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn defaults_derive_from_content_root() {
        let config = AppConfig::from_inputs(
            FileConfig::default(),
            EnvOverrides::default(),
            PathBuf::from("/srv/site"),
        );
        assert_eq!(config.port, 3000);
        assert_eq!(config.skills_dir, PathBuf::from("/srv/site/skills"));
        assert_eq!(config.prompts_dir, PathBuf::from("/srv/site/content/docs"));
        assert_eq!(config.archives_dir, PathBuf::from("/srv/site/public/skills"));
        assert_eq!(config.log_dir, PathBuf::from("/srv/site/logs"));
        assert_eq!(config.excluded_dir, "skills");
    }

    #[test]
    fn env_overrides_beat_file_values() {
        let file = FileConfig {
            server: ServerFileConfig {
                host: Some("127.0.0.1".to_string()),
                port: Some(8080),
            },
            content: ContentFileConfig {
                root: Some(PathBuf::from("site")),
                site_url: Some("https://file.example/".to_string()),
                ..ContentFileConfig::default()
            },
            logging: LoggingFileConfig {
                level: Some("WARNING".to_string()),
                retention_days: Some(0),
                directory: None,
            },
        };
        let overrides = EnvOverrides {
            port: Some(9090),
            site_url: Some("https://env.example/".to_string()),
            ..EnvOverrides::default()
        };

        let config = AppConfig::from_inputs(file, overrides, PathBuf::from("/work"));
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 9090);
        assert_eq!(config.content_root, PathBuf::from("/work/site"));
        assert_eq!(config.skills_dir, PathBuf::from("/work/site/skills"));
        assert_eq!(config.site_url, "https://env.example");
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.log_retention_days, 1);
    }

    #[test]
    fn missing_config_file_uses_defaults() {
        let temp = tempdir().expect("tempdir");
        let config = AppConfig::from_config_file_path(
            Path::new("promptdocs.json"),
            EnvOverrides::default(),
            temp.path().to_path_buf(),
        )
        .expect("config");
        assert_eq!(config.content_root, temp.path());
        assert_eq!(config.config_path, temp.path().join("promptdocs.json"));
    }

    #[test]
    fn config_file_is_read_and_invalid_json_errors() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("promptdocs.json");
        std::fs::write(
            &path,
            r#"{ "content": { "skills_dir": "/abs/skills", "excluded_dir": "bundles" } }"#,
        )
        .expect("write config");

        let config = AppConfig::from_config_file_path(
            &path,
            EnvOverrides::default(),
            temp.path().to_path_buf(),
        )
        .expect("config");
        assert_eq!(config.skills_dir, PathBuf::from("/abs/skills"));
        assert_eq!(config.excluded_dir, "bundles");

        std::fs::write(&path, "{ not json").expect("write broken config");
        let error = AppConfig::from_config_file_path(
            &path,
            EnvOverrides::default(),
            temp.path().to_path_buf(),
        )
        .expect_err("invalid json must fail");
        assert!(error.to_string().contains("invalid config json"));
    }
}
