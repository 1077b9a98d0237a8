use crate::infrastructure::config::AppConfig;

/// Which of the configured content directories exist at startup.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ContentLayout {
    pub skills: bool,
    pub prompts: bool,
    pub archives: bool,
}

/// Content is read-only, so nothing is created here; missing directories
/// only produce warnings and empty listings later on.
pub fn inspect_content_layout(config: &AppConfig) -> ContentLayout {
    let layout = ContentLayout {
        skills: config.skills_dir.is_dir(),
        prompts: config.prompts_dir.is_dir(),
        archives: config.archives_dir.is_dir(),
    };

    if !layout.skills {
        tracing::warn!(skills_dir = %config.skills_dir.display(), "skills directory missing");
    }
    if !layout.prompts {
        tracing::warn!(prompts_dir = %config.prompts_dir.display(), "prompts directory missing");
    }
    if !layout.archives {
        tracing::info!(
            archives_dir = %config.archives_dir.display(),
            "no prebuilt skill archives; bulk download disabled until promptdocs-archives runs"
        );
    }
    tracing::debug!(?layout, "inspected content layout");

    layout
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::config::{EnvOverrides, FileConfig};
    use tempfile::tempdir;

    #[test]
    fn reports_present_directories() {
        let temp = tempdir().expect("tempdir");
        std::fs::create_dir_all(temp.path().join("skills")).expect("skills dir");
        let config = AppConfig::from_inputs(
            FileConfig::default(),
            EnvOverrides::default(),
            temp.path().to_path_buf(),
        );

        let layout = inspect_content_layout(&config);
        assert_eq!(
            layout,
            ContentLayout {
                skills: true,
                prompts: false,
                archives: false,
            }
        );
    }
}
