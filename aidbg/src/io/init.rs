//! Initialization helpers for `.aidbg/` scaffolding.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use tracing::info;

use super::config::{AidbgConfig, write_config};

const AIDBG_GITIGNORE: &str = "history.txt\n";

/// All canonical paths within `.aidbg/` for a project root.
#[derive(Debug, Clone)]
pub struct AidbgPaths {
    pub root: PathBuf,
    pub aidbg_dir: PathBuf,
    pub gitignore_path: PathBuf,
    pub config_path: PathBuf,
    pub history_path: PathBuf,
}

impl AidbgPaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let aidbg_dir = root.join(".aidbg");
        Self {
            root: root.clone(),
            aidbg_dir: aidbg_dir.clone(),
            gitignore_path: aidbg_dir.join(".gitignore"),
            config_path: aidbg_dir.join("config.toml"),
            history_path: aidbg_dir.join("history.txt"),
        }
    }
}

/// Options for `init_aidbg`.
#[derive(Debug, Clone)]
pub struct InitOptions {
    /// If true, overwrite existing files.
    pub force: bool,
}

/// Create `.aidbg/` scaffolding in `root`.
///
/// Fails if `.aidbg/` already exists unless `options.force` is set.
pub fn init_aidbg(root: &Path, options: &InitOptions) -> Result<AidbgPaths> {
    let paths = AidbgPaths::new(root);
    if paths.aidbg_dir.exists() && !options.force {
        return Err(anyhow!(
            "aidbg init: .aidbg already exists (use --force to overwrite)"
        ));
    }
    if paths.aidbg_dir.exists() && !paths.aidbg_dir.is_dir() {
        return Err(anyhow!("aidbg init: .aidbg exists but is not a directory"));
    }

    fs::create_dir_all(&paths.aidbg_dir)
        .with_context(|| format!("create directory {}", paths.aidbg_dir.display()))?;
    fs::write(&paths.gitignore_path, AIDBG_GITIGNORE)
        .with_context(|| format!("write {}", paths.gitignore_path.display()))?;
    write_config(&paths.config_path, &AidbgConfig::default())?;

    info!(dir = %paths.aidbg_dir.display(), "initialized aidbg directory");
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::config::load_config;

    #[test]
    fn init_writes_default_config() {
        let temp = tempfile::tempdir().expect("tempdir");
        let paths = init_aidbg(temp.path(), &InitOptions { force: false }).expect("init");

        assert!(paths.gitignore_path.is_file());
        let cfg = load_config(&paths.config_path).expect("load");
        assert_eq!(cfg, AidbgConfig::default());
    }

    #[test]
    fn init_refuses_to_overwrite_without_force() {
        let temp = tempfile::tempdir().expect("tempdir");
        init_aidbg(temp.path(), &InitOptions { force: false }).expect("first init");

        let err = init_aidbg(temp.path(), &InitOptions { force: false }).unwrap_err();
        assert!(err.to_string().contains("already exists"));

        init_aidbg(temp.path(), &InitOptions { force: true }).expect("forced init");
    }
}
