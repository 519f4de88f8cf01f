//! Configuration stored under `.aidbg/config.toml`.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::core::auto_continue::MAX_AUTO_CONTINUE;

/// Debugger assistant configuration (TOML).
///
/// Intended to be edited by humans. Missing fields default to the values
/// below, so an empty file is a valid config.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AidbgConfig {
    /// Verbosity switch: show the error source chain alongside turn failures.
    pub debug: bool,

    /// Maximum consecutive unattended continuation turns.
    pub auto_continue_limit: u32,

    pub agent: AgentConfig,

    pub context: ContextConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AgentConfig {
    /// Agent argv (e.g. `["codex","exec","-"]`). The prompt is written to stdin.
    pub command: Vec<String>,

    /// Wall-clock budget for one agent invocation in seconds.
    pub timeout_secs: u64,

    /// Truncate agent stdout/stderr beyond this many bytes.
    pub output_limit_bytes: usize,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            command: Vec::new(),
            timeout_secs: 120,
            output_limit_bytes: 100_000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ContextConfig {
    /// Source lines shown above and below the current line.
    pub source_window: usize,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self { source_window: 5 }
    }
}

impl Default for AidbgConfig {
    fn default() -> Self {
        Self {
            debug: false,
            auto_continue_limit: MAX_AUTO_CONTINUE,
            agent: AgentConfig::default(),
            context: ContextConfig::default(),
        }
    }
}

impl AidbgConfig {
    pub fn validate(&self) -> Result<()> {
        if self.auto_continue_limit == 0 {
            return Err(anyhow!("auto_continue_limit must be > 0"));
        }
        if self.agent.timeout_secs == 0 {
            return Err(anyhow!("agent.timeout_secs must be > 0"));
        }
        if self.agent.output_limit_bytes == 0 {
            return Err(anyhow!("agent.output_limit_bytes must be > 0"));
        }
        if self
            .agent
            .command
            .first()
            .is_some_and(|program| program.trim().is_empty())
        {
            return Err(anyhow!("agent.command must start with a program name"));
        }
        Ok(())
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `AidbgConfig::default()`.
pub fn load_config(path: &Path) -> Result<AidbgConfig> {
    if !path.exists() {
        let cfg = AidbgConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: AidbgConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Atomically write config to disk (temp file + rename).
pub fn write_config(path: &Path, cfg: &AidbgConfig) -> Result<()> {
    cfg.validate()?;
    let mut buf = toml::to_string_pretty(cfg).context("serialize config toml")?;
    buf.push('\n');
    write_atomic(path, &buf)
}

fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let parent = path
        .parent()
        .with_context(|| format!("config path missing parent {}", path.display()))?;
    fs::create_dir_all(parent).with_context(|| format!("create directory {}", parent.display()))?;
    let tmp_path = path.with_extension("toml.tmp");
    fs::write(&tmp_path, contents)
        .with_context(|| format!("write temp config {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path).with_context(|| format!("replace config {}", path.display()))?;
    Ok(())
}
