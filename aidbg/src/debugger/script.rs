//! Batch-like scripts: loading, statement parsing and `%NAME%` expansion.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use anyhow::{Context, Result, bail};
use regex::{Captures, Regex};

static VAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"%([A-Za-z_][A-Za-z0-9_]*)%").unwrap());

/// A script held in memory, one entry per physical line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Script {
    pub path: PathBuf,
    pub lines: Vec<String>,
}

impl Script {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
        let script = Self::from_source(path, &raw);
        if script.first_executable(0).is_none() {
            bail!("{}: nothing to execute", path.display());
        }
        Ok(script)
    }

    pub fn from_source(path: impl Into<PathBuf>, raw: &str) -> Self {
        Self {
            path: path.into(),
            lines: raw.lines().map(|line| line.trim_end().to_string()).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Index of the first line at or after `from` that does something.
    pub fn first_executable(&self, from: usize) -> Option<usize> {
        (from..self.lines.len()).find(|&idx| Statement::parse(&self.lines[idx]).is_executable())
    }
}

/// One parsed script line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    Set { name: String, value: String },
    Echo(String),
    /// Blank lines, `rem` and `::` comments, `@echo off`.
    Nothing,
    Unsupported(String),
}

impl Statement {
    pub fn parse(line: &str) -> Self {
        let line = line.trim().trim_start_matches('@');
        if line.is_empty() || line.starts_with("::") {
            return Statement::Nothing;
        }
        let (keyword, rest) = match line.split_once(char::is_whitespace) {
            Some((keyword, rest)) => (keyword, rest.trim_start()),
            None => (line, ""),
        };
        match keyword.to_ascii_lowercase().as_str() {
            "rem" => Statement::Nothing,
            "echo" if rest.eq_ignore_ascii_case("off") || rest.eq_ignore_ascii_case("on") => {
                Statement::Nothing
            }
            "echo" => Statement::Echo(rest.to_string()),
            "set" => match rest.split_once('=') {
                Some((name, value)) if !name.trim().is_empty() => Statement::Set {
                    name: name.trim().to_string(),
                    value: value.to_string(),
                },
                _ => Statement::Unsupported(line.to_string()),
            },
            _ => Statement::Unsupported(line.to_string()),
        }
    }

    pub fn is_executable(&self) -> bool {
        !matches!(self, Statement::Nothing)
    }
}

/// Replace every `%NAME%` with its value. Unknown names are left as written.
pub fn expand(text: &str, variables: &BTreeMap<String, String>) -> String {
    VAR_RE
        .replace_all(text, |caps: &Captures<'_>| match variables.get(&caps[1]) {
            Some(value) => value.clone(),
            None => caps[0].to_string(),
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_statements() {
        assert_eq!(
            Statement::parse("set name=World"),
            Statement::Set {
                name: "name".to_string(),
                value: "World".to_string()
            }
        );
        assert_eq!(
            Statement::parse("  ECHO Hello %name%"),
            Statement::Echo("Hello %name%".to_string())
        );
        assert_eq!(Statement::parse("@echo off"), Statement::Nothing);
        assert_eq!(Statement::parse("rem a comment"), Statement::Nothing);
        assert_eq!(Statement::parse(":: another"), Statement::Nothing);
        assert_eq!(Statement::parse("   "), Statement::Nothing);
        assert_eq!(
            Statement::parse("set =oops"),
            Statement::Unsupported("set =oops".to_string())
        );
        assert_eq!(
            Statement::parse("goto end"),
            Statement::Unsupported("goto end".to_string())
        );
    }

    #[test]
    fn expands_known_variables_only() {
        let vars = BTreeMap::from([("name".to_string(), "World".to_string())]);
        assert_eq!(expand("Hello %name%!", &vars), "Hello World!");
        assert_eq!(expand("%missing% stays", &vars), "%missing% stays");
        assert_eq!(expand("100% sure", &vars), "100% sure");
    }

    #[test]
    fn first_executable_skips_comments() {
        let script = Script::from_source("t.bat", "@echo off\nrem hi\n\nset x=1\n");
        assert_eq!(script.first_executable(0), Some(3));
        assert_eq!(script.first_executable(4), None);
    }

    #[test]
    fn load_rejects_scripts_without_statements() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("empty.bat");
        fs::write(&path, "rem nothing here\n").expect("write");

        let err = Script::load(&path).expect_err("should fail");
        assert!(err.to_string().contains("nothing to execute"));
    }
}
