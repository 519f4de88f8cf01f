//! Tools the AI agent may call during a turn, and how they are looked up.
//!
//! Registries compose instead of patching each other: a [`CompositeRegistry`]
//! tries its primary registry and falls back to a secondary one. The
//! composition is built once at startup.

use std::collections::BTreeMap;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::core::effects::TurnEffects;
use crate::core::types::Frame;

/// Description of a tool as shown to the agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    /// Example arguments object, rendered into the prompt.
    pub arguments: String,
}

pub trait Tool {
    fn spec(&self) -> ToolSpec;

    /// Run the tool. The returned text is shown to the user.
    fn call(&self, arguments: &Value, frame: &Frame, effects: &mut TurnEffects<'_>)
    -> Result<String>;
}

/// Name → tool lookup.
pub trait ToolRegistry {
    fn lookup(&self, name: &str) -> Option<&dyn Tool>;

    /// Specs of every reachable tool, without duplicates by name.
    fn specs(&self) -> Vec<ToolSpec>;
}

/// A plain set of tools keyed by name.
#[derive(Default)]
pub struct ToolSet {
    tools: BTreeMap<String, Box<dyn Tool>>,
}

impl ToolSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, tool: impl Tool + 'static) -> Self {
        self.insert(tool);
        self
    }

    pub fn insert(&mut self, tool: impl Tool + 'static) {
        self.tools.insert(tool.spec().name, Box::new(tool));
    }
}

impl ToolRegistry for ToolSet {
    fn lookup(&self, name: &str) -> Option<&dyn Tool> {
        self.tools.get(name).map(|tool| tool.as_ref())
    }

    fn specs(&self) -> Vec<ToolSpec> {
        self.tools.values().map(|tool| tool.spec()).collect()
    }
}

/// Looks in `primary` first and falls through to `fallback` on a miss.
pub struct CompositeRegistry<P, F> {
    primary: P,
    fallback: F,
}

impl<P: ToolRegistry, F: ToolRegistry> CompositeRegistry<P, F> {
    pub fn new(primary: P, fallback: F) -> Self {
        Self { primary, fallback }
    }
}

impl<P: ToolRegistry, F: ToolRegistry> ToolRegistry for CompositeRegistry<P, F> {
    fn lookup(&self, name: &str) -> Option<&dyn Tool> {
        if let Some(tool) = self.primary.lookup(name) {
            return Some(tool);
        }
        debug!(tool = name, "primary registry miss, trying fallback");
        self.fallback.lookup(name)
    }

    fn specs(&self) -> Vec<ToolSpec> {
        let mut specs = self.primary.specs();
        for spec in self.fallback.specs() {
            if !specs.iter().any(|s| s.name == spec.name) {
                specs.push(spec);
            }
        }
        specs
    }
}

/// Tools every session has.
pub fn builtin_tools() -> ToolSet {
    ToolSet::new().with(RunDebugCommand)
}

/// Queue a debugger command and optionally ask for an automated follow-up turn.
pub struct RunDebugCommand;

#[derive(Debug, Deserialize)]
struct RunDebugCommandArgs {
    command: String,
    #[serde(default, rename = "continue")]
    keep_going: bool,
}

impl Tool for RunDebugCommand {
    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: "run_debug_command".to_string(),
            description: "Run a debugger command after this answer. Set \"continue\" to true to \
                          be called again once it has executed."
                .to_string(),
            arguments: r#"{"command": "next", "continue": true}"#.to_string(),
        }
    }

    fn call(
        &self,
        arguments: &Value,
        _frame: &Frame,
        effects: &mut TurnEffects<'_>,
    ) -> Result<String> {
        let args: RunDebugCommandArgs = serde_json::from_value(arguments.clone())
            .context("parse run_debug_command arguments")?;
        let command = args.command.trim();
        if command.is_empty() {
            return Err(anyhow!("run_debug_command: command must not be empty"));
        }
        effects.add_pending_debug_command(command);
        if args.keep_going {
            effects.request_auto_continue();
            Ok(format!("queued `{command}` (auto-continue)"))
        } else {
            Ok(format!("queued `{command}`"))
        }
    }
}
