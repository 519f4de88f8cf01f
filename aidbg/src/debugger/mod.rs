//! A small batch-script debugger the interception layer can drive.
//!
//! [`ScriptDebugger`] pauses before each executable line. Its commands run
//! synchronously inside [`DebugHost::dispatch`], so every command except
//! `quit` hands control straight back to the prompt.

pub mod breakpoints;
pub mod commands;
pub mod script;

use std::collections::BTreeMap;
use std::fmt::Display;
use std::io::Write;

use anyhow::{Context, Result, anyhow};
use colored::Colorize;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::core::effects::TurnEffects;
use crate::core::types::{Frame, Signal};
use crate::io::tools::{Tool, ToolSet, ToolSpec};
use crate::session::DebugHost;
use breakpoints::Breakpoints;
use commands::{DebugCommand, HELP};
use script::{Script, Statement, expand};

/// Lines shown on each side of the current line by `list`.
const LIST_RADIUS: usize = 3;

pub struct ScriptDebugger<W> {
    script: Script,
    /// Index of the next line to execute; `None` once the script has ended.
    pc: Option<usize>,
    variables: BTreeMap<String, String>,
    breakpoints: Breakpoints,
    out: W,
}

impl<W: Write> ScriptDebugger<W> {
    pub fn new(script: Script, out: W) -> Self {
        let pc = script.first_executable(0);
        Self {
            script,
            pc,
            variables: BTreeMap::new(),
            breakpoints: Breakpoints::new(),
            out,
        }
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    pub fn is_finished(&self) -> bool {
        self.pc.is_none()
    }

    pub fn variables(&self) -> &BTreeMap<String, String> {
        &self.variables
    }

    /// Print where execution is paused.
    pub fn show_position(&mut self) {
        match self.pc {
            Some(idx) => {
                let header = format!("{}:{}", self.script.path.display(), idx + 1);
                let text = self.script.lines[idx].clone();
                self.say(format!("{}  {}", header.cyan(), text));
            }
            None => self.say("Script finished."),
        }
    }

    fn say(&mut self, text: impl Display) {
        if let Err(err) = writeln!(self.out, "{text}") {
            warn!(err = %err, "failed to write debugger output");
        }
    }

    /// Execute the current line and move to the next executable one.
    fn step(&mut self) {
        let Some(idx) = self.pc else {
            return;
        };
        match Statement::parse(&self.script.lines[idx]) {
            Statement::Set { name, value } => {
                let value = expand(&value, &self.variables);
                debug!(line = idx + 1, name = %name, "set variable");
                self.variables.insert(name, value);
            }
            Statement::Echo(text) => {
                let text = expand(&text, &self.variables);
                self.say(text);
            }
            Statement::Unsupported(text) => {
                self.say(format!("(skipped unsupported statement: {text})").yellow());
            }
            Statement::Nothing => {}
        }
        self.pc = self.script.first_executable(idx + 1);
    }

    fn run_to_breakpoint(&mut self) {
        self.step();
        while let Some(idx) = self.pc {
            if self.breakpoints.contains(idx + 1) {
                self.say(format!("Breakpoint hit at line {}", idx + 1));
                return;
            }
            self.step();
        }
    }

    fn set_breakpoint(&mut self, line: usize) {
        if line > self.script.len() {
            self.say(format!(
                "Line {line} is past the end of the script ({} lines).",
                self.script.len()
            ));
        } else if self.breakpoints.add(line) {
            self.say(format!("Breakpoint set at line {line}"));
        } else {
            self.say(format!("Line {line} already has a breakpoint"));
        }
    }

    fn delete_breakpoint(&mut self, line: usize) {
        if self.breakpoints.remove(line) {
            self.say(format!("Breakpoint removed from line {line}"));
        } else {
            self.say(format!("No breakpoint on line {line}"));
        }
    }

    fn list(&mut self) {
        let center = self.pc.unwrap_or(self.script.len().saturating_sub(1));
        let start = center.saturating_sub(LIST_RADIUS);
        let end = (center + LIST_RADIUS + 1).min(self.script.len());
        let width = end.to_string().len();
        for idx in start..end {
            let marker = if Some(idx) == self.pc { "=>" } else { "  " };
            let bp = if self.breakpoints.contains(idx + 1) { "*" } else { " " };
            let text = format!(
                "{marker}{bp}{:>width$}| {}",
                idx + 1,
                self.script.lines[idx]
            );
            self.say(text);
        }
    }

    fn print_variable(&mut self, name: &str) {
        match self.variables.get(name) {
            Some(value) => self.say(format!("{name}={value}")),
            None => self.say(format!("{name} is not defined")),
        }
    }

    fn print_variables(&mut self) {
        if self.variables.is_empty() {
            self.say("No variables set.");
            return;
        }
        let lines: Vec<String> = self
            .variables
            .iter()
            .map(|(name, value)| format!("  {name}={value}"))
            .collect();
        for line in lines {
            self.say(line);
        }
    }
}

impl<W: Write> DebugHost for ScriptDebugger<W> {
    fn current_frame(&self) -> Option<Frame> {
        let idx = self.pc?;
        Some(Frame {
            path: self.script.path.clone(),
            line: idx + 1,
            source: self.script.lines.clone(),
            variables: self.variables.clone(),
            breakpoints: self.breakpoints.lines(),
        })
    }

    fn dispatch(&mut self, line: &str) -> Signal {
        let command = match DebugCommand::parse(line) {
            Ok(command) => command,
            Err(message) => {
                self.say(message.red());
                return Signal::Retry;
            }
        };
        debug!(?command, "debugger command");

        match command {
            DebugCommand::Next | DebugCommand::Continue if self.is_finished() => {
                self.say("The script has finished; nothing to run.");
            }
            DebugCommand::Next => {
                self.step();
                self.show_position();
            }
            DebugCommand::Continue => {
                self.run_to_breakpoint();
                self.show_position();
            }
            DebugCommand::Break(line) => self.set_breakpoint(line),
            DebugCommand::Delete(line) => self.delete_breakpoint(line),
            DebugCommand::List => self.list(),
            DebugCommand::Print(name) => self.print_variable(&name),
            DebugCommand::Vars => self.print_variables(),
            DebugCommand::Help => self.say(HELP),
            DebugCommand::Quit => return Signal::Quit,
        }
        Signal::Retry
    }
}

/// Tools the debugger offers the AI agent on top of the built-ins.
pub fn debugger_tools() -> ToolSet {
    ToolSet::new().with(ReadVariable)
}

/// Read one variable from the paused frame.
pub struct ReadVariable;

#[derive(Debug, Deserialize)]
struct ReadVariableArgs {
    name: String,
}

impl Tool for ReadVariable {
    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: "read_variable".to_string(),
            description: "Read the current value of a script variable.".to_string(),
            arguments: r#"{"name": "x"}"#.to_string(),
        }
    }

    fn call(
        &self,
        arguments: &Value,
        frame: &Frame,
        _effects: &mut TurnEffects<'_>,
    ) -> Result<String> {
        let args: ReadVariableArgs =
            serde_json::from_value(arguments.clone()).context("parse read_variable arguments")?;
        frame
            .variables
            .get(&args.name)
            .map(|value| format!("{}={value}", args.name))
            .ok_or_else(|| anyhow!("read_variable: `{}` is not defined", args.name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::auto_continue::AutoContinue;
    use crate::core::queue::PendingCommandQueue;
    use crate::io::tools::ToolRegistry;
    use serde_json::json;

    const DEMO: &str = "@echo off\nset name=World\necho Hello %name%\nrem done\nset x=2\n";

    fn debugger() -> ScriptDebugger<Vec<u8>> {
        ScriptDebugger::new(Script::from_source("demo.bat", DEMO), Vec::new())
    }

    fn printed(dbg: &ScriptDebugger<Vec<u8>>) -> String {
        String::from_utf8_lossy(dbg.output()).into_owned()
    }

    #[test]
    fn starts_paused_on_first_statement() {
        let dbg = debugger();
        let frame = dbg.current_frame().expect("frame");
        assert_eq!(frame.line, 2);
        assert_eq!(frame.current_line(), Some("set name=World"));
        assert!(frame.variables.is_empty());
    }

    #[test]
    fn next_executes_and_skips_comments() {
        let mut dbg = debugger();
        assert_eq!(dbg.dispatch("next"), Signal::Retry);
        assert_eq!(dbg.dispatch("n"), Signal::Retry);

        assert!(printed(&dbg).contains("Hello World\n"));
        let frame = dbg.current_frame().expect("frame");
        assert_eq!(frame.line, 5);
        assert_eq!(frame.variables.get("name").map(String::as_str), Some("World"));
    }

    #[test]
    fn continue_stops_at_breakpoint_then_runs_to_end() {
        let mut dbg = debugger();
        dbg.dispatch("break 5");
        dbg.dispatch("continue");
        assert_eq!(dbg.current_frame().map(|f| f.line), Some(5));
        assert!(printed(&dbg).contains("Breakpoint hit at line 5"));

        dbg.dispatch("c");
        assert!(dbg.current_frame().is_none());
        assert_eq!(dbg.variables().get("x").map(String::as_str), Some("2"));
        assert!(printed(&dbg).contains("Script finished."));

        dbg.dispatch("next");
        assert!(printed(&dbg).contains("nothing to run"));
    }

    #[test]
    fn breakpoints_show_up_in_frame() {
        let mut dbg = debugger();
        dbg.dispatch("b 5");
        dbg.dispatch("b 3");
        dbg.dispatch("b 99");
        dbg.dispatch("d 3");
        assert_eq!(dbg.current_frame().expect("frame").breakpoints, vec![5]);
        assert!(printed(&dbg).contains("past the end"));
    }

    #[test]
    fn inspection_commands_print_state() {
        let mut dbg = debugger();
        dbg.dispatch("vars");
        dbg.dispatch("next");
        dbg.dispatch("print name");
        dbg.dispatch("p missing");
        dbg.dispatch("list");

        let out = printed(&dbg);
        assert!(out.contains("No variables set."));
        assert!(out.contains("name=World\n"));
        assert!(out.contains("missing is not defined"));
        assert!(out.contains("=> 3| echo Hello %name%"));
    }

    #[test]
    fn quit_ends_session_and_errors_retry() {
        let mut dbg = debugger();
        assert_eq!(dbg.dispatch("bogus"), Signal::Retry);
        assert_eq!(dbg.dispatch("help"), Signal::Retry);
        assert_eq!(dbg.dispatch("quit"), Signal::Quit);
        assert!(printed(&dbg).contains("unknown command `bogus`"));
    }

    #[test]
    fn read_variable_tool_reads_frame() {
        let mut dbg = debugger();
        dbg.dispatch("next");
        let frame = dbg.current_frame().expect("frame");
        let mut pending = PendingCommandQueue::new();
        let mut auto = AutoContinue::default();
        let mut effects = TurnEffects::new(&mut pending, &mut auto);

        let tools = debugger_tools();
        let tool = tools.lookup("read_variable").expect("tool");
        let found = tool
            .call(&json!({"name": "name"}), &frame, &mut effects)
            .expect("call");
        assert_eq!(found, "name=World");
        assert!(
            tool.call(&json!({"name": "nope"}), &frame, &mut effects)
                .is_err()
        );
        assert!(pending.is_empty());
    }
}
