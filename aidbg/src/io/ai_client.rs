//! AI client abstraction for debugger turns.
//!
//! The [`AiClient`] trait decouples the interception layer from the agent
//! backend. [`CommandAiClient`] spawns a configured agent command; tests use
//! scripted clients that never spawn processes.

use std::io::Write;
use std::process::Command;
use std::time::Duration;

use anyhow::{Context, anyhow};
use colored::Colorize;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::core::effects::TurnEffects;
use crate::core::types::{Frame, TurnKind};
use crate::io::config::AgentConfig;
use crate::io::context::ContextPayload;
use crate::io::process::{is_not_found, run_with_timeout};
use crate::io::prompt::PromptEngine;
use crate::io::tools::ToolRegistry;

/// How an AI turn failed.
#[derive(Debug, Error)]
pub enum AskError {
    /// Credentials or setup are missing. Expected and actionable, never a bug.
    #[error("{0}")]
    Configuration(String),
    /// Anything else.
    #[error(transparent)]
    Failure(#[from] anyhow::Error),
}

/// Answers a question about the paused program.
///
/// Rendering the answer is the client's job. The only state it may change is
/// through `effects`: queued debugger commands and the auto-continue request.
pub trait AiClient {
    fn ask(
        &mut self,
        kind: TurnKind,
        question: &str,
        context: &ContextPayload,
        frame: &Frame,
        effects: &mut TurnEffects<'_>,
    ) -> Result<(), AskError>;
}

/// Structured agent reply.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AgentReply {
    #[serde(default)]
    pub answer: String,
    #[serde(default)]
    pub tool_calls: Vec<ToolCall>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ToolCall {
    pub name: String,
    #[serde(default)]
    pub arguments: Value,
}

/// Parse agent stdout. Non-JSON output is taken as a bare answer.
pub fn parse_reply(stdout: &str) -> AgentReply {
    let trimmed = stdout.trim();
    if let Ok(reply) = serde_json::from_str::<AgentReply>(trimmed) {
        return reply;
    }
    // Agents often wrap the object in prose or a code fence.
    if let (Some(start), Some(end)) = (trimmed.find('{'), trimmed.rfind('}'))
        && start < end
        && let Ok(reply) = serde_json::from_str::<AgentReply>(&trimmed[start..=end])
    {
        return reply;
    }
    AgentReply {
        answer: trimmed.to_string(),
        tool_calls: Vec::new(),
    }
}

/// Client that pipes the rendered prompt into an external agent command.
pub struct CommandAiClient<R, W> {
    agent: AgentConfig,
    config_hint: String,
    prompts: PromptEngine,
    registry: R,
    out: W,
}

impl<R: ToolRegistry> CommandAiClient<R, std::io::Stdout> {
    pub fn new(
        agent: AgentConfig,
        config_hint: impl Into<String>,
        registry: R,
    ) -> anyhow::Result<Self> {
        Self::with_output(agent, config_hint, registry, std::io::stdout())
    }
}

impl<R: ToolRegistry, W: Write> CommandAiClient<R, W> {
    /// `config_hint` names the config file in configuration error messages.
    pub fn with_output(
        agent: AgentConfig,
        config_hint: impl Into<String>,
        registry: R,
        out: W,
    ) -> anyhow::Result<Self> {
        Ok(Self {
            agent,
            config_hint: config_hint.into(),
            prompts: PromptEngine::new()?,
            registry,
            out,
        })
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    fn run_agent(&self, prompt: &str) -> Result<String, AskError> {
        let Some((program, args)) = self.agent.command.split_first() else {
            return Err(AskError::Configuration(format!(
                "No AI agent configured. Set [agent].command in {}",
                self.config_hint
            )));
        };
        let mut cmd = Command::new(program);
        cmd.args(args);

        let output = match run_with_timeout(
            cmd,
            Some(prompt.as_bytes()),
            Duration::from_secs(self.agent.timeout_secs),
            self.agent.output_limit_bytes,
        ) {
            Ok(output) => output,
            Err(err) if is_not_found(&err) => {
                return Err(AskError::Configuration(format!(
                    "AI agent `{program}` not found. Check [agent].command in {}",
                    self.config_hint
                )));
            }
            Err(err) => return Err(AskError::Failure(err.context("run agent"))),
        };

        if output.timed_out {
            warn!(timeout_secs = self.agent.timeout_secs, "agent timed out");
            return Err(anyhow!("agent timed out after {}s", self.agent.timeout_secs).into());
        }
        if !output.status.success() {
            warn!(exit_code = ?output.status.code(), "agent failed");
            return Err(anyhow!(
                "agent exited with status {:?}: {}",
                output.status.code(),
                output.stderr_tail(3)
            )
            .into());
        }
        Ok(output.stdout_text())
    }
}

impl<R: ToolRegistry, W: Write> AiClient for CommandAiClient<R, W> {
    #[instrument(skip_all, fields(kind = kind.as_str(), location = %context.location))]
    fn ask(
        &mut self,
        kind: TurnKind,
        question: &str,
        context: &ContextPayload,
        frame: &Frame,
        effects: &mut TurnEffects<'_>,
    ) -> Result<(), AskError> {
        let prompt = self
            .prompts
            .render(kind, question, context, &self.registry.specs())?;
        info!("asking agent");
        let stdout = self.run_agent(&prompt)?;
        let reply = parse_reply(&stdout);
        debug!(
            answer_bytes = reply.answer.len(),
            tool_calls = reply.tool_calls.len(),
            "agent replied"
        );

        if !reply.answer.trim().is_empty() {
            writeln!(self.out, "{}", reply.answer.trim()).context("write answer")?;
        }
        for call in &reply.tool_calls {
            let tool = self
                .registry
                .lookup(&call.name)
                .ok_or_else(|| anyhow!("unknown tool `{}`", call.name))?;
            let message = tool
                .call(&call.arguments, frame, effects)
                .with_context(|| format!("tool `{}`", call.name))?;
            writeln!(self.out, "{}", format!("  -> {message}").bright_black())
                .context("write tool result")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::auto_continue::AutoContinue;
    use crate::core::queue::PendingCommandQueue;
    use crate::io::tools::builtin_tools;
    use std::collections::BTreeMap;
    use std::path::PathBuf;

    fn frame() -> Frame {
        Frame {
            path: PathBuf::from("demo.bat"),
            line: 1,
            source: vec!["set a=1".to_string()],
            variables: BTreeMap::new(),
            breakpoints: Vec::new(),
        }
    }

    fn payload() -> ContextPayload {
        ContextPayload {
            location: "demo.bat:1".to_string(),
            source: "=> 1| set a=1\n".to_string(),
            variables: Vec::new(),
            breakpoints: Vec::new(),
        }
    }

    fn client(command: &[&str]) -> CommandAiClient<crate::io::tools::ToolSet, Vec<u8>> {
        let agent = AgentConfig {
            command: command.iter().map(|s| s.to_string()).collect(),
            timeout_secs: 5,
            output_limit_bytes: 100_000,
        };
        CommandAiClient::with_output(agent, ".aidbg/config.toml", builtin_tools(), Vec::new())
            .expect("client")
    }

    fn ask(
        client: &mut CommandAiClient<crate::io::tools::ToolSet, Vec<u8>>,
        pending: &mut PendingCommandQueue,
        auto: &mut AutoContinue,
    ) -> Result<(), AskError> {
        let mut effects = TurnEffects::new(pending, auto);
        client.ask(TurnKind::Question, "why?", &payload(), &frame(), &mut effects)
    }

    #[test]
    fn parse_reply_accepts_json() {
        let reply = parse_reply(
            r#"{"answer": "x is 1", "tool_calls": [{"name": "run_debug_command", "arguments": {"command": "next"}}]}"#,
        );
        assert_eq!(reply.answer, "x is 1");
        assert_eq!(reply.tool_calls.len(), 1);
        assert_eq!(reply.tool_calls[0].name, "run_debug_command");
    }

    #[test]
    fn parse_reply_finds_fenced_json() {
        let reply = parse_reply("Here you go:\n```json\n{\"answer\": \"ok\"}\n```\n");
        assert_eq!(reply.answer, "ok");
        assert!(reply.tool_calls.is_empty());
    }

    #[test]
    fn parse_reply_falls_back_to_plain_text() {
        let reply = parse_reply("  just text {not json}  ");
        assert_eq!(reply.answer, "just text {not json}");
        assert!(reply.tool_calls.is_empty());
    }

    #[test]
    fn empty_command_is_a_configuration_error() {
        let mut pending = PendingCommandQueue::new();
        let mut auto = AutoContinue::default();
        let err = ask(&mut client(&[]), &mut pending, &mut auto).unwrap_err();
        match err {
            AskError::Configuration(message) => {
                assert!(message.contains(".aidbg/config.toml"));
            }
            other => panic!("expected configuration error, got {other:?}"),
        }
    }

    #[test]
    fn missing_program_is_a_configuration_error() {
        let mut pending = PendingCommandQueue::new();
        let mut auto = AutoContinue::default();
        let err = ask(
            &mut client(&["aidbg-definitely-missing-agent"]),
            &mut pending,
            &mut auto,
        )
        .unwrap_err();
        assert!(matches!(err, AskError::Configuration(_)));
    }

    #[cfg(unix)]
    #[test]
    fn json_reply_prints_answer_and_runs_tools() {
        let script = r#"cat >/dev/null; echo '{"answer":"stepping","tool_calls":[{"name":"run_debug_command","arguments":{"command":"next","continue":true}}]}'"#;
        let mut client = client(&["sh", "-c", script]);
        let mut pending = PendingCommandQueue::new();
        let mut auto = AutoContinue::default();

        ask(&mut client, &mut pending, &mut auto).expect("ask");

        let printed = String::from_utf8_lossy(client.output()).into_owned();
        assert!(printed.contains("stepping"));
        assert!(printed.contains("queued `next`"));
        assert_eq!(pending.take_all(), vec!["next"]);
        assert!(auto.is_armed());
    }

    #[cfg(unix)]
    #[test]
    fn prompt_reaches_agent_stdin() {
        let mut client = client(&["sh", "-c", "grep -c 'why?'"]);
        let mut pending = PendingCommandQueue::new();
        let mut auto = AutoContinue::default();

        ask(&mut client, &mut pending, &mut auto).expect("ask");

        let printed = String::from_utf8_lossy(client.output()).into_owned();
        assert_eq!(printed.trim(), "1");
    }

    #[cfg(unix)]
    #[test]
    fn failing_agent_is_a_failure() {
        let mut client = client(&["sh", "-c", "cat >/dev/null; echo boom >&2; exit 3"]);
        let mut pending = PendingCommandQueue::new();
        let mut auto = AutoContinue::default();

        let err = ask(&mut client, &mut pending, &mut auto).unwrap_err();
        match err {
            AskError::Failure(inner) => assert!(inner.to_string().contains("boom")),
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn unknown_tool_is_a_failure() {
        let script = r#"cat >/dev/null; echo '{"answer":"","tool_calls":[{"name":"format_disk"}]}'"#;
        let mut client = client(&["sh", "-c", script]);
        let mut pending = PendingCommandQueue::new();
        let mut auto = AutoContinue::default();

        let err = ask(&mut client, &mut pending, &mut auto).unwrap_err();
        assert!(err.to_string().contains("unknown tool `format_disk`"));
    }
}
