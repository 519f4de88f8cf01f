//! Prompt rendering for agent turns.

use anyhow::{Context, Result};
use minijinja::{Environment, context};
use tracing::debug;

use crate::core::types::TurnKind;
use crate::io::context::ContextPayload;
use crate::io::tools::ToolSpec;

const ASK_TEMPLATE: &str = include_str!("prompts/ask.md");

/// Template engine wrapper around minijinja.
pub struct PromptEngine {
    env: Environment<'static>,
}

impl PromptEngine {
    pub fn new() -> Result<Self> {
        let mut env = Environment::new();
        env.add_template("ask", ASK_TEMPLATE)
            .context("load ask template")?;
        Ok(Self { env })
    }

    pub fn render(
        &self,
        kind: TurnKind,
        question: &str,
        payload: &ContextPayload,
        tools: &[ToolSpec],
    ) -> Result<String> {
        let template = self.env.get_template("ask")?;
        let rendered = template
            .render(context! {
                continuation => kind == TurnKind::Continuation,
                question => question.trim(),
                context => payload,
                tools => tools,
            })
            .context("render ask template")?;
        debug!(kind = kind.as_str(), bytes = rendered.len(), "rendered prompt");
        Ok(rendered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> ContextPayload {
        ContextPayload {
            location: "demo.bat:2".to_string(),
            source: "   1| set a=1\n=> 2| echo %a%\n".to_string(),
            variables: vec![("a".to_string(), "1".to_string())],
            breakpoints: vec![2, 4],
        }
    }

    fn tools() -> Vec<ToolSpec> {
        vec![ToolSpec {
            name: "run_debug_command".to_string(),
            description: "Run a command.".to_string(),
            arguments: r#"{"command": "next"}"#.to_string(),
        }]
    }

    #[test]
    fn question_prompt_includes_context_and_tools() {
        let engine = PromptEngine::new().expect("engine");
        let prompt = engine
            .render(TurnKind::Question, " why? ", &payload(), &tools())
            .expect("render");

        assert!(prompt.contains("## Question\n\nwhy?"));
        assert!(prompt.contains("demo.bat:2"));
        assert!(prompt.contains("=> 2| echo %a%"));
        assert!(prompt.contains("- a = 1"));
        assert!(prompt.contains("2, 4"));
        assert!(prompt.contains("`run_debug_command`"));
        assert!(prompt.contains("\"tool_calls\""));
    }

    #[test]
    fn continuation_prompt_uses_its_own_heading() {
        let engine = PromptEngine::new().expect("engine");
        let mut empty = payload();
        empty.variables.clear();
        empty.breakpoints.clear();
        let prompt = engine
            .render(TurnKind::Continuation, "go on", &empty, &[])
            .expect("render");

        assert!(prompt.contains("## Continuation\n\ngo on"));
        assert!(!prompt.contains("## Question"));
        assert!(prompt.contains("## Variables\n\nNone."));
    }
}
