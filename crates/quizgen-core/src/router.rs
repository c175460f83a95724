//! Tool Router
//!
//! Maps an inbound `{tool, input}` envelope onto a dispatcher invocation.
//! Only envelope problems (unknown tool, unknown backend, missing prompt) are
//! reported as errors; everything past this point yields a [`Problem`].

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::dispatch::Dispatcher;
use crate::problem::Problem;
use crate::prompt::{ADVANCED, GENERAL, PromptTemplate, ROUTING, SIMPLE_SELECT};

/// `llm` value that asks the local model to pick a tool
pub const AUTO_BACKEND: &str = "auto";

/// Inbound call envelope
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ToolCall {
    /// Tool identifier
    pub tool: String,

    /// Tool arguments (`prompt`, optional `llm`)
    #[serde(default)]
    pub input: Map<String, Value>,
}

/// Outbound result envelope
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ToolOutput {
    pub output: Problem,
}

/// Known tools
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToolName {
    /// Backend chosen by the caller through `input.llm`
    GenerateProblem,
    /// Simple multiple choice on the local model
    GenerateProblemMistral,
    /// Intermediate/advanced questions on the hosted chat model
    GenerateProblemWithGpt,
}

impl ToolName {
    pub const ALL: [Self; 3] = [
        Self::GenerateProblem,
        Self::GenerateProblemMistral,
        Self::GenerateProblemWithGpt,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::GenerateProblem => "generate_problem",
            Self::GenerateProblemMistral => "generate_problem_mistral",
            Self::GenerateProblemWithGpt => "generate_problem_with_gpt",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tool| tool.as_str() == name)
    }

    pub const fn description(self) -> &'static str {
        match self {
            Self::GenerateProblem => {
                "Problem generator on the backend named by `llm` (or `auto` to let the local model choose)"
            }
            Self::GenerateProblemMistral => {
                "Problem generator for simple option questions, such as choosing the right word for a definition"
            }
            Self::GenerateProblemWithGpt => {
                "Problem generator for intermediate/advanced questions, both option and writing questions"
            }
        }
    }
}

impl std::fmt::Display for ToolName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Envelope errors surfaced to the caller
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RouterError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Unsupported LLM: {0}")]
    UnsupportedBackend(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl RouterError {
    /// Stable machine-readable error code
    pub const fn code(&self) -> &'static str {
        match self {
            Self::UnknownTool(_) => "UNKNOWN_TOOL",
            Self::UnsupportedBackend(_) => "UNSUPPORTED_BACKEND",
            Self::InvalidInput(_) => "INVALID_INPUT",
        }
    }
}

/// Which backends the named tools are bound to
#[derive(Clone, Debug)]
pub struct RouterConfig {
    /// Backend for `generate_problem` when `llm` is absent
    pub default_backend: String,

    /// Backend behind `generate_problem_mistral` and advisory routing
    pub local_backend: String,

    /// Backend behind `generate_problem_with_gpt`
    pub hosted_backend: String,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            default_backend: "ollama".into(),
            local_backend: "ollama".into(),
            hosted_backend: "chatgpt".into(),
        }
    }
}

/// Routes call envelopes to the dispatcher
#[derive(Clone)]
pub struct ToolRouter {
    dispatcher: Dispatcher,
    config: RouterConfig,
}

impl ToolRouter {
    pub fn new(dispatcher: Dispatcher, config: RouterConfig) -> Self {
        Self { dispatcher, config }
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// Handle one call envelope
    pub async fn route(&self, call: &ToolCall) -> Result<ToolOutput, RouterError> {
        let tool =
            ToolName::parse(&call.tool).ok_or_else(|| RouterError::UnknownTool(call.tool.clone()))?;
        let prompt = required_prompt(&call.input)?;

        let (backend, template) = match tool {
            ToolName::GenerateProblem => match requested_llm(&call.input)? {
                None => (self.config.default_backend.as_str(), &GENERAL),
                Some(AUTO_BACKEND) => self.target(self.choose_tool(prompt).await),
                Some(llm) if self.dispatcher.supports(llm) => (llm, &GENERAL),
                Some(llm) => return Err(RouterError::UnsupportedBackend(llm.to_string())),
            },
            named => self.target(named),
        };

        tracing::debug!(tool = %tool, backend = %backend, "Routing tool call");

        let output = self.dispatcher.invoke_with(backend, template, prompt).await;
        Ok(ToolOutput { output })
    }

    /// Ask the local model which of the two named tools fits the prompt
    ///
    /// Advisory only: any failure or unrecognised reply picks the local tool.
    pub async fn choose_tool(&self, prompt: &str) -> ToolName {
        let Some(local) = self.dispatcher.backends().get(&self.config.local_backend) else {
            return ToolName::GenerateProblemMistral;
        };

        let chosen = match self.dispatcher.call(local.as_ref(), &ROUTING.compose(prompt)).await {
            Ok(reply) if reply.contains(ToolName::GenerateProblemWithGpt.as_str()) => {
                ToolName::GenerateProblemWithGpt
            }
            Ok(_) => ToolName::GenerateProblemMistral,
            Err(e) => {
                tracing::warn!(error = %e, "Tool routing failed, using local tool");
                ToolName::GenerateProblemMistral
            }
        };

        tracing::info!(tool = %chosen, "Advisory routing selected tool");
        chosen
    }

    fn target(&self, tool: ToolName) -> (&str, &'static PromptTemplate) {
        match tool {
            ToolName::GenerateProblem => (self.config.default_backend.as_str(), &GENERAL),
            ToolName::GenerateProblemMistral => (self.config.local_backend.as_str(), &SIMPLE_SELECT),
            ToolName::GenerateProblemWithGpt => (self.config.hosted_backend.as_str(), &ADVANCED),
        }
    }
}

fn required_prompt(input: &Map<String, Value>) -> Result<&str, RouterError> {
    input
        .get("prompt")
        .and_then(Value::as_str)
        .ok_or_else(|| RouterError::InvalidInput("`prompt` must be a string".into()))
}

fn requested_llm(input: &Map<String, Value>) -> Result<Option<&str>, RouterError> {
    match input.get("llm") {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.trim())),
        Some(_) => Err(RouterError::InvalidInput("`llm` must be a string".into())),
    }
}
