//! The interactive chat turn: one query in, one prose answer out.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::mcp::McpClient;
use crate::provider::{
    CompletionProvider, CompletionRequest, GenerationSettings, ToolDefinition,
};
use crate::types::ChatMessage;

/// Narrow view of the MCP connection the chat loop needs.
#[async_trait]
pub trait ToolTransport: Send + Sync {
    /// Tool catalog advertised at session start.
    fn tool_definitions(&self) -> Vec<ToolDefinition>;

    /// Execute one tool call; returns the raw result payload.
    async fn call(&self, name: &str, arguments: serde_json::Value) -> Result<serde_json::Value>;
}

#[async_trait]
impl ToolTransport for McpClient {
    fn tool_definitions(&self) -> Vec<ToolDefinition> {
        self.tools()
            .iter()
            .map(|tool| ToolDefinition {
                name: tool.name.clone(),
                description: tool.description.clone().unwrap_or_default(),
                parameters: tool.input_schema.clone(),
            })
            .collect()
    }

    async fn call(&self, name: &str, arguments: serde_json::Value) -> Result<serde_json::Value> {
        Ok(self
            .call_tool(name, arguments)
            .await?
            .into_value_or_text())
    }
}

/// One chat session: a provider, a tool transport, and turn settings.
///
/// A turn runs AWAITING_LLM → (optional AWAITING_TOOL →
/// AWAITING_LLM_FOLLOWUP) → answer. The message list is rebuilt per turn;
/// a failed turn leaves nothing behind.
pub struct ChatSession {
    provider: Arc<dyn CompletionProvider>,
    tools: Arc<dyn ToolTransport>,
    system_prompt: Option<String>,
    settings: GenerationSettings,
}

impl ChatSession {
    pub fn new(provider: Arc<dyn CompletionProvider>, tools: Arc<dyn ToolTransport>) -> Self {
        Self {
            provider,
            tools,
            system_prompt: None,
            settings: GenerationSettings::default(),
        }
    }

    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system_prompt = Some(system.into());
        self
    }

    pub fn with_settings(mut self, settings: GenerationSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Process one user query and return the final answer text.
    ///
    /// At most one tool invocation happens per turn: the follow-up request
    /// carries no tool definitions, so the model has to answer in prose.
    pub async fn process_query(&self, query: &str) -> Result<String> {
        let mut messages = Vec::new();
        if let Some(system) = &self.system_prompt {
            messages.push(ChatMessage::system(system.clone()));
        }
        messages.push(ChatMessage::user(query));

        let request = CompletionRequest::new(messages.clone())
            .with_settings(self.settings.clone())
            .with_tools(self.tools.tool_definitions());
        let response = self.provider.complete(&request).await?;

        let extra = response.tool_calls.len().saturating_sub(1);
        let Some(call) = response.tool_calls.into_iter().next() else {
            return Ok(response.text);
        };
        if extra > 0 {
            debug!(dropped = extra, "model suggested multiple tool calls; keeping the first");
        }

        info!(tool = %call.name, "executing tool call");
        let (payload, is_error) = match self.tools.call(&call.name, call.arguments.clone()).await {
            Ok(value) => (value, false),
            Err(err) if err.is_tool_failure() => {
                // feed the failure back so the model can explain it in prose
                warn!(error = %err, "tool call failed");
                (json!({ "error": err.to_string() }), true)
            }
            Err(err) => return Err(err),
        };

        let result_message = ChatMessage::tool_result(call.id.clone(), payload, is_error);
        messages.push(ChatMessage::assistant_tool_call(call));
        messages.push(result_message);

        let followup =
            CompletionRequest::new(messages).with_settings(self.settings.clone());
        let final_response = self.provider.complete(&followup).await?;
        Ok(final_response.text)
    }
}
