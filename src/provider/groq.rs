//! Groq chat-completions provider (OpenAI-compatible wire format).

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::error::{ChatError, Result};
use crate::models::GroqModel;
use crate::types::{ChatMessage, ContentPart, Role, ToolCall};

use super::http::{bearer_headers, shared_client, status_to_error};
use super::{
    CompletionProvider, CompletionRequest, CompletionResponse, FinishReason, Usage,
};

const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";

pub struct GroqProvider {
    model: GroqModel,
    api_key: String,
    base_url: String,
}

impl GroqProvider {
    pub fn new(model: GroqModel, api_key: String, base_url: Option<String>) -> Self {
        Self {
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            model,
            api_key,
        }
    }

    fn build_request_body(&self, request: &CompletionRequest) -> serde_json::Value {
        let messages = request
            .messages
            .iter()
            .map(message_to_wire)
            .collect::<Vec<_>>();

        let mut body = serde_json::json!({
            "model": self.model.as_str(),
            "messages": messages,
        });

        let obj = body.as_object_mut().expect("body is an object");

        if let Some(max) = request.settings.max_tokens {
            obj.insert("max_tokens".into(), max.into());
        }
        if let Some(temp) = request.settings.temperature {
            obj.insert("temperature".into(), temp.into());
        }
        if let Some(top_p) = request.settings.top_p {
            obj.insert("top_p".into(), top_p.into());
        }
        if let Some(ref stops) = request.settings.stop_sequences {
            obj.insert("stop".into(), serde_json::json!(stops));
        }

        if let Some(ref tools) = request.tools {
            if !tools.is_empty() {
                let tool_defs: Vec<serde_json::Value> = tools
                    .iter()
                    .map(|t| {
                        serde_json::json!({
                            "type": "function",
                            "function": {
                                "name": t.name,
                                "description": t.description,
                                "parameters": t.parameters,
                            }
                        })
                    })
                    .collect();
                obj.insert("tools".into(), tool_defs.into());
            }
        }

        body
    }
}

#[async_trait]
impl CompletionProvider for GroqProvider {
    fn model_id(&self) -> &str {
        self.model.as_str()
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse> {
        let body = self.build_request_body(request);
        let url = format!("{}/chat/completions", self.base_url);

        debug!(model = self.model.as_str(), "Groq chat completion");

        let resp = shared_client()
            .post(&url)
            .headers(bearer_headers(&self.api_key))
            .json(&body)
            .send()
            .await?;

        let status = resp.status().as_u16();
        if status != 200 {
            let body_text = resp.text().await.unwrap_or_default();
            return Err(status_to_error(status, &body_text));
        }

        let data: GroqChatResponse = resp.json().await?;
        let choice = data
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ChatError::api(200, "No choices in Groq response"))?;

        let tool_calls = choice
            .message
            .tool_calls
            .unwrap_or_default()
            .into_iter()
            .map(|tc| ToolCall {
                id: tc.id,
                name: tc.function.name,
                // arguments arrive as a JSON-encoded string; a parse failure
                // keeps the raw string for the MCP layer to reject or coerce
                arguments: serde_json::from_str(&tc.function.arguments)
                    .unwrap_or(serde_json::Value::String(tc.function.arguments)),
            })
            .collect();

        let finish_reason = choice.finish_reason.as_deref().and_then(parse_finish_reason);

        Ok(CompletionResponse {
            text: choice.message.content.unwrap_or_default(),
            usage: data
                .usage
                .map(|u| Usage {
                    input_tokens: u.prompt_tokens,
                    output_tokens: u.completion_tokens,
                    total_tokens: u.total_tokens,
                })
                .unwrap_or_default(),
            tool_calls,
            finish_reason,
        })
    }
}

fn parse_finish_reason(s: &str) -> Option<FinishReason> {
    match s {
        "stop" => Some(FinishReason::Stop),
        "length" => Some(FinishReason::Length),
        "tool_calls" => Some(FinishReason::ToolCalls),
        "content_filter" => Some(FinishReason::ContentFilter),
        _ => None,
    }
}

fn message_to_wire(msg: &ChatMessage) -> serde_json::Value {
    let role = match msg.role {
        Role::System => "system",
        Role::User => "user",
        Role::Assistant => "assistant",
        Role::Tool => "tool",
    };

    // Tool results are flattened to the OpenAI tool-role shape
    if let Some(ContentPart::ToolResult(tr)) = msg.content.first() {
        return serde_json::json!({
            "role": "tool",
            "tool_call_id": tr.tool_call_id,
            "content": tr.result.to_string(),
        });
    }

    // Assistant messages carrying tool calls
    let tool_calls = msg.tool_calls();
    if !tool_calls.is_empty() {
        let tc_json: Vec<serde_json::Value> = tool_calls
            .iter()
            .map(|tc| {
                serde_json::json!({
                    "id": tc.id,
                    "type": "function",
                    "function": {
                        "name": tc.name,
                        "arguments": tc.arguments.to_string(),
                    }
                })
            })
            .collect();
        let text = msg.text();
        return serde_json::json!({
            "role": role,
            "content": if text.is_empty() { serde_json::Value::Null } else { serde_json::Value::String(text) },
            "tool_calls": tc_json,
        });
    }

    serde_json::json!({ "role": role, "content": msg.text() })
}

// Groq API response types (internal)

#[derive(Deserialize)]
struct GroqChatResponse {
    choices: Vec<GroqChoice>,
    usage: Option<GroqUsage>,
}

#[derive(Deserialize)]
struct GroqChoice {
    message: GroqMessage,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct GroqMessage {
    content: Option<String>,
    tool_calls: Option<Vec<GroqToolCall>>,
}

#[derive(Deserialize)]
struct GroqToolCall {
    id: String,
    function: GroqFunction,
}

#[derive(Deserialize)]
struct GroqFunction {
    name: String,
    arguments: String,
}

#[derive(Deserialize)]
struct GroqUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}
