//! MCP client holding the single server session for the process lifetime.

use std::collections::HashSet;

use rmcp::{
    model::{
        CallToolRequestParams, CallToolResult, ClientInfo, Content, JsonObject, ProtocolVersion,
        ResourceContents,
    },
    service::{ClientInitializeError, ServiceError},
};
use tracing::debug;

use crate::error::{ChatError, Result};

use super::schema::McpToolSchema;
use super::transport::{McpRunningService, McpTransport};

/// Raw result payload of a tool call, passed through unmodified.
#[derive(Debug, Clone)]
pub struct McpToolCallResult {
    pub structured_content: Option<serde_json::Value>,
    pub text_content: Option<String>,
    pub content: Vec<serde_json::Value>,
}

impl McpToolCallResult {
    pub fn into_value_or_text(self) -> serde_json::Value {
        if let Some(structured) = self.structured_content {
            return structured;
        }
        if let Some(text) = self.text_content {
            return serde_json::Value::String(text);
        }
        serde_json::Value::Array(self.content)
    }
}

/// Client for a Model Context Protocol server.
///
/// Connecting spawns the server, runs the initialize handshake, and caches
/// the advertised tool set; the set is read-only for the session lifetime.
pub struct McpClient {
    session: McpRunningService,
    tools: Vec<McpToolSchema>,
    advertised: HashSet<String>,
}

impl McpClient {
    /// Connect to the server behind `transport` and fetch its tool catalog.
    pub async fn connect(mut transport: impl McpTransport) -> Result<Self> {
        let client_info = ClientInfo {
            protocol_version: ProtocolVersion::LATEST,
            ..Default::default()
        };

        let session = transport
            .connect(client_info)
            .await
            .map_err(map_initialize_error)?;

        let tools = fetch_tools(&session).await?;
        let advertised = tools.iter().map(|tool| tool.name.clone()).collect();
        debug!(count = tools.len(), "MCP server advertised tools");

        Ok(Self {
            session,
            tools,
            advertised,
        })
    }

    /// The advertised tool descriptors; an empty set is valid.
    pub fn tools(&self) -> &[McpToolSchema] {
        &self.tools
    }

    /// Execute a tool on the MCP server.
    ///
    /// Names outside the advertised set are rejected locally, without a
    /// wire round-trip.
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: serde_json::Value,
    ) -> Result<McpToolCallResult> {
        ensure_advertised(&self.advertised, name)?;
        let arguments = coerce_tool_arguments(arguments)?;

        let result = self
            .session
            .call_tool(CallToolRequestParams {
                meta: None,
                name: name.to_owned().into(),
                arguments,
                task: None,
            })
            .await
            .map_err(|e| map_call_error(name, e))?;

        map_call_result(name, result)
    }
}

async fn fetch_tools(session: &McpRunningService) -> Result<Vec<McpToolSchema>> {
    let tools = match session.list_all_tools().await {
        Ok(tools) => tools,
        Err(ServiceError::UnexpectedResponse) => {
            // some servers reject paginated listing; fall back to one page
            let page = session
                .list_tools(None)
                .await
                .map_err(map_list_error)?;
            page.tools
        }
        Err(e) => return Err(map_list_error(e)),
    };

    Ok(tools.into_iter().map(map_tool_schema).collect())
}

fn ensure_advertised(advertised: &HashSet<String>, name: &str) -> Result<()> {
    if advertised.contains(name) {
        Ok(())
    } else {
        Err(ChatError::UnknownTool(name.to_string()))
    }
}

fn map_tool_schema(tool: rmcp::model::Tool) -> McpToolSchema {
    McpToolSchema {
        name: tool.name.to_string(),
        description: tool.description.map(|d| d.to_string()),
        input_schema: serde_json::Value::Object((*tool.input_schema).clone()),
    }
}

fn coerce_tool_arguments(value: serde_json::Value) -> Result<Option<JsonObject>> {
    match value {
        serde_json::Value::Null => Ok(None),
        serde_json::Value::Object(map) => Ok(Some(map)),
        serde_json::Value::String(raw) => {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            let parsed: serde_json::Value = serde_json::from_str(trimmed).map_err(|e| {
                ChatError::InvalidArgument(format!("tool arguments must be valid JSON: {e}"))
            })?;
            coerce_tool_arguments(parsed)
        }
        other => Err(ChatError::InvalidArgument(format!(
            "tool arguments must be a JSON object; got {other}"
        ))),
    }
}

fn extract_text_content(content: &[Content]) -> Option<String> {
    let mut lines = Vec::new();
    for item in content {
        if let Some(text) = item.as_text() {
            lines.push(text.text.clone());
            continue;
        }
        if let Some(resource) = item.as_resource() {
            if let ResourceContents::TextResourceContents { text, .. } = &resource.resource {
                lines.push(text.clone());
            }
        }
    }

    if lines.is_empty() {
        None
    } else {
        Some(lines.join("\n"))
    }
}

fn map_call_result(name: &str, result: CallToolResult) -> Result<McpToolCallResult> {
    let text_content = extract_text_content(&result.content);
    let content = result
        .content
        .iter()
        .filter_map(|item| serde_json::to_value(item).ok())
        .collect::<Vec<_>>();

    if result.is_error.unwrap_or(false) {
        let message = result
            .structured_content
            .as_ref()
            .map(|v| v.to_string())
            .or_else(|| text_content.clone())
            .unwrap_or_else(|| "MCP tool returned an error result".into());

        return Err(ChatError::ToolExecution {
            tool_name: name.to_string(),
            message,
        });
    }

    Ok(McpToolCallResult {
        structured_content: result.structured_content,
        text_content,
        content,
    })
}

fn map_initialize_error(error: ClientInitializeError) -> ChatError {
    match error {
        ClientInitializeError::ConnectionClosed(context) => {
            ChatError::Connection(format!("initialize connection closed: {context}"))
        }
        ClientInitializeError::TransportError { error, context } => {
            ChatError::Connection(format!("transport error ({context}): {error}"))
        }
        ClientInitializeError::JsonRpcError(error) => ChatError::Connection(format!(
            "initialize rejected (JSON-RPC error {}): {}",
            error.code.0, error.message
        )),
        ClientInitializeError::Cancelled => ChatError::Connection("initialize cancelled".into()),
        other => ChatError::Connection(format!("initialize error: {other}")),
    }
}

fn map_list_error(error: ServiceError) -> ChatError {
    match error {
        ServiceError::Timeout { timeout } => ChatError::Timeout(timeout.as_millis() as u64),
        other => ChatError::Connection(format!("tools/list failed: {other}")),
    }
}

fn map_call_error(name: &str, error: ServiceError) -> ChatError {
    match error {
        ServiceError::McpError(error) => ChatError::ToolExecution {
            tool_name: name.to_string(),
            message: format!("MCP error {}: {}", error.code.0, error.message),
        },
        ServiceError::TransportSend(error) => {
            ChatError::Connection(format!("tools/call transport send failed: {error}"))
        }
        ServiceError::TransportClosed => ChatError::Connection("tools/call transport closed".into()),
        ServiceError::Timeout { timeout } => ChatError::Timeout(timeout.as_millis() as u64),
        ServiceError::Cancelled { reason } => {
            let suffix = reason
                .as_deref()
                .map(|r| format!(" ({r})"))
                .unwrap_or_default();
            ChatError::ToolExecution {
                tool_name: name.to_string(),
                message: format!("tools/call cancelled{suffix}"),
            }
        }
        other => ChatError::ToolExecution {
            tool_name: name.to_string(),
            message: format!("MCP service error: {other}"),
        },
    }
}
