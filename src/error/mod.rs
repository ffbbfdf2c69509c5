//! Error types for paperchat.

use thiserror::Error;

/// Primary error type for all paperchat operations.
#[derive(Error, Debug)]
pub enum ChatError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Cannot reach MCP server: {0}")]
    Connection(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Rate limited: retry after {retry_after_ms:?}ms")]
    RateLimited { retry_after_ms: Option<u64> },

    #[error("Timeout after {0}ms")]
    Timeout(u64),

    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Tool execution error: {tool_name} - {message}")]
    ToolExecution { tool_name: String, message: String },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl ChatError {
    /// Create an API error.
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Whether this error should end the session rather than the turn.
    ///
    /// Configuration and connection failures happen before the first prompt
    /// and leave nothing to chat with; everything else is reported and the
    /// next turn starts clean.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Configuration(_) | Self::Connection(_))
    }

    /// Whether this error came from a tool invocation.
    ///
    /// Tool failures are not reported directly; the chat loop feeds the
    /// payload back to the model so the user gets a prose explanation.
    pub fn is_tool_failure(&self) -> bool {
        matches!(self, Self::UnknownTool(_) | Self::ToolExecution { .. })
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, ChatError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configuration_and_connection_are_fatal() {
        assert!(ChatError::Configuration("missing GROQ_API_KEY".into()).is_fatal());
        assert!(ChatError::Connection("spawn failed".into()).is_fatal());
    }

    #[test]
    fn turn_level_errors_are_not_fatal() {
        assert!(!ChatError::api(500, "server error").is_fatal());
        assert!(!ChatError::UnknownTool("search_papers".into()).is_fatal());
        assert!(!ChatError::RateLimited {
            retry_after_ms: Some(1000)
        }
        .is_fatal());
    }

    #[test]
    fn tool_failures_are_classified() {
        assert!(ChatError::UnknownTool("nope".into()).is_tool_failure());
        assert!(ChatError::ToolExecution {
            tool_name: "search_papers".into(),
            message: "upstream 503".into()
        }
        .is_tool_failure());
        assert!(!ChatError::api(400, "bad request").is_tool_failure());
    }

    #[test]
    fn api_error_displays_status_and_message() {
        let err = ChatError::api(429, "slow down");
        assert_eq!(err.to_string(), "API error (status 429): slow down");
    }
}
