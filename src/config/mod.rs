//! Configuration from the environment (.env file + process vars).

use crate::error::{ChatError, Result};
use crate::models::GroqModel;

/// Command line used when no MCP server override is configured; matches the
/// upstream arXiv search server.
const DEFAULT_SERVER_COMMAND: &str = "python";
const DEFAULT_SERVER_ARGS: [&str; 2] = ["-m", "mcp_simple_arxiv"];

/// Startup configuration for a chat session.
#[derive(Debug, Clone)]
pub struct ChatConfig {
    pub api_key: String,
    pub base_url: Option<String>,
    pub model: GroqModel,
    pub server_command: String,
    pub server_args: Vec<String>,
}

impl ChatConfig {
    /// Load from a local `.env` (if present) and the process environment.
    ///
    /// A missing `GROQ_API_KEY` is a fatal configuration error, reported
    /// before any prompt is shown.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv(); // load .env if present, ignore error
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup (tests pass a closure).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let api_key = lookup("GROQ_API_KEY")
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                ChatError::Configuration(
                    "GROQ_API_KEY is not set; add it to .env or the environment".into(),
                )
            })?;

        let model = match lookup("PAPERCHAT_MODEL") {
            Some(name) => parse_model(&name),
            None => GroqModel::default(),
        };

        // the server command and args default as a pair: overriding the
        // command alone must not inherit the arXiv module args
        let (server_command, server_args) = match (
            lookup("PAPERCHAT_SERVER_CMD"),
            lookup("PAPERCHAT_SERVER_ARGS"),
        ) {
            (None, None) => (
                DEFAULT_SERVER_COMMAND.to_string(),
                DEFAULT_SERVER_ARGS.iter().map(|s| s.to_string()).collect(),
            ),
            (command, args) => (
                command.unwrap_or_else(|| DEFAULT_SERVER_COMMAND.to_string()),
                args.map(|raw| raw.split_whitespace().map(str::to_string).collect())
                    .unwrap_or_default(),
            ),
        };

        Ok(Self {
            api_key,
            base_url: lookup("GROQ_BASE_URL"),
            model,
            server_command,
            server_args,
        })
    }
}

/// Parse a model name, falling back to a custom id for unknown names.
pub fn parse_model(name: &str) -> GroqModel {
    name.parse()
        .unwrap_or_else(|_| GroqModel::Custom(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn missing_api_key_is_a_configuration_error() {
        let err = ChatConfig::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(matches!(err, ChatError::Configuration(_)));
        assert!(err.to_string().contains("GROQ_API_KEY"));
    }

    #[test]
    fn blank_api_key_is_rejected() {
        let err =
            ChatConfig::from_lookup(lookup_from(&[("GROQ_API_KEY", "   ")])).unwrap_err();
        assert!(matches!(err, ChatError::Configuration(_)));
    }

    #[test]
    fn defaults_point_at_the_arxiv_server() {
        let config =
            ChatConfig::from_lookup(lookup_from(&[("GROQ_API_KEY", "gsk_test")])).unwrap();
        assert_eq!(config.model, GroqModel::Llama318bInstant);
        assert_eq!(config.server_command, "python");
        assert_eq!(config.server_args, vec!["-m", "mcp_simple_arxiv"]);
        assert_eq!(config.base_url, None);
    }

    #[test]
    fn server_command_override_does_not_inherit_default_args() {
        let config = ChatConfig::from_lookup(lookup_from(&[
            ("GROQ_API_KEY", "gsk_test"),
            ("PAPERCHAT_SERVER_CMD", "arxiv-server"),
        ]))
        .unwrap();
        assert_eq!(config.server_command, "arxiv-server");
        assert!(config.server_args.is_empty());
    }

    #[test]
    fn server_args_are_whitespace_split() {
        let config = ChatConfig::from_lookup(lookup_from(&[
            ("GROQ_API_KEY", "gsk_test"),
            ("PAPERCHAT_SERVER_CMD", "uv"),
            ("PAPERCHAT_SERVER_ARGS", "run  mcp-simple-arxiv --offline"),
        ]))
        .unwrap();
        assert_eq!(config.server_args, vec!["run", "mcp-simple-arxiv", "--offline"]);
    }

    #[test]
    fn model_override_accepts_known_and_custom_names() {
        let config = ChatConfig::from_lookup(lookup_from(&[
            ("GROQ_API_KEY", "gsk_test"),
            ("PAPERCHAT_MODEL", "llama-3.3-70b-versatile"),
        ]))
        .unwrap();
        assert_eq!(config.model, GroqModel::Llama3370bVersatile);

        let config = ChatConfig::from_lookup(lookup_from(&[
            ("GROQ_API_KEY", "gsk_test"),
            ("PAPERCHAT_MODEL", "qwen-2.5-72b"),
        ]))
        .unwrap();
        assert_eq!(config.model, GroqModel::Custom("qwen-2.5-72b".into()));
    }

    #[test]
    fn base_url_override_is_passed_through() {
        let config = ChatConfig::from_lookup(lookup_from(&[
            ("GROQ_API_KEY", "gsk_test"),
            ("GROQ_BASE_URL", "http://localhost:8080/openai/v1"),
        ]))
        .unwrap();
        assert_eq!(
            config.base_url.as_deref(),
            Some("http://localhost:8080/openai/v1")
        );
    }
}
