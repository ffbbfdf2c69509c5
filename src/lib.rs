//! paperchat — chat with arXiv over MCP and Groq.
//!
//! A thin interactive client: user queries go to the Groq chat-completions
//! API together with the tool catalog of one MCP server (the arXiv search
//! server, spawned as a subprocess). When the model requests a tool call,
//! the call is executed over MCP and the result is fed back for a final
//! prose answer. One tool invocation per turn, strictly sequential.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use paperchat::chat::ChatSession;
//! use paperchat::config::ChatConfig;
//! use paperchat::mcp::{McpClient, StdioTransport};
//! use paperchat::provider::groq::GroqProvider;
//!
//! # async fn example() -> paperchat::error::Result<()> {
//! let config = ChatConfig::from_env()?;
//! let transport = StdioTransport::new(config.server_command.clone(), config.server_args.clone());
//! let client = McpClient::connect(transport).await?;
//! let provider = GroqProvider::new(config.model.clone(), config.api_key.clone(), config.base_url.clone());
//!
//! let session = ChatSession::new(Arc::new(provider), Arc::new(client));
//! let answer = session.process_query("find papers on quantum computing by Feynman").await?;
//! println!("{answer}");
//! # Ok(())
//! # }
//! ```

pub mod chat;
pub mod cli;
pub mod config;
pub mod error;
pub mod mcp;
pub mod models;
pub mod provider;
pub mod types;
