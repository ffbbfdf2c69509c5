//! MCP transport layer.

use async_trait::async_trait;
use rmcp::model::ClientInfo;
use rmcp::service::{ClientInitializeError, DynService, RoleClient, RunningService, ServiceExt};
use rmcp::transport::TokioChildProcess;
use tokio::process::Command;

pub type DynClientService = Box<dyn DynService<RoleClient>>;
pub type McpRunningService = RunningService<RoleClient, DynClientService>;

/// Transport trait for MCP communication.
///
/// Wire framing and the initialize handshake are owned by rmcp; a transport
/// only knows how to reach the server process.
#[async_trait]
pub trait McpTransport: Send {
    /// Create and initialize a new rmcp running service for this transport.
    async fn connect(
        &mut self,
        client_info: ClientInfo,
    ) -> Result<McpRunningService, ClientInitializeError>;
}

/// Stdio-based MCP transport (spawns a local server subprocess).
pub struct StdioTransport {
    command: String,
    args: Vec<String>,
}

impl StdioTransport {
    /// Create a stdio transport from command and args.
    pub fn new(command: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            command: command.into(),
            args,
        }
    }

    /// Create a stdio transport from command only.
    pub fn from_command(command: impl Into<String>) -> Self {
        Self::new(command, Vec::new())
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }
}

#[async_trait]
impl McpTransport for StdioTransport {
    async fn connect(
        &mut self,
        client_info: ClientInfo,
    ) -> Result<McpRunningService, ClientInitializeError> {
        let mut command = Command::new(&self.command);
        command.args(&self.args);
        let transport = TokioChildProcess::new(command).map_err(|error| {
            ClientInitializeError::transport::<TokioChildProcess>(error, "spawn stdio transport")
        })?;

        client_info.into_dyn().serve(transport).await
    }
}
