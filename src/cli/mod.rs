//! CLI surface for paperchat.

use clap::Parser;

/// Chat with arXiv from the terminal.
#[derive(Parser, Debug)]
#[command(
    name = "paperchat",
    version,
    about = "paperchat — Groq-backed MCP chat client for arXiv"
)]
pub struct Cli {
    /// Model to use (Groq model id)
    #[arg(short, long)]
    pub model: Option<String>,

    /// System prompt
    #[arg(short, long)]
    pub system: Option<String>,

    /// Max tokens per completion
    #[arg(long, default_value_t = 1000)]
    pub max_tokens: u32,

    /// Temperature (0.0 - 2.0)
    #[arg(short, long)]
    pub temperature: Option<f64>,

    /// Command used to launch the MCP server
    #[arg(long)]
    pub server_command: Option<String>,

    /// Argument passed to the MCP server command (repeatable)
    #[arg(long = "server-arg")]
    pub server_args: Vec<String>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}
