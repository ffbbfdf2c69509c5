//! paperchat binary entry point.

use std::io::Write;
use std::sync::Arc;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};

use paperchat::chat::ChatSession;
use paperchat::cli::Cli;
use paperchat::config::{parse_model, ChatConfig};
use paperchat::error::Result;
use paperchat::mcp::{McpClient, StdioTransport};
use paperchat::provider::groq::GroqProvider;
use paperchat::provider::GenerationSettings;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn init_tracing(verbosity: u8) {
    let default_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = ChatConfig::from_env()?;
    if let Some(model) = cli.model {
        config.model = parse_model(&model);
    }
    if let Some(command) = cli.server_command {
        config.server_command = command;
        config.server_args = cli.server_args;
    } else if !cli.server_args.is_empty() {
        config.server_args = cli.server_args;
    }

    // Connect before showing any prompt; an unreachable server is fatal here.
    let transport = StdioTransport::new(config.server_command.clone(), config.server_args.clone());
    let client = McpClient::connect(transport).await?;

    let tool_names: Vec<&str> = client.tools().iter().map(|t| t.name.as_str()).collect();
    println!("Connected! Available tools: {}", tool_names.join(", "));
    println!("Type your queries or 'quit' to exit.");

    let provider = GroqProvider::new(
        config.model.clone(),
        config.api_key.clone(),
        config.base_url.clone(),
    );

    let settings = GenerationSettings {
        max_tokens: Some(cli.max_tokens),
        temperature: cli.temperature,
        ..Default::default()
    };

    let mut session =
        ChatSession::new(Arc::new(provider), Arc::new(client)).with_settings(settings);
    if let Some(system) = cli.system {
        session = session.with_system(system);
    }

    repl(&session).await
}

async fn repl(session: &ChatSession) -> Result<()> {
    let stdin = tokio::io::stdin();
    let mut lines = BufReader::new(stdin).lines();

    loop {
        print!("\n>>> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break; // EOF
        };
        let query = line.trim();
        if query.is_empty() {
            continue;
        }
        if query.eq_ignore_ascii_case("quit") || query.eq_ignore_ascii_case("exit") {
            break;
        }

        match session.process_query(query).await {
            Ok(answer) => println!("\n{answer}"),
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => eprintln!("\nError: {e}"),
        }
    }

    Ok(())
}
