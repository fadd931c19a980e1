//! Mock Agent - Main Entry Point
//!
//! Command-line front end for the mock LLM backend and its tools.

use clap::{Parser, Subcommand};
use futures::StreamExt;
use mock_agent::config::MockAgentConfig;
use mock_agent::llm::{CompletionRequest, LlmProvider, Message, MockLlmProvider};
use mock_agent::observability::{init_default_logging, init_logging, LogFormat};
use mock_agent::processing::ToolLoop;
use mock_agent::tools::{ToolContext, ToolSystem};
use std::io::Write;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn, Level};

/// Deterministic mock LLM backend for testing agent frameworks
#[derive(Parser)]
#[command(name = "mock-agent")]
#[command(about = "Deterministic mock LLM backend with simulated tools")]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Verbose logging (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Send a message to the mock model
    Chat {
        /// User message
        message: String,
        /// Stream a single turn instead of running the tool loop
        #[arg(long)]
        stream: bool,
        /// Offer no tools to the model
        #[arg(long)]
        no_tools: bool,
    },
    /// Print the registered tool descriptions as JSON
    Tools,
    /// Invoke one tool directly
    Invoke {
        /// Tool name
        tool: String,
        /// Arguments as a JSON object
        #[arg(value_name = "ARGS_JSON")]
        arguments: String,
    },
    /// Validate configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,
    },
}

type CliResult = Result<(), Box<dyn std::error::Error>>;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    match cli.verbose {
        0 => init_default_logging(),
        level => {
            let format = LogFormat::parse(
                &std::env::var("LOG_FORMAT").unwrap_or_else(|_| "compact".to_string()),
            );
            let level = if level == 1 { Level::DEBUG } else { Level::TRACE };
            init_logging(level, format, false);
        }
    }

    let config = match load_configuration(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    let cancel = CancellationToken::new();
    spawn_interrupt_handler(cancel.clone());

    let result = match cli.command {
        Commands::Chat {
            message,
            stream,
            no_tools,
        } => handle_chat_command(&config, &message, stream, no_tools, &cancel).await,
        Commands::Tools => handle_tools_command(&config).await,
        Commands::Invoke { tool, arguments } => {
            handle_invoke_command(&config, &tool, &arguments, &cancel).await
        }
        Commands::Config { show } => handle_config_command(&config, show),
    };

    if let Err(e) = result {
        error!("Command failed: {}", e);
        eprintln!("error: {e}");
        process::exit(1);
    }
}

fn load_configuration(
    config_path: &Option<PathBuf>,
) -> Result<MockAgentConfig, Box<dyn std::error::Error>> {
    match config_path {
        Some(path) => {
            info!("Loading configuration from: {}", path.display());
            Ok(MockAgentConfig::load_from_file(path)?)
        }
        None => {
            let default_paths = ["mock-agent.toml", "config/mock-agent.toml"];

            for path_str in default_paths {
                let path = PathBuf::from(path_str);
                if path.exists() {
                    info!("Loading configuration from: {}", path.display());
                    return Ok(MockAgentConfig::load_from_file(&path)?);
                }
            }

            info!("No configuration file found, using defaults");
            Ok(MockAgentConfig::default())
        }
    }
}

/// Cancel the shared token on Ctrl-C so delays and streams stop early
fn spawn_interrupt_handler(cancel: CancellationToken) {
    tokio::spawn(async move {
        match signal::ctrl_c().await {
            Ok(()) => {
                warn!("Received interrupt, cancelling in-flight work");
                cancel.cancel();
            }
            Err(e) => error!("Failed to listen for interrupt: {}", e),
        }
    });
}

async fn build_tool_system(
    config: &MockAgentConfig,
) -> Result<ToolSystem, Box<dyn std::error::Error>> {
    let mut tool_system = ToolSystem::new();
    tool_system.initialize(&config.tools).await?;
    info!(tools = ?tool_system.list_tools(), "Tool system ready");
    Ok(tool_system)
}

async fn handle_chat_command(
    config: &MockAgentConfig,
    message: &str,
    stream: bool,
    no_tools: bool,
    cancel: &CancellationToken,
) -> CliResult {
    let provider = MockLlmProvider::new(config.llm.provider_config())?;
    let tool_system = if no_tools {
        ToolSystem::new()
    } else {
        build_tool_system(config).await?
    };

    if stream {
        return stream_single_turn(&provider, &tool_system, config, message, cancel).await;
    }

    let tool_loop = ToolLoop::new(
        Arc::new(provider),
        Arc::new(tool_system),
        config.budget.max_iterations,
    )
    .with_system_prompt(config.llm.system_prompt.clone());

    let outcome = tool_loop.run(message, cancel).await?;
    info!(
        iterations = outcome.iterations,
        tool_calls = outcome.tool_calls,
        "Chat completed"
    );
    println!("{}", outcome.response);
    Ok(())
}

async fn stream_single_turn(
    provider: &MockLlmProvider,
    tool_system: &ToolSystem,
    config: &MockAgentConfig,
    message: &str,
    cancel: &CancellationToken,
) -> CliResult {
    let mut messages = Vec::with_capacity(2);
    if let Some(prompt) = &config.llm.system_prompt {
        messages.push(Message::system(prompt.clone()));
    }
    messages.push(Message::user(message));

    let request = CompletionRequest::new(messages, tool_system.descriptions());
    let mut stream = provider.complete_stream(request, cancel.clone());

    while let Some(item) = stream.next().await {
        let chunk = item?;
        if let Some(content) = &chunk.delta.content {
            print!("{content}");
            std::io::stdout().flush()?;
        }
        if let Some(call) = &chunk.delta.tool_call {
            println!("[tool call {}] {}({})", call.index, call.name, call.arguments);
        }
        if let Some(reason) = chunk.finish_reason {
            println!();
            info!(finish_reason = ?reason, "Stream finished");
        }
    }

    Ok(())
}

async fn handle_tools_command(config: &MockAgentConfig) -> CliResult {
    let tool_system = build_tool_system(config).await?;
    println!(
        "{}",
        serde_json::to_string_pretty(&tool_system.descriptions())?
    );
    Ok(())
}

async fn handle_invoke_command(
    config: &MockAgentConfig,
    tool: &str,
    arguments: &str,
    cancel: &CancellationToken,
) -> CliResult {
    let tool_system = build_tool_system(config).await?;
    let parameters: serde_json::Value = serde_json::from_str(arguments)?;

    let ctx = ToolContext::new(cancel.clone());
    let result = tool_system.invoke(tool, &parameters, &ctx).await?;
    println!("{result}");
    Ok(())
}

fn handle_config_command(config: &MockAgentConfig, show: bool) -> CliResult {
    if show {
        println!("Current configuration:");
        println!("{}", toml::to_string_pretty(config)?);
    }

    info!(agent_id = %config.agent.id, "Configuration validation complete");
    Ok(())
}
