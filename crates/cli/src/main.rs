mod error;

use clap::Parser;
use mcp::Tool;
use runtime::{Conversation, OllamaBackend, schema};

use error::Result;

const DEFAULT_SERVER_URL: &str = "http://localhost:8000/sse";
const DEFAULT_MODEL: &str = "qwen2.5";
const DEFAULT_PROMPT: &str = "How is the weather in LA, California?";

#[derive(Parser)]
#[command(name = "skiff")]
#[command(about = "Relay a chat model's tool calls to an MCP server", long_about = None)]
#[command(version)]
struct Cli {
    /// MCP server SSE endpoint
    #[arg(default_value = DEFAULT_SERVER_URL)]
    server_url: String,

    /// Chat model to use
    #[arg(long, default_value = DEFAULT_MODEL)]
    model: String,

    /// Opening user message
    #[arg(long, default_value = DEFAULT_PROMPT)]
    prompt: String,

    /// Ollama base URL (defaults to the local instance)
    #[arg(long)]
    ollama_url: Option<String>,
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    let mut client = mcp::Client::connect(&cli.server_url).await?;
    client.initialize().await?;
    println!("Connected to MCP server at {}", cli.server_url);

    let tools = client.list_tools().await?;
    print_tools(&tools);

    let schemas = tools
        .iter()
        .map(schema::adapt)
        .collect::<runtime::Result<Vec<_>>>()?;

    let mut backend = OllamaBackend::new(&cli.model);
    if let Some(url) = &cli.ollama_url {
        backend = backend.with_base_url(url);
    }
    let mut conversation = Conversation::new(backend, schemas, &cli.prompt);
    conversation.run(&mut client).await?;

    client.close();
    Ok(())
}

fn print_tools(tools: &[Tool]) {
    println!("\nAvailable tools:");
    if tools.is_empty() {
        println!("No tools available");
        return;
    }
    for tool in tools {
        match &tool.description {
            Some(description) => println!(" * {} - {description}", tool.name),
            None => println!(" * {}", tool.name),
        }
    }
}
