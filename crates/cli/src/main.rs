mod config;
mod error;

use std::io::{self, BufRead, Write};
use std::path::Path;

use agent::{Agent, AnthropicBackend, QueryResponse};
use clap::{Parser, Subcommand};
use market::AftermathClient;
use tracing::info;
use tracing_subscriber::EnvFilter;

use config::Config;
use error::Result;

const CONFIG_FILE: &str = "suisage.toml";

const DEMO_QUERIES: &[&str] = &[
    "Get me the prices of SUI and USDC",
    "Show me the current prices of SUI, USDC, and BTC",
    "Get information about pool 0x52ac89ee8c446638930f53129803f026a04028d2c0deef314321f71c69ab7f78?",
    "Get fees for pool 0x52ac89ee8c446638930f53129803f026a04028d2c0deef314321f71c69ab7f78",
    "What's the spot price between afSUI and ksui in pool 0x52ac89ee8c446638930f53129803f026a04028d2c0deef314321f71c69ab7f78?",
    "What are the top pools by tvl?",
    "What are the top pools by fees?",
    "What are the top pools by apr?",
];

#[derive(Parser)]
#[command(name = "suisage")]
#[command(about = "A natural-language front end for Sui market data", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Answer a single query
    Ask {
        /// The natural-language query
        query: String,
        /// Print the full structured response as JSON
        #[arg(long)]
        json: bool,
    },
    /// Start an interactive session
    Chat,
    /// Replay the built-in example queries
    Demo,
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let config = load_config()?;
    let agent = build_agent(&config)?;
    info!(model = %config.model(), "agent ready");

    match cli.command {
        Some(Commands::Ask { query, json }) => cmd_ask(&agent, &query, json).await,
        Some(Commands::Chat) | None => cmd_chat(&agent).await,
        Some(Commands::Demo) => cmd_demo(&agent).await,
    }
}

fn load_config() -> Result<Config> {
    if Path::new(CONFIG_FILE).exists() {
        Ok(Config::load(CONFIG_FILE)?)
    } else {
        Ok(Config::default())
    }
}

fn build_agent(config: &Config) -> Result<Agent<AnthropicBackend, AftermathClient>> {
    let backend = AnthropicBackend::builder(config.api_key()?, config.model())
        .max_tokens(config.backend.max_tokens)
        .temperature(config.backend.temperature)
        .build();

    Ok(Agent::new(backend, AftermathClient::new()).with_network(config.network()?))
}

async fn cmd_ask(
    agent: &Agent<AnthropicBackend, AftermathClient>,
    query: &str,
    json: bool,
) -> Result<()> {
    let response = agent.price_info(query).await;
    if json {
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else {
        print_response(&response);
    }
    Ok(())
}

async fn cmd_chat(agent: &Agent<AnthropicBackend, AftermathClient>) -> Result<()> {
    println!("suisage v{}", env!("CARGO_PKG_VERSION"));
    println!("Ask about Sui pools, prices, routes, staking and DCA orders.");
    println!("Type 'quit' or Ctrl+D to exit.\n");

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("> ");
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            // EOF
            break;
        }

        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if input == "quit" || input == "exit" {
            break;
        }

        print_response(&agent.price_info(input).await);
        println!();
    }

    println!("\nSession ended.");
    Ok(())
}

async fn cmd_demo(agent: &Agent<AnthropicBackend, AftermathClient>) -> Result<()> {
    for query in DEMO_QUERIES {
        println!("\n-------------------");
        println!("Query: {query}");
        println!("-------------------");

        let response = agent.price_info(query).await;
        println!("{}", serde_json::to_string_pretty(&response)?);
    }
    Ok(())
}

fn print_response(response: &QueryResponse) {
    match response {
        QueryResponse::Success { final_answer, .. } => println!("\n{final_answer}"),
        QueryResponse::NeedsInfo { request } => println!("\n{request}"),
        QueryResponse::Error { error } => eprintln!("\nError: {error}"),
    }
}
