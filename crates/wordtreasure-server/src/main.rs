//! WordTreasure Server CLI
//!
//! Starts the similarity HTTP server.

use std::env;
use std::process;
use wordtreasure_server::{config::ServerConfig, start_server, ServerError};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

async fn run() -> Result<(), ServerError> {
    // Parse command-line arguments
    let args: Vec<String> = env::args().collect();

    let config = if args.len() > 2 && args[1] == "--config" {
        // Load from specified config file
        let config_path = &args[2];
        ServerConfig::from_file(config_path)?
    } else if args.len() > 1 && args[1] == "--help" {
        print_help();
        process::exit(0);
    } else {
        eprintln!("Warning: No config file specified, using default configuration");
        eprintln!("Usage: wordtreasure-server --config <path-to-config.toml>");
        eprintln!();
        ServerConfig::default()
    };

    // Start the server
    start_server(config).await?;

    Ok(())
}

fn print_help() {
    println!("WordTreasure Server - Word Similarity Scoring and Hints");
    println!();
    println!("USAGE:");
    println!("    wordtreasure-server --config <path-to-config.toml>");
    println!();
    println!("OPTIONS:");
    println!("    --config <file>    Load configuration from TOML file");
    println!("    --help             Print this help message");
    println!();
    println!("EXAMPLE:");
    println!("    wordtreasure-server --config config/server.toml");
    println!();
    println!("CONFIGURATION:");
    println!("    The TOML config file may contain:");
    println!("    - bind_address: IP address to bind (default: '0.0.0.0')");
    println!("    - bind_port: Port number (default: 8000)");
    println!("    - inference_endpoint: Embedding/NLI sidecar URL");
    println!("    - embedding_dimension: Sidecar embedding size (default: 768)");
    println!("    - [engine]: weights, probe templates, hint templates");
    println!();
}
