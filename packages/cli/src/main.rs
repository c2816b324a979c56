mod commands;
mod config;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{apply, inspect, tools, ApplyArgs, InspectArgs, ToolsCommand};

/// Scene Builder CLI - headless editing sessions over html/css/js pages
#[derive(Parser, Debug)]
#[command(name = "scene")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load a page and print its live element tree
    Inspect(InspectArgs),

    /// Apply a registry tool to one element
    Apply(ApplyArgs),

    /// Manage the tool registry
    Tools {
        #[command(subcommand)]
        command: ToolsCommand,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let cwd = match std::env::current_dir() {
        Ok(dir) => dir.display().to_string(),
        Err(err) => {
            eprintln!("{} cannot read current directory: {}", "Error:".red().bold(), err);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Command::Inspect(args) => inspect(args, &cwd).await,
        Command::Apply(args) => apply(args, &cwd).await,
        Command::Tools { command } => tools(command, &cwd).await,
    };

    if let Err(err) = result {
        eprintln!();
        eprintln!("{} {}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
