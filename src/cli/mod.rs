pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "gatectl")]
#[command(about = "Operator CLI for the TMS entitlement gate")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "List the feature key catalog")]
    Features,

    #[command(about = "List preconfigured gates")]
    Presets,

    #[command(about = "Render the upgrade prompt for a feature")]
    Prompt(commands::prompt::PromptArgs),

    #[command(about = "Mint a development session token")]
    Token(commands::token::TokenArgs),

    #[command(about = "Ask a running gate service for a decision")]
    Check(commands::check::CheckArgs),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    match cli.command {
        Commands::Features => commands::catalog::features(output_format),
        Commands::Presets => commands::catalog::presets(output_format),
        Commands::Prompt(args) => commands::prompt::handle(args, output_format),
        Commands::Token(args) => commands::token::handle(args, output_format),
        Commands::Check(args) => commands::check::handle(args, output_format).await,
    }
}
