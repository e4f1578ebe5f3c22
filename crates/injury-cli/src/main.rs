//! Injury Insight CLI - Command-line interface
//!
//! Usage:
//!   injury token --subject <name> [--minutes N]
//!   injury frequencies <severity|body-part>
//!   injury ask <severity|body-part> <question>

use anyhow::Context;
use clap::{Parser, Subcommand};
use injury_analysis::{ChatCompletionClient, InjuryAnalyzer};
use injury_api::auth::{generate_access_token, JwtConfig};
use injury_core::{AppConfig, Topic};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "injury")]
#[command(about = "OSHA injury statistics analysis CLI")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Mint a signed access token for the API
    Token {
        /// Subject recorded in the token
        #[arg(long)]
        subject: String,
        /// Lifetime in minutes (defaults to the configured expiration)
        #[arg(long)]
        minutes: Option<u64>,
    },
    /// Print the frequency table for a topic as JSON
    Frequencies {
        /// severity or body-part
        topic: String,
    },
    /// Run a full analysis locally
    Ask {
        /// severity or body-part
        topic: String,
        /// Question to ask
        question: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("Failed to load configuration")?;

    // Logs go to stderr so stdout stays machine-readable
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Token { subject, minutes } => {
            if config.auth.uses_placeholder_secret() {
                tracing::warn!("SECRET_KEY is not set; token is signed with the placeholder secret");
            }
            let mut jwt = JwtConfig::from_auth_config(&config.auth);
            if let Some(minutes) = minutes {
                jwt.access_expiration_secs = minutes.saturating_mul(60);
            }
            let token = generate_access_token(&jwt, &subject)?;
            println!("{token}");
        }
        Commands::Frequencies { topic } => {
            let topic: Topic = topic.parse()?;
            let analyzer = analyzer(&config)?;
            let table = analyzer.frequencies(topic).await?;
            println!("{}", serde_json::to_string_pretty(&table)?);
        }
        Commands::Ask { topic, question } => {
            let topic: Topic = topic.parse()?;
            let analyzer = analyzer(&config)?;
            let analysis = analyzer.analyze(topic, &question).await?;
            println!("{}", serde_json::to_string_pretty(&analysis)?);
        }
    }

    Ok(())
}

fn analyzer(config: &AppConfig) -> anyhow::Result<InjuryAnalyzer> {
    let completion = ChatCompletionClient::from_config(&config.llm)?;
    Ok(InjuryAnalyzer::new(
        config.dataset.clone(),
        Arc::new(completion),
    ))
}
