use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::info;

use shortsafe::config::Config;
use shortsafe::detection::RemoteClassifier;
use shortsafe::gate::decide;
use shortsafe::lexicon::Lexicon;
use shortsafe::output::terminal;

/// ShortSafe: toxicity screening for short-video titles and captions.
///
/// Scores text with a remote classifier when one is reachable and falls back
/// to a local lexicon heuristic when it is not.
#[derive(Parser)]
#[command(name = "shortsafe", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Screen a piece of text (remote classifier with local fallback)
    Detect {
        text: String,

        /// Print the result as JSON instead of a colored summary
        #[arg(long)]
        json: bool,
    },

    /// Run only the local heuristic, as used for live typing feedback
    QuickCheck { text: String },

    /// Screen text and run it through the publication gate
    Publish {
        text: String,

        /// Publish even if a warning asks for confirmation
        #[arg(long)]
        confirm: bool,
    },

    /// Screen several texts in one batch request
    Batch {
        #[arg(required = true)]
        texts: Vec<String>,
    },

    /// Check that the remote classifier is reachable
    Health,

    /// Run the reference classifier service
    #[cfg(feature = "web")]
    Serve {
        /// Port to listen on (overrides SHORTSAFE_PORT)
        #[arg(long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("shortsafe=info")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::load()?;
    let lexicon = Arc::new(Lexicon::default());

    match cli.command {
        Commands::Detect { text, json } => {
            let detector = config.detector(lexicon)?;
            let result = detector.detect(&text).await;
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                terminal::display_detection(&text, &result);
            }
        }

        Commands::QuickCheck { text } => {
            let scorer =
                shortsafe::detection::HeuristicScorer::new(lexicon, config.noise_source());
            let result = scorer.quick_check(&text);
            terminal::display_detection(&text, &result);
        }

        Commands::Publish { text, confirm } => {
            let detector = config.detector(lexicon)?;
            let result = detector.detect(&text).await;
            terminal::display_detection(&text, &result);

            // Without --confirm a pending prompt counts as unanswered
            let decision = decide(&result, Some(confirm));
            info!(state = %decision.state, score = result.score, "Gate decision");
            terminal::display_gate_decision(&decision);

            if !decision.allowed {
                anyhow::bail!("Publication blocked");
            }
        }

        Commands::Batch { texts } => {
            let detector = config.detector(lexicon)?;
            let results = detector.detect_batch(&texts).await;
            terminal::display_batch(&texts, &results);
        }

        Commands::Health => {
            let url = config.require_classifier_url()?;
            let client = RemoteClassifier::new(url, config.classifier_timeout)?;
            println!("Checking classifier at {}...", client.base_url());
            match client.health().await {
                Ok(health) => {
                    println!("  Status: {}", health.status.green());
                    if let Some(model) = &health.model {
                        println!("  Model: {model}");
                    }
                    if let Some(version) = &health.version {
                        println!("  Version: {version}");
                    }
                    if !health.endpoints.is_empty() {
                        println!("  Endpoints: {}", health.endpoints.join(", "));
                    }
                }
                Err(e) => {
                    println!("  {} {}", "Unavailable:".red(), e);
                    println!(
                        "{}",
                        "Detection will fall back to the local heuristic.".dimmed()
                    );
                }
            }
        }

        #[cfg(feature = "web")]
        Commands::Serve { port } => {
            let port = port.unwrap_or(config.port);
            info!(port = port, "Starting reference classifier");
            let state = shortsafe::web::AppState::new(lexicon);
            shortsafe::web::run_server(state, &config.bind, port).await?;
        }
    }

    Ok(())
}
