use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::info;

use commentmood::config::{ClassifierBackend, Config};
use commentmood::pipeline::{self, PipelineOutcome, Stage};
use commentmood::reddit::client::RedditClient;
use commentmood::reddit::source::SearchQuery;
use commentmood::sentiment::SentimentClassifier;

/// commentmood: sentiment report for Reddit comments.
///
/// Searches a subreddit for a keyword, classifies the sentiment of the
/// comments under the top results and renders a word cloud and a
/// sentiment bar chart.
#[derive(Parser)]
#[command(name = "commentmood", version, about)]
struct Cli {
    /// Defaults to `run` when omitted
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch, clean, classify and report (the default)
    Run,

    /// Download the ONNX sentiment model
    DownloadModel,

    /// Show which credentials and model files are configured
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("commentmood=info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run().await?,

        Commands::DownloadModel => {
            let config = Config::load();
            let model_dir = &config.model_dir;

            println!("Downloading ONNX sentiment model...");
            println!("  Source: {}", config.model_url);
            println!("  Destination: {}", model_dir.display());

            commentmood::sentiment::download::download_model(&config.model_url, model_dir)
                .await?;

            println!("\n{}", "Model downloaded successfully.".bold());
            println!("You can now run `commentmood run`.");
        }

        Commands::Status => {
            let config = Config::load();
            commentmood::status::show(&config);
        }
    }

    Ok(())
}

/// The full pipeline. Missing credentials and a failed Reddit connection
/// abort with an error; every later problem ends in "nothing to report".
async fn run() -> Result<()> {
    println!("{}", "Loading credentials and connecting to Reddit...".bold());

    let config = Config::load();
    config.require_reddit()?;
    info!(stage = %Stage::CredentialsLoaded, "Credentials loaded");

    let client = RedditClient::connect(&config)
        .await
        .context("Could not connect to Reddit")?;
    println!("  {} Connected to the Reddit API", "✓".green());

    let query = SearchQuery::default();
    let outcome = pipeline::run(&client, &query, || create_classifier(&config)).await;

    match outcome {
        PipelineOutcome::Ready(table) => {
            println!("\n{}", "Rendering charts...".bold());

            let run_dir = config
                .output_dir
                .join(chrono::Local::now().format("%Y%m%d-%H%M%S").to_string());
            let files = commentmood::report::render(&table, &query.keyword, &run_dir)?;

            info!(stage = %Stage::Reported, rows = table.len(), "Report complete");
            println!("\n{}", "Charts saved:".bold());
            println!("  Word cloud: {}", files.word_cloud.display());
            println!("  Sentiment:  {}", files.bar_chart.display());
        }
        PipelineOutcome::NothingToReport { stage, reason } => {
            info!(stage = %stage, reason = %reason, "Nothing to report");
            println!(
                "\n{}",
                format!("Nothing to analyze or visualize: {reason}.").yellow()
            );
            println!("Check the search settings and your credentials, then try again.");
        }
    }

    Ok(())
}

/// Create a sentiment classifier based on the configured backend.
fn create_classifier(config: &Config) -> Result<Box<dyn SentimentClassifier>> {
    config.require_classifier()?;
    match config.classifier_backend {
        ClassifierBackend::Onnx => {
            info!("Using local ONNX sentiment classifier");
            let classifier =
                commentmood::sentiment::onnx::OnnxSentimentClassifier::load(&config.model_dir)?;
            Ok(Box::new(classifier))
        }
        ClassifierBackend::HuggingFace => {
            info!("Using Hugging Face Inference API sentiment classifier");
            let classifier = commentmood::sentiment::huggingface::HuggingFaceClassifier::new(
                &config.hf_inference_url,
                config.hf_api_token.clone(),
            );
            Ok(Box::new(classifier))
        }
    }
}
