// Setup status display — credentials, classifier backend, model files.

use colored::Colorize;

use crate::config::{ClassifierBackend, Config};
use crate::sentiment::download::{export_command, model_files_present, MODEL_FILE};

/// Display setup status to the terminal. Secret values are never printed.
pub fn show(config: &Config) {
    println!("{}", "=== commentmood status ===".bold());

    println!("\nReddit credentials:");
    let missing = config.missing_reddit_vars();
    for name in ["REDDIT_CLIENT_ID", "REDDIT_CLIENT_SECRET", "REDDIT_USER_AGENT"] {
        let state = if missing.contains(&name) {
            "missing".red()
        } else {
            "set".green()
        };
        println!("  {:<22} {}", name, state);
    }

    println!("\nSentiment classifier: {}", config.classifier_backend.name());
    match config.classifier_backend {
        ClassifierBackend::Onnx => {
            let present = model_files_present(&config.model_dir);
            println!(
                "  Model directory: {} ({})",
                config.model_dir.display(),
                if present {
                    "files present".green()
                } else {
                    "files missing".red()
                }
            );
            if !present {
                println!("  Run `commentmood download-model` to fetch them.");
                if !config.model_dir.join(MODEL_FILE).exists() {
                    println!(
                        "  If the model repo has no ONNX graph, export one with:\n    {}",
                        export_command(&config.model_dir)
                    );
                }
            }
        }
        ClassifierBackend::HuggingFace => {
            let state = if config.hf_api_token.is_empty() {
                "missing".red()
            } else {
                "set".green()
            };
            println!("  HF_API_TOKEN: {}", state);
            println!("  Endpoint: {}", config.hf_inference_url);
        }
    }

    println!("\nOutput directory: {}", config.output_dir.display());
}
